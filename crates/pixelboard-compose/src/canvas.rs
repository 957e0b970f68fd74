//! The canvas: one backing raster image plus composition defaults
//!
//! Every drawing operation mutates the canvas in place. Layers are built,
//! composited with "over" alpha semantics, then dropped; nothing here keeps
//! state beyond the pixel buffer and the default colors.

use std::path::PathBuf;

use bytes::Bytes;
use image::{DynamicImage, RgbImage, RgbaImage};
use image::imageops;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use pixelboard_core::{Color, ComposeConfig, ComposeError, ComposeResult, Placement, Region};

#[derive(Debug)]
pub struct Canvas {
    pub(crate) image: RgbaImage,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) foreground: Color,
    pub(crate) background: Color,
    pub(crate) font_path: Option<PathBuf>,
}

impl Canvas {
    /// Create a blank canvas filled with the background color.
    pub fn new(width: u32, height: u32, background: Color, foreground: Color) -> ComposeResult<Canvas> {
        if width == 0 || height == 0 {
            return Err(ComposeError::EmptyGeometry { width, height });
        }
        let image = RgbaImage::from_pixel(width, height, background.to_rgba());
        Ok(Canvas {
            image,
            width,
            height,
            foreground,
            background,
            font_path: None,
        })
    }

    /// Create a canvas with the colors and default font of a config.
    pub fn from_config(width: u32, height: u32, config: &ComposeConfig) -> ComposeResult<Canvas> {
        let mut canvas = Canvas::new(width, height, config.background, config.foreground)?;
        canvas.font_path = config.font_path.clone();
        Ok(canvas)
    }

    /// Create a canvas initialized from a raw 8-bit RGB buffer.
    pub fn from_rgb(
        width: u32,
        height: u32,
        rgb: &[u8],
        background: Color,
        foreground: Color,
    ) -> ComposeResult<Canvas> {
        if width == 0 || height == 0 {
            return Err(ComposeError::EmptyGeometry { width, height });
        }
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(ComposeError::RgbLengthMismatch {
                width,
                height,
                expected,
                actual: rgb.len(),
            });
        }
        // Checked above, from_raw only fails on a length mismatch.
        let pixels = RgbImage::from_raw(width, height, rgb.to_vec()).ok_or(
            ComposeError::RgbLengthMismatch {
                width,
                height,
                expected,
                actual: rgb.len(),
            },
        )?;
        Ok(Canvas {
            image: DynamicImage::ImageRgb8(pixels).to_rgba8(),
            width,
            height,
            foreground,
            background,
            font_path: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Normalize a bounding region against this canvas, per the fractional
    /// (<= 1) or absolute (> 1) edge convention.
    pub fn region(&self, left: f64, top: f64, right: f64, bottom: f64) -> ComposeResult<Region> {
        Region::from_edges(left, top, right, bottom, self.width, self.height)
    }

    /// Allocate a transparent layer for a later overlay. Defaults to canvas
    /// size; has no effect on the canvas itself.
    pub fn layer(&self, width: Option<u32>, height: Option<u32>, background: Color) -> RgbaImage {
        RgbaImage::from_pixel(
            width.unwrap_or(self.width),
            height.unwrap_or(self.height),
            background.to_rgba(),
        )
    }

    /// Composite a layer onto the canvas with "over" alpha semantics, at an
    /// explicit offset or a gravity anchor. The layer is left untouched.
    pub fn overlay(&mut self, layer: &RgbaImage, placement: Placement) {
        let (x, y) = match placement {
            Placement::At(x, y) => (x, y),
            Placement::Anchored(gravity) => gravity.anchor(
                (self.width, self.height),
                (layer.width(), layer.height()),
            ),
        };
        imageops::overlay(&mut self.image, layer, x, y);
    }

    /// Stroke an unfilled rectangle along the canvas edge in the foreground
    /// color, `stroke_width` pixels deep. Interior pixels stay untouched.
    pub fn border(&mut self, stroke_width: u32) {
        let color = self.foreground.to_rgba();
        for inset in 0..stroke_width {
            if inset * 2 >= self.width || inset * 2 >= self.height {
                break;
            }
            let rect = Rect::at(inset as i32, inset as i32)
                .of_size(self.width - inset * 2, self.height - inset * 2);
            draw_hollow_rect_mut(&mut self.image, rect, color);
        }
        tracing::debug!(stroke_width, "drew border");
    }

    /// Raw 8-bit RGB pixel data, row-major, alpha dropped.
    pub fn rgb(&self) -> Bytes {
        let rgb = DynamicImage::ImageRgba8(self.image.clone()).to_rgb8();
        Bytes::from(rgb.into_raw())
    }

    /// Borrow the backing image, mainly for pixel assertions in tests.
    pub fn pixels(&self) -> &RgbaImage {
        &self.image
    }
}
