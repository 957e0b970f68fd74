//! File and stream I/O
//!
//! Sources and targets are file specs in the engine's spirit: an optional
//! leading "FORMAT:" tag forces the codec, "-" names the standard streams,
//! anything else is a path whose extension picks the format.

use std::fs;
use std::io::{self, Cursor, Read, Write};

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

use pixelboard_core::{ComposeError, ComposeResult, Gravity, Placement};

use crate::canvas::Canvas;

/// Split an optional "FORMAT:" tag off a file spec.
fn split_format(spec: &str) -> ComposeResult<(Option<ImageFormat>, &str)> {
    if let Some((tag, rest)) = spec.split_once(':') {
        if !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            let format = ImageFormat::from_extension(tag.to_ascii_lowercase())
                .ok_or_else(|| ComposeError::UnknownFormat(tag.to_string()))?;
            return Ok((Some(format), rest));
        }
    }
    Ok((None, spec))
}

/// Pick a scaling filter by downscale ratio: cheap filters for heavy
/// reductions, Lanczos when the sizes are close.
pub fn select_filter(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

impl Canvas {
    /// Load an image from a file (or stdin for "-"), scale it to fit the
    /// canvas minus `margin` on each edge, and overlay it centered.
    /// `stretch` forces the exact target size instead of preserving the
    /// aspect ratio.
    pub fn read(&mut self, source: &str, margin: u32, stretch: bool) -> ComposeResult<()> {
        let (format, path) = split_format(source)?;

        let bytes = if path == "-" {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            buf
        } else {
            fs::read(path)?
        };

        let decoded = match format {
            Some(format) => image::load_from_memory_with_format(&bytes, format)?,
            None => ImageReader::new(Cursor::new(&bytes))
                .with_guessed_format()?
                .decode()?,
        };

        let span = margin as u64 * 2;
        if span >= self.width as u64 || span >= self.height as u64 {
            return Err(ComposeError::MarginExceedsCanvas {
                margin,
                width: self.width,
                height: self.height,
            });
        }
        let target_width = self.width - margin * 2;
        let target_height = self.height - margin * 2;

        let (from_width, from_height) = decoded.dimensions();
        let filter = select_filter(from_width, from_height, target_width, target_height);
        let scaled = if stretch {
            decoded.resize_exact(target_width, target_height, filter)
        } else {
            decoded.resize(target_width, target_height, filter)
        };
        let (to_width, to_height) = scaled.dimensions();
        tracing::debug!(
            source = path,
            from_width,
            from_height,
            to_width,
            to_height,
            stretch,
            "scaled source image"
        );

        self.overlay(&scaled.to_rgba8(), Placement::Anchored(Gravity::Center));
        Ok(())
    }

    /// Encode the canvas to a file, or to stdout for "-" (PNG unless a
    /// "FORMAT:" tag says otherwise).
    pub fn write(&self, target: &str) -> ComposeResult<()> {
        let (format, path) = split_format(target)?;

        if path == "-" {
            let format = format.unwrap_or(ImageFormat::Png);
            let mut buf = Vec::new();
            self.encodable(format)
                .write_to(&mut Cursor::new(&mut buf), format)?;
            io::stdout().lock().write_all(&buf)?;
            return Ok(());
        }

        let format = match format {
            Some(format) => format,
            None => ImageFormat::from_path(path)?,
        };
        self.encodable(format).save_with_format(path, format)?;
        tracing::debug!(target = path, format = ?format, "wrote canvas");
        Ok(())
    }

    // JPEG has no alpha channel; everything else keeps RGBA.
    fn encodable(&self, format: ImageFormat) -> DynamicImage {
        if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgba8(self.image.clone()).to_rgb8().into()
        } else {
            DynamicImage::ImageRgba8(self.image.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_format_recognizes_tags() {
        let (format, rest) = split_format("PNG:frame.data").unwrap();
        assert_eq!(format, Some(ImageFormat::Png));
        assert_eq!(rest, "frame.data");

        let (format, rest) = split_format("jpeg:-").unwrap();
        assert_eq!(format, Some(ImageFormat::Jpeg));
        assert_eq!(rest, "-");
    }

    #[test]
    fn split_format_passes_plain_paths() {
        let (format, rest) = split_format("shot.png").unwrap();
        assert_eq!(format, None);
        assert_eq!(rest, "shot.png");

        let (format, rest) = split_format("-").unwrap();
        assert_eq!(format, None);
        assert_eq!(rest, "-");
    }

    #[test]
    fn split_format_rejects_unknown_tag() {
        let err = split_format("NOPE:file").unwrap_err();
        assert_eq!(err.error_type(), "UnknownFormat");
    }

    #[test]
    fn filter_by_ratio() {
        assert_eq!(select_filter(1000, 1000, 100, 100), FilterType::Triangle);
        assert_eq!(select_filter(160, 160, 100, 100), FilterType::CatmullRom);
        assert_eq!(select_filter(100, 100, 100, 100), FilterType::Lanczos3);
        assert_eq!(select_filter(50, 50, 100, 100), FilterType::Lanczos3);
    }
}
