//! Framebuffer pixel packing
//!
//! Maps raw RGB frames (the `Canvas::rgb` payload) to the pixel layouts a
//! Linux framebuffer device expects, and pushes packed frames to the device
//! at a pixel offset. Device geometry comes from configuration; querying it
//! from the driver is the display side's job, not this crate's.

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pixelboard_core::{ComposeError, ComposeResult};

/// Pixel layout of the target framebuffer, little-endian throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelLayout {
    /// 16bpp, 5-6-5.
    Rgb565,
    /// 24bpp, blue in the lowest byte.
    Rgb888,
    /// 32bpp with an opaque alpha byte, blue in the lowest byte.
    Xrgb8888,
}

impl PixelLayout {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelLayout::Rgb565 => 2,
            PixelLayout::Rgb888 => 3,
            PixelLayout::Xrgb8888 => 4,
        }
    }

    // Red, green, blue bit offsets within the packed word.
    fn shifts(&self) -> (u32, u32, u32) {
        match self {
            PixelLayout::Rgb565 => (11, 5, 0),
            PixelLayout::Rgb888 | PixelLayout::Xrgb8888 => (16, 8, 0),
        }
    }
}

/// Pack a raw RGB frame into the given layout.
pub fn pack(rgb: &[u8], layout: PixelLayout) -> ComposeResult<Vec<u8>> {
    if rgb.len() % 3 != 0 {
        return Err(ComposeError::InvalidInput(format!(
            "rgb frame of {} bytes is not a whole number of pixels",
            rgb.len()
        )));
    }
    let (red, green, blue) = layout.shifts();
    let mut out = Vec::with_capacity(rgb.len() / 3 * layout.bytes_per_pixel());
    for px in rgb.chunks_exact(3) {
        match layout {
            PixelLayout::Rgb565 => {
                let word = (((px[0] >> 3) as u16) << red)
                    | (((px[1] >> 2) as u16) << green)
                    | (((px[2] >> 3) as u16) << blue);
                out.extend_from_slice(&word.to_le_bytes());
            }
            PixelLayout::Rgb888 => {
                let word =
                    ((px[0] as u32) << red) | ((px[1] as u32) << green) | ((px[2] as u32) << blue);
                out.extend_from_slice(&word.to_le_bytes()[..3]);
            }
            PixelLayout::Xrgb8888 => {
                let word = ((px[0] as u32) << red)
                    | ((px[1] as u32) << green)
                    | ((px[2] as u32) << blue)
                    | 0xff00_0000;
                out.extend_from_slice(&word.to_le_bytes());
            }
        }
    }
    Ok(out)
}

/// Unpack framebuffer bytes back to raw RGB. The 565 layout loses the low
/// channel bits, so its round-trip is lossy by construction.
pub fn unpack(packed: &[u8], layout: PixelLayout) -> ComposeResult<Vec<u8>> {
    let bpp = layout.bytes_per_pixel();
    if packed.len() % bpp != 0 {
        return Err(ComposeError::InvalidInput(format!(
            "framebuffer data of {} bytes is not a whole number of {}-byte pixels",
            packed.len(),
            bpp
        )));
    }
    let (red, green, blue) = layout.shifts();
    let mut out = Vec::with_capacity(packed.len() / bpp * 3);
    for px in packed.chunks_exact(bpp) {
        match layout {
            PixelLayout::Rgb565 => {
                let word = u16::from_le_bytes([px[0], px[1]]);
                out.push(((word >> red) as u8) << 3);
                out.push(((word >> green) as u8) << 2);
                out.push(((word >> blue) as u8) << 3);
            }
            PixelLayout::Rgb888 | PixelLayout::Xrgb8888 => {
                let word = u32::from_le_bytes([px[0], px[1], px[2], *px.get(3).unwrap_or(&0)]);
                out.push((word >> red) as u8);
                out.push((word >> green) as u8);
                out.push((word >> blue) as u8);
            }
        }
    }
    Ok(out)
}

/// Geometry of a framebuffer device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramebufferInfo {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
}

impl FramebufferInfo {
    pub fn pixel_capacity(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A framebuffer device as a frame sink.
#[derive(Debug)]
pub struct Framebuffer {
    path: PathBuf,
    info: FramebufferInfo,
}

impl Framebuffer {
    pub fn new(path: impl Into<PathBuf>, info: FramebufferInfo) -> Framebuffer {
        Framebuffer {
            path: path.into(),
            info,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&self) -> &FramebufferInfo {
        &self.info
    }

    /// Pack and write a raw RGB frame at the given pixel offset. The write
    /// is rejected whole when offset + frame overruns the device.
    pub fn write_rgb(&self, rgb: &[u8], offset: usize) -> ComposeResult<()> {
        let pixels = rgb.len() / 3;
        let capacity = self.info.pixel_capacity();
        if offset + pixels > capacity {
            return Err(ComposeError::FramebufferRange {
                offset,
                pixels,
                capacity,
            });
        }

        let packed = pack(rgb, self.info.layout)?;
        let mut device = OpenOptions::new().write(true).open(&self.path)?;
        device.seek(SeekFrom::Start(
            (offset * self.info.layout.bytes_per_pixel()) as u64,
        ))?;
        device.write_all(&packed)?;
        tracing::debug!(
            device = %self.path.display(),
            pixels,
            offset,
            layout = ?self.info.layout,
            "pushed frame"
        );
        Ok(())
    }
}
