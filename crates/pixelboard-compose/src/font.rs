//! Font loading and reference-glyph metrics
//!
//! Rasterization itself happens in `imageproc`; this module only loads the
//! font bytes and reads the scaled metrics that drive the text layout.

use std::fs;
use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};

use pixelboard_core::{ComposeError, ComposeResult};

/// Bundled monospaced font, used when nothing else is configured.
pub static DEFAULT_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Glyph used to measure column capacity. Exact for monospaced fonts,
/// pessimistic for proportional ones (few glyphs are wider than M).
pub const REFERENCE_GLYPH: char = 'M';

/// Load a font from a file, or the bundled default when `path` is `None`.
pub fn load(path: Option<&Path>) -> ComposeResult<FontArc> {
    match path {
        Some(p) => {
            let bytes = fs::read(p)?;
            FontArc::try_from_vec(bytes)
                .map_err(|e| ComposeError::Font(format!("{}: {}", p.display(), e)))
        }
        None => {
            FontArc::try_from_slice(DEFAULT_FONT).map_err(|e| ComposeError::Font(e.to_string()))
        }
    }
}

/// Scaled metrics of the reference glyph at a given point size.
#[derive(Debug, Clone, Copy)]
pub struct GlyphMetrics {
    /// Height of the tallest glyph above the baseline, in pixels.
    pub ascent: f32,
    /// Extent below the baseline, negative, in pixels.
    pub descent: f32,
    /// Baseline-to-baseline distance including the line gap.
    pub line_height: f32,
    /// Horizontal advance of the reference glyph.
    pub advance: f32,
}

pub fn reference_metrics(font: &FontArc, point: f32) -> GlyphMetrics {
    let scaled = font.as_scaled(PxScale::from(point));
    GlyphMetrics {
        ascent: scaled.ascent(),
        descent: scaled.descent(),
        line_height: scaled.height() + scaled.line_gap(),
        advance: scaled.h_advance(font.glyph_id(REFERENCE_GLYPH)),
    }
}
