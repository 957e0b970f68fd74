//! Multi-line text layout
//!
//! Text is laid out into a transparent layer and composited onto the
//! canvas. Capacity, wrapping and clipping are all computed in columns and
//! rows of the reference glyph, which makes them exact for monospaced fonts
//! and an approximation for proportional ones.

use std::path::PathBuf;

use ab_glyph::PxScale;
use imageproc::drawing::{draw_text_mut, text_size};
use serde::{Deserialize, Serialize};

use pixelboard_core::{Color, ComposeResult, Gravity, HAlign, Placement, VAlign};

use crate::canvas::Canvas;
use crate::font::{self, GlyphMetrics};

/// Tab stops match the usual 8-column convention.
pub const TAB_STOP: usize = 8;

/// Parameters for a text block. All fields have documented defaults; build
/// one with struct update syntax from `TextStyle::default()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Text box offset in the canvas.
    pub left: i64,
    pub top: i64,
    /// Text box size; `None` falls back to the full canvas dimension.
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Bounding region (left, top, right, bottom) in fractional or absolute
    /// edges; overrides `left`/`top`/`width`/`height` when set.
    pub region: Option<(f64, f64, f64, f64)>,
    /// Anchor for the block inside its box.
    pub gravity: Gravity,
    /// Wrap long lines at word boundaries to fit the column capacity.
    pub wrap: bool,
    /// Drop rows and columns that do not fit; `false` renders partial
    /// glyphs at the box edge instead.
    pub clip: bool,
    /// Point size.
    pub point: f32,
    /// Fill color; `None` uses the canvas foreground.
    pub fg: Option<Color>,
    /// Layer background behind the text.
    pub bg: Color,
    /// Font file; `None` uses the canvas default.
    pub font: Option<PathBuf>,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            left: 0,
            top: 0,
            width: None,
            height: None,
            region: None,
            gravity: Gravity::NorthWest,
            wrap: false,
            clip: true,
            point: 20.0,
            fg: None,
            bg: Color::TRANSPARENT,
            font: None,
        }
    }
}

/// Expand tabs to spaces at fixed column stops.
pub fn expand_tabs(line: &str, tab_stop: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = tab_stop - (col % tab_stop);
            for _ in 0..pad {
                out.push(' ');
            }
            col += pad;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

/// Column and row capacity of a text box under the given metrics.
pub fn capacity(box_width: u32, box_height: u32, metrics: &GlyphMetrics) -> (usize, usize) {
    let max_cols = if metrics.advance > 0.0 {
        (box_width as f32 / metrics.advance) as usize
    } else {
        0
    };
    let max_lines = (box_height as f32 / (metrics.line_height + 1.0)) as usize;
    (max_cols, max_lines)
}

/// Greedily break one line into segments of at most `max_cols` columns,
/// preferring the last space at or before the limit and hard-breaking when
/// a span has no space. Trailing spaces are stripped between rounds.
pub fn wrap_line(line: &str, max_cols: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = line.trim_end_matches(' ').to_string();
    if max_cols == 0 {
        return vec![rest];
    }
    while rest.chars().count() > max_cols {
        let head: String = rest.chars().take(max_cols).collect();
        match head.rfind(' ') {
            Some(i) => {
                out.push(rest[..i].to_string());
                rest = rest[i + 1..].to_string();
            }
            None => {
                rest = rest[head.len()..].to_string();
                out.push(head);
            }
        }
        rest = rest.trim_end_matches(' ').to_string();
    }
    out.push(rest);
    out
}

/// Truncate to the box capacity: drop rows past `max_lines`, then columns
/// past `max_cols` on the kept rows. Idempotent after wrapping.
pub fn clip_lines(lines: &mut Vec<String>, max_lines: usize, max_cols: usize) {
    lines.truncate(max_lines);
    for line in lines.iter_mut() {
        if line.chars().count() > max_cols {
            *line = line.chars().take(max_cols).collect();
        }
    }
}

/// Baseline of the first line for a block anchored by `gravity`: top rows
/// hang from the ascent, bottom rows sit the descent above the box bottom,
/// middle rows center the block.
pub fn first_baseline(
    gravity: Gravity,
    box_height: u32,
    line_count: usize,
    metrics: &GlyphMetrics,
) -> f32 {
    let block_height = line_count as f32 * metrics.line_height;
    match gravity.row() {
        VAlign::Top => metrics.ascent,
        VAlign::Middle => (box_height as f32 - block_height) / 2.0 + metrics.ascent,
        VAlign::Bottom => box_height as f32 - block_height + metrics.ascent,
    }
}

impl Canvas {
    /// Lay out and render a text block, then composite it onto the canvas.
    ///
    /// Line breaks split the text, tabs expand to spaces. The box comes
    /// from `style.region` when set, else from the explicit offset/size
    /// fields. A box too small for any text is a no-op, not an error.
    pub fn text(&mut self, text: &str, style: &TextStyle) -> ComposeResult<()> {
        let mut lines: Vec<String> = text
            .lines()
            .map(|line| expand_tabs(line, TAB_STOP))
            .collect();

        let (left, top, width, height) = match style.region {
            Some((l, t, r, b)) => {
                let region = self.region(l, t, r, b)?;
                (region.left, region.top, region.width, region.height)
            }
            None => (
                style.left,
                style.top,
                style.width.unwrap_or(self.width),
                style.height.unwrap_or(self.height),
            ),
        };

        let font = font::load(style.font.as_deref().or(self.font_path.as_deref()))?;
        let metrics = font::reference_metrics(&font, style.point);
        let (max_cols, max_lines) = capacity(width, height, &metrics);

        if style.wrap {
            lines = lines
                .iter()
                .flat_map(|line| wrap_line(line, max_cols))
                .collect();
        }
        if style.clip {
            clip_lines(&mut lines, max_lines, max_cols);
        }
        if lines.is_empty() {
            tracing::debug!(width, height, "text box has no capacity, nothing to draw");
            return Ok(());
        }

        let scale = PxScale::from(style.point);
        let fill = style.fg.unwrap_or(self.foreground).to_rgba();
        let mut layer = self.layer(Some(width), Some(height), style.bg);
        let baseline = first_baseline(style.gravity, height, lines.len(), &metrics);

        for (index, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (line_width, _) = text_size(scale, &font, line);
            let x = match style.gravity.column() {
                HAlign::Left => 0.0,
                HAlign::Center => (width as f32 - line_width as f32) / 2.0,
                HAlign::Right => width as f32 - line_width as f32,
            };
            let y = baseline - metrics.ascent + index as f32 * metrics.line_height;
            draw_text_mut(
                &mut layer,
                fill,
                x.round() as i32,
                y.round() as i32,
                scale,
                &font,
                line,
            );
        }

        self.overlay(&layer, Placement::At(left, top));
        tracing::debug!(
            lines = lines.len(),
            left,
            top,
            width,
            height,
            gravity = %style.gravity,
            "rendered text block"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono_metrics() -> GlyphMetrics {
        GlyphMetrics {
            ascent: 10.0,
            descent: -3.0,
            line_height: 14.0,
            advance: 8.0,
        }
    }

    #[test]
    fn expand_tabs_at_stops() {
        assert_eq!(expand_tabs("a\tb", 8), "a       b");
        assert_eq!(expand_tabs("\tx", 8), "        x");
        assert_eq!(expand_tabs("12345678\ty", 8), "12345678        y");
        assert_eq!(expand_tabs("plain", 8), "plain");
    }

    #[test]
    fn capacity_floors() {
        let m = mono_metrics();
        // 100 / 8 = 12.5 -> 12 columns; 50 / 15 = 3.33 -> 3 lines.
        assert_eq!(capacity(100, 50, &m), (12, 3));
        assert_eq!(capacity(7, 10, &m), (0, 0));
    }

    #[test]
    fn wrap_breaks_at_last_space() {
        // The last space inside the first 11 columns is after "hello".
        assert_eq!(
            wrap_line("hello brave world", 11),
            vec!["hello", "brave world"]
        );
        assert_eq!(wrap_line("one two three", 8), vec!["one two", "three"]);
    }

    #[test]
    fn wrap_hard_breaks_without_space() {
        assert_eq!(wrap_line("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_strips_trailing_spaces() {
        assert_eq!(wrap_line("short   ", 10), vec!["short"]);
        assert_eq!(wrap_line("aaa bbb   ", 4), vec!["aaa", "bbb"]);
    }

    #[test]
    fn wrap_keeps_short_lines() {
        assert_eq!(wrap_line("fits", 10), vec!["fits"]);
        assert_eq!(wrap_line("", 10), vec![""]);
    }

    #[test]
    fn clip_drops_rows_then_columns() {
        let mut lines: Vec<String> = vec!["abcdef".into(), "gh".into(), "ijklmn".into()];
        clip_lines(&mut lines, 2, 4);
        assert_eq!(lines, vec!["abcd", "gh"]);
    }

    #[test]
    fn clip_is_idempotent_after_wrap() {
        let mut lines = wrap_line("lorem ipsum dolor", 5);
        let before = lines.clone();
        clip_lines(&mut lines, 10, 5);
        assert_eq!(lines, before);
    }

    #[test]
    fn first_baseline_rows() {
        let m = mono_metrics();
        assert_eq!(first_baseline(Gravity::NorthWest, 100, 2, &m), 10.0);
        // Bottom: block of 2 lines is 28 tall, so top of block is 72.
        assert_eq!(first_baseline(Gravity::South, 100, 2, &m), 82.0);
        // Middle: (100 - 28) / 2 = 36 block top.
        assert_eq!(first_baseline(Gravity::West, 100, 2, &m), 46.0);
    }

    #[test]
    fn text_into_zero_capacity_box_is_noop() {
        let mut canvas = Canvas::new(100, 100, Color::BLACK, Color::WHITE).unwrap();
        let style = TextStyle {
            width: Some(4),
            height: Some(4),
            ..TextStyle::default()
        };
        canvas.text("does not fit", &style).unwrap();
        for pixel in canvas.rgb().chunks_exact(3) {
            assert_eq!(pixel, [0, 0, 0]);
        }
    }

    #[test]
    fn text_draws_pixels_in_foreground() {
        let mut canvas = Canvas::new(120, 60, Color::BLACK, Color::WHITE).unwrap();
        canvas.text("Hi", &TextStyle::default()).unwrap();
        let lit = canvas
            .rgb()
            .chunks_exact(3)
            .filter(|px| px[0] > 200)
            .count();
        assert!(lit > 0, "expected some white text pixels");
    }

    #[test]
    fn text_defaults_box_to_canvas_size() {
        // A southeast-anchored block must land near the canvas corner when
        // no box is given.
        let mut canvas = Canvas::new(200, 80, Color::BLACK, Color::WHITE).unwrap();
        let style = TextStyle {
            gravity: Gravity::SouthEast,
            ..TextStyle::default()
        };
        canvas.text("x", &style).unwrap();
        let img = canvas.pixels();
        let mut lit_right_half = 0;
        let mut lit_left_half = 0;
        for (x, _, pixel) in img.enumerate_pixels() {
            if pixel[0] > 200 {
                if x >= 100 {
                    lit_right_half += 1;
                } else {
                    lit_left_half += 1;
                }
            }
        }
        assert!(lit_right_half > 0);
        assert_eq!(lit_left_half, 0);
    }

    #[test]
    fn text_region_overrides_offsets() {
        let mut canvas = Canvas::new(100, 100, Color::BLACK, Color::WHITE).unwrap();
        let style = TextStyle {
            left: 0,
            top: 0,
            region: Some((0.5, 0.5, 1.0, 1.0)),
            ..TextStyle::default()
        };
        canvas.text("Q", &style).unwrap();
        for (x, y, pixel) in canvas.pixels().enumerate_pixels() {
            if pixel[0] > 200 {
                assert!(x >= 50 && y >= 50, "lit pixel outside region at {x},{y}");
            }
        }
    }

    #[test]
    fn malformed_region_fails_before_drawing() {
        let mut canvas = Canvas::new(100, 100, Color::BLACK, Color::WHITE).unwrap();
        let style = TextStyle {
            region: Some((0.9, 0.0, 0.1, 1.0)),
            ..TextStyle::default()
        };
        let err = canvas.text("nope", &style).unwrap_err();
        assert_eq!(err.error_type(), "MalformedRegion");
        for pixel in canvas.rgb().chunks_exact(3) {
            assert_eq!(pixel, [0, 0, 0]);
        }
    }
}
