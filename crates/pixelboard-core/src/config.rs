//! Configuration module
//!
//! Process-wide composition defaults: default colors, point size and the
//! font file used when a text style names none. Defaults can be overridden
//! from the environment; the config is built once at startup and treated as
//! immutable afterwards.

use std::env;
use std::path::PathBuf;

use crate::color::Color;
use crate::error::{ComposeError, ComposeResult};

// Common constants
const DEFAULT_FOREGROUND: Color = Color::WHITE;
const DEFAULT_BACKGROUND: Color = Color::BLACK;
const DEFAULT_POINT_SIZE: f32 = 20.0;

const ENV_FONT: &str = "PIXELBOARD_FONT";
const ENV_FOREGROUND: &str = "PIXELBOARD_FG";
const ENV_BACKGROUND: &str = "PIXELBOARD_BG";
const ENV_POINT_SIZE: &str = "PIXELBOARD_POINT";

/// Composition defaults shared by every canvas built from this config.
#[derive(Clone, Debug)]
pub struct ComposeConfig {
    /// Font file used when a text style names none. `None` selects the
    /// bundled monospaced font.
    pub font_path: Option<PathBuf>,
    pub foreground: Color,
    pub background: Color,
    pub point_size: f32,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        ComposeConfig {
            font_path: None,
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
            point_size: DEFAULT_POINT_SIZE,
        }
    }
}

impl ComposeConfig {
    /// Build a config from the environment, falling back to the defaults
    /// for anything unset. Malformed values are errors, not silent
    /// fallbacks.
    pub fn from_env() -> ComposeResult<Self> {
        let mut config = ComposeConfig::default();

        if let Ok(path) = env::var(ENV_FONT) {
            config.font_path = Some(PathBuf::from(path));
        }
        if let Ok(fg) = env::var(ENV_FOREGROUND) {
            config.foreground = Color::parse(&fg)?;
        }
        if let Ok(bg) = env::var(ENV_BACKGROUND) {
            config.background = Color::parse(&bg)?;
        }
        if let Ok(point) = env::var(ENV_POINT_SIZE) {
            config.point_size = point
                .parse::<f32>()
                .map_err(|_| ComposeError::InvalidInput(format!("point size: {point:?}")))?;
        }

        Ok(config)
    }
}
