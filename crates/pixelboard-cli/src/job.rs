//! JSON job descriptions
//!
//! A job is a canvas plus an ordered list of operations, so a whole
//! composition can be described in one file and replayed from the CLI.

use serde::{Deserialize, Serialize};

use pixelboard_core::{Color, ComposeResult};

use pixelboard_compose::{Canvas, TextStyle};

fn default_background() -> Color {
    Color::BLACK
}

fn default_foreground() -> Color {
    Color::WHITE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_background")]
    pub bg: Color,
    #[serde(default = "default_foreground")]
    pub fg: Color,
    pub ops: Vec<Op>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Draw a text block.
    Text {
        text: String,
        #[serde(flatten)]
        style: TextStyle,
    },
    /// Stroke the canvas edge.
    Border { width: u32 },
    /// Load, scale and center an image file.
    Place {
        source: String,
        #[serde(default)]
        margin: u32,
        #[serde(default)]
        stretch: bool,
    },
}

impl Job {
    /// Build the canvas and run every operation in order.
    pub fn run(&self) -> ComposeResult<Canvas> {
        let mut canvas = Canvas::new(self.width, self.height, self.bg, self.fg)?;
        for op in &self.ops {
            match op {
                Op::Text { text, style } => canvas.text(text, style)?,
                Op::Border { width } => canvas.border(*width),
                Op::Place {
                    source,
                    margin,
                    stretch,
                } => canvas.read(source, *margin, *stretch)?,
            }
        }
        Ok(canvas)
    }
}
