//! Error types module
//!
//! All composition failures are unified under the `ComposeError` enum:
//! geometry violations, unknown keywords, engine (decode/encode) errors and
//! plain I/O. Every operation fails whole; a returned error means no layer
//! was composited onto the canvas.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("malformed region: ({left}, {top}) to ({right}, {bottom}) is not northwest to southeast")]
    MalformedRegion {
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
    },

    #[error("unknown gravity: {0:?}")]
    UnknownGravity(String),

    #[error("unknown color: {0:?}")]
    UnknownColor(String),

    #[error("unknown image format: {0:?}")]
    UnknownFormat(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("empty canvas geometry: {width}x{height}")]
    EmptyGeometry { width: u32, height: u32 },

    #[error("rgb buffer is {actual} bytes, {width}x{height}x3 requires {expected}")]
    RgbLengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("margin {margin} leaves no drawable area on {width}x{height}")]
    MarginExceedsCanvas { margin: u32, width: u32, height: u32 },

    #[error("font error: {0}")]
    Font(String),

    #[error("framebuffer range: offset {offset} + {pixels} pixels exceeds {capacity}")]
    FramebufferRange {
        offset: usize,
        pixels: usize,
        capacity: usize,
    },

    #[error("image error: {0}")]
    Image(#[source] image::ImageError),

    #[error("io error: {0}")]
    Io(#[source] io::Error),
}

pub type ComposeResult<T> = Result<T, ComposeError>;

// Error conversion implementations following Rust best practices
impl From<image::ImageError> for ComposeError {
    fn from(err: image::ImageError) -> Self {
        ComposeError::Image(err)
    }
}

impl From<io::Error> for ComposeError {
    fn from(err: io::Error) -> Self {
        ComposeError::Io(err)
    }
}

impl ComposeError {
    /// Get the error type name for reporting
    pub fn error_type(&self) -> &'static str {
        match self {
            ComposeError::MalformedRegion { .. } => "MalformedRegion",
            ComposeError::UnknownGravity(_) => "UnknownGravity",
            ComposeError::UnknownColor(_) => "UnknownColor",
            ComposeError::UnknownFormat(_) => "UnknownFormat",
            ComposeError::InvalidInput(_) => "InvalidInput",
            ComposeError::EmptyGeometry { .. } => "EmptyGeometry",
            ComposeError::RgbLengthMismatch { .. } => "RgbLengthMismatch",
            ComposeError::MarginExceedsCanvas { .. } => "MarginExceedsCanvas",
            ComposeError::Font(_) => "Font",
            ComposeError::FramebufferRange { .. } => "FramebufferRange",
            ComposeError::Image(_) => "Image",
            ComposeError::Io(_) => "Io",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        while let Some(err) = source {
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}
