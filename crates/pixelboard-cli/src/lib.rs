//! Shared helpers for the pixelboard CLI binary.

pub mod job;

use pixelboard_compose::PixelLayout;

/// Parse a "WxH" geometry argument.
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("invalid geometry {s:?}, expected WxH"))?;
    let width = w
        .parse::<u32>()
        .map_err(|_| format!("invalid width: {w:?}"))?;
    let height = h
        .parse::<u32>()
        .map_err(|_| format!("invalid height: {h:?}"))?;
    if width == 0 || height == 0 {
        return Err("geometry must be nonzero".to_string());
    }
    Ok((width, height))
}

/// Parse a framebuffer pixel layout name.
pub fn parse_layout(s: &str) -> Result<PixelLayout, String> {
    match s {
        "rgb565" => Ok(PixelLayout::Rgb565),
        "rgb888" => Ok(PixelLayout::Rgb888),
        "xrgb8888" => Ok(PixelLayout::Xrgb8888),
        _ => Err(format!(
            "unknown layout {s:?}, expected rgb565, rgb888 or xrgb8888"
        )),
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
