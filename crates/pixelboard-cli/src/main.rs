//! Pixelboard CLI — compose raster images from the shell.
//!
//! Defaults (colors, point size, font) come from the environment via
//! `ComposeConfig`; see PIXELBOARD_FG / PIXELBOARD_BG / PIXELBOARD_POINT /
//! PIXELBOARD_FONT.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use pixelboard_cli::{init_tracing, job::Job, parse_layout, parse_size};
use pixelboard_compose::{Canvas, Framebuffer, FramebufferInfo, PixelLayout, TextStyle};
use pixelboard_core::{Color, ComposeConfig, Gravity};

#[derive(Parser)]
#[command(name = "pixelboard", about = "Raster image composition CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a blank canvas, optionally with a border
    Create {
        /// Canvas geometry as WxH
        #[arg(value_parser = parse_size)]
        size: (u32, u32),
        /// Background color
        #[arg(long)]
        bg: Option<Color>,
        /// Foreground color (used by --border)
        #[arg(long)]
        fg: Option<Color>,
        /// Border stroke width in pixels
        #[arg(long)]
        border: Option<u32>,
        /// Output file, "-" for stdout
        #[arg(short, long)]
        output: String,
    },
    /// Place an image file on a canvas, scaled and centered
    Place {
        /// Source image, "-" for stdin, "FORMAT:file" to force the codec
        source: String,
        /// Canvas geometry as WxH
        #[arg(long, value_parser = parse_size)]
        size: (u32, u32),
        /// Pixels to leave around the edge
        #[arg(long, default_value = "0")]
        margin: u32,
        /// Fill the box exactly instead of preserving aspect ratio
        #[arg(long)]
        stretch: bool,
        /// Background color
        #[arg(long)]
        bg: Option<Color>,
        /// Output file, "-" for stdout
        #[arg(short, long)]
        output: String,
    },
    /// Render a text banner
    Banner {
        /// Text to render; tabs and line breaks are honored
        text: String,
        /// Canvas geometry as WxH
        #[arg(long, value_parser = parse_size)]
        size: (u32, u32),
        /// Anchor: nw, n, ne, w, c, e, sw, s or se
        #[arg(long, default_value = "c")]
        gravity: Gravity,
        /// Point size
        #[arg(long)]
        point: Option<f32>,
        /// Wrap long lines at word boundaries
        #[arg(long)]
        wrap: bool,
        /// Render partial glyphs instead of clipping to the box
        #[arg(long)]
        no_clip: bool,
        /// Text color
        #[arg(long)]
        fg: Option<Color>,
        /// Background color
        #[arg(long)]
        bg: Option<Color>,
        /// Font file
        #[arg(long)]
        font: Option<PathBuf>,
        /// Output file, "-" for stdout
        #[arg(short, long)]
        output: String,
    },
    /// Run a JSON job description
    Render {
        /// Path to the job file
        job: PathBuf,
        /// Output file, "-" for stdout
        #[arg(short, long)]
        output: String,
    },
    /// Push an image to a framebuffer device
    Push {
        /// Source image, "-" for stdin
        source: String,
        /// Framebuffer device path
        #[arg(long, default_value = "/dev/fb0")]
        device: PathBuf,
        /// Device geometry as WxH
        #[arg(long, value_parser = parse_size)]
        size: (u32, u32),
        /// Pixel layout: rgb565, rgb888 or xrgb8888
        #[arg(long, default_value = "rgb565", value_parser = parse_layout)]
        layout: PixelLayout,
        /// Pixel offset into the device
        #[arg(long, default_value = "0")]
        offset: usize,
        /// Fill the screen exactly instead of preserving aspect ratio
        #[arg(long)]
        stretch: bool,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = ComposeConfig::from_env().context("reading configuration")?;

    match cli.command {
        Commands::Create {
            size: (width, height),
            bg,
            fg,
            border,
            output,
        } => {
            let mut canvas = canvas_with(width, height, &config, bg, fg)?;
            if let Some(stroke) = border {
                canvas.border(stroke);
            }
            canvas.write(&output).context("writing canvas")?;
        }
        Commands::Place {
            source,
            size: (width, height),
            margin,
            stretch,
            bg,
            output,
        } => {
            let mut canvas = canvas_with(width, height, &config, bg, None)?;
            canvas
                .read(&source, margin, stretch)
                .with_context(|| format!("placing {source:?}"))?;
            canvas.write(&output).context("writing canvas")?;
        }
        Commands::Banner {
            text,
            size: (width, height),
            gravity,
            point,
            wrap,
            no_clip,
            fg,
            bg,
            font,
            output,
        } => {
            let mut canvas = canvas_with(width, height, &config, bg, fg)?;
            let style = TextStyle {
                gravity,
                wrap,
                clip: !no_clip,
                point: point.unwrap_or(config.point_size),
                font: font.or_else(|| config.font_path.clone()),
                ..TextStyle::default()
            };
            canvas.text(&text, &style).context("rendering text")?;
            canvas.write(&output).context("writing canvas")?;
        }
        Commands::Render { job, output } => {
            let spec = std::fs::read_to_string(&job)
                .with_context(|| format!("reading job {}", job.display()))?;
            let job: Job = serde_json::from_str(&spec).context("parsing job")?;
            let canvas = job.run().context("running job")?;
            canvas.write(&output).context("writing canvas")?;
        }
        Commands::Push {
            source,
            device,
            size: (width, height),
            layout,
            offset,
            stretch,
        } => {
            let mut canvas = canvas_with(width, height, &config, None, None)?;
            canvas
                .read(&source, 0, stretch)
                .with_context(|| format!("placing {source:?}"))?;
            let fb = Framebuffer::new(
                device,
                FramebufferInfo {
                    width,
                    height,
                    layout,
                },
            );
            fb.write_rgb(&canvas.rgb(), offset)
                .context("pushing frame")?;
        }
    }

    Ok(())
}

fn canvas_with(
    width: u32,
    height: u32,
    config: &ComposeConfig,
    bg: Option<Color>,
    fg: Option<Color>,
) -> anyhow::Result<Canvas> {
    let mut merged = config.clone();
    if let Some(bg) = bg {
        merged.background = bg;
    }
    if let Some(fg) = fg {
        merged.foreground = fg;
    }
    Ok(Canvas::from_config(width, height, &merged)?)
}
