//! End-to-end composition tests: write/read round trips, scaled placement
//! and raw RGB export against real encoded files.

use pixelboard_compose::{Canvas, Color, Placement, TextStyle};

fn gradient_canvas(width: u32, height: u32) -> Canvas {
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            rgb.push((x * 3 % 256) as u8);
            rgb.push((y * 5 % 256) as u8);
            rgb.push(((x + y) % 256) as u8);
        }
    }
    Canvas::from_rgb(width, height, &rgb, Color::BLACK, Color::WHITE).unwrap()
}

#[test]
fn png_write_read_round_trip_preserves_rgb() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    let spec = path.to_str().unwrap();

    let source = gradient_canvas(64, 64);
    source.write(spec).unwrap();

    let mut restored = Canvas::new(64, 64, Color::BLACK, Color::WHITE).unwrap();
    restored.read(spec, 0, false).unwrap();

    assert_eq!(source.rgb(), restored.rgb());
}

#[test]
fn format_prefix_forces_codec() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.data");
    let spec = format!("PNG:{}", path.display());

    let source = gradient_canvas(16, 16);
    source.write(&spec).unwrap();

    // The plain path has no usable extension; the tag drives the decode.
    let mut restored = Canvas::new(16, 16, Color::BLACK, Color::WHITE).unwrap();
    restored.read(&spec, 0, false).unwrap();
    assert_eq!(source.rgb(), restored.rgb());
}

#[test]
fn write_jpeg_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.jpg");

    let source = gradient_canvas(32, 32);
    source.write(path.to_str().unwrap()).unwrap();
    assert!(path.metadata().unwrap().len() > 0);
}

#[test]
fn read_missing_file_fails() {
    let mut canvas = Canvas::new(32, 32, Color::BLACK, Color::WHITE).unwrap();
    let err = canvas.read("/nonexistent/input.png", 0, false).unwrap_err();
    assert_eq!(err.error_type(), "Io");
}

#[test]
fn read_undecodable_bytes_fail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.png");
    std::fs::write(&path, b"not an image at all").unwrap();

    let mut canvas = Canvas::new(32, 32, Color::BLACK, Color::WHITE).unwrap();
    let err = canvas.read(path.to_str().unwrap(), 0, false).unwrap_err();
    assert_eq!(err.error_type(), "Image");
}

#[test]
fn read_aspect_fit_centers_within_margin() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("square.png");
    Canvas::new(50, 50, Color::WHITE, Color::WHITE)
        .unwrap()
        .write(path.to_str().unwrap())
        .unwrap();

    let mut canvas = Canvas::new(100, 60, Color::BLACK, Color::WHITE).unwrap();
    canvas.read(path.to_str().unwrap(), 10, false).unwrap();

    let img = canvas.pixels();
    // Box is 80x40; a square source fits as 40x40, centered at (30, 10).
    assert_eq!(img.get_pixel(30, 10)[0], 255);
    assert_eq!(img.get_pixel(69, 49)[0], 255);
    assert_eq!(img.get_pixel(50, 30)[0], 255);
    assert_eq!(img.get_pixel(25, 30)[0], 0);
    assert_eq!(img.get_pixel(74, 30)[0], 0);
    assert_eq!(img.get_pixel(50, 5)[0], 0);
}

#[test]
fn read_stretch_fills_margin_box() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("square.png");
    Canvas::new(50, 50, Color::WHITE, Color::WHITE)
        .unwrap()
        .write(path.to_str().unwrap())
        .unwrap();

    let mut canvas = Canvas::new(100, 60, Color::BLACK, Color::WHITE).unwrap();
    canvas.read(path.to_str().unwrap(), 10, true).unwrap();

    let img = canvas.pixels();
    // The whole 80x40 box is painted regardless of the source aspect.
    assert_eq!(img.get_pixel(10, 10)[0], 255);
    assert_eq!(img.get_pixel(89, 49)[0], 255);
    assert_eq!(img.get_pixel(9, 30)[0], 0);
    assert_eq!(img.get_pixel(90, 30)[0], 0);
}

#[test]
fn read_margin_larger_than_canvas_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("square.png");
    Canvas::new(8, 8, Color::WHITE, Color::WHITE)
        .unwrap()
        .write(path.to_str().unwrap())
        .unwrap();

    let mut canvas = Canvas::new(20, 20, Color::BLACK, Color::WHITE).unwrap();
    let err = canvas
        .read(path.to_str().unwrap(), 10, false)
        .unwrap_err();
    assert_eq!(err.error_type(), "MarginExceedsCanvas");
}

#[test]
fn rgb_export_matches_geometry() {
    let canvas = gradient_canvas(7, 5);
    let rgb = canvas.rgb();
    assert_eq!(rgb.len(), 7 * 5 * 3);
}

#[test]
fn layered_banner_composition() {
    // Canvas with border and centered text; the pipeline a caller would
    // actually run.
    let mut canvas = Canvas::new(160, 80, Color::parse("navy").unwrap(), Color::WHITE).unwrap();
    canvas.border(3);
    let style = TextStyle {
        gravity: pixelboard_compose::Gravity::Center,
        wrap: true,
        ..TextStyle::default()
    };
    canvas.text("status ok", &style).unwrap();

    let badge = canvas.layer(Some(10), Some(10), Color::parse("red").unwrap());
    canvas.overlay(&badge, Placement::At(4, 4));

    let img = canvas.pixels();
    // Border ring in fg, badge patch in red, background still navy somewhere.
    assert_eq!(img.get_pixel(0, 0)[0], 255);
    assert_eq!(*img.get_pixel(8, 8), image::Rgba([255, 0, 0, 255]));
    assert_eq!(*img.get_pixel(80, 8), image::Rgba([0, 0, 128, 255]));
}
