//! fontprobe - Font Metadata and Metrics Probe
//!
//! Usage: fontprobe [--size N] FONT...
//!
//! Prints the metadata probe result for each file plus the core
//! metrics at the given point size (default 12).

use std::error::Error;

use typemetrics::{Font, FontType, TrueTypeFont, Type1Font, probe};

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut size = 12.0f64;
    let mut paths = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--size" {
            size = args
                .next()
                .ok_or("--size requires a value")?
                .parse::<f64>()?;
        } else {
            paths.push(arg);
        }
    }
    if paths.is_empty() {
        eprintln!("usage: fontprobe [--size N] FONT...");
        std::process::exit(2);
    }

    for path in &paths {
        match describe(path, size) {
            Ok(()) => {}
            Err(e) => log::warn!("{}: {}", path, e),
        }
    }

    Ok(())
}

fn describe(path: &str, size: f64) -> typemetrics::Result<()> {
    let info = probe(path)?;
    println!(
        "{}: {} / {} ({:?}{}{}{}{})",
        info.file_name,
        info.family_name,
        info.face_name,
        info.font_type,
        flag(info.bold, ", bold"),
        flag(info.italic, ", italic"),
        flag(info.underline, ", underline"),
        flag(info.strikeout, ", strikeout"),
    );

    match info.font_type {
        FontType::TrueType => print_metrics(&TrueTypeFont::from_file(path)?, size),
        FontType::Type1 => print_metrics(&Type1Font::from_file(path)?, size),
    }
    Ok(())
}

fn print_metrics(font: &dyn Font, size: f64) {
    println!(
        "  at {}pt: ascent {} descent {} cap-height {} line-spacing {} underline {}",
        size,
        font.ascender_at(size),
        font.descender_at(size),
        font.cap_height_at(size),
        font.default_line_spacing_at(size),
        font.underline_position_at(size),
    );
}

fn flag(on: bool, label: &str) -> &str {
    if on { label } else { "" }
}
