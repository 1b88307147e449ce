//! PNG to JPEG conversion for a single directory.

mod naming;

pub use naming::jpg_name_for;

use anyhow::{anyhow, Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::shared::constants;
use crate::utils::{file_utils, logger, time_utils::Timer};

/// Outcome of one directory run.
#[derive(Debug, Default)]
pub struct ConversionReport {
    /// `(png file name, jpg file name)` in processing order.
    pub converted: Vec<(String, String)>,
    pub output_dir: PathBuf,
}

/// Converts every `*.png` directly inside `input_dir` to JPEG.
///
/// Output goes to `output_dir`, or next to the sources when `None`. The output
/// directory is created if needed. An input directory without PNG files is
/// reported on stdout and yields an empty report.
pub fn convert_png_to_jpg(input_dir: &Path, output_dir: Option<&Path>) -> Result<ConversionReport> {
    let output_path = output_dir.unwrap_or(input_dir).to_path_buf();
    file_utils::ensure_dir(&output_path)?;

    let png_files = file_utils::list_files(input_dir, constants::PNG_EXTENSION)?;

    let mut report = ConversionReport {
        converted: Vec::with_capacity(png_files.len()),
        output_dir: output_path,
    };

    if png_files.is_empty() {
        println!("No PNG files found in {}", input_dir.display());
        logger::info(&format!("no png files in {}", input_dir.display()));
        return Ok(report);
    }

    println!("Converting {} files...", png_files.len());
    let timer = Timer::new();

    for png_file in &png_files {
        let (png_name, stem) = utf8_names(png_file)?;
        let jpg_name = jpg_name_for(stem);
        let jpg_path = report.output_dir.join(&jpg_name);

        convert_file(png_file, &jpg_path)?;

        println!("  ✓ {} -> {}", png_name, jpg_name);
        logger::debug(&format!("{} -> {}", png_file.display(), jpg_path.display()));
        report.converted.push((png_name.to_string(), jpg_name));
    }

    logger::info(&format!(
        "converted {} files in {}ms",
        report.converted.len(),
        timer.elapsed_ms()
    ));
    println!("\nDone! Saved to: {}", report.output_dir.display());

    Ok(report)
}

/// Decodes `src`, drops any alpha channel and writes a quality-95 JPEG to `dst`.
pub fn convert_file(src: &Path, dst: &Path) -> Result<()> {
    // Sniff the format from the content; a file named just `.png` has no extension
    let rgb = ImageReader::open(src)
        .and_then(|reader| reader.with_guessed_format())
        .with_context(|| format!("Failed to read image: {}", src.display()))?
        .decode()
        .with_context(|| format!("Failed to decode image: {}", src.display()))?
        .to_rgb8();

    let file = File::create(dst).with_context(|| format!("Failed to create file: {}", dst.display()))?;
    let mut writer = BufWriter::new(file);

    {
        let mut encoder = JpegEncoder::new_with_quality(&mut writer, constants::JPEG_QUALITY);
        encoder
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8.into())
            .with_context(|| format!("Failed to encode JPEG: {}", dst.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write file: {}", dst.display()))
}

/// File name and stem as UTF-8; output names are derived from the stem, so
/// a lossy conversion would silently write under a different name.
fn utf8_names(path: &Path) -> Result<(&str, &str)> {
    let name = path.file_name().and_then(|n| n.to_str());
    let stem = path.file_stem().and_then(|s| s.to_str());
    match (name, stem) {
        (Some(name), Some(stem)) => Ok((name, stem)),
        _ => Err(anyhow!("File name is not valid UTF-8: {}", path.display())),
    }
}
