use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use frame_tools::core::extractor;
use frame_tools::shared::constants::{DEFAULT_FRAME_PREFIX, DEFAULT_FRAME_STEP};
use frame_tools::utils::logger;

/// Convert video into frames.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to input video file.
    #[arg(long)]
    video: PathBuf,
    /// Directory where frames will be saved.
    #[arg(long)]
    out: PathBuf,
    /// Prefix for frame filenames.
    #[arg(long, default_value = DEFAULT_FRAME_PREFIX)]
    prefix: String,
    /// Save every N-th frame.
    #[arg(long, default_value_t = DEFAULT_FRAME_STEP, value_parser = clap::value_parser!(u64).range(1..))]
    step: u64,
}

fn main() -> Result<()> {
    logger::init();

    let cli = Cli::parse();
    logger::info(&format!("convert-video-to-frames {:?}", cli));

    extractor::video_to_frames(&cli.video, &cli.out, &cli.prefix, cli.step)?;

    Ok(())
}
