use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use frame_tools::converter;
use frame_tools::utils::logger;

/// Convert PNG to JPG
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input directory with PNG files
    input: PathBuf,
    /// Output directory (default: same as input)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    logger::init();

    let cli = Cli::parse();
    logger::info(&format!("convert-png-to-jpg {:?}", cli));

    converter::convert_png_to_jpg(&cli.input, cli.output.as_deref())?;

    Ok(())
}
