use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let reader = image::ImageReader::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?
        .with_guessed_format()?;
    let format = reader.format();
    let decoded = reader
        .decode()
        .with_context(|| format!("Failed to decode {}", args.file.display()))?;

    println!("File:        {}", args.file.display());
    if let Some(format) = format {
        println!("Format:      {:?}", format);
    }
    println!("Dimensions:  {}x{}", decoded.width(), decoded.height());
    println!("Color type:  {:?}", decoded.color());

    Ok(())
}
