use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use myofinder_core::io::processing::ProcessingResult;
use myofinder_core::workspace::Workspace;

use super::load_config;

#[derive(Args)]
pub struct ImportArgs {
    /// Processing result JSON keyed by image index
    pub result: PathBuf,

    /// Images in the order the processing result numbers them
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Output project JSON
    #[arg(short, long)]
    pub output: PathBuf,

    /// Project title (defaults to the output file name)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Viewer config TOML
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &ImportArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut workspace = Workspace::new(config);

    for image in &args.images {
        let path = image
            .canonicalize()
            .with_context(|| format!("Image not found: {}", image.display()))?;
        workspace
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
    }

    let result = ProcessingResult::load(&args.result)
        .with_context(|| format!("Failed to read processing result {}", args.result.display()))?;
    let applied = workspace.ingest_result(&result);

    let title = args.title.clone().unwrap_or_else(|| {
        args.output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let project = workspace.to_project(title)?;
    project
        .save(&args.output)
        .with_context(|| format!("Failed to write project to {}", args.output.display()))?;

    println!(
        "Project saved to {} ({} images, {} with results)",
        args.output.display(),
        workspace.len(),
        applied
    );

    Ok(())
}
