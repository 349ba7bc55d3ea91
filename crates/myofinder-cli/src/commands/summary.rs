use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use myofinder_core::io::csv::summary_csv;
use myofinder_core::io::project::Project;
use myofinder_core::workspace::Workspace;

use super::load_config;
use crate::summary::print_project_summary;

#[derive(Args)]
pub struct SummaryArgs {
    /// Project JSON
    pub project: PathBuf,

    /// Write the summary as CSV instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Viewer config TOML
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &SummaryArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let project = Project::load(&args.project)
        .with_context(|| format!("Failed to read project {}", args.project.display()))?;
    let base_dir = args.project.parent().unwrap_or(Path::new("."));
    let workspace = Workspace::from_project(&project, base_dir, config)?;
    let rows = workspace.summary();

    if let Some(ref path) = args.output {
        std::fs::write(path, summary_csv(&rows))
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        println!("Summary saved to {}", path.display());
    } else {
        print_project_summary(&project.title, &rows);
    }

    Ok(())
}
