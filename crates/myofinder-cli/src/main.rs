mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "myofinder", about = "Myotube image annotation viewer")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image file metadata
    Info(commands::info::InfoArgs),
    /// Print or save the default viewer config
    Config(commands::config::ConfigArgs),
    /// Render an image with its markers to a PNG frame
    Render(commands::render::RenderArgs),
    /// Build a project file from images and a processing result
    Import(commands::import::ImportArgs),
    /// Summarize the markers of a project
    Summary(commands::summary::SummaryArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Import(args) => commands::import::run(args),
        Commands::Summary(args) => commands::summary::run(args),
    }
}
