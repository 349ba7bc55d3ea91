pub mod config;
pub mod import;
pub mod info;
pub mod render;
pub mod summary;

use std::path::Path;

use anyhow::{Context, Result};
use myofinder_core::config::ViewerConfig;

/// Read a viewer config from `path`, or fall back to the defaults.
fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    match path {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("Failed to read config {}", path.display())),
        None => Ok(ViewerConfig::default()),
    }
}
