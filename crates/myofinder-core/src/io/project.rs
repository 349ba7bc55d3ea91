//! Saved project: every image with its markers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::ordered_entries;
use crate::error::Result;
use crate::markers::{FiberRecord, NucleusRecord};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectImage {
    #[serde(rename = "nameImage")]
    pub name_image: String,
    /// Image file, relative paths are resolved against the project file's directory.
    #[serde(rename = "imagePath")]
    pub image_path: PathBuf,
    #[serde(rename = "FiberData", default)]
    pub fiber_data: Vec<FiberRecord>,
    #[serde(rename = "NucleiData", default)]
    pub nuclei_data: Vec<NucleusRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub data: BTreeMap<String, ProjectImage>,
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let project: Project = serde_json::from_str(&text)?;
        info!(
            path = %path.display(),
            images = project.data.len(),
            "Project loaded"
        );
        Ok(project)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        info!(path = %path.display(), images = self.data.len(), "Project saved");
        Ok(())
    }

    /// Images in id order.
    pub fn images(&self) -> Vec<(&str, &ProjectImage)> {
        ordered_entries(&self.data)
    }
}
