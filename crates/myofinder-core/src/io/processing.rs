//! Result document of the external segmentation routine.
//!
//! ```json
//! { "0": { "nuclei": { "nucleiIn": [[x, y]], "nucleiOut": [[x, y]] },
//!          "fibers": { "0": { "fiberPath": [[x, y]], "fiberArea": 100.0 } } } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ordered_entries;
use crate::error::Result;

/// Nuclei found in one image, split by classification.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NucleiBatch {
    #[serde(rename = "nucleiIn", default)]
    pub nuclei_in: Vec<[f64; 2]>,
    #[serde(rename = "nucleiOut", default)]
    pub nuclei_out: Vec<[f64; 2]>,
}

impl NucleiBatch {
    pub fn len(&self) -> usize {
        self.nuclei_in.len() + self.nuclei_out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiberEntry {
    #[serde(rename = "fiberPath")]
    pub fiber_path: Vec<[f64; 2]>,
    #[serde(rename = "fiberArea")]
    pub fiber_area: f64,
}

/// Fibers of one image keyed by the routine's fiber id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiberBatch(pub BTreeMap<String, FiberEntry>);

impl FiberBatch {
    /// Entries in id order (numeric ids ascending).
    pub fn ordered(&self) -> Vec<(&str, &FiberEntry)> {
        ordered_entries(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerResult {
    #[serde(default)]
    pub nuclei: NucleiBatch,
    #[serde(default)]
    pub fibers: FiberBatch,
}

/// Per-image results keyed by surface id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessingResult(pub BTreeMap<String, LayerResult>);

impl ProcessingResult {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn layers(&self) -> Vec<(&str, &LayerResult)> {
        ordered_entries(&self.0)
    }
}
