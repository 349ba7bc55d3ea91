use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};
use crate::error::Result;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub channels: ChannelConfig,
}

impl ViewerConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Size of the rendered frame in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SURFACE_WIDTH,
            height: DEFAULT_SURFACE_HEIGHT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub show_nuclei: bool,
    pub show_fibers: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_nuclei: true,
            show_fibers: true,
        }
    }
}

/// Which color channels of the base image are shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            red: true,
            green: true,
            blue: true,
        }
    }
}
