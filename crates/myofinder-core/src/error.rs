use thiserror::Error;

use crate::ids::{MarkerId, SurfaceId};

#[derive(Error, Debug)]
pub enum MyofinderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("No matching nucleus to delete (id {0})")]
    NucleusNotFound(MarkerId),

    #[error("No matching fiber to delete (id {0})")]
    FiberNotFound(MarkerId),

    #[error("Unknown nucleus type code: {0}")]
    InvalidClassification(u8),

    #[error("Surface {0} not found")]
    SurfaceNotFound(SurfaceId),

    #[error("Surface {0} is already open")]
    DuplicateSurface(SurfaceId),

    #[error("Invalid project file: {0}")]
    InvalidProject(String),

    #[error("Image loader stopped before producing a result")]
    LoaderDisconnected,
}

pub type Result<T> = std::result::Result<T, MyofinderError>;
