use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::error::{MyofinderError, Result};

/// Decode an image file into an RGBA8 raster.
pub fn load_raster(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)?;
    let raster = img.to_rgba8();
    check_dimensions(&raster)?;
    debug!(
        path = %path.display(),
        width = raster.width(),
        height = raster.height(),
        "Decoded image"
    );
    Ok(raster)
}

/// Decode an in-memory encoded image (PNG, TIFF, ...).
pub fn decode_raster(bytes: &[u8]) -> Result<RgbaImage> {
    let raster = image::load_from_memory(bytes)?.to_rgba8();
    check_dimensions(&raster)?;
    Ok(raster)
}

/// Save a rendered frame, format chosen from the file extension.
pub fn save_frame(frame: &RgbaImage, path: &Path) -> Result<()> {
    frame.save(path)?;
    Ok(())
}

fn check_dimensions(raster: &RgbaImage) -> Result<()> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(MyofinderError::InvalidDimensions { width, height });
    }
    Ok(())
}
