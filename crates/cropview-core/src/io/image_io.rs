use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::warn;

use crate::error::{CropviewError, Result};
use crate::export::decode_data_url;

fn ensure_dimensions(img: DynamicImage) -> Result<RgbaImage> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CropviewError::InvalidDimensions { width, height });
    }
    Ok(rgba)
}

/// Decode an image file into RGBA8.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).inspect_err(|e| {
        warn!(path = %path.display(), error = %e, "Failed to decode image");
    })?;
    ensure_dimensions(img)
}

/// Save as 8-bit RGBA PNG.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Write the PNG carried by an export data string to disk.
pub fn write_data_url(data_url: &str, path: &Path) -> Result<()> {
    let bytes = decode_data_url(data_url)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
