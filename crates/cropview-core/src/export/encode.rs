use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{ImageFormat, RgbaImage};

use crate::consts::PNG_DATA_URL_PREFIX;
use crate::error::{CropviewError, Result};

/// Encode as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Encode as a self-describing `data:image/png;base64,...` string.
pub fn encode_png_data_url(image: &RgbaImage) -> Result<String> {
    let bytes = encode_png(image)?;
    Ok(format!("{PNG_DATA_URL_PREFIX}{}", BASE64.encode(bytes)))
}

/// Recover the PNG bytes from a data string produced by
/// [`encode_png_data_url`].
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let payload = data_url
        .trim()
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| {
            CropviewError::InvalidDataUrl(format!(
                "expected prefix {PNG_DATA_URL_PREFIX:?}"
            ))
        })?;
    Ok(BASE64.decode(payload)?)
}

/// Decode a data string back into pixels.
pub fn data_url_to_image(data_url: &str) -> Result<RgbaImage> {
    let bytes = decode_data_url(data_url)?;
    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png)?;
    Ok(img.to_rgba8())
}
