//! Rasterise the crop window to a standalone RGBA bitmap.
//!
//! Each output pixel centre is inverse-mapped into the native image and
//! sampled bilinearly. Centres that land outside the native image stay
//! fully transparent.

use image::RgbaImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::geometry::{Rect, Size, ViewTransform};

/// Export of a viewport-space crop window over the live transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportExport {
    pub crop: Rect,
    pub transform: ViewTransform,
    pub circular: bool,
}

/// Export without a pan/zoom transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyExport {
    /// Crop in displayed-image pixels.
    pub crop: Rect,
    /// Size the image was displayed at; equal to the natural size when the
    /// crop is already in native pixels.
    pub displayed: Size,
    /// Clockwise-positive, about the native image centre.
    pub rotation_degrees: f64,
    /// Uniform scale applied after rotation.
    pub scale: f64,
    pub circular: bool,
}

/// Minimal fully transparent image.
pub fn placeholder() -> RgbaImage {
    RgbaImage::new(1, 1)
}

/// Render the crop window exactly as the image appears on screen: the full
/// image drawn at `(tx - crop.x, ty - crop.y)` with size `natural * scale`.
pub fn render_viewport(image: Option<&RgbaImage>, params: &ViewportExport) -> RgbaImage {
    let Some(src) = image else {
        return placeholder();
    };
    let crop = params.crop;
    let t = params.transform;
    if crop.is_degenerate() || !(t.scale > 0.0 && t.scale.is_finite()) {
        return placeholder();
    }

    let out_w = crop.width.round() as u32;
    let out_h = crop.height.round() as u32;
    if out_w == 0 || out_h == 0 {
        return placeholder();
    }

    let offset_x = t.translate_x - crop.x;
    let offset_y = t.translate_y - crop.y;
    let scale = t.scale;

    debug!(out_w, out_h, offset_x, offset_y, scale, "Rendering viewport export");

    rasterize(src, out_w, out_h, params.circular, |x, y| {
        ((x - offset_x) / scale, (y - offset_y) / scale)
    })
}

/// Render the legacy path: offset by the crop, rotate about the native
/// centre, scale, then draw the full image.
pub fn render_legacy(image: Option<&RgbaImage>, params: &LegacyExport) -> RgbaImage {
    let Some(src) = image else {
        return placeholder();
    };
    let crop = params.crop;
    if crop.is_degenerate() || !(params.scale > 0.0 && params.scale.is_finite()) {
        return placeholder();
    }

    let natural = Size::from(src.dimensions());
    let (ratio_x, ratio_y) = if params.displayed.is_measured() {
        (
            natural.width / params.displayed.width,
            natural.height / params.displayed.height,
        )
    } else {
        (1.0, 1.0)
    };

    let out_w = (crop.width * ratio_x).round() as u32;
    let out_h = (crop.height * ratio_y).round() as u32;
    if out_w == 0 || out_h == 0 {
        return placeholder();
    }

    let crop_x = crop.x * ratio_x;
    let crop_y = crop.y * ratio_y;
    let center = natural.center();
    let (sin, cos) = params.rotation_degrees.to_radians().sin_cos();
    let scale = params.scale;

    debug!(
        out_w,
        out_h,
        rotation = params.rotation_degrees,
        scale,
        "Rendering legacy export"
    );

    rasterize(src, out_w, out_h, params.circular, |x, y| {
        let qx = x + crop_x - center.x;
        let qy = y + crop_y - center.y;
        let rx = qx * cos + qy * sin;
        let ry = -qx * sin + qy * cos;
        (rx / scale + center.x, ry / scale + center.y)
    })
}

/// Fill a `width x height` buffer by mapping each output pixel centre
/// through `to_native`.
fn rasterize<F>(src: &RgbaImage, width: u32, height: u32, circular: bool, to_native: F) -> RgbaImage
where
    F: Fn(f64, f64) -> (f64, f64) + Sync,
{
    let row_len = width as usize * 4;
    let mut buf = vec![0u8; row_len * height as usize];

    if width as usize * height as usize >= PARALLEL_PIXEL_THRESHOLD {
        buf.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(row, out)| fill_row(src, row, out, width, height, circular, &to_native));
    } else {
        buf.chunks_mut(row_len)
            .enumerate()
            .for_each(|(row, out)| fill_row(src, row, out, width, height, circular, &to_native));
    }

    RgbaImage::from_raw(width, height, buf).unwrap_or_else(placeholder)
}

fn fill_row<F>(
    src: &RgbaImage,
    row: usize,
    out: &mut [u8],
    width: u32,
    height: u32,
    circular: bool,
    to_native: &F,
) where
    F: Fn(f64, f64) -> (f64, f64),
{
    let cy = row as f64 + 0.5;
    for col in 0..width as usize {
        let cx = col as f64 + 0.5;
        if circular && !inside_ellipse(cx, cy, f64::from(width), f64::from(height)) {
            continue;
        }
        let (nx, ny) = to_native(cx, cy);
        if let Some(px) = sample_bilinear(src, nx, ny) {
            out[col * 4..col * 4 + 4].copy_from_slice(&px);
        }
    }
}

/// Ellipse inscribed in the output bounds.
fn inside_ellipse(x: f64, y: f64, width: f64, height: f64) -> bool {
    let rx = width / 2.0;
    let ry = height / 2.0;
    let dx = (x - rx) / rx;
    let dy = (y - ry) / ry;
    dx * dx + dy * dy <= 1.0
}

/// Sample at native point `(x, y)` using pixel-centre convention.
/// `None` when the point lies outside the image.
fn sample_bilinear(src: &RgbaImage, x: f64, y: f64) -> Option<[u8; 4]> {
    let (w, h) = src.dimensions();
    if !(x >= 0.0 && y >= 0.0 && x < f64::from(w) && y < f64::from(h)) {
        return None;
    }

    let fx = x - 0.5;
    let fy = y - 0.5;
    let x0f = fx.floor();
    let y0f = fy.floor();
    let tx = fx - x0f;
    let ty = fy - y0f;

    let max_x = i64::from(w) - 1;
    let max_y = i64::from(h) - 1;
    let x0 = (x0f as i64).clamp(0, max_x) as u32;
    let x1 = (x0f as i64 + 1).clamp(0, max_x) as u32;
    let y0 = (y0f as i64).clamp(0, max_y) as u32;
    let y1 = (y0f as i64 + 1).clamp(0, max_y) as u32;

    let p00 = src.get_pixel(x0, y0).0;
    let p10 = src.get_pixel(x1, y0).0;
    let p01 = src.get_pixel(x0, y1).0;
    let p11 = src.get_pixel(x1, y1).0;

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(p00[c]) * (1.0 - tx) + f64::from(p10[c]) * tx;
        let bottom = f64::from(p01[c]) * (1.0 - tx) + f64::from(p11[c]) * tx;
        let v = top * (1.0 - ty) + bottom * ty;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    Some(out)
}
