//! Pure cover-fit geometry.
//!
//! Every function here is total: non-positive dimensions take an explicit
//! guard branch and return a safe value instead of dividing by zero.

use crate::consts::{
    FALLBACK_BASE_SCALE, FALLBACK_MAX_SCALE, FALLBACK_MIN_SCALE, MAX_ZOOM_FACTOR, MIN_ZOOM_FACTOR,
};
use crate::geometry::{NaturalSize, Point, ScaleLimits, ViewportSize};

/// Scale at which the image covers the viewport on both axes
/// (`object-fit: cover`). Returns 1.0 for a degenerate image.
pub fn cover_scale(viewport: ViewportSize, image: NaturalSize) -> f64 {
    if !(image.width > 0.0 && image.height > 0.0) {
        return 1.0;
    }
    (viewport.width / image.width).max(viewport.height / image.height)
}

/// Translation that centres the scaled image in the viewport.
pub fn center_translation(viewport: ViewportSize, image: NaturalSize, scale: f64) -> (f64, f64) {
    (
        (viewport.width - image.width * scale) / 2.0,
        (viewport.height - image.height * scale) / 2.0,
    )
}

/// Clamp a translation so the scaled image leaves no gap inside the viewport.
///
/// An axis where the scaled image is narrower than the viewport is centred
/// instead; that only happens below the cover scale.
pub fn clamp_translation(
    viewport: ViewportSize,
    image: NaturalSize,
    scale: f64,
    tx: f64,
    ty: f64,
) -> (f64, f64) {
    (
        clamp_axis(viewport.width, image.width * scale, tx),
        clamp_axis(viewport.height, image.height * scale, ty),
    )
}

fn clamp_axis(viewport_len: f64, rendered_len: f64, t: f64) -> f64 {
    if rendered_len >= viewport_len {
        t.clamp(viewport_len - rendered_len, 0.0)
    } else {
        (viewport_len - rendered_len) / 2.0
    }
}

/// Zoom bounds for the pair. Always recomputed from the base dimensions,
/// never from the live scale, so the zoom-out floor cannot move.
pub fn scale_limits(viewport: ViewportSize, image: NaturalSize) -> ScaleLimits {
    if !(viewport.width > 0.0 && viewport.height > 0.0 && image.width > 0.0 && image.height > 0.0)
    {
        return ScaleLimits {
            min_scale: FALLBACK_MIN_SCALE,
            max_scale: FALLBACK_MAX_SCALE,
            base_scale: FALLBACK_BASE_SCALE,
        };
    }

    let base_scale = cover_scale(viewport, image);
    ScaleLimits {
        min_scale: base_scale * MIN_ZOOM_FACTOR,
        max_scale: base_scale * MAX_ZOOM_FACTOR,
        base_scale,
    }
}

/// Translation that keeps the image point under `anchor` fixed while the
/// scale goes from `old_scale` to `new_scale`. The result is clamped.
pub fn zoom_at_point(
    viewport: ViewportSize,
    image: NaturalSize,
    old_scale: f64,
    new_scale: f64,
    tx: f64,
    ty: f64,
    anchor: Point,
) -> (f64, f64) {
    if !(old_scale > 0.0 && old_scale.is_finite()) {
        return clamp_translation(viewport, image, new_scale, tx, ty);
    }

    let ratio = new_scale / old_scale;
    let new_tx = anchor.x - (anchor.x - tx) * ratio;
    let new_ty = anchor.y - (anchor.y - ty) * ratio;
    clamp_translation(viewport, image, new_scale, new_tx, new_ty)
}
