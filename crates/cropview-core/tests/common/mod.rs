#![allow(dead_code)]

use image::{Rgba, RgbaImage};

use cropview_core::geometry::{Rect, Size};
use cropview_core::viewport::ViewTransformStore;

/// Opaque image whose pixels encode their own coordinates, so a sampled
/// pixel can be traced back to its source.
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

/// A store already fitted to the given sizes.
pub fn fitted_store(viewport: (f64, f64), natural: (f64, f64)) -> ViewTransformStore {
    let mut store = ViewTransformStore::new();
    store.observe(
        Size::new(viewport.0, viewport.1),
        Size::new(natural.0, natural.1),
    );
    assert!(store.is_fitted());
    store
}

pub fn assert_rect_eq(actual: Rect, expected: Rect, eps: f64) {
    let close = (actual.x - expected.x).abs() <= eps
        && (actual.y - expected.y).abs() <= eps
        && (actual.width - expected.width).abs() <= eps
        && (actual.height - expected.height).abs() <= eps;
    assert!(close, "rect {actual:?} != expected {expected:?}");
}
