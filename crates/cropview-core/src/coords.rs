//! Conversion of rectangles between viewport space and native image space.
//!
//! All call sites convert through [`to_native_space`] and
//! [`to_viewport_space`]; [`CropRegion`] carries its space so a stored
//! rectangle is never converted twice.

use serde::{Deserialize, Serialize};

use crate::geometry::{NaturalSize, Point, Rect, ViewTransform};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateSpace {
    /// On-screen pixels, origin at the viewport's top-left.
    Viewport,
    /// Source pixels, origin at the bitmap's top-left.
    Native,
}

/// A rectangle in native space, either in absolute pixels or in percent
/// (0-100) of the native dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum NativeRect {
    Pixels(Rect),
    Percent(Rect),
}

impl NativeRect {
    /// Absolute native pixels.
    pub fn resolve(&self, native: NaturalSize) -> Rect {
        match *self {
            Self::Pixels(r) => r,
            Self::Percent(r) => Rect::new(
                r.x * native.width / 100.0,
                r.y * native.height / 100.0,
                r.width * native.width / 100.0,
                r.height * native.height / 100.0,
            ),
        }
    }
}

/// Inverse-map a viewport rectangle into native pixels, clamped to
/// `[0, native.width] x [0, native.height]`.
///
/// The min corner is clamped first, then the max corner is clamped to be
/// no smaller than it, so the result never has negative extent.
pub fn to_native_space(rect: Rect, transform: &ViewTransform, native: NaturalSize) -> Rect {
    if !(transform.scale > 0.0 && transform.scale.is_finite()) {
        return Rect::default();
    }

    let min = transform.viewport_to_image(rect.min());
    let max = transform.viewport_to_image(rect.max());

    let nw = native.width.max(0.0);
    let nh = native.height.max(0.0);

    let x0 = min.x.clamp(0.0, nw);
    let y0 = min.y.clamp(0.0, nh);
    let x1 = max.x.clamp(0.0, nw).max(x0);
    let y1 = max.y.clamp(0.0, nh).max(y0);

    Rect::from_min_max(Point::new(x0, y0), Point::new(x1, y1))
}

/// Forward-map a native rectangle into viewport space. Percent input is
/// resolved against `native` first.
pub fn to_viewport_space(rect: NativeRect, transform: &ViewTransform, native: NaturalSize) -> Rect {
    let r = rect.resolve(native);
    let min = transform.image_to_viewport(r.min());
    Rect::new(
        min.x,
        min.y,
        r.width * transform.scale,
        r.height * transform.scale,
    )
}

/// A crop rectangle tagged with the space it is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    space: CoordinateSpace,
    rect: Rect,
}

impl CropRegion {
    pub fn viewport(rect: Rect) -> Self {
        Self {
            space: CoordinateSpace::Viewport,
            rect,
        }
    }

    pub fn native(rect: Rect) -> Self {
        Self {
            space: CoordinateSpace::Native,
            rect,
        }
    }

    pub fn space(&self) -> CoordinateSpace {
        self.space
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Re-express the region in `target`. No-op if already there.
    pub fn to_space(
        self,
        target: CoordinateSpace,
        transform: &ViewTransform,
        native: NaturalSize,
    ) -> Self {
        match (self.space, target) {
            (CoordinateSpace::Viewport, CoordinateSpace::Native) => {
                Self::native(to_native_space(self.rect, transform, native))
            }
            (CoordinateSpace::Native, CoordinateSpace::Viewport) => Self::viewport(
                to_viewport_space(NativeRect::Pixels(self.rect), transform, native),
            ),
            _ => self,
        }
    }
}
