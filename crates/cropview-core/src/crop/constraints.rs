use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Crop aspect ratio presets.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum CropAspect {
    #[default]
    Free,
    Square,
    ThreeByFour,
    FourByThree,
    SixteenByNine,
    /// Arbitrary width/height ratio.
    Custom(f64),
}

impl CropAspect {
    pub const PRESETS: &[Self] = &[
        Self::Free,
        Self::Square,
        Self::ThreeByFour,
        Self::FourByThree,
        Self::SixteenByNine,
    ];

    /// Return the width/height ratio, or `None` for free.
    pub fn ratio(&self) -> Option<f64> {
        match self {
            Self::Free => None,
            Self::Square => Some(1.0),
            Self::ThreeByFour => Some(3.0 / 4.0),
            Self::FourByThree => Some(4.0 / 3.0),
            Self::SixteenByNine => Some(16.0 / 9.0),
            Self::Custom(r) => Some(*r),
        }
    }
}

impl fmt::Display for CropAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "Free"),
            Self::Square => write!(f, "1:1"),
            Self::ThreeByFour => write!(f, "3:4"),
            Self::FourByThree => write!(f, "4:3"),
            Self::SixteenByNine => write!(f, "16:9"),
            Self::Custom(r) => write!(f, "{r:.3}:1"),
        }
    }
}

/// Shape rules for a crop rectangle.
///
/// Precedence: aspect ratio first, then the max size bounds (scaled
/// uniformly under a locked ratio), then the min size bounds (min wins over
/// max and may break the ratio), then the containing bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CropConstraints {
    pub aspect: CropAspect,
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
}

impl CropConstraints {
    /// Constrain `rect` to these rules inside `bounds`.
    pub fn apply(&self, rect: Rect, bounds: Rect) -> Rect {
        if bounds.is_degenerate() {
            return rect;
        }

        let ratio = self.aspect.ratio().filter(|r| *r > 0.0 && r.is_finite());
        let mut r = rect;
        if let Some(ratio) = ratio {
            r = snap_to_ratio(r, ratio, bounds.width, bounds.height);
        }

        let mut w = r.width;
        let mut h = r.height;
        let max_w = self.max_width.unwrap_or(f64::INFINITY);
        let max_h = self.max_height.unwrap_or(f64::INFINITY);
        if ratio.is_some() {
            // Shrink both sides together so the ratio survives
            let k = (max_w / w).min(max_h / h).min(1.0);
            if k.is_finite() && k > 0.0 {
                w *= k;
                h *= k;
            }
        } else {
            w = w.min(max_w);
            h = h.min(max_h);
        }
        w = w.max(self.min_width).min(bounds.width);
        h = h.max(self.min_height).min(bounds.height);

        let x = r.x.max(bounds.x).min(bounds.right() - w);
        let y = r.y.max(bounds.y).min(bounds.bottom() - h);

        Rect::new(x, y, w, h)
    }

    /// A centred rectangle covering `fraction` of `bounds`, constrained.
    pub fn centered_default(&self, bounds: Rect, fraction: f64) -> Rect {
        let rect =
            Rect::from_center_size(bounds.center(), bounds.width * fraction, bounds.height * fraction);
        self.apply(rect, bounds)
    }
}

/// Snap to `ratio` (width/height) around the rectangle's centre, shrinking
/// to fit `max_w` x `max_h`.
fn snap_to_ratio(rect: Rect, ratio: f64, max_w: f64, max_h: f64) -> Rect {
    let center = rect.center();

    // Try keeping width, adjust height
    let mut w = rect.width;
    let mut h = w / ratio;

    if h > max_h {
        h = max_h;
        w = h * ratio;
    }
    if w > max_w {
        w = max_w;
        h = w / ratio;
    }

    Rect::from_center_size(center, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_ratio_keeps_center() {
        let r = snap_to_ratio(Rect::new(10.0, 10.0, 100.0, 20.0), 2.0, 500.0, 500.0);
        assert_eq!(r.width, 100.0);
        assert_eq!(r.height, 50.0);
        assert_eq!(r.center(), Rect::new(10.0, 10.0, 100.0, 20.0).center());
    }

    #[test]
    fn test_snap_to_ratio_shrinks_to_height() {
        let r = snap_to_ratio(Rect::new(0.0, 0.0, 200.0, 10.0), 1.0, 400.0, 100.0);
        assert_eq!(r.width, 100.0);
        assert_eq!(r.height, 100.0);
    }
}
