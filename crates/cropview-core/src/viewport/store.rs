use tracing::{debug, trace};

use crate::consts::{MAX_ZOOM_FACTOR, MIN_ZOOM_FACTOR};
use crate::geometry::{NaturalSize, Point, ScaleLimits, ViewTransform, ViewportSize};
use crate::viewport::kernel::{
    center_translation, clamp_translation, cover_scale, scale_limits, zoom_at_point,
};

/// Which branch a size observation took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refit {
    /// New image or first measurement: cover-and-centre fit.
    Fitted,
    /// Viewport-only resize: relative zoom and focus preserved.
    Resized,
    /// Same dimensions as last time.
    Unchanged,
    /// A dimension is not measured yet; nothing was fitted.
    Deferred,
}

/// Single owner of the live `{scale, translate}` triple.
///
/// Every mutation goes through the kernel clamps, so the cover invariant
/// holds after each call.
#[derive(Clone, Debug, Default)]
pub struct ViewTransformStore {
    transform: ViewTransform,
    viewport: ViewportSize,
    natural: NaturalSize,
    fitted: bool,
}

impl ViewTransformStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn natural(&self) -> NaturalSize {
        self.natural
    }

    /// True once both sizes have been measured and a fit has run.
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn limits(&self) -> ScaleLimits {
        scale_limits(self.viewport, self.natural)
    }

    /// `scale / base_scale`, clamped to the zoom range.
    pub fn zoom_multiplier(&self) -> f64 {
        let base = self.limits().base_scale;
        (self.transform.scale / base).clamp(MIN_ZOOM_FACTOR, MAX_ZOOM_FACTOR)
    }

    /// Back to the unset baseline.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reconcile with freshly measured sizes.
    ///
    /// Natural-size changes and viewport changes are detected separately:
    /// a new image always re-fits, a viewport-only change re-derives the
    /// transform from the previous one, and repeated identical sizes are a
    /// no-op. Unmeasured viewport sizes are never recorded.
    pub fn observe(&mut self, viewport: ViewportSize, natural: NaturalSize) -> Refit {
        if !natural.is_measured() {
            if self.fitted {
                debug!("Natural size cleared, transform unfitted");
            }
            self.natural = natural;
            self.fitted = false;
            if viewport.is_measured() {
                self.viewport = viewport;
            }
            return Refit::Deferred;
        }

        let natural_changed = natural != self.natural || !self.fitted;

        if !viewport.is_measured() {
            if natural_changed {
                self.natural = natural;
                self.fitted = false;
            }
            return Refit::Deferred;
        }

        let viewport_changed = viewport != self.viewport;

        match (natural_changed, viewport_changed) {
            (true, _) => {
                self.fit(viewport, natural);
                Refit::Fitted
            }
            (false, true) => {
                self.resize(viewport);
                Refit::Resized
            }
            (false, false) => Refit::Unchanged,
        }
    }

    pub fn set_viewport_size(&mut self, viewport: ViewportSize) -> Refit {
        self.observe(viewport, self.natural)
    }

    pub fn set_natural_size(&mut self, natural: NaturalSize) -> Refit {
        self.observe(self.viewport, natural)
    }

    fn fit(&mut self, viewport: ViewportSize, natural: NaturalSize) {
        let scale = cover_scale(viewport, natural);
        let (tx, ty) = center_translation(viewport, natural, scale);

        self.viewport = viewport;
        self.natural = natural;
        self.transform = ViewTransform::new(scale, tx, ty);
        self.fitted = true;

        debug!(
            viewport = ?(viewport.width, viewport.height),
            natural = ?(natural.width, natural.height),
            scale,
            tx,
            ty,
            "Cover fit"
        );
    }

    fn resize(&mut self, viewport: ViewportSize) {
        let natural = self.natural;
        let old_viewport = self.viewport;
        let old = self.transform;

        let old_limits = scale_limits(old_viewport, natural);
        let zoom_factor = old.scale / old_limits.base_scale;

        let new_limits = scale_limits(viewport, natural);
        let new_scale = (new_limits.base_scale * zoom_factor)
            .clamp(new_limits.base_scale, new_limits.max_scale);

        // Keep the image point that sat at the old viewport centre centred.
        let focus = old.viewport_to_image(old_viewport.center());
        let center = viewport.center();
        let tx = center.x - focus.x * new_scale;
        let ty = center.y - focus.y * new_scale;
        let (tx, ty) = clamp_translation(viewport, natural, new_scale, tx, ty);

        self.viewport = viewport;
        self.transform = ViewTransform::new(new_scale, tx, ty);

        debug!(
            viewport = ?(viewport.width, viewport.height),
            zoom_factor,
            scale = new_scale,
            "Viewport resized"
        );
    }

    /// Translate by a delta. Scale is untouched.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !self.fitted {
            return;
        }
        let t = self.transform;
        let (tx, ty) = clamp_translation(
            self.viewport,
            self.natural,
            t.scale,
            t.translate_x + dx,
            t.translate_y + dy,
        );
        self.transform = ViewTransform::new(t.scale, tx, ty);
        trace!(tx, ty, "Pan");
    }

    /// The single zoom entry point: clamp into the scale limits, anchor
    /// (viewport centre when `anchor` is `None`), then clamp the translate.
    pub fn apply_scale(&mut self, new_scale: f64, anchor: Option<Point>) {
        if !self.fitted || !new_scale.is_finite() {
            return;
        }
        let limits = self.limits();
        let scale = limits.clamp(new_scale);
        let anchor = anchor.unwrap_or_else(|| self.viewport.center());

        let t = self.transform;
        let (tx, ty) = zoom_at_point(
            self.viewport,
            self.natural,
            t.scale,
            scale,
            t.translate_x,
            t.translate_y,
            anchor,
        );
        self.transform = ViewTransform::new(scale, tx, ty);
        trace!(scale, tx, ty, "Zoom");
    }

    /// Multiply the current scale by `factor` around `anchor`.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        self.apply_scale(self.transform.scale * factor, Some(anchor));
    }

    /// Store a fully specified transform. The scale is kept verbatim,
    /// only the translate is clamped.
    pub fn set_direct(&mut self, transform: ViewTransform) {
        if !self.fitted || !(transform.scale > 0.0 && transform.scale.is_finite()) {
            return;
        }
        let (tx, ty) = clamp_translation(
            self.viewport,
            self.natural,
            transform.scale,
            transform.translate_x,
            transform.translate_y,
        );
        self.transform = ViewTransform::new(transform.scale, tx, ty);
        trace!(tx, ty, "Direct transform");
    }
}
