//! The engine a host shell talks to.
//!
//! `Viewer` wires the transform store, input arbiter, crop session and
//! export scheduler together behind one narrow API. It never blocks and
//! never fails on geometry; only export encoding returns errors.

use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::config::ViewerConfig;
use crate::consts::EPSILON;
use crate::coords::{CoordinateSpace, CropRegion};
use crate::crop::{CropFrame, CropSession};
use crate::error::Result;
use crate::export::{
    ExportJob, ExportMode, ExportOutput, ExportScheduler, ExportTicket, LegacyExport,
    ViewportExport,
};
use crate::geometry::{NaturalSize, Point, Rect, ScaleLimits, Size, ViewTransform, ViewportSize};
use crate::input::{InputArbiter, InputEvent, Outcome};
use crate::viewport::{Refit, ViewTransformStore};

#[derive(Debug)]
pub struct Viewer {
    config: ViewerConfig,
    store: ViewTransformStore,
    arbiter: InputArbiter,
    crop: CropSession,
    exports: ExportScheduler,
    image: Option<Arc<RgbaImage>>,
    published_zoom: Option<f64>,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            arbiter: InputArbiter::new(&config),
            config,
            store: ViewTransformStore::new(),
            crop: CropSession::new(),
            exports: ExportScheduler::new(),
            image: None,
            published_zoom: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Replace the host configuration and reconcile dependent state.
    pub fn set_config(&mut self, config: ViewerConfig) {
        let old = std::mem::replace(&mut self.config, config);
        self.arbiter.configure(&self.config);

        if self.config.transform_enabled && old.scaling != self.config.scaling {
            self.set_scaling(self.config.scaling);
        }

        if self.config.crop_enabled != old.crop_enabled {
            if self.config.crop_enabled {
                self.enable_crop();
            } else {
                self.crop.disable();
            }
        } else if self.crop.is_enabled()
            && (old.transform_enabled != self.config.transform_enabled
                || old.constraints() != self.config.constraints())
        {
            // Re-express the selection in the new space / under new rules.
            if let Some(frame) = self.crop_frame() {
                self.crop.enable(&frame);
            }
        }
    }

    pub fn store(&self) -> &ViewTransformStore {
        &self.store
    }

    pub fn transform(&self) -> ViewTransform {
        self.store.transform()
    }

    pub fn limits(&self) -> ScaleLimits {
        self.store.limits()
    }

    pub fn viewport_size(&self) -> ViewportSize {
        self.store.viewport()
    }

    pub fn image(&self) -> Option<&Arc<RgbaImage>> {
        self.image.as_ref()
    }

    pub fn natural_size(&self) -> NaturalSize {
        self.image
            .as_ref()
            .map(|img| Size::from(img.dimensions()))
            .unwrap_or(Size::ZERO)
    }

    // -----------------------------------------------------------------------
    // Image and viewport lifecycle
    // -----------------------------------------------------------------------

    /// Show a new image. Always re-fits and drops any previous crop.
    pub fn set_image(&mut self, image: Arc<RgbaImage>) -> Refit {
        self.crop.clear();
        self.arbiter.reset();
        self.exports.cancel_pending();
        self.published_zoom = None;

        let natural = Size::from(image.dimensions());
        self.image = Some(image);
        // A new image with the same dimensions is still a new image.
        self.store.set_natural_size(Size::ZERO);
        let refit = self.store.set_natural_size(natural);
        self.after_refit(refit, None);
        refit
    }

    /// Back to the unset baseline: no image, no transform, no crop.
    pub fn clear_image(&mut self) {
        self.image = None;
        self.store.set_natural_size(Size::ZERO);
        self.crop.clear();
        self.arbiter.reset();
        self.exports.cancel_pending();
        self.published_zoom = None;
    }

    /// The host failed to decode the image.
    pub fn image_failed(&mut self, reason: &str) {
        warn!(reason, "Image failed to load, resetting viewer");
        self.clear_image();
    }

    /// Resize notification. Idempotent for repeated identical sizes.
    pub fn resize(&mut self, viewport: ViewportSize) -> Refit {
        let old_transform = self.store.transform();
        let refit = self.store.set_viewport_size(viewport);
        self.after_refit(refit, Some(old_transform));
        refit
    }

    fn after_refit(&mut self, refit: Refit, old_transform: Option<ViewTransform>) {
        match refit {
            Refit::Fitted => {
                if self.config.crop_enabled {
                    self.enable_crop();
                }
            }
            Refit::Resized => {
                if let (Some(old), Some(frame)) = (old_transform, self.crop_frame()) {
                    self.crop.reproject(&old, &frame);
                }
            }
            // Native-space editing only needs the natural size.
            Refit::Deferred => {
                if self.config.crop_enabled && self.crop.selection().is_none() {
                    self.enable_crop();
                }
            }
            Refit::Unchanged => {}
        }
    }

    // -----------------------------------------------------------------------
    // Transform
    // -----------------------------------------------------------------------

    /// Client-space position of the viewport's top-left corner.
    pub fn set_surface_origin(&mut self, origin: Point) {
        self.arbiter.set_surface_origin(origin);
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> Outcome {
        self.arbiter.handle(event, &mut self.store)
    }

    pub fn arbiter(&self) -> &InputArbiter {
        &self.arbiter
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        if self.config.transform_enabled {
            self.store.pan(dx, dy);
        }
    }

    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        if self.config.transform_enabled {
            self.store.zoom_at(anchor, factor);
        }
    }

    pub fn apply_scale(&mut self, scale: f64, anchor: Option<Point>) {
        if self.config.transform_enabled {
            self.store.apply_scale(scale, anchor);
        }
    }

    /// Host-driven zoom multiplier, mapped onto the zoom range through the
    /// same anchored, clamped path as gestures.
    pub fn set_scaling(&mut self, multiplier: f64) {
        if !(multiplier > 0.0 && multiplier.is_finite()) {
            return;
        }
        self.config.scaling = multiplier;
        if self.config.transform_enabled {
            let base = self.store.limits().base_scale;
            self.store.apply_scale(base * multiplier, None);
        }
    }

    pub fn zoom_multiplier(&self) -> f64 {
        self.store.zoom_multiplier()
    }

    /// The zoom multiplier, but only when it differs from the last value
    /// returned here. Hosts call this after every event to keep their zoom
    /// control in sync.
    pub fn poll_zoom_multiplier(&mut self) -> Option<f64> {
        if !self.store.is_fitted() {
            return None;
        }
        let m = self.store.zoom_multiplier();
        let changed = self
            .published_zoom
            .map_or(true, |prev| (prev - m).abs() > EPSILON);
        if changed {
            self.published_zoom = Some(m);
            Some(m)
        } else {
            None
        }
    }

    // -----------------------------------------------------------------------
    // Crop
    // -----------------------------------------------------------------------

    fn edit_space(&self) -> CoordinateSpace {
        if self.config.transform_enabled {
            CoordinateSpace::Viewport
        } else {
            CoordinateSpace::Native
        }
    }

    /// `None` until the sizes the current mode needs are measured.
    pub fn crop_frame(&self) -> Option<CropFrame> {
        let natural = self.natural_size();
        let ready = natural.is_measured()
            && (!self.config.transform_enabled || self.store.is_fitted());
        if !ready {
            return None;
        }
        Some(CropFrame {
            space: self.edit_space(),
            transform: self.store.transform(),
            viewport: self.store.viewport(),
            natural,
            constraints: self.config.constraints(),
            host_default: self.config.default_crop,
        })
    }

    pub fn crop_enabled(&self) -> bool {
        self.crop.is_enabled()
    }

    /// Enter crop editing. Returns the selection once an image is ready.
    pub fn enable_crop(&mut self) -> Option<CropRegion> {
        self.config.crop_enabled = true;
        let frame = self.crop_frame()?;
        Some(self.crop.enable(&frame))
    }

    /// Leave crop editing; the selection is kept.
    pub fn disable_crop(&mut self) {
        self.config.crop_enabled = false;
        self.crop.disable();
    }

    /// Rectangle edited by the crop widget, in the current edit space.
    pub fn edit_crop(&mut self, rect: Rect) -> Option<CropRegion> {
        if self.config.locked || self.config.disabled || !self.crop.is_enabled() {
            return None;
        }
        let frame = self.crop_frame()?;
        Some(self.crop.edit(rect, &frame))
    }

    pub fn complete_crop(&mut self) -> Option<CropRegion> {
        let frame = self.crop_frame()?;
        let done = self.crop.complete(&frame);
        debug!(completed = ?done.map(|r| r.rect()), "Crop completed");
        done
    }

    pub fn crop_region(&self) -> Option<CropRegion> {
        self.crop.selection()
    }

    /// Selection in the current edit space.
    pub fn crop_rect(&self) -> Option<Rect> {
        let sel = self.crop.selection()?;
        match self.crop_frame() {
            Some(frame) => Some(
                sel.to_space(frame.space, &frame.transform, frame.natural)
                    .rect(),
            ),
            None => Some(sel.rect()),
        }
    }

    /// Selection in native pixels.
    pub fn native_crop_rect(&self) -> Option<Rect> {
        let sel = self.crop.selection()?;
        let natural = self.natural_size();
        Some(
            sel.to_space(CoordinateSpace::Native, &self.store.transform(), natural)
                .rect(),
        )
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    /// Schedule an export for the next frame.
    pub fn request_export(&mut self) -> ExportTicket {
        self.exports.request()
    }

    pub fn export_pending(&self) -> bool {
        self.exports.is_pending()
    }

    /// At frame time: the due export, snapshotted from live state now
    /// rather than when it was requested.
    pub fn take_export_job(&mut self) -> Option<ExportJob> {
        let ticket = self.exports.take_due()?;
        Some(self.snapshot(ticket))
    }

    /// Last-write-wins gate for finished exports.
    pub fn accept_export(&mut self, ticket: ExportTicket) -> bool {
        self.exports.accept(ticket)
    }

    /// Request, snapshot, render and encode synchronously.
    pub fn export_now(&mut self) -> Result<ExportOutput> {
        let ticket = self.exports.request();
        self.exports.take_due();
        let output = self.snapshot(ticket).run()?;
        self.exports.accept(output.ticket);
        Ok(output)
    }

    fn snapshot(&self, ticket: ExportTicket) -> ExportJob {
        let mode = if self.config.transform_enabled {
            ExportMode::Viewport(ViewportExport {
                crop: self.crop_rect().unwrap_or_default(),
                transform: self.store.transform(),
                circular: self.config.circular,
            })
        } else {
            ExportMode::Legacy(LegacyExport {
                crop: self.native_crop_rect().unwrap_or_default(),
                displayed: self.natural_size(),
                rotation_degrees: self.config.rotation_degrees,
                scale: self.config.scaling,
                circular: self.config.circular,
            })
        };
        debug!(ticket = ticket.id(), mode = ?mode, "Export snapshot");
        ExportJob {
            ticket,
            image: self.image.clone(),
            mode,
        }
    }
}
