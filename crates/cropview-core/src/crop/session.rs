use tracing::debug;

use crate::consts::DEFAULT_CROP_FRACTION;
use crate::coords::{CoordinateSpace, CropRegion, NativeRect};
use crate::crop::constraints::CropConstraints;
use crate::geometry::{NaturalSize, Rect, ViewTransform, ViewportSize};

/// Everything the session needs to place or re-express a rectangle.
#[derive(Clone, Copy, Debug)]
pub struct CropFrame {
    /// Space selections are edited in: viewport when the transform is
    /// active, native in legacy mode.
    pub space: CoordinateSpace,
    pub transform: ViewTransform,
    pub viewport: ViewportSize,
    pub natural: NaturalSize,
    pub constraints: CropConstraints,
    pub host_default: Option<NativeRect>,
}

impl CropFrame {
    /// The rectangle selections must stay inside.
    pub fn bounds(&self) -> Rect {
        match self.space {
            CoordinateSpace::Viewport => self.viewport.to_rect(),
            CoordinateSpace::Native => self.natural.to_rect(),
        }
    }

    fn constrain(&self, region: CropRegion) -> CropRegion {
        let region = region.to_space(self.space, &self.transform, self.natural);
        let rect = self.constraints.apply(region.rect(), self.bounds());
        match self.space {
            CoordinateSpace::Viewport => CropRegion::viewport(rect),
            CoordinateSpace::Native => CropRegion::native(rect),
        }
    }
}

/// Crop-editing state: the live selection plus the last completed crop.
///
/// Turning editing off keeps the selection so turning it back on restores it.
#[derive(Clone, Debug, Default)]
pub struct CropSession {
    enabled: bool,
    selection: Option<CropRegion>,
    /// Kept in native space so it survives any later transform.
    completed: Option<CropRegion>,
}

impl CropSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn selection(&self) -> Option<CropRegion> {
        self.selection
    }

    pub fn completed(&self) -> Option<CropRegion> {
        self.completed
    }

    /// Enter crop editing. The selection is created on first entry:
    /// preserved selection, else last completed crop, else the host
    /// default, else a centred fraction of the bounds.
    pub fn enable(&mut self, frame: &CropFrame) -> CropRegion {
        self.enabled = true;

        let region = if let Some(sel) = self.selection {
            frame.constrain(sel)
        } else if let Some(done) = self.completed {
            frame.constrain(done)
        } else if let Some(default) = frame.host_default {
            frame.constrain(CropRegion::native(default.resolve(frame.natural)))
        } else {
            let rect = frame
                .constraints
                .centered_default(frame.bounds(), DEFAULT_CROP_FRACTION);
            match frame.space {
                CoordinateSpace::Viewport => CropRegion::viewport(rect),
                CoordinateSpace::Native => CropRegion::native(rect),
            }
        };

        debug!(space = ?region.space(), rect = ?region.rect(), "Crop editing enabled");
        self.selection = Some(region);
        region
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Store a rectangle edited by the crop widget, expressed in
    /// `frame.space`. Returns the constrained result.
    pub fn edit(&mut self, rect: Rect, frame: &CropFrame) -> CropRegion {
        let region = match frame.space {
            CoordinateSpace::Viewport => CropRegion::viewport(rect),
            CoordinateSpace::Native => CropRegion::native(rect),
        };
        let region = frame.constrain(region);
        self.selection = Some(region);
        region
    }

    /// Record the current selection as the completed crop.
    pub fn complete(&mut self, frame: &CropFrame) -> Option<CropRegion> {
        let sel = self.selection?;
        let done = sel.to_space(CoordinateSpace::Native, &frame.transform, frame.natural);
        self.completed = Some(done);
        Some(done)
    }

    /// Re-project a viewport-space selection after a viewport resize so it
    /// keeps covering the same image content.
    pub fn reproject(&mut self, old_transform: &ViewTransform, frame: &CropFrame) {
        let Some(sel) = self.selection else {
            return;
        };
        if sel.space() != CoordinateSpace::Viewport {
            self.selection = Some(frame.constrain(sel));
            return;
        }
        let native = sel.to_space(CoordinateSpace::Native, old_transform, frame.natural);
        self.selection = Some(frame.constrain(native));
    }

    /// Drop every rectangle (new image or decode failure).
    pub fn clear(&mut self) {
        self.selection = None;
        self.completed = None;
    }
}
