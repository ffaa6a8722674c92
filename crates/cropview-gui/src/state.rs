use std::path::PathBuf;
use std::sync::Arc;

use cropview_core::geometry::{Point, Rect};
use image::RgbaImage;

const MAX_LOG_LINES: usize = 200;

#[derive(Default)]
pub struct UIState {
    pub file_path: Option<PathBuf>,
    pub log_messages: Vec<String>,
    /// Mirrors the viewer's published zoom multiplier.
    pub zoom: f64,
    pub export: ExportState,
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_LINES {
            let excess = self.log_messages.len() - MAX_LOG_LINES;
            self.log_messages.drain(..excess);
        }
    }
}

/// Latest accepted export.
#[derive(Default)]
pub struct ExportState {
    pub preview: Option<egui::TextureHandle>,
    pub image: Option<Arc<RgbaImage>>,
    pub data_url: Option<String>,
    pub in_flight: bool,
}

#[derive(Default)]
pub struct ViewportState {
    pub texture: Option<egui::TextureHandle>,
    /// Touch ids currently down. While non-empty, egui's simulated mouse
    /// events are ignored so one finger is not seen twice.
    pub touches: Vec<u64>,
    pub shift_held: bool,
    pub crop_drag: Option<CropDrag>,
}

/// Which part of the crop rectangle a drag grabbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragHandle {
    Move,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Drawing a fresh rectangle from the press point.
    Create,
}

/// A crop-widget drag in viewport coordinates.
#[derive(Clone, Copy, Debug)]
pub struct CropDrag {
    pub pointer: u64,
    pub handle: DragHandle,
    pub start: Point,
    pub start_rect: Rect,
}
