pub mod encode;
pub mod render;
pub mod scheduler;

use std::sync::Arc;

use image::RgbaImage;

use crate::error::Result;

pub use encode::{data_url_to_image, decode_data_url, encode_png, encode_png_data_url};
pub use render::{placeholder, render_legacy, render_viewport, LegacyExport, ViewportExport};
pub use scheduler::{ExportScheduler, ExportTicket};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExportMode {
    /// Pan/zoom active: viewport-space crop over the live transform.
    Viewport(ViewportExport),
    /// No transform: native crop with rotation and scale.
    Legacy(LegacyExport),
}

/// Snapshot of everything an export needs, taken at draw time.
/// Cheap to clone and safe to hand to a worker thread.
#[derive(Clone, Debug)]
pub struct ExportJob {
    pub ticket: ExportTicket,
    pub image: Option<Arc<RgbaImage>>,
    pub mode: ExportMode,
}

/// Rendered export plus its encoded data string.
#[derive(Clone, Debug)]
pub struct ExportOutput {
    pub ticket: ExportTicket,
    pub image: RgbaImage,
    pub data_url: String,
}

impl ExportJob {
    pub fn render(&self) -> RgbaImage {
        let src = self.image.as_deref();
        match &self.mode {
            ExportMode::Viewport(params) => render_viewport(src, params),
            ExportMode::Legacy(params) => render_legacy(src, params),
        }
    }

    /// Render and encode.
    pub fn run(&self) -> Result<ExportOutput> {
        let image = self.render();
        let data_url = encode_png_data_url(&image)?;
        Ok(ExportOutput {
            ticket: self.ticket,
            image,
            data_url,
        })
    }
}
