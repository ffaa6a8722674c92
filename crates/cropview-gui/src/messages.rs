use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cropview_core::config::ViewerConfig;
use cropview_core::export::{ExportJob, ExportOutput};
use image::RgbaImage;

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Decode an image file.
    LoadImage { path: PathBuf },

    /// Render and encode a snapshotted export.
    Export { job: ExportJob },

    /// Write the PNG carried by an export data string to disk.
    SaveExport { path: PathBuf, data_url: String },
}

/// Results sent from worker thread back to UI thread.
pub enum WorkerResult {
    ImageLoaded {
        path: PathBuf,
        image: Arc<RgbaImage>,
        elapsed: Duration,
    },
    ImageFailed {
        path: PathBuf,
        message: String,
    },
    ExportComplete {
        output: ExportOutput,
        elapsed: Duration,
    },
    ExportSaved {
        path: PathBuf,
    },
    ConfigImported {
        path: PathBuf,
        config: ViewerConfig,
    },
    Error {
        message: String,
    },
    Log {
        message: String,
    },
}
