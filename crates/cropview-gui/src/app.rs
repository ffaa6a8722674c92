use std::sync::mpsc;
use std::sync::Arc;

use cropview_core::config::ViewerConfig;
use cropview_core::viewer::Viewer;
use image::RgbaImage;

use crate::convert::rgba_to_color_image;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::state::{UIState, ViewportState};
use crate::worker;

pub struct CropviewApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    /// Lets dialog threads report back without going through the worker.
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub viewer: Viewer,
    pub ui_state: UIState,
    pub viewport: ViewportState,
    pub show_about: bool,
}

impl CropviewApp {
    pub fn new(ctx: &egui::Context) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = worker::spawn_worker(result_tx.clone(), ctx.clone());

        Self {
            cmd_tx,
            result_tx,
            result_rx,
            viewer: Viewer::new(default_config()),
            ui_state: UIState {
                zoom: 1.0,
                ..Default::default()
            },
            viewport: ViewportState::default(),
            show_about: false,
        }
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::ImageLoaded {
                    path,
                    image,
                    elapsed,
                } => {
                    self.ui_state.add_log(format!(
                        "Opened: {} ({}x{}) in {}",
                        path.display(),
                        image.width(),
                        image.height(),
                        format_duration(elapsed)
                    ));
                    self.update_viewport_texture(ctx, &image);
                    self.viewport.crop_drag = None;
                    self.ui_state.file_path = Some(path);
                    self.clear_export();
                    self.viewer.set_image(image);
                    self.viewer.request_export();
                }
                WorkerResult::ImageFailed { path, message } => {
                    self.ui_state
                        .add_log(format!("ERROR: {}: {message}", path.display()));
                    self.viewport.texture = None;
                    self.viewport.crop_drag = None;
                    self.ui_state.file_path = None;
                    self.clear_export();
                    self.viewer.image_failed(&message);
                }
                WorkerResult::ExportComplete { output, elapsed } => {
                    self.ui_state.export.in_flight = false;
                    if !self.viewer.accept_export(output.ticket) {
                        continue;
                    }
                    tracing::debug!(
                        ticket = output.ticket.id(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Export accepted"
                    );
                    let preview = ctx.load_texture(
                        "export_preview",
                        rgba_to_color_image(&output.image),
                        egui::TextureOptions::LINEAR,
                    );
                    self.ui_state.export.preview = Some(preview);
                    self.ui_state.export.image = Some(Arc::new(output.image));
                    self.ui_state.export.data_url = Some(output.data_url);
                }
                WorkerResult::ExportSaved { path } => {
                    self.ui_state.add_log(format!("Saved: {}", path.display()));
                }
                WorkerResult::ConfigImported { path, config } => {
                    self.ui_state
                        .add_log(format!("Config imported: {}", path.display()));
                    self.apply_config(config);
                }
                WorkerResult::Error { message } => {
                    self.ui_state.export.in_flight = false;
                    self.ui_state.add_log(format!("ERROR: {message}"));
                }
                WorkerResult::Log { message } => {
                    self.ui_state.add_log(message);
                }
            }
        }
    }

    fn update_viewport_texture(&mut self, ctx: &egui::Context, image: &RgbaImage) {
        let texture = ctx.load_texture(
            "viewport",
            rgba_to_color_image(image),
            egui::TextureOptions::LINEAR,
        );
        self.viewport.texture = Some(texture);
    }

    fn clear_export(&mut self) {
        self.ui_state.export.preview = None;
        self.ui_state.export.image = None;
        self.ui_state.export.data_url = None;
    }

    /// Replace the viewer config and re-export.
    pub fn apply_config(&mut self, mut config: ViewerConfig) {
        if !config.transform_enabled {
            // The viewport panel only draws the pan/zoom presentation
            self.ui_state
                .add_log("Config disables pan/zoom; keeping it on in the viewer".into());
            config.transform_enabled = true;
        }
        if let Err(e) = config.validate() {
            self.ui_state.add_log(format!("ERROR: {e}"));
            return;
        }
        if &config == self.viewer.config() {
            return;
        }
        self.viewer.set_config(config);
        self.viewport.crop_drag = None;
        self.viewer.request_export();
    }

    pub fn send_command(&self, cmd: WorkerCommand) {
        let _ = self.cmd_tx.send(cmd);
    }

    /// Hand the due export (if any) to the worker, snapshotted now.
    fn dispatch_export(&mut self) {
        if let Some(job) = self.viewer.take_export_job() {
            self.ui_state.export.in_flight = true;
            self.send_command(WorkerCommand::Export { job });
        }
    }
}

impl eframe::App for CropviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::viewport::show(ctx, self);

        self.dispatch_export();
        if let Some(m) = self.viewer.poll_zoom_multiplier() {
            self.ui_state.zoom = m;
        }

        if self.show_about {
            egui::Window::new("About Cropview")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Cropview");
                        ui.label("Pan, zoom and crop images");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}

/// Plain drags edit the crop; Shift+drag pans. Wheel and pinch always zoom.
pub fn default_config() -> ViewerConfig {
    ViewerConfig {
        pan_requires_modifier: true,
        ..Default::default()
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", d.as_millis())
    } else {
        format!("{secs:.1}s")
    }
}
