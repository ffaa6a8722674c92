use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use cropview_core::export::ExportJob;
use cropview_core::io::image_io::{load_image, write_data_url};
use tracing::{debug, info, warn};

use crate::messages::{WorkerCommand, WorkerResult};

/// Spawn the worker thread. Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> mpsc::Sender<WorkerCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("cropview-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        })
        .expect("Failed to spawn worker thread");

    cmd_tx
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn send_error(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, err: anyhow::Error) {
    warn!(error = %err, "Worker command failed");
    send(
        tx,
        ctx,
        WorkerResult::Error {
            message: format!("{err:#}"),
        },
    );
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::LoadImage { path } => handle_load_image(&path, &tx, &ctx),
            WorkerCommand::Export { job } => {
                // Only the newest export matters; skip any that queued behind it.
                let job = drain_newer_exports(job, &cmd_rx, &tx, &ctx);
                handle_export(&job, &tx, &ctx);
            }
            WorkerCommand::SaveExport { path, data_url } => {
                handle_save(path, &data_url, &tx, &ctx)
            }
        }
    }
    debug!("Worker channel closed, exiting");
}

fn handle_load_image(path: &Path, tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context) {
    let start = Instant::now();
    match load_image(path) {
        Ok(image) => {
            info!(path = %path.display(), width = image.width(), height = image.height(), "Image loaded");
            send(
                tx,
                ctx,
                WorkerResult::ImageLoaded {
                    path: path.to_path_buf(),
                    image: Arc::new(image),
                    elapsed: start.elapsed(),
                },
            );
        }
        Err(e) => send(
            tx,
            ctx,
            WorkerResult::ImageFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        ),
    }
}

/// Take any export commands already queued; return the newest job. Other
/// commands found on the way are handled in order.
fn drain_newer_exports(
    mut job: ExportJob,
    cmd_rx: &mpsc::Receiver<WorkerCommand>,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) -> ExportJob {
    while let Ok(cmd) = cmd_rx.try_recv() {
        match cmd {
            WorkerCommand::Export { job: newer } => job = newer,
            WorkerCommand::LoadImage { path } => handle_load_image(&path, tx, ctx),
            WorkerCommand::SaveExport { path, data_url } => handle_save(path, &data_url, tx, ctx),
        }
    }
    job
}

fn handle_save(
    path: PathBuf,
    data_url: &str,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    match write_data_url(data_url, &path)
        .with_context(|| format!("Failed to save {}", path.display()))
    {
        Ok(()) => send(tx, ctx, WorkerResult::ExportSaved { path }),
        Err(e) => send_error(tx, ctx, e),
    }
}

fn handle_export(job: &ExportJob, tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context) {
    let start = Instant::now();
    match job.run().context("Export failed") {
        Ok(output) => send(
            tx,
            ctx,
            WorkerResult::ExportComplete {
                output,
                elapsed: start.elapsed(),
            },
        ),
        Err(e) => send_error(tx, ctx, e),
    }
}
