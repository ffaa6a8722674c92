use cropview_core::consts::{MAX_ZOOM_FACTOR, MIN_ZOOM_FACTOR};
use cropview_core::crop::CropAspect;

use crate::app::CropviewApp;

const LEFT_PANEL_WIDTH: f32 = 260.0;

pub fn show(ctx: &egui::Context, app: &mut CropviewApp) {
    egui::SidePanel::left("controls")
        .default_width(LEFT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(LEFT_PANEL_WIDTH - 20.0);

                image_section(ui, app);
                ui.separator();
                view_section(ui, app);
                ui.separator();
                crop_section(ui, app);
                ui.separator();
                preview_section(ui, app);
            });
        });
}

fn image_section(ui: &mut egui::Ui, app: &mut CropviewApp) {
    super::section_header(ui, "Image", None);
    ui.add_space(4.0);

    match app.ui_state.file_path {
        Some(ref path) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(name);
            let natural = app.viewer.natural_size();
            ui.small(format!("{}x{}", natural.width, natural.height));
        }
        None => {
            ui.small("No image loaded (File > Open Image...)");
        }
    }
}

fn view_section(ui: &mut egui::Ui, app: &mut CropviewApp) {
    super::section_header(ui, "View", None);
    ui.add_space(4.0);

    let mut config = app.viewer.config().clone();
    ui.checkbox(&mut config.pan_enabled, "Drag to pan");
    ui.add_enabled_ui(config.pan_enabled, |ui| {
        ui.checkbox(&mut config.pan_requires_modifier, "Only while Shift is held");
    });
    app.apply_config(config);

    ui.add_space(4.0);
    let fitted = app.viewer.store().is_fitted();
    ui.add_enabled_ui(fitted, |ui| {
        let slider = egui::Slider::new(&mut app.ui_state.zoom, MIN_ZOOM_FACTOR..=MAX_ZOOM_FACTOR)
            .logarithmic(true)
            .text("Zoom")
            .custom_formatter(|v, _| format!("{v:.2}x"));
        if ui.add(slider).changed() {
            app.viewer.set_scaling(app.ui_state.zoom);
            app.viewer.request_export();
        }
        if ui.button("Fit").clicked() {
            app.viewer.set_scaling(1.0);
            app.viewer.request_export();
        }
    });
    ui.small("Wheel or pinch to zoom");
}

fn crop_section(ui: &mut egui::Ui, app: &mut CropviewApp) {
    let status = app.viewer.crop_enabled().then_some("editing");
    super::section_header(ui, "Crop", status);
    ui.add_space(4.0);

    let mut config = app.viewer.config().clone();
    ui.checkbox(&mut config.crop_enabled, "Crop mode");
    ui.checkbox(&mut config.locked, "Lock selection");
    ui.checkbox(&mut config.circular, "Circular");
    super::enum_combo(ui, "Aspect", &mut config.aspect, CropAspect::PRESETS);
    app.apply_config(config);

    if let Some(native) = app.viewer.native_crop_rect() {
        ui.add_space(4.0);
        ui.small(format!(
            "Selection: {:.0}x{:.0} at ({:.0}, {:.0})",
            native.width, native.height, native.x, native.y
        ));
    }
}

fn preview_section(ui: &mut egui::Ui, app: &mut CropviewApp) {
    let status = app.ui_state.export.in_flight.then_some("rendering...");
    super::section_header(ui, "Export", status);
    ui.add_space(4.0);

    let Some(ref texture) = app.ui_state.export.preview else {
        ui.small("Nothing exported yet");
        return;
    };

    let [w, h] = texture.size();
    let max_w = ui.available_width();
    let scale = (max_w / w as f32).min(1.0);
    ui.image((texture.id(), egui::vec2(w as f32 * scale, h as f32 * scale)));
    if let Some(ref image) = app.ui_state.export.image {
        ui.small(format!("{}x{} px", image.width(), image.height()));
    }
}
