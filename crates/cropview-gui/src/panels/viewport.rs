use cropview_core::geometry::{Point, Size};
use cropview_core::input::{InputEvent, PointerEvent};
use cropview_core::viewport::Refit;

use crate::app::CropviewApp;
use crate::panels::crop_interaction;

/// Pointer id used for the mouse; touch ids are offset past it.
const MOUSE_POINTER: u64 = 0;
const TOUCH_POINTER_BASE: u64 = 1;

/// Pixels per wheel line, matching what browsers report for one notch.
const WHEEL_LINE_PX: f64 = 40.0;

pub fn show(ctx: &egui::Context, app: &mut CropviewApp) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            paint_background(ui, rect);
            let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

            app.viewer
                .set_surface_origin(Point::new(f64::from(rect.min.x), f64::from(rect.min.y)));
            let refit = app
                .viewer
                .resize(Size::new(f64::from(rect.width()), f64::from(rect.height())));
            if matches!(refit, Refit::Fitted | Refit::Resized) {
                app.viewer.request_export();
            }

            let Some(texture_id) = app.viewport.texture.as_ref().map(|t| t.id()) else {
                show_placeholder(ui);
                return;
            };

            let tracking = app.viewer.arbiter().active_pointers() > 0
                || app.viewport.crop_drag.is_some();
            if response.hovered() || tracking {
                forward_input(ui, app, rect);
            }
            if response.hovered() {
                crop_interaction::update_cursor(ctx, ui, app, rect);
            }

            let painter = ui.painter_at(rect);
            draw_image(&painter, app, texture_id, rect);
            if app.viewer.crop_enabled() {
                if let Some(crop) = app.viewer.crop_rect() {
                    crop_interaction::draw_crop_overlay(
                        &painter,
                        rect,
                        crop,
                        app.viewer.config().circular,
                    );
                }
            }
        });
}

fn to_point(pos: egui::Pos2) -> Point {
    Point::new(f64::from(pos.x), f64::from(pos.y))
}

/// Translate this frame's raw egui events into engine input.
fn forward_input(ui: &egui::Ui, app: &mut CropviewApp, rect: egui::Rect) {
    let (events, shift, hover) = ui.input(|i| (i.events.clone(), i.modifiers.shift, i.pointer.hover_pos()));

    if shift != app.viewport.shift_held {
        app.viewport.shift_held = shift;
        let event = if shift {
            InputEvent::ModifierDown
        } else {
            InputEvent::ModifierUp
        };
        dispatch(app, &event, rect);
    }

    for event in &events {
        match *event {
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } => {
                // egui mirrors the first touch as mouse events
                if !app.viewport.touches.is_empty() {
                    continue;
                }
                let pe = PointerEvent::new(MOUSE_POINTER, f64::from(pos.x), f64::from(pos.y));
                if pressed {
                    if rect.contains(pos) {
                        dispatch(app, &InputEvent::PointerDown(pe), rect);
                    }
                } else {
                    dispatch(app, &InputEvent::PointerUp(pe), rect);
                }
            }
            egui::Event::PointerMoved(pos) => {
                if app.viewport.touches.is_empty() {
                    let pe = PointerEvent::new(MOUSE_POINTER, f64::from(pos.x), f64::from(pos.y));
                    dispatch(app, &InputEvent::PointerMove(pe), rect);
                }
            }
            egui::Event::PointerGone => {
                // The arbiter forgets the modifier on leave; resend it on return
                app.viewport.shift_held = false;
                dispatch(app, &InputEvent::PointerLeave, rect);
            }
            egui::Event::Touch { id, phase, pos, .. } => {
                let pe = PointerEvent::new(
                    TOUCH_POINTER_BASE + id.0,
                    f64::from(pos.x),
                    f64::from(pos.y),
                );
                match phase {
                    egui::TouchPhase::Start => {
                        if rect.contains(pos) {
                            app.viewport.touches.push(id.0);
                            dispatch(app, &InputEvent::PointerDown(pe), rect);
                        }
                    }
                    egui::TouchPhase::Move => dispatch(app, &InputEvent::PointerMove(pe), rect),
                    egui::TouchPhase::End => {
                        app.viewport.touches.retain(|t| *t != id.0);
                        dispatch(app, &InputEvent::PointerUp(pe), rect);
                    }
                    egui::TouchPhase::Cancel => {
                        app.viewport.touches.retain(|t| *t != id.0);
                        dispatch(app, &InputEvent::PointerCancel(pe), rect);
                    }
                }
            }
            egui::Event::MouseWheel { unit, delta, .. } => {
                let Some(pos) = hover.filter(|p| rect.contains(*p)) else {
                    continue;
                };
                let event = InputEvent::Wheel {
                    position: to_point(pos),
                    delta_y: wheel_delta_y(unit, delta.y, rect.height()),
                };
                dispatch(app, &event, rect);
            }
            // Trackpad pinch arrives pre-digested as a zoom factor
            egui::Event::Zoom(factor) => {
                if let Some(pos) = hover.filter(|p| rect.contains(*p)) {
                    let anchor = to_point(pos - rect.min.to_vec2());
                    app.viewer.zoom_at(anchor, f64::from(factor));
                    app.viewer.request_export();
                }
            }
            _ => {}
        }
    }
}

/// egui reports scroll-up as positive; the engine expects browser-style
/// `delta_y` (positive scrolls down) in pixels.
fn wheel_delta_y(unit: egui::MouseWheelUnit, dy: f32, page_height: f32) -> f64 {
    let dy = -f64::from(dy);
    match unit {
        egui::MouseWheelUnit::Point => dy,
        egui::MouseWheelUnit::Line => dy * WHEEL_LINE_PX,
        egui::MouseWheelUnit::Page => dy * f64::from(page_height),
    }
}

fn dispatch(app: &mut CropviewApp, event: &InputEvent, rect: egui::Rect) {
    let claimed = app.viewer.handle_input(event).is_claimed();
    if claimed {
        app.viewer.request_export();
    }
    crop_interaction::handle_event(
        &mut app.viewer,
        &mut app.viewport,
        event,
        claimed,
        to_point(rect.min),
    );
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn draw_image(
    painter: &egui::Painter,
    app: &CropviewApp,
    texture_id: egui::TextureId,
    rect: egui::Rect,
) {
    if !app.viewer.store().is_fitted() {
        return;
    }
    let r = app
        .viewer
        .transform()
        .rendered_rect(app.viewer.natural_size());
    let img_rect = egui::Rect::from_min_size(
        rect.min + egui::vec2(r.x as f32, r.y as f32),
        egui::vec2(r.width as f32, r.height as f32),
    );
    painter.image(
        texture_id,
        img_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

fn show_placeholder(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Open an image to begin")
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}
