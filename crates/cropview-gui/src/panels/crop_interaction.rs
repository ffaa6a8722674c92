//! The crop widget: dragging the selection and its corners, and drawing
//! the overlay. Only sees events the input arbiter passed through.

use cropview_core::geometry::{Point, Rect};
use cropview_core::input::InputEvent;
use cropview_core::viewer::Viewer;

use crate::app::CropviewApp;
use crate::state::{CropDrag, DragHandle, ViewportState};

/// Grab distance around each corner, in points.
const HANDLE_RADIUS: f64 = 8.0;
const MIN_CREATE_SIZE: f64 = 1.0;

const SHADE: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 0, 0, 140);
const OUTLINE: egui::Color32 = egui::Color32::from_rgb(255, 255, 255);

/// Route one engine event to the crop widget. Anything the arbiter claimed
/// ends the current drag: a pan or pinch owns the pointers now.
pub fn handle_event(
    viewer: &mut Viewer,
    viewport: &mut ViewportState,
    event: &InputEvent,
    claimed: bool,
    origin: Point,
) {
    if claimed {
        viewport.crop_drag = None;
        return;
    }
    if !viewer.crop_enabled() {
        return;
    }
    match *event {
        InputEvent::PointerDown(p) => {
            if viewport.crop_drag.is_some() {
                return;
            }
            let Some(rect) = viewer.crop_rect() else {
                return;
            };
            let start = to_local(p.position, origin);
            viewport.crop_drag = Some(CropDrag {
                pointer: p.id.0,
                handle: hit_test(rect, start).unwrap_or(DragHandle::Create),
                start,
                start_rect: rect,
            });
        }
        InputEvent::PointerMove(p) => {
            let Some(drag) = viewport.crop_drag.filter(|d| d.pointer == p.id.0) else {
                return;
            };
            let rect = dragged_rect(&drag, to_local(p.position, origin));
            if drag.handle == DragHandle::Create
                && (rect.width < MIN_CREATE_SIZE || rect.height < MIN_CREATE_SIZE)
            {
                return;
            }
            if viewer.edit_crop(rect).is_none() {
                viewport.crop_drag = None;
            }
        }
        InputEvent::PointerUp(p) | InputEvent::PointerCancel(p) => {
            if viewport.crop_drag.is_some_and(|d| d.pointer == p.id.0) {
                finish_drag(viewer, viewport);
            }
        }
        InputEvent::PointerLeave => {
            if viewport.crop_drag.is_some() {
                finish_drag(viewer, viewport);
            }
        }
        _ => {}
    }
}

fn finish_drag(viewer: &mut Viewer, viewport: &mut ViewportState) {
    viewport.crop_drag = None;
    if let Some(done) = viewer.complete_crop() {
        tracing::debug!(rect = ?done.rect(), "Crop drag finished");
    }
    viewer.request_export();
}

fn to_local(client: Point, origin: Point) -> Point {
    Point::new(client.x - origin.x, client.y - origin.y)
}

/// Which handle sits under `p`, corners first.
pub fn hit_test(rect: Rect, p: Point) -> Option<DragHandle> {
    let corners = [
        (rect.min(), DragHandle::TopLeft),
        (Point::new(rect.right(), rect.y), DragHandle::TopRight),
        (Point::new(rect.x, rect.bottom()), DragHandle::BottomLeft),
        (rect.max(), DragHandle::BottomRight),
    ];
    corners
        .into_iter()
        .find(|(c, _)| c.distance(p) <= HANDLE_RADIUS)
        .map(|(_, handle)| handle)
        .or_else(|| rect.contains(p).then_some(DragHandle::Move))
}

/// Rectangle produced by dragging `drag` to `p`. Constraints are applied
/// later by the viewer; this only moves edges.
pub fn dragged_rect(drag: &CropDrag, p: Point) -> Rect {
    let r = drag.start_rect;
    let dx = p.x - drag.start.x;
    let dy = p.y - drag.start.y;
    match drag.handle {
        DragHandle::Move => Rect::new(r.x + dx, r.y + dy, r.width, r.height),
        DragHandle::Create => span(drag.start, p),
        DragHandle::TopLeft => span(Point::new(r.x + dx, r.y + dy), r.max()),
        DragHandle::TopRight => span(
            Point::new(r.x, r.y + dy),
            Point::new(r.right() + dx, r.bottom()),
        ),
        DragHandle::BottomLeft => span(
            Point::new(r.x + dx, r.y),
            Point::new(r.right(), r.bottom() + dy),
        ),
        DragHandle::BottomRight => span(r.min(), Point::new(r.right() + dx, r.bottom() + dy)),
    }
}

/// Normalised rectangle between two corners, whichever way round.
fn span(a: Point, b: Point) -> Rect {
    Rect::from_min_max(
        Point::new(a.x.min(b.x), a.y.min(b.y)),
        Point::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

pub fn update_cursor(ctx: &egui::Context, ui: &egui::Ui, app: &CropviewApp, panel: egui::Rect) {
    if !app.viewer.crop_enabled() || app.viewer.arbiter().pan_permitted() {
        return;
    }
    let handle = match app.viewport.crop_drag {
        Some(drag) => Some(drag.handle),
        None => {
            let Some(pos) = ui.input(|i| i.pointer.hover_pos()) else {
                return;
            };
            let local = Point::new(
                f64::from(pos.x - panel.min.x),
                f64::from(pos.y - panel.min.y),
            );
            app.viewer.crop_rect().and_then(|r| hit_test(r, local))
        }
    };
    let icon = match handle {
        Some(DragHandle::Move) => egui::CursorIcon::Move,
        Some(DragHandle::TopLeft | DragHandle::BottomRight) => egui::CursorIcon::ResizeNwSe,
        Some(DragHandle::TopRight | DragHandle::BottomLeft) => egui::CursorIcon::ResizeNeSw,
        Some(DragHandle::Create) | None => egui::CursorIcon::Crosshair,
    };
    ctx.set_cursor_icon(icon);
}

/// Shade everything outside the crop and outline it.
pub fn draw_crop_overlay(painter: &egui::Painter, panel: egui::Rect, crop: Rect, circular: bool) {
    let c = egui::Rect::from_min_size(
        panel.min + egui::vec2(crop.x as f32, crop.y as f32),
        egui::vec2(crop.width as f32, crop.height as f32),
    );
    let inner = c.intersect(panel);

    // Four bands around the crop
    let bands = [
        egui::Rect::from_min_max(panel.min, egui::pos2(panel.max.x, inner.min.y)),
        egui::Rect::from_min_max(egui::pos2(panel.min.x, inner.max.y), panel.max),
        egui::Rect::from_min_max(
            egui::pos2(panel.min.x, inner.min.y),
            egui::pos2(inner.min.x, inner.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(inner.max.x, inner.min.y),
            egui::pos2(panel.max.x, inner.max.y),
        ),
    ];
    for band in bands {
        if band.is_positive() {
            painter.rect_filled(band, 0.0, SHADE);
        }
    }

    painter.rect_stroke(
        c,
        0.0,
        egui::Stroke::new(1.0, OUTLINE),
        egui::StrokeKind::Inside,
    );

    if circular {
        painter.add(egui::Shape::closed_line(
            ellipse_points(c, 64),
            egui::Stroke::new(1.5, OUTLINE),
        ));
    }

    for corner in [c.left_top(), c.right_top(), c.left_bottom(), c.right_bottom()] {
        painter.rect_filled(
            egui::Rect::from_center_size(corner, egui::vec2(8.0, 8.0)),
            1.0,
            OUTLINE,
        );
    }
}

fn ellipse_points(rect: egui::Rect, segments: usize) -> Vec<egui::Pos2> {
    let center = rect.center();
    let rx = rect.width() / 2.0;
    let ry = rect.height() / 2.0;
    (0..segments)
        .map(|i| {
            let a = i as f32 / segments as f32 * std::f32::consts::TAU;
            egui::pos2(center.x + rx * a.cos(), center.y + ry * a.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cropview_core::config::ViewerConfig;
    use cropview_core::geometry::Size;
    use cropview_core::input::PointerEvent;
    use image::RgbaImage;

    use super::*;

    /// 200x200 viewer where plain drags edit the crop, as the app runs it.
    fn crop_viewer() -> Viewer {
        let mut viewer = Viewer::new(ViewerConfig {
            pan_requires_modifier: true,
            ..Default::default()
        });
        viewer.resize(Size::new(200.0, 200.0));
        viewer.set_image(Arc::new(RgbaImage::new(200, 200)));
        viewer
    }

    fn route(viewer: &mut Viewer, viewport: &mut ViewportState, event: InputEvent) {
        let claimed = viewer.handle_input(&event).is_claimed();
        handle_event(viewer, viewport, &event, claimed, Point::ORIGIN);
    }

    fn pe(id: u64, x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(id, x, y)
    }

    fn drag(handle: DragHandle) -> CropDrag {
        CropDrag {
            pointer: 0,
            handle,
            start: Point::new(50.0, 50.0),
            start_rect: Rect::new(20.0, 20.0, 60.0, 40.0),
        }
    }

    #[test]
    fn test_hit_test_corners_inside_outside() {
        let r = Rect::new(20.0, 20.0, 60.0, 40.0);
        assert_eq!(hit_test(r, Point::new(22.0, 21.0)), Some(DragHandle::TopLeft));
        assert_eq!(hit_test(r, Point::new(80.0, 60.0)), Some(DragHandle::BottomRight));
        assert_eq!(hit_test(r, Point::new(79.0, 22.0)), Some(DragHandle::TopRight));
        assert_eq!(hit_test(r, Point::new(50.0, 40.0)), Some(DragHandle::Move));
        assert_eq!(hit_test(r, Point::new(150.0, 150.0)), None);
    }

    #[test]
    fn test_dragged_rect_move() {
        let r = dragged_rect(&drag(DragHandle::Move), Point::new(60.0, 45.0));
        assert_eq!(r, Rect::new(30.0, 15.0, 60.0, 40.0));
    }

    #[test]
    fn test_dragged_rect_corner_keeps_opposite_fixed() {
        let r = dragged_rect(&drag(DragHandle::BottomRight), Point::new(70.0, 60.0));
        assert_eq!(r, Rect::new(20.0, 20.0, 80.0, 50.0));

        let r = dragged_rect(&drag(DragHandle::TopLeft), Point::new(40.0, 40.0));
        assert_eq!(r, Rect::new(10.0, 10.0, 70.0, 50.0));
    }

    #[test]
    fn test_dragged_rect_create_normalises() {
        let r = dragged_rect(&drag(DragHandle::Create), Point::new(30.0, 20.0));
        assert_eq!(r, Rect::new(30.0, 20.0, 20.0, 30.0));
    }

    #[test]
    fn test_drag_moves_selection() {
        let mut viewer = crop_viewer();
        let mut viewport = ViewportState::default();
        let before = viewer.crop_rect().unwrap();

        route(&mut viewer, &mut viewport, InputEvent::PointerDown(pe(1, 100.0, 100.0)));
        assert_eq!(viewport.crop_drag.map(|d| d.handle), Some(DragHandle::Move));
        route(&mut viewer, &mut viewport, InputEvent::PointerMove(pe(1, 90.0, 95.0)));
        route(&mut viewer, &mut viewport, InputEvent::PointerUp(pe(1, 90.0, 95.0)));

        let after = viewer.crop_rect().unwrap();
        assert_eq!((after.x, after.y), (before.x - 10.0, before.y - 5.0));
        assert!(viewport.crop_drag.is_none());
    }

    #[test]
    fn test_claimed_gesture_ends_drag() {
        let mut viewer = crop_viewer();
        let mut viewport = ViewportState::default();
        let before = viewer.crop_rect().unwrap();

        route(&mut viewer, &mut viewport, InputEvent::PointerDown(pe(1, 100.0, 100.0)));
        assert!(viewport.crop_drag.is_some());

        // A second finger turns it into a pinch, which owns the gesture
        route(&mut viewer, &mut viewport, InputEvent::PointerDown(pe(2, 120.0, 100.0)));
        assert!(viewport.crop_drag.is_none());

        // Pinch ends; the first finger's later moves must not resume the old drag
        route(&mut viewer, &mut viewport, InputEvent::PointerUp(pe(2, 120.0, 100.0)));
        route(&mut viewer, &mut viewport, InputEvent::PointerMove(pe(1, 60.0, 60.0)));
        assert!(viewport.crop_drag.is_none());
        assert_eq!(viewer.crop_rect().unwrap(), before);
    }
}
