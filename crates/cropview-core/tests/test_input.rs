mod common;

use approx::assert_abs_diff_eq;

use cropview_core::config::ViewerConfig;
use cropview_core::geometry::Point;
use cropview_core::input::{
    Capture, GestureState, InputArbiter, InputEvent, PointerEvent, PointerId,
};
use cropview_core::viewport::ViewTransformStore;

use common::fitted_store;

fn down(id: u64, x: f64, y: f64) -> InputEvent {
    InputEvent::PointerDown(PointerEvent::new(id, x, y))
}

fn moved(id: u64, x: f64, y: f64) -> InputEvent {
    InputEvent::PointerMove(PointerEvent::new(id, x, y))
}

fn up(id: u64, x: f64, y: f64) -> InputEvent {
    InputEvent::PointerUp(PointerEvent::new(id, x, y))
}

fn setup(config: ViewerConfig) -> (InputArbiter, ViewTransformStore) {
    (
        InputArbiter::new(&config),
        fitted_store((100.0, 100.0), (200.0, 100.0)),
    )
}

// ---------------------------------------------------------------------------
// Pan
// ---------------------------------------------------------------------------

#[test]
fn test_single_pointer_pans() {
    let (mut arbiter, mut store) = setup(ViewerConfig::default());

    let out = arbiter.handle(&down(1, 50.0, 50.0), &mut store);
    assert!(out.is_claimed());
    assert_eq!(out.capture, Capture::Acquire(PointerId(1)));
    assert!(matches!(arbiter.state(), GestureState::Panning(_)));

    let out = arbiter.handle(&moved(1, 70.0, 50.0), &mut store);
    assert!(out.is_claimed());
    assert_abs_diff_eq!(store.transform().translate_x, -30.0);

    // Displacement is measured from the pan start, not the last move
    arbiter.handle(&moved(1, 60.0, 50.0), &mut store);
    assert_abs_diff_eq!(store.transform().translate_x, -40.0);

    let out = arbiter.handle(&up(1, 60.0, 50.0), &mut store);
    assert_eq!(out.capture, Capture::Release(PointerId(1)));
    assert_eq!(arbiter.state(), GestureState::Idle);
    assert_eq!(arbiter.active_pointers(), 0);
}

#[test]
fn test_pan_is_clamped_to_cover() {
    let (mut arbiter, mut store) = setup(ViewerConfig::default());
    arbiter.handle(&down(1, 50.0, 50.0), &mut store);
    arbiter.handle(&moved(1, 500.0, 500.0), &mut store);

    let t = store.transform();
    assert_eq!((t.translate_x, t.translate_y), (0.0, 0.0));
}

#[test]
fn test_pan_disabled_passes_to_crop() {
    let config = ViewerConfig {
        pan_enabled: false,
        ..Default::default()
    };
    let (mut arbiter, mut store) = setup(config);
    let before = store.transform();

    let out = arbiter.handle(&down(1, 50.0, 50.0), &mut store);
    assert!(!out.is_claimed());
    assert_eq!(out.capture, Capture::None);
    assert_eq!(arbiter.state(), GestureState::CropEditing);

    let out = arbiter.handle(&moved(1, 80.0, 50.0), &mut store);
    assert!(!out.is_claimed());
    assert_eq!(store.transform(), before);
}

// ---------------------------------------------------------------------------
// Modifier
// ---------------------------------------------------------------------------

#[test]
fn test_modifier_required_for_pan() {
    let config = ViewerConfig {
        pan_requires_modifier: true,
        ..Default::default()
    };
    let (mut arbiter, mut store) = setup(config);

    let out = arbiter.handle(&down(1, 50.0, 50.0), &mut store);
    assert!(!out.is_claimed());
    arbiter.handle(&up(1, 50.0, 50.0), &mut store);

    arbiter.handle(&InputEvent::ModifierDown, &mut store);
    let out = arbiter.handle(&down(2, 50.0, 50.0), &mut store);
    assert!(out.is_claimed());

    let out = arbiter.handle(&InputEvent::ModifierUp, &mut store);
    assert_eq!(out.capture, Capture::Release(PointerId(2)));
    assert_eq!(arbiter.state(), GestureState::Idle);
}

#[test]
fn test_modifier_release_without_requirement_keeps_pan() {
    let (mut arbiter, mut store) = setup(ViewerConfig::default());
    arbiter.handle(&InputEvent::ModifierDown, &mut store);
    arbiter.handle(&down(1, 50.0, 50.0), &mut store);

    arbiter.handle(&InputEvent::ModifierUp, &mut store);
    assert!(matches!(arbiter.state(), GestureState::Panning(_)));
}

// ---------------------------------------------------------------------------
// Pinch
// ---------------------------------------------------------------------------

#[test]
fn test_two_pointers_pinch_zoom() {
    let (mut arbiter, mut store) = setup(ViewerConfig::default());
    arbiter.handle(&down(1, 40.0, 50.0), &mut store);
    let out = arbiter.handle(&down(2, 60.0, 50.0), &mut store);
    assert!(out.is_claimed());
    assert_eq!(out.capture, Capture::Acquire(PointerId(2)));
    assert!(matches!(arbiter.state(), GestureState::Pinching(_)));

    // Distance 20 -> 40 doubles the scale around the centre (50, 50)
    arbiter.handle(&moved(2, 80.0, 50.0), &mut store);
    let t = store.transform();
    assert_abs_diff_eq!(t.scale, 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(t.translate_x, -150.0, epsilon = 1e-9);
    assert_abs_diff_eq!(t.translate_y, -50.0, epsilon = 1e-9);
}

#[test]
fn test_pinch_scale_is_relative_to_start() {
    let (mut arbiter, mut store) = setup(ViewerConfig::default());
    arbiter.handle(&down(1, 40.0, 50.0), &mut store);
    arbiter.handle(&down(2, 60.0, 50.0), &mut store);

    arbiter.handle(&moved(2, 80.0, 50.0), &mut store);
    arbiter.handle(&moved(2, 70.0, 50.0), &mut store);
    assert_abs_diff_eq!(store.transform().scale, 1.5, epsilon = 1e-9);
}

#[test]
fn test_pinch_degrades_to_pan() {
    let (mut arbiter, mut store) = setup(ViewerConfig::default());
    arbiter.handle(&down(1, 40.0, 50.0), &mut store);
    arbiter.handle(&down(2, 60.0, 50.0), &mut store);

    let out = arbiter.handle(&up(2, 60.0, 50.0), &mut store);
    assert_eq!(out.capture, Capture::Release(PointerId(2)));
    match arbiter.state() {
        GestureState::Panning(anchor) => assert_eq!(anchor.pointer, PointerId(1)),
        other => panic!("expected pan, got {other:?}"),
    }

    arbiter.handle(&up(1, 40.0, 50.0), &mut store);
    assert_eq!(arbiter.state(), GestureState::Idle);
}

#[test]
fn test_pinch_degrades_to_idle_when_pan_not_permitted() {
    let config = ViewerConfig {
        pan_enabled: false,
        ..Default::default()
    };
    let (mut arbiter, mut store) = setup(config);
    arbiter.handle(&down(1, 40.0, 50.0), &mut store);
    arbiter.handle(&down(2, 60.0, 50.0), &mut store);
    assert!(matches!(arbiter.state(), GestureState::Pinching(_)));

    arbiter.handle(&up(1, 40.0, 50.0), &mut store);
    assert_eq!(arbiter.state(), GestureState::Idle);
}

#[test]
fn test_pinch_reanchors_when_third_pointer_remains() {
    let (mut arbiter, mut store) = setup(ViewerConfig::default());
    arbiter.handle(&down(1, 10.0, 50.0), &mut store);
    arbiter.handle(&down(2, 90.0, 50.0), &mut store);
    assert!(arbiter.handle(&down(3, 15.0, 50.0), &mut store).is_claimed());
    assert_eq!(arbiter.active_pointers(), 3);

    // One of the original pair lifts; pointers 1 and 3 now pinch
    let out = arbiter.handle(&up(2, 90.0, 50.0), &mut store);
    assert_eq!(out.capture, Capture::Release(PointerId(2)));
    match arbiter.state() {
        GestureState::Pinching(anchor) => {
            assert_abs_diff_eq!(anchor.initial_distance, 5.0, epsilon = 1e-9);
            assert_abs_diff_eq!(anchor.initial_scale, 1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(anchor.center.x, 12.5, epsilon = 1e-9);
        }
        other => panic!("expected pinch, got {other:?}"),
    }

    // A small spread scales against the new pair, not the old one
    arbiter.handle(&moved(3, 15.5, 50.0), &mut store);
    assert_abs_diff_eq!(store.transform().scale, 1.1, epsilon = 1e-9);
}

#[test]
fn test_coincident_pinch_does_not_zoom() {
    let (mut arbiter, mut store) = setup(ViewerConfig::default());
    let before = store.transform();
    arbiter.handle(&down(1, 50.0, 50.0), &mut store);
    arbiter.handle(&down(2, 50.0, 50.0), &mut store);
    arbiter.handle(&moved(2, 90.0, 50.0), &mut store);
    assert_eq!(store.transform(), before);
}

// ---------------------------------------------------------------------------
// Leave, wheel, disabled
// ---------------------------------------------------------------------------

#[test]
fn test_pointer_leave_clears_state() {
    let (mut arbiter, mut store) = setup(ViewerConfig::default());
    arbiter.handle(&down(1, 50.0, 50.0), &mut store);

    let out = arbiter.handle(&InputEvent::PointerLeave, &mut store);
    assert_eq!(out.capture, Capture::Release(PointerId(1)));
    assert_eq!(arbiter.state(), GestureState::Idle);
    assert_eq!(arbiter.active_pointers(), 0);
}

#[test]
fn test_wheel_down_zooms_out_up_zooms_in() {
    let (mut arbiter, mut store) = setup(ViewerConfig::default());

    let out = arbiter.handle(
        &InputEvent::Wheel {
            position: Point::new(50.0, 50.0),
            delta_y: -100.0,
        },
        &mut store,
    );
    assert!(out.is_claimed());
    assert!(out.prevent_default);
    assert_abs_diff_eq!(store.transform().scale, (0.15f64).exp(), epsilon = 1e-9);

    arbiter.handle(
        &InputEvent::Wheel {
            position: Point::new(50.0, 50.0),
            delta_y: 200.0,
        },
        &mut store,
    );
    assert_abs_diff_eq!(store.transform().scale, (-0.15f64).exp(), epsilon = 1e-9);
}

#[test]
fn test_wheel_uses_surface_origin() {
    let (mut arbiter, mut store) = setup(ViewerConfig::default());
    arbiter.set_surface_origin(Point::new(100.0, 200.0));

    let anchor = Point::new(30.0, 40.0);
    let before = store.transform().viewport_to_image(anchor);
    arbiter.handle(
        &InputEvent::Wheel {
            position: Point::new(130.0, 240.0),
            delta_y: -300.0,
        },
        &mut store,
    );
    let after = store.transform().viewport_to_image(anchor);
    assert_abs_diff_eq!(after.x, before.x, epsilon = 1e-9);
    assert_abs_diff_eq!(after.y, before.y, epsilon = 1e-9);
}

#[test]
fn test_legacy_mode_claims_nothing() {
    let config = ViewerConfig {
        transform_enabled: false,
        ..Default::default()
    };
    let (mut arbiter, mut store) = setup(config);
    let before = store.transform();

    assert!(!arbiter.handle(&down(1, 50.0, 50.0), &mut store).is_claimed());
    assert!(!arbiter.handle(&down(2, 70.0, 50.0), &mut store).is_claimed());
    assert!(!arbiter.handle(&moved(2, 90.0, 50.0), &mut store).is_claimed());
    let wheel = arbiter.handle(
        &InputEvent::Wheel {
            position: Point::new(50.0, 50.0),
            delta_y: -100.0,
        },
        &mut store,
    );
    assert!(!wheel.is_claimed());
    // The page must not scroll under the surface even when nothing zooms
    assert!(wheel.prevent_default);
    assert_eq!(store.transform(), before);
}

#[test]
fn test_disabled_passes_everything() {
    let config = ViewerConfig {
        disabled: true,
        ..Default::default()
    };
    let (mut arbiter, mut store) = setup(config);

    assert!(!arbiter.handle(&down(1, 50.0, 50.0), &mut store).is_claimed());
    assert_eq!(arbiter.active_pointers(), 0);
    let wheel = arbiter.handle(
        &InputEvent::Wheel {
            position: Point::new(50.0, 50.0),
            delta_y: 100.0,
        },
        &mut store,
    );
    assert!(!wheel.is_claimed());
    assert!(wheel.prevent_default);
}

#[test]
fn test_untracked_move_passes() {
    let (mut arbiter, mut store) = setup(ViewerConfig::default());
    assert!(!arbiter.handle(&moved(9, 10.0, 10.0), &mut store).is_claimed());
}
