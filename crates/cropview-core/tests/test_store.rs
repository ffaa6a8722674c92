mod common;

use approx::assert_abs_diff_eq;

use cropview_core::geometry::{Point, Size, ViewTransform};
use cropview_core::viewport::{Refit, ViewTransformStore};

use common::fitted_store;

#[test]
fn test_first_observation_fits_cover() {
    let mut store = ViewTransformStore::new();
    let refit = store.observe(Size::new(100.0, 100.0), Size::new(200.0, 100.0));
    assert_eq!(refit, Refit::Fitted);

    let t = store.transform();
    assert_abs_diff_eq!(t.scale, 1.0);
    assert_abs_diff_eq!(t.translate_x, -50.0);
    assert_abs_diff_eq!(t.translate_y, 0.0);
}

#[test]
fn test_unmeasured_viewport_defers() {
    let mut store = ViewTransformStore::new();
    assert_eq!(
        store.observe(Size::ZERO, Size::new(200.0, 100.0)),
        Refit::Deferred
    );
    assert!(!store.is_fitted());

    // Once measured, the pending natural size is fitted
    assert_eq!(
        store.set_viewport_size(Size::new(100.0, 100.0)),
        Refit::Fitted
    );
    assert!(store.is_fitted());
}

#[test]
fn test_unmeasured_viewport_is_not_recorded() {
    let mut store = fitted_store((100.0, 100.0), (200.0, 100.0));
    let before = store.transform();

    assert_eq!(store.set_viewport_size(Size::ZERO), Refit::Deferred);
    assert_eq!(store.viewport(), Size::new(100.0, 100.0));

    // Coming back to the same size is not a resize
    assert_eq!(
        store.set_viewport_size(Size::new(100.0, 100.0)),
        Refit::Unchanged
    );
    assert_eq!(store.transform(), before);
}

#[test]
fn test_repeated_resize_is_idempotent() {
    let mut store = fitted_store((100.0, 100.0), (200.0, 100.0));
    store.zoom_at(Point::new(50.0, 50.0), 2.0);

    assert_eq!(
        store.set_viewport_size(Size::new(150.0, 120.0)),
        Refit::Resized
    );
    let once = store.transform();
    assert_eq!(
        store.set_viewport_size(Size::new(150.0, 120.0)),
        Refit::Unchanged
    );
    assert_eq!(store.transform(), once);
}

#[test]
fn test_resize_preserves_relative_zoom() {
    let mut store = fitted_store((100.0, 100.0), (200.0, 100.0));
    store.apply_scale(2.0, None);
    assert_abs_diff_eq!(store.zoom_multiplier(), 2.0, epsilon = 1e-9);

    store.set_viewport_size(Size::new(200.0, 200.0));
    let t = store.transform();
    assert_abs_diff_eq!(store.limits().base_scale, 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(t.scale, 4.0, epsilon = 1e-9);
    assert_abs_diff_eq!(store.zoom_multiplier(), 2.0, epsilon = 1e-9);
}

#[test]
fn test_resize_keeps_centre_content() {
    let mut store = fitted_store((100.0, 100.0), (200.0, 100.0));
    let focus = store
        .transform()
        .viewport_to_image(store.viewport().center());

    store.set_viewport_size(Size::new(200.0, 200.0));
    let after = store
        .transform()
        .viewport_to_image(store.viewport().center());
    assert_abs_diff_eq!(after.x, focus.x, epsilon = 1e-9);
    assert_abs_diff_eq!(after.y, focus.y, epsilon = 1e-9);
}

#[test]
fn test_new_image_always_refits() {
    let mut store = fitted_store((100.0, 100.0), (200.0, 100.0));
    store.apply_scale(2.5, None);

    assert_eq!(
        store.set_natural_size(Size::new(100.0, 400.0)),
        Refit::Fitted
    );
    assert_abs_diff_eq!(store.zoom_multiplier(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_zoom_anchor_preserved() {
    let mut store = fitted_store((100.0, 100.0), (200.0, 100.0));
    let anchor = Point::new(30.0, 40.0);
    let before = store.transform().viewport_to_image(anchor);

    store.zoom_at(anchor, 2.0);
    let after = store.transform().viewport_to_image(anchor);
    assert_abs_diff_eq!(after.x, before.x, epsilon = 1e-9);
    assert_abs_diff_eq!(after.y, before.y, epsilon = 1e-9);
}

#[test]
fn test_zoom_out_floor_converges() {
    let mut store = fitted_store((100.0, 100.0), (200.0, 100.0));
    for _ in 0..20 {
        store.zoom_at(Point::new(10.0, 10.0), 0.5);
    }
    let t = store.transform();
    assert_abs_diff_eq!(t.scale, 0.4, epsilon = 1e-12);
    // Narrower than the viewport on both axes, so centred
    assert_abs_diff_eq!(t.translate_x, 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(t.translate_y, 30.0, epsilon = 1e-9);

    // The floor does not creep after more attempts
    store.zoom_at(Point::new(90.0, 90.0), 0.1);
    assert_abs_diff_eq!(store.transform().scale, 0.4, epsilon = 1e-12);
}

#[test]
fn test_zoom_in_ceiling() {
    let mut store = fitted_store((100.0, 100.0), (200.0, 100.0));
    store.apply_scale(50.0, None);
    assert_abs_diff_eq!(store.transform().scale, 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(store.zoom_multiplier(), 3.0, epsilon = 1e-12);
}

#[test]
fn test_pan_is_clamped() {
    let mut store = fitted_store((100.0, 100.0), (200.0, 100.0));
    store.pan(20.0, 0.0);
    assert_abs_diff_eq!(store.transform().translate_x, -30.0);

    store.pan(1000.0, 1000.0);
    let t = store.transform();
    assert_eq!((t.translate_x, t.translate_y), (0.0, 0.0));
}

#[test]
fn test_set_direct_keeps_scale_clamps_translate() {
    let mut store = fitted_store((100.0, 100.0), (200.0, 100.0));
    store.set_direct(ViewTransform::new(2.0, 50.0, -500.0));

    let t = store.transform();
    assert_eq!(t.scale, 2.0);
    assert_eq!(t.translate_x, 0.0);
    assert_eq!(t.translate_y, -100.0);
}

#[test]
fn test_mutations_ignored_before_fit() {
    let mut store = ViewTransformStore::new();
    store.pan(10.0, 10.0);
    store.apply_scale(2.0, None);
    assert_eq!(store.transform(), ViewTransform::IDENTITY);
}

#[test]
fn test_cover_invariant_after_gestures() {
    let mut store = fitted_store((320.0, 240.0), (1000.0, 500.0));
    let ops: [(f64, f64, f64); 5] = [
        (1.7, 10.0, 200.0),
        (0.9, 300.0, 5.0),
        (2.4, 160.0, 120.0),
        (0.5, 0.0, 0.0),
        (1.1, 319.0, 239.0),
    ];
    for (factor, x, y) in ops {
        store.zoom_at(Point::new(x, y), factor);
        store.pan(-37.0, 13.0);

        let t = store.transform();
        let rendered = t.rendered_rect(store.natural());
        let base = store.limits().base_scale;
        if t.scale >= base - 1e-12 {
            assert!(rendered.x <= 1e-9, "gap on the left: {rendered:?}");
            assert!(rendered.y <= 1e-9, "gap at the top: {rendered:?}");
            assert!(rendered.right() >= 320.0 - 1e-9, "gap on the right: {rendered:?}");
            assert!(rendered.bottom() >= 240.0 - 1e-9, "gap at the bottom: {rendered:?}");
        }
    }
}
