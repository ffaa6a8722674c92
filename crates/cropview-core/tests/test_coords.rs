mod common;

use cropview_core::coords::{
    to_native_space, to_viewport_space, CoordinateSpace, CropRegion, NativeRect,
};
use cropview_core::geometry::{Rect, Size, ViewTransform};

use common::assert_rect_eq;

fn zoomed() -> ViewTransform {
    ViewTransform::new(2.0, -10.0, -20.0)
}

#[test]
fn test_viewport_to_native() {
    let native = to_native_space(
        Rect::new(10.0, 20.0, 40.0, 60.0),
        &zoomed(),
        Size::new(100.0, 100.0),
    );
    assert_rect_eq(native, Rect::new(10.0, 20.0, 20.0, 30.0), 1e-9);
}

#[test]
fn test_round_trip_inside_image() {
    let natural = Size::new(100.0, 100.0);
    let rect = Rect::new(10.0, 20.0, 40.0, 60.0);

    let native = to_native_space(rect, &zoomed(), natural);
    let back = to_viewport_space(NativeRect::Pixels(native), &zoomed(), natural);
    assert_rect_eq(back, rect, 1e-9);
}

#[test]
fn test_native_result_clamped_to_image() {
    let natural = Size::new(100.0, 100.0);

    let overhang = to_native_space(Rect::new(0.0, 0.0, 1000.0, 1000.0), &zoomed(), natural);
    assert_rect_eq(overhang, Rect::new(5.0, 10.0, 95.0, 90.0), 1e-9);

    // Entirely off the image: empty, never negative
    let outside = to_native_space(Rect::new(-100.0, -100.0, 50.0, 50.0), &zoomed(), natural);
    assert_eq!(outside.width, 0.0);
    assert_eq!(outside.height, 0.0);
    assert!(outside.x >= 0.0 && outside.y >= 0.0);
}

#[test]
fn test_bad_scale_gives_empty_rect() {
    let bad = ViewTransform::new(0.0, 0.0, 0.0);
    let r = to_native_space(Rect::new(0.0, 0.0, 10.0, 10.0), &bad, Size::new(10.0, 10.0));
    assert_eq!(r, Rect::default());
}

#[test]
fn test_percent_resolves_against_native() {
    let natural = Size::new(200.0, 100.0);
    let pct = NativeRect::Percent(Rect::new(10.0, 20.0, 50.0, 50.0));
    assert_rect_eq(pct.resolve(natural), Rect::new(20.0, 20.0, 100.0, 50.0), 1e-9);

    let identity = ViewTransform::IDENTITY;
    let vp = to_viewport_space(pct, &identity, natural);
    assert_rect_eq(vp, Rect::new(20.0, 20.0, 100.0, 50.0), 1e-9);
}

#[test]
fn test_region_converts_once() {
    let natural = Size::new(100.0, 100.0);
    let region = CropRegion::viewport(Rect::new(10.0, 20.0, 40.0, 60.0));

    let native = region.to_space(CoordinateSpace::Native, &zoomed(), natural);
    assert_eq!(native.space(), CoordinateSpace::Native);

    // Converting to the space it is already in is a no-op
    let again = native.to_space(CoordinateSpace::Native, &zoomed(), natural);
    assert_eq!(again, native);
}
