#![allow(clippy::float_cmp)]

use std::f64::consts::{FRAC_PI_2, TAU};

use proptest::prelude::*;

use super::*;
use crate::shape::{LineSlope, ShapeKind};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn rect_at(x: f64, y: f64, w: f64, h: f64) -> Shape {
    Shape::new(ShapeKind::Rectangle, x, y, w, h)
}

fn geometry(s: &Shape) -> (f64, f64, f64, f64) {
    (s.x, s.y, s.width, s.height)
}

// =============================================================
// translate_shape
// =============================================================

#[test]
fn translate_moves_origin_only() {
    let mut s = rect_at(10.0, 20.0, 100.0, 80.0);
    s.rotation = 1.0;
    translate_shape(&mut s, 5.0, -7.0);
    assert_eq!(geometry(&s), (15.0, 13.0, 100.0, 80.0));
    assert_eq!(s.rotation, 1.0);
}

// =============================================================
// resize_shape: unrotated, one case per anchor
// =============================================================

#[test]
fn resize_each_anchor_moves_only_its_edges() {
    // Box spans x 10..110, y 20..100.
    let cases = [
        (ResizeAnchor::Nw, pt(30.0, 40.0), (30.0, 40.0, 80.0, 60.0)),
        (ResizeAnchor::N, pt(60.0, 30.0), (10.0, 30.0, 100.0, 70.0)),
        (ResizeAnchor::Ne, pt(130.0, 10.0), (10.0, 10.0, 120.0, 90.0)),
        (ResizeAnchor::E, pt(140.0, 60.0), (10.0, 20.0, 130.0, 80.0)),
        (ResizeAnchor::Se, pt(150.0, 120.0), (10.0, 20.0, 140.0, 100.0)),
        (ResizeAnchor::S, pt(60.0, 130.0), (10.0, 20.0, 100.0, 110.0)),
        (ResizeAnchor::Sw, pt(0.0, 110.0), (0.0, 20.0, 110.0, 90.0)),
        (ResizeAnchor::W, pt(-10.0, 60.0), (-10.0, 20.0, 120.0, 80.0)),
    ];
    for (anchor, pointer, expected) in cases {
        let mut s = rect_at(10.0, 20.0, 100.0, 80.0);
        let fixed_before = s.anchor_position(anchor.opposite());
        resize_shape(&mut s, anchor, pointer);
        assert_eq!(geometry(&s), expected, "anchor {anchor:?}");
        assert_eq!(s.anchor_position(anchor.opposite()), fixed_before, "anchor {anchor:?}");
    }
}

#[test]
fn resize_bottom_right_scenario() {
    let mut s = rect_at(10.0, 10.0, 100.0, 50.0);
    resize_shape(&mut s, ResizeAnchor::Se, pt(150.0, 90.0));
    assert_eq!(geometry(&s), (10.0, 10.0, 140.0, 80.0));
}

#[test]
fn resize_past_opposite_edge_clamps_to_zero() {
    let mut s = rect_at(0.0, 0.0, 50.0, 50.0);
    resize_shape(&mut s, ResizeAnchor::Se, pt(-20.0, -20.0));
    assert_eq!(geometry(&s), (0.0, 0.0, 0.0, 0.0));

    let mut s = rect_at(0.0, 0.0, 50.0, 50.0);
    resize_shape(&mut s, ResizeAnchor::Nw, pt(80.0, 90.0));
    assert_eq!(geometry(&s), (50.0, 50.0, 0.0, 0.0));
}

#[test]
fn resize_with_pointer_on_handle_is_noop() {
    for anchor in ResizeAnchor::ALL {
        let mut s = rect_at(10.0, 20.0, 100.0, 80.0);
        let handle = s.anchor_position(anchor);
        resize_shape(&mut s, anchor, handle);
        assert_eq!(geometry(&s), (10.0, 20.0, 100.0, 80.0), "anchor {anchor:?}");
    }
}

#[test]
fn resize_keeps_line_slope() {
    let mut s = Shape::from_drag(ShapeKind::Line, pt(0.0, 100.0), pt(100.0, 0.0));
    s.normalize();
    resize_shape(&mut s, ResizeAnchor::Ne, pt(150.0, -50.0));
    assert_eq!(s.slope, LineSlope::Ascending);
    let (a, b) = s.line_endpoints();
    assert_eq!(a, pt(0.0, 100.0));
    assert_eq!(b, pt(150.0, -50.0));
}

// =============================================================
// resize_shape: rotated
// =============================================================

#[test]
fn resize_rotated_uses_local_axes_and_pins_opposite_handle() {
    let mut s = rect_at(0.0, 0.0, 100.0, 50.0);
    s.rotation = FRAC_PI_2;
    let handles = s.rotated_resize_handles();
    let west_before = handles[ResizeAnchor::W.index()];
    // The E handle sits at (50, 75) on screen; dragging straight down
    // lengthens the shape along its local x axis.
    assert!(approx_eq(handles[ResizeAnchor::E.index()].x, 50.0));
    assert!(approx_eq(handles[ResizeAnchor::E.index()].y, 75.0));

    resize_shape(&mut s, ResizeAnchor::E, pt(50.0, 95.0));

    assert!(approx_eq(s.width, 120.0));
    assert!(approx_eq(s.height, 50.0));
    let after = s.rotated_resize_handles();
    let west_after = after[ResizeAnchor::W.index()];
    let east_after = after[ResizeAnchor::E.index()];
    assert!(approx_eq(west_after.x, west_before.x) && approx_eq(west_after.y, west_before.y));
    assert!(approx_eq(east_after.x, 50.0) && approx_eq(east_after.y, 95.0));
}

// =============================================================
// rotate_shape / set_rotation
// =============================================================

#[test]
fn rotate_wraps_past_full_turn() {
    let mut s = rect_at(0.0, 0.0, 10.0, 10.0);
    s.rotation = 6.0;
    rotate_shape(&mut s, 1.0);
    assert!(approx_eq(s.rotation, 7.0 - TAU));
}

#[test]
fn rotate_negative_wraps_up() {
    let mut s = rect_at(0.0, 0.0, 10.0, 10.0);
    rotate_shape(&mut s, -FRAC_PI_2);
    assert!(approx_eq(s.rotation, 3.0 * FRAC_PI_2));
}

#[test]
fn set_rotation_normalizes() {
    let mut s = rect_at(0.0, 0.0, 10.0, 10.0);
    set_rotation(&mut s, -TAU - 1.0);
    assert!(approx_eq(s.rotation, TAU - 1.0));
}

// =============================================================
// Properties
// =============================================================

/// Distance between two angles on the circle.
fn angular_gap(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

proptest! {
    #[test]
    fn translate_and_back_restores_position(
        x in -10_000i32..10_000,
        y in -10_000i32..10_000,
        dx in -10_000i32..10_000,
        dy in -10_000i32..10_000,
    ) {
        let mut s = rect_at(f64::from(x), f64::from(y), 40.0, 30.0);
        translate_shape(&mut s, f64::from(dx), f64::from(dy));
        translate_shape(&mut s, -f64::from(dx), -f64::from(dy));
        prop_assert_eq!(s.x, f64::from(x));
        prop_assert_eq!(s.y, f64::from(y));
    }

    #[test]
    fn rotations_summing_to_full_turn_restore_rotation(
        start in 0.0..TAU,
        steps in 1usize..64,
    ) {
        let mut s = rect_at(0.0, 0.0, 10.0, 10.0);
        s.rotation = start;
        #[allow(clippy::cast_precision_loss)]
        let delta = TAU / steps as f64;
        for _ in 0..steps {
            rotate_shape(&mut s, delta);
        }
        prop_assert!(angular_gap(s.rotation, start) < 1e-9);
    }

    #[test]
    fn unrotated_resize_pins_opposite_anchor(
        index in 0usize..8,
        px in -300.0..300.0f64,
        py in -300.0..300.0f64,
    ) {
        let anchor = ResizeAnchor::ALL[index];
        let mut s = rect_at(-50.0, -40.0, 100.0, 80.0);
        let fixed = s.anchor_position(anchor.opposite());
        resize_shape(&mut s, anchor, pt(px, py));
        prop_assert!(s.is_normalized());
        // Edge midpoints move when a perpendicular edge moves; corners never do.
        if matches!(anchor, ResizeAnchor::Nw | ResizeAnchor::Ne | ResizeAnchor::Se | ResizeAnchor::Sw) {
            let after = s.anchor_position(anchor.opposite());
            prop_assert!(approx_eq(after.x, fixed.x) && approx_eq(after.y, fixed.y), "{:?} moved to {:?}", fixed, after);
        }
    }
}
