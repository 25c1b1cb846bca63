//! In-place shape transforms: translate, resize by handle, rotate.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::geometry::{Point, Rect, normalize_angle, rotate_point};
use crate::hit::ResizeAnchor;
use crate::shape::Shape;

/// Move the shape rigidly by `(dx, dy)`. Size and rotation are unchanged.
pub fn translate_shape(shape: &mut Shape, dx: f64, dy: f64) {
    shape.x += dx;
    shape.y += dy;
}

/// Drag the handle at `anchor` to the surface point `p`.
///
/// The pointer is taken into the shape's local frame (rotated by `-rotation`
/// about the current center) before the edges named by `anchor` move to it.
/// Edges cannot cross: width and height clamp at zero. For a rotated shape the
/// box is then shifted so the opposite anchor keeps its surface position.
///
/// The box is stored as origin plus size, so an edge derived from the other
/// three can differ from its old value by rounding. Callers driving a
/// gesture resize the gesture's starting box on every move.
pub fn resize_shape(shape: &mut Shape, anchor: ResizeAnchor, p: Point) {
    let b = shape.bounds();
    let center = b.center();
    let local = rotate_point(p, center, -shape.rotation);

    let fixed = anchor.opposite();
    let fixed_before = rotate_point(shape.anchor_position(fixed), center, shape.rotation);

    let mut left = b.x;
    let mut right = b.x + b.width;
    let mut top = b.y;
    let mut bottom = b.y + b.height;
    if anchor.moves_left() {
        left = local.x.min(right);
    }
    if anchor.moves_right() {
        right = local.x.max(left);
    }
    if anchor.moves_top() {
        top = local.y.min(bottom);
    }
    if anchor.moves_bottom() {
        bottom = local.y.max(top);
    }

    let resized = Rect::new(left, top, right - left, bottom - top);
    shape.x = resized.x;
    shape.y = resized.y;
    shape.width = resized.width;
    shape.height = resized.height;

    if shape.rotation != 0.0 {
        let fixed_after = rotate_point(shape.anchor_position(fixed), resized.center(), shape.rotation);
        translate_shape(shape, fixed_before.x - fixed_after.x, fixed_before.y - fixed_after.y);
    }
}

/// Add `delta` radians to the rotation, wrapping into `[0, 2π)`.
pub fn rotate_shape(shape: &mut Shape, delta: f64) {
    shape.rotation = normalize_angle(shape.rotation + delta);
}

/// Set an absolute rotation, wrapping into `[0, 2π)`.
pub fn set_rotation(shape: &mut Shape, angle: f64) {
    shape.rotation = normalize_angle(angle);
}
