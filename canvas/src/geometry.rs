//! Geometry utilities: points, axis-aligned boxes, and rotation helpers.
//!
//! Everything here is pure. Angles are in radians and positive angles rotate
//! clockwise on screen (the y axis points down), matching the 2D canvas API.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::f64::consts::TAU;

/// A point in surface coordinates (pixels, y pointing down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An axis-aligned box. `width`/`height` may be negative for boxes built from
/// an in-progress drag; call [`Rect::normalized`] before bounds checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// The box spanned by two opposite corners, in either order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Same box with non-negative size and the origin moved to the min corner.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::from_corners(Point::new(self.x, self.y), Point::new(self.x + self.width, self.y + self.height))
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive bounds check for an unrotated, normalized box.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Rotate `p` about `center` by `angle` radians.
#[must_use]
pub fn rotate_point(p: Point, center: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point {
        x: center.x + dx * cos - dy * sin,
        y: center.y + dx * sin + dy * cos,
    }
}

/// Whether `p` lies inside `rect` rotated by `rotation` about its own center.
///
/// The point is brought into the rectangle's local frame by rotating it by
/// `-rotation`, then bounds-checked.
#[must_use]
pub fn point_in_rectangle(p: Point, rect: Rect, rotation: f64) -> bool {
    let rect = rect.normalized();
    let local = rotate_point(p, rect.center(), -rotation);
    rect.contains(local)
}

/// Wrap an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Shortest distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Angle of `p` around `center`, as returned by `atan2`.
#[must_use]
pub fn angle_from(center: Point, p: Point) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}
