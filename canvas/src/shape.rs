//! Shape model: the closed set of drawable primitives and their geometry.
//!
//! Every kind shares the same geometry fields (bounding box, rotation, style),
//! and per-kind behavior is dispatched with `match` on [`ShapeKind`]. The
//! bounding box is the unrotated frame; `rotation` turns it about its center.
//!
//! Lines keep the normalized-box invariant too: which diagonal of the box the
//! segment runs along is recorded in [`LineSlope`].

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{HANDLE_SIZE, LINE_HIT_TOLERANCE, ROTATION_HANDLE_OFFSET, ROTATION_HANDLE_RADIUS};
use crate::geometry::{Point, Rect, distance_to_segment, normalize_angle, point_in_rectangle, rotate_point};
use crate::hit::ResizeAnchor;

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// The kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Rectangle filling the bounding box.
    Rectangle,
    /// Ellipse inscribed within the bounding box.
    Ellipse,
    /// Isosceles triangle: apex at the top-center, base along the bottom edge.
    Triangle,
    /// Straight segment along one diagonal of the bounding box.
    Line,
}

impl ShapeKind {
    /// Lowercase name used in snapshots.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
            Self::Triangle => "triangle",
            Self::Line => "line",
        }
    }

    /// Parse a lowercase kind name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "rectangle" => Some(Self::Rectangle),
            "ellipse" => Some(Self::Ellipse),
            "triangle" => Some(Self::Triangle),
            "line" => Some(Self::Line),
            _ => None,
        }
    }
}

/// Which diagonal of its bounding box a line follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSlope {
    /// Top-left to bottom-right.
    #[default]
    Descending,
    /// Bottom-left to top-right.
    Ascending,
}

impl LineSlope {
    #[must_use]
    pub fn is_descending(&self) -> bool {
        *self == Self::Descending
    }

    /// Slope of the segment from `start` to `end`.
    #[must_use]
    pub fn between(start: Point, end: Point) -> Self {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        if dx * dy < 0.0 { Self::Ascending } else { Self::Descending }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Descending => "descending",
            Self::Ascending => "ascending",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "descending" => Some(Self::Descending),
            "ascending" => Some(Self::Ascending),
            _ => None,
        }
    }
}

/// Paint attributes of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill as a CSS color string.
    pub fill: String,
    /// Stroke as a CSS color string.
    pub stroke: String,
    /// Stroke width in pixels.
    pub line_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self { fill: "transparent".to_owned(), stroke: "#000000".to_owned(), line_width: 2.0 }
    }
}

/// A shape on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier for this shape.
    pub id: ShapeId,
    /// Which primitive this is.
    pub kind: ShapeKind,
    /// Left edge of the bounding box.
    pub x: f64,
    /// Top edge of the bounding box.
    pub y: f64,
    /// Width of the bounding box. Negative only while a drag-draw is in progress.
    pub width: f64,
    /// Height of the bounding box. Negative only while a drag-draw is in progress.
    pub height: f64,
    /// Clockwise rotation in radians around the bounding-box center, in `[0, 2π)`.
    pub rotation: f64,
    /// Diagonal followed by a line. Ignored by the other kinds.
    #[serde(default, skip_serializing_if = "LineSlope::is_descending")]
    pub slope: LineSlope,
    /// Paint attributes.
    #[serde(default)]
    pub style: ShapeStyle,
}

impl Shape {
    /// Create an unrotated shape with the default style.
    #[must_use]
    pub fn new(kind: ShapeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            slope: LineSlope::Descending,
            style: ShapeStyle::default(),
        }
    }

    /// The shape being dragged out from `anchor` to `current`.
    ///
    /// The size is signed (pointer left of or above the anchor gives a
    /// negative width or height); [`Shape::normalize`] fixes it on commit.
    #[must_use]
    pub fn from_drag(kind: ShapeKind, anchor: Point, current: Point) -> Self {
        let mut shape = Self::new(kind, anchor.x, anchor.y, current.x - anchor.x, current.y - anchor.y);
        if kind == ShapeKind::Line {
            shape.slope = LineSlope::between(anchor, current);
        }
        shape
    }

    /// Move the origin to the min corner, make the size non-negative, and
    /// wrap the rotation into `[0, 2π)`.
    pub fn normalize(&mut self) {
        let b = self.bounds();
        self.x = b.x;
        self.y = b.y;
        self.width = b.width;
        self.height = b.height;
        self.rotation = normalize_angle(self.rotation);
    }

    /// Whether width and height are both non-negative.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    /// The normalized, unrotated bounding box.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height).normalized()
    }

    /// Rotation pivot.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Line endpoints in surface coordinates, rotation applied.
    #[must_use]
    pub fn line_endpoints(&self) -> (Point, Point) {
        let b = self.bounds();
        let (start, end) = match self.slope {
            LineSlope::Descending => (Point::new(b.x, b.y), Point::new(b.x + b.width, b.y + b.height)),
            LineSlope::Ascending => (Point::new(b.x, b.y + b.height), Point::new(b.x + b.width, b.y)),
        };
        let c = b.center();
        (rotate_point(start, c, self.rotation), rotate_point(end, c, self.rotation))
    }

    /// Triangle vertices (apex, bottom-right, bottom-left) in surface coordinates.
    #[must_use]
    pub fn triangle_vertices(&self) -> [Point; 3] {
        let b = self.bounds();
        let c = b.center();
        [
            Point::new(b.x + b.width / 2.0, b.y),
            Point::new(b.x + b.width, b.y + b.height),
            Point::new(b.x, b.y + b.height),
        ]
        .map(|v| rotate_point(v, c, self.rotation))
    }

    /// Whether `p` lies on the shape.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        match self.kind {
            ShapeKind::Rectangle => point_in_rectangle(p, self.bounds(), self.rotation),
            ShapeKind::Ellipse => self.ellipse_contains(p),
            ShapeKind::Triangle => self.triangle_contains(p),
            ShapeKind::Line => {
                let (a, b) = self.line_endpoints();
                distance_to_segment(p, a, b) <= LINE_HIT_TOLERANCE
            }
        }
    }

    fn ellipse_contains(&self, p: Point) -> bool {
        let b = self.bounds();
        let rx = b.width / 2.0;
        let ry = b.height / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let c = b.center();
        let local = rotate_point(p, c, -self.rotation);
        let nx = (local.x - c.x) / rx;
        let ny = (local.y - c.y) / ry;
        nx * nx + ny * ny <= 1.0
    }

    fn triangle_contains(&self, p: Point) -> bool {
        let b = self.bounds();
        if b.width <= 0.0 || b.height <= 0.0 {
            return false;
        }
        let [v0, v1, v2] = self.triangle_vertices();
        let d1 = edge_sign(p, v0, v1);
        let d2 = edge_sign(p, v1, v2);
        let d3 = edge_sign(p, v2, v0);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }

    /// Unrotated position of one resize handle.
    #[must_use]
    pub fn anchor_position(&self, anchor: ResizeAnchor) -> Point {
        let b = self.bounds();
        let left = b.x;
        let right = b.x + b.width;
        let top = b.y;
        let bottom = b.y + b.height;
        let mid_x = b.x + b.width / 2.0;
        let mid_y = b.y + b.height / 2.0;
        match anchor {
            ResizeAnchor::Nw => Point::new(left, top),
            ResizeAnchor::N => Point::new(mid_x, top),
            ResizeAnchor::Ne => Point::new(right, top),
            ResizeAnchor::E => Point::new(right, mid_y),
            ResizeAnchor::Se => Point::new(right, bottom),
            ResizeAnchor::S => Point::new(mid_x, bottom),
            ResizeAnchor::Sw => Point::new(left, bottom),
            ResizeAnchor::W => Point::new(left, mid_y),
        }
    }

    /// The 8 unrotated handle positions (corners and edge midpoints), in
    /// [`ResizeAnchor::ALL`] order.
    #[must_use]
    pub fn resize_handles(&self) -> [Point; 8] {
        ResizeAnchor::ALL.map(|anchor| self.anchor_position(anchor))
    }

    /// The 8 handle positions with the shape's rotation applied.
    #[must_use]
    pub fn rotated_resize_handles(&self) -> [Point; 8] {
        let c = self.center();
        self.resize_handles()
            .map(|h| rotate_point(h, c, self.rotation))
    }

    /// The resize handle under `p`, if any.
    #[must_use]
    pub fn handle_at(&self, p: Point) -> Option<ResizeAnchor> {
        let half = HANDLE_SIZE / 2.0;
        ResizeAnchor::ALL
            .into_iter()
            .zip(self.rotated_resize_handles())
            .find(|(_, h)| point_in_rectangle(p, Rect::new(h.x - half, h.y - half, HANDLE_SIZE, HANDLE_SIZE), 0.0))
            .map(|(anchor, _)| anchor)
    }

    /// Whether `p` is over any of the 8 resize handles.
    #[must_use]
    pub fn is_over_handle(&self, p: Point) -> bool {
        self.handle_at(p).is_some()
    }

    /// Rotate handle position: above the top-center, turned with the shape.
    #[must_use]
    pub fn rotation_handle(&self) -> Point {
        let b = self.bounds();
        let local = Point::new(b.x + b.width / 2.0, b.y - ROTATION_HANDLE_OFFSET);
        rotate_point(local, b.center(), self.rotation)
    }

    /// Whether `p` is over the rotate handle.
    #[must_use]
    pub fn is_over_rotation_handle(&self, p: Point) -> bool {
        p.distance_to(self.rotation_handle()) <= ROTATION_HANDLE_RADIUS
    }
}

/// Which side of the directed edge `a`→`b` the point `p` falls on.
fn edge_sign(p: Point, a: Point, b: Point) -> f64 {
    (p.x - b.x) * (a.y - b.y) - (a.x - b.x) * (p.y - b.y)
}
