#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::collection::ShapeCollection;
use crate::geometry::Point;
use crate::shape::ShapeId;

/// Which part of a shape was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    RotateHandle,
}

/// Anchor position for resize handles.
///
/// The declaration order is the handle index order used by
/// [`crate::shape::Shape::resize_handles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

impl ResizeAnchor {
    /// All anchors in handle index order.
    pub const ALL: [ResizeAnchor; 8] = [
        ResizeAnchor::Nw,
        ResizeAnchor::N,
        ResizeAnchor::Ne,
        ResizeAnchor::E,
        ResizeAnchor::Se,
        ResizeAnchor::S,
        ResizeAnchor::Sw,
        ResizeAnchor::W,
    ];

    /// Handle index of this anchor (0 = NW, clockwise).
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Anchor for a handle index, if in range.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The anchor diagonally or directly across the box.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Nw => Self::Se,
            Self::N => Self::S,
            Self::Ne => Self::Sw,
            Self::E => Self::W,
            Self::Se => Self::Nw,
            Self::S => Self::N,
            Self::Sw => Self::Ne,
            Self::W => Self::E,
        }
    }

    /// Whether dragging this anchor moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Nw | Self::N | Self::Ne)
    }

    /// Whether dragging this anchor moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Sw | Self::S | Self::Se)
    }

    /// Whether dragging this anchor moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Nw | Self::W | Self::Sw)
    }

    /// Whether dragging this anchor moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::Ne | Self::E | Self::Se)
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub shape_id: ShapeId,
    pub part: HitPart,
}

/// Test which shape (if any) is under `p`.
///
/// The selected shape's resize handles are checked first, then its rotate
/// handle, then every body from topmost to bottommost.
#[must_use]
pub fn hit_test(p: Point, shapes: &ShapeCollection, selected_id: Option<ShapeId>) -> Option<Hit> {
    if let Some(selected) = selected_id.and_then(|id| shapes.get(&id)) {
        if let Some(anchor) = selected.handle_at(p) {
            return Some(Hit { shape_id: selected.id, part: HitPart::ResizeHandle(anchor) });
        }
        if selected.is_over_rotation_handle(p) {
            return Some(Hit { shape_id: selected.id, part: HitPart::RotateHandle });
        }
    }

    shapes
        .topmost_at(p)
        .map(|shape| Hit { shape_id: shape.id, part: HitPart::Body })
}
