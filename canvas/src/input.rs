//! Input model: tools, mouse buttons, keys, and the gesture state machine.
//!
//! `Tool` captures what a primary-button press on empty space should do.
//! `InputState` is the gesture tracked between mouse-down and mouse-up,
//! carrying the context needed to apply incremental transforms and to tell
//! on release whether the shape actually changed.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::Point;
use crate::hit::ResizeAnchor;
use crate::shape::{ShapeId, ShapeKind};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Draw a rectangle.
    Rectangle,
    /// Draw an ellipse.
    Ellipse,
    /// Draw a triangle.
    Triangle,
    /// Draw a straight line.
    Line,
}

impl Tool {
    /// The shape kind this tool draws, or `None` for the select tool.
    #[must_use]
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Self::Select => None,
            Self::Rectangle => Some(ShapeKind::Rectangle),
            Self::Ellipse => Some(ShapeKind::Ellipse),
            Self::Triangle => Some(ShapeKind::Triangle),
            Self::Line => Some(ShapeKind::Line),
        }
    }

    /// CSS cursor shown while this tool is active.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Select => "default",
            _ => "crosshair",
        }
    }

    /// Parse a lowercase tool name as used by the host toolbar.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "select" => Some(Self::Select),
            "rectangle" => Some(Self::Rectangle),
            "ellipse" => Some(Self::Ellipse),
            "triangle" => Some(Self::Triangle),
            "line" => Some(Self::Line),
            _ => None,
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key removes the selected shape.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active drawing tool.
    pub tool: Tool,
    /// The id of the currently selected shape, if any.
    pub selected_id: Option<ShapeId>,
}

/// Internal state for the input state machine.
///
/// Exactly one variant is active. Every non-idle variant is entered on a
/// primary-button press and left on release.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next mouse-down.
    #[default]
    Idle,
    /// A new shape is being dragged out with a drawing tool.
    Drawing {
        /// Kind of shape being drawn.
        kind: ShapeKind,
        /// Where the drag started.
        anchor: Point,
        /// Latest pointer position.
        current: Point,
    },
    /// The selected shape is being moved.
    Dragging {
        /// Id of the shape being dragged.
        id: ShapeId,
        /// Pointer position at the previous event.
        last: Point,
        /// Shape x at the start of the drag.
        orig_x: f64,
        /// Shape y at the start of the drag.
        orig_y: f64,
    },
    /// The selected shape is being resized by one of its eight handles.
    Resizing {
        /// Id of the shape being resized.
        id: ShapeId,
        /// Which corner/edge handle is being dragged.
        anchor: ResizeAnchor,
        /// Shape x at the start of the resize.
        orig_x: f64,
        /// Shape y at the start of the resize.
        orig_y: f64,
        /// Shape width at the start of the resize.
        orig_w: f64,
        /// Shape height at the start of the resize.
        orig_h: f64,
    },
    /// The selected shape is being turned by its rotate handle.
    Rotating {
        /// Id of the shape being rotated.
        id: ShapeId,
        /// Center of the shape; the rotation pivot.
        center: Point,
        /// Pointer angle about `center` at mouse-down.
        start_angle: f64,
        /// Shape rotation at mouse-down.
        orig_rotation: f64,
    },
}

impl InputState {
    /// Whether no gesture is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
