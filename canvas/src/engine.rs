use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::collection::ShapeCollection;
use crate::consts::{DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};
use crate::geometry::{Point, angle_from};
use crate::hit::{Hit, HitPart, hit_test};
use crate::input::{Button, InputState, Key, Tool, UiState};
use crate::render;
use crate::shape::{Shape, ShapeId};
use crate::transform::{resize_shape, set_rotation, translate_shape};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A drawing gesture committed a new shape.
    ShapeCreated(Shape),
    /// A drag, resize, or rotate gesture changed a shape.
    ShapeUpdated(Shape),
    /// The selected shape was removed.
    ShapeDeleted { id: ShapeId },
    /// The host should switch the surface cursor.
    SetCursor(String),
    /// The scene changed; clear and redraw.
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub shapes: ShapeCollection,
    pub ui: UiState,
    pub input: InputState,
    pub width: f64,
    pub height: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            shapes: ShapeCollection::new(),
            ui: UiState::default(),
            input: InputState::default(),
            width: DEFAULT_SURFACE_WIDTH,
            height: DEFAULT_SURFACE_HEIGHT,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a core for a surface of the given size.
    #[must_use]
    pub fn with_size(width: f64, height: f64) -> Self {
        Self { width, height, ..Self::default() }
    }

    // --- Data inputs ---

    /// Replace every shape, dropping selection and any gesture.
    pub fn load_shapes(&mut self, shapes: ShapeCollection) {
        self.shapes = shapes;
        self.ui.selected_id = None;
        self.input = InputState::Idle;
    }

    /// Set the active tool.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.ui.tool = tool;
        vec![Action::SetCursor(tool.cursor().to_owned())]
    }

    // --- Queries ---

    /// The currently selected shape, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.ui.selected_id
    }

    /// Look up a shape by ID.
    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// The shape being drawn, with its signed in-progress size.
    #[must_use]
    pub fn preview(&self) -> Option<Shape> {
        match self.input {
            InputState::Drawing { kind, anchor, current } => Some(Shape::from_drag(kind, anchor, current)),
            _ => None,
        }
    }

    // --- Input events ---

    /// Primary-button press: start drawing, or pick a handle or body.
    pub fn on_mouse_down(&mut self, p: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || !self.input.is_idle() {
            return Vec::new();
        }

        if let Some(kind) = self.ui.tool.shape_kind() {
            self.input = InputState::Drawing { kind, anchor: p, current: p };
            return vec![Action::RenderNeeded];
        }

        match hit_test(p, &self.shapes, self.ui.selected_id) {
            Some(Hit { shape_id, part }) => self.begin_select_gesture(shape_id, part, p),
            None => {
                self.ui.selected_id = None;
            }
        }
        vec![Action::RenderNeeded]
    }

    fn begin_select_gesture(&mut self, id: ShapeId, part: HitPart, p: Point) {
        let Some(shape) = self.shapes.get(&id) else {
            return;
        };
        self.input = match part {
            HitPart::ResizeHandle(anchor) => InputState::Resizing {
                id,
                anchor,
                orig_x: shape.x,
                orig_y: shape.y,
                orig_w: shape.width,
                orig_h: shape.height,
            },
            HitPart::RotateHandle => {
                let center = shape.center();
                InputState::Rotating {
                    id,
                    center,
                    start_angle: angle_from(center, p),
                    orig_rotation: shape.rotation,
                }
            }
            HitPart::Body => {
                self.ui.selected_id = Some(id);
                InputState::Dragging { id, last: p, orig_x: shape.x, orig_y: shape.y }
            }
        };
    }

    /// Pointer motion: update the preview or apply the active transform.
    pub fn on_mouse_move(&mut self, p: Point) -> Vec<Action> {
        if self.apply_pointer(p) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Feed `p` into the active gesture. Returns whether a gesture consumed it.
    fn apply_pointer(&mut self, p: Point) -> bool {
        match &mut self.input {
            InputState::Idle => false,
            InputState::Drawing { current, .. } => {
                *current = p;
                true
            }
            InputState::Dragging { id, last, .. } => {
                let (dx, dy) = (p.x - last.x, p.y - last.y);
                *last = p;
                match self.shapes.get_mut(id) {
                    Some(shape) => {
                        translate_shape(shape, dx, dy);
                        true
                    }
                    None => self.abandon_gesture(),
                }
            }
            InputState::Resizing { id, anchor, orig_x, orig_y, orig_w, orig_h } => match self.shapes.get_mut(id) {
                Some(shape) => {
                    // Each move resizes the gesture's starting box, so rounding never accumulates.
                    shape.x = *orig_x;
                    shape.y = *orig_y;
                    shape.width = *orig_w;
                    shape.height = *orig_h;
                    resize_shape(shape, *anchor, p);
                    true
                }
                None => self.abandon_gesture(),
            },
            InputState::Rotating { id, center, start_angle, orig_rotation } => {
                let angle = *orig_rotation + angle_from(*center, p) - *start_angle;
                match self.shapes.get_mut(id) {
                    Some(shape) => {
                        set_rotation(shape, angle);
                        true
                    }
                    None => self.abandon_gesture(),
                }
            }
        }
    }

    /// The gesture's shape vanished: drop the gesture and the selection.
    fn abandon_gesture(&mut self) -> bool {
        self.input = InputState::Idle;
        self.ui.selected_id = None;
        false
    }

    /// Primary-button release: commit the drawing or report the change.
    #[allow(clippy::float_cmp)]
    pub fn on_mouse_up(&mut self, p: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.apply_pointer(p);

        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Drawing { kind, anchor, current } => {
                let mut shape = Shape::from_drag(kind, anchor, current);
                shape.normalize();
                tracing::debug!(id = %shape.id, kind = shape.kind.as_str(), "shape created");
                self.shapes.add_shape(shape.clone());
                self.ui.selected_id = None;
                vec![Action::ShapeCreated(shape), Action::RenderNeeded]
            }
            InputState::Dragging { id, orig_x, orig_y, .. } => {
                self.updated_if(&id, |s| s.x != orig_x || s.y != orig_y)
            }
            InputState::Resizing { id, orig_x, orig_y, orig_w, orig_h, .. } => self.updated_if(&id, |s| {
                s.x != orig_x || s.y != orig_y || s.width != orig_w || s.height != orig_h
            }),
            InputState::Rotating { id, orig_rotation, .. } => {
                self.updated_if(&id, |s| s.rotation != orig_rotation)
            }
        }
    }

    fn updated_if(&self, id: &ShapeId, changed: impl Fn(&Shape) -> bool) -> Vec<Action> {
        match self.shapes.get(id) {
            Some(shape) if changed(shape) => {
                tracing::debug!(id = %shape.id, "shape updated");
                vec![Action::ShapeUpdated(shape.clone()), Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    /// Escape cancels the gesture and deselects; Delete/Backspace removes
    /// the selected shape.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_escape() {
            self.cancel_gesture();
            self.ui.selected_id = None;
            return vec![Action::RenderNeeded];
        }

        if key.is_delete() && self.input.is_idle() {
            let Some(id) = self.ui.selected_id.take() else {
                return Vec::new();
            };
            if self.shapes.remove(&id).is_some() {
                tracing::debug!(%id, "shape deleted");
                return vec![Action::ShapeDeleted { id }, Action::RenderNeeded];
            }
        }
        Vec::new()
    }

    /// Drop the active gesture, restoring the shape it was editing.
    fn cancel_gesture(&mut self) {
        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::Drawing { .. } => {}
            InputState::Dragging { id, orig_x, orig_y, .. } => {
                if let Some(shape) = self.shapes.get_mut(&id) {
                    shape.x = orig_x;
                    shape.y = orig_y;
                }
            }
            InputState::Resizing { id, orig_x, orig_y, orig_w, orig_h, .. } => {
                if let Some(shape) = self.shapes.get_mut(&id) {
                    shape.x = orig_x;
                    shape.y = orig_y;
                    shape.width = orig_w;
                    shape.height = orig_h;
                }
            }
            InputState::Rotating { id, orig_rotation, .. } => {
                if let Some(shape) = self.shapes.get_mut(&id) {
                    shape.rotation = orig_rotation;
                }
            }
        }
    }

    /// Paint the scene onto any surface.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if a drawing call fails.
    pub fn render<S: render::Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        render::draw_scene(surface, &self.shapes, &self.ui, self.preview().as_ref(), self.width, self.height)
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element, sized to it.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let core = EngineCore::with_size(f64::from(canvas.width()), f64::from(canvas.height()));
        Self { canvas, core }
    }

    // --- Delegated inputs ---

    pub fn load_shapes(&mut self, shapes: ShapeCollection) {
        self.core.load_shapes(shapes);
    }

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn on_mouse_down(&mut self, p: Point, button: Button) -> Vec<Action> {
        self.core.on_mouse_down(p, button)
    }

    pub fn on_mouse_move(&mut self, p: Point) -> Vec<Action> {
        self.core.on_mouse_move(p)
    }

    pub fn on_mouse_up(&mut self, p: Point, button: Button) -> Vec<Action> {
        self.core.on_mouse_up(p, button)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        self.core.on_key_down(key)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let mut ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        self.core.render(&mut ctx)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.core.selection()
    }

    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.core.shape(id)
    }
}
