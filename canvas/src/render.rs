//! Rendering: draws the full canvas scene to a 2D surface.
//!
//! Drawing goes through the [`Surface`] trait, which mirrors the subset of the
//! Canvas2D API the renderer needs. The browser binding at the bottom of this
//! module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! Nothing here mutates application state.
//!
//! Every frame is a full clear-and-redraw: background, shapes in z-order,
//! selection UI for the selected shape, then the drawing preview on top.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::collection::ShapeCollection;
use crate::consts::{
    BACKGROUND_COLOR, HANDLE_SIZE, ROTATION_HANDLE_RADIUS, SELECTION_COLOR, SELECTION_DASH,
};
use crate::hit::ResizeAnchor;
use crate::input::UiState;
use crate::shape::{LineSlope, Shape, ShapeKind};

/// Immediate-mode 2D drawing target.
///
/// Calls that can fail on a real canvas return `Result`; the rest cannot.
pub trait Surface {
    type Error;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;
    fn rotate(&mut self, angle: f64) -> Result<(), Self::Error>;

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    #[allow(clippy::too_many_arguments)]
    fn ellipse(
        &mut self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<(), Self::Error>;
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) -> Result<(), Self::Error>;
    fn fill(&mut self);
    fn stroke(&mut self);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), Self::Error>;
}

/// Draw the full scene.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw_scene<S: Surface>(
    surface: &mut S,
    shapes: &ShapeCollection,
    ui: &UiState,
    preview: Option<&Shape>,
    width: f64,
    height: f64,
) -> Result<(), S::Error> {
    // Layer 1: clear and paint the background.
    surface.clear_rect(0.0, 0.0, width, height);
    surface.set_fill_style(BACKGROUND_COLOR);
    surface.fill_rect(0.0, 0.0, width, height);

    // Layer 2: shapes in z-order (bottom first).
    for shape in shapes.iter() {
        draw_shape(surface, shape)?;
    }

    // Layer 3: selection UI.
    if let Some(selected) = ui.selected_id.and_then(|id| shapes.get(&id)) {
        draw_selection(surface, selected)?;
        draw_resize_handles(surface, selected);
        draw_rotation_handle(surface, selected)?;
    }

    // Layer 4: the shape being drawn.
    if let Some(shape) = preview {
        draw_shape(surface, shape)?;
    }

    Ok(())
}

// =============================================================
// Shapes
// =============================================================

/// Draw one shape in its rotated frame.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw_shape<S: Surface>(surface: &mut S, shape: &Shape) -> Result<(), S::Error> {
    let b = shape.bounds();
    let hw = b.width / 2.0;
    let hh = b.height / 2.0;

    surface.save();
    translate_and_rotate(surface, shape)?;
    surface.set_fill_style(&shape.style.fill);
    surface.set_stroke_style(&shape.style.stroke);
    surface.set_line_width(shape.style.line_width);

    match shape.kind {
        ShapeKind::Rectangle => {
            surface.fill_rect(-hw, -hh, b.width, b.height);
            surface.stroke_rect(-hw, -hh, b.width, b.height);
        }
        ShapeKind::Ellipse => {
            surface.begin_path();
            surface.ellipse(0.0, 0.0, hw, hh, 0.0, 0.0, TAU)?;
            surface.fill();
            surface.stroke();
        }
        ShapeKind::Triangle => {
            surface.begin_path();
            surface.move_to(0.0, -hh);
            surface.line_to(hw, hh);
            surface.line_to(-hw, hh);
            surface.close_path();
            surface.fill();
            surface.stroke();
        }
        ShapeKind::Line => {
            surface.begin_path();
            match shape.slope {
                LineSlope::Descending => {
                    surface.move_to(-hw, -hh);
                    surface.line_to(hw, hh);
                }
                LineSlope::Ascending => {
                    surface.move_to(-hw, hh);
                    surface.line_to(hw, -hh);
                }
            }
            surface.stroke();
        }
    }

    surface.restore();
    Ok(())
}

// =============================================================
// Selection UI
// =============================================================

/// Dashed outline around the shape's rotated bounding box.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw_selection<S: Surface>(surface: &mut S, shape: &Shape) -> Result<(), S::Error> {
    let b = shape.bounds();
    surface.save();
    translate_and_rotate(surface, shape)?;
    surface.set_stroke_style(SELECTION_COLOR);
    surface.set_line_width(1.0);
    surface.set_line_dash(&[SELECTION_DASH, SELECTION_DASH])?;
    surface.stroke_rect(-b.width / 2.0, -b.height / 2.0, b.width, b.height);
    surface.set_line_dash(&[])?;
    surface.restore();
    Ok(())
}

/// The 8 resize handles as squares centered on the rotated handle positions.
pub fn draw_resize_handles<S: Surface>(surface: &mut S, shape: &Shape) {
    let half = HANDLE_SIZE / 2.0;
    surface.save();
    surface.set_fill_style("#ffffff");
    surface.set_stroke_style(SELECTION_COLOR);
    surface.set_line_width(1.0);
    for h in shape.rotated_resize_handles() {
        surface.fill_rect(h.x - half, h.y - half, HANDLE_SIZE, HANDLE_SIZE);
        surface.stroke_rect(h.x - half, h.y - half, HANDLE_SIZE, HANDLE_SIZE);
    }
    surface.restore();
}

/// The rotate handle and its stem from the top-center handle.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw_rotation_handle<S: Surface>(surface: &mut S, shape: &Shape) -> Result<(), S::Error> {
    let top = shape.rotated_resize_handles()[ResizeAnchor::N.index()];
    let knob = shape.rotation_handle();

    surface.save();
    surface.set_stroke_style(SELECTION_COLOR);
    surface.set_line_width(1.0);
    surface.begin_path();
    surface.move_to(top.x, top.y);
    surface.line_to(knob.x, knob.y);
    surface.stroke();

    surface.begin_path();
    surface.arc(knob.x, knob.y, ROTATION_HANDLE_RADIUS, 0.0, TAU)?;
    surface.set_fill_style("#ffffff");
    surface.fill();
    surface.stroke();
    surface.restore();
    Ok(())
}

/// Translate to the shape's center and rotate by its rotation angle.
fn translate_and_rotate<S: Surface>(surface: &mut S, shape: &Shape) -> Result<(), S::Error> {
    let c = shape.center();
    surface.translate(c.x, c.y)?;
    surface.rotate(shape.rotation)?;
    Ok(())
}

// =============================================================
// Browser binding
// =============================================================

impl Surface for CanvasRenderingContext2d {
    type Error = JsValue;

    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::translate(self, x, y)
    }

    fn rotate(&mut self, angle: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::rotate(self, angle)
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn close_path(&mut self) {
        CanvasRenderingContext2d::close_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn ellipse(
        &mut self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<(), JsValue> {
        CanvasRenderingContext2d::ellipse(self, x, y, radius_x, radius_y, rotation, start_angle, end_angle)
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::arc(self, x, y, radius, start_angle, end_angle)
    }

    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        CanvasRenderingContext2d::stroke_rect(self, x, y, width, height);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        CanvasRenderingContext2d::clear_rect(self, x, y, width, height);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        CanvasRenderingContext2d::set_line_width(self, width);
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), JsValue> {
        let dash_array = js_sys::Array::new();
        for segment in segments {
            dash_array.push(&JsValue::from_f64(*segment));
        }
        CanvasRenderingContext2d::set_line_dash(self, &dash_array)
    }
}
