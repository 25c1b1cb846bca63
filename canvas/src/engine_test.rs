#![allow(clippy::float_cmp)]

use std::f64::consts::FRAC_PI_2;

use super::*;
use crate::hit::ResizeAnchor;
use crate::shape::{LineSlope, ShapeKind};

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn key(name: &str) -> Key {
    Key(name.to_owned())
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn created(actions: &[Action]) -> Option<&Shape> {
    actions.iter().find_map(|a| match a {
        Action::ShapeCreated(s) => Some(s),
        _ => None,
    })
}

fn updated(actions: &[Action]) -> Option<&Shape> {
    actions.iter().find_map(|a| match a {
        Action::ShapeUpdated(s) => Some(s),
        _ => None,
    })
}

fn geometry(s: &Shape) -> (f64, f64, f64, f64) {
    (s.x, s.y, s.width, s.height)
}

/// Core with one committed rectangle; returns its id.
fn core_with_rect(x: f64, y: f64, w: f64, h: f64) -> (EngineCore, ShapeId) {
    let mut core = EngineCore::new();
    let shape = Shape::new(ShapeKind::Rectangle, x, y, w, h);
    let id = shape.id;
    core.shapes.add_shape(shape);
    (core, id)
}

fn click(core: &mut EngineCore, p: Point) -> Vec<Action> {
    let mut actions = core.on_mouse_down(p, Button::Primary);
    actions.extend(core.on_mouse_up(p, Button::Primary));
    actions
}

fn drag(core: &mut EngineCore, from: Point, to: Point) -> Vec<Action> {
    let mut actions = core.on_mouse_down(from, Button::Primary);
    actions.extend(core.on_mouse_move(to));
    actions.extend(core.on_mouse_up(to, Button::Primary));
    actions
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn core_new_has_no_selection() {
    let core = EngineCore::new();
    assert!(core.selection().is_none());
    assert!(core.input.is_idle());
}

#[test]
fn core_default_tool_is_select() {
    assert_eq!(EngineCore::new().ui.tool, Tool::Select);
}

#[test]
fn core_default_collection_is_empty() {
    assert!(EngineCore::new().shapes.is_empty());
}

#[test]
fn core_default_surface_size() {
    let core = EngineCore::new();
    assert_eq!((core.width, core.height), (500.0, 500.0));
    let sized = EngineCore::with_size(800.0, 600.0);
    assert_eq!((sized.width, sized.height), (800.0, 600.0));
}

// =============================================================
// Tools
// =============================================================

#[test]
fn set_tool_emits_cursor() {
    let mut core = EngineCore::new();
    assert_eq!(core.set_tool(Tool::Ellipse), vec![Action::SetCursor("crosshair".to_owned())]);
    assert_eq!(core.ui.tool, Tool::Ellipse);
    assert_eq!(core.set_tool(Tool::Select), vec![Action::SetCursor("default".to_owned())]);
}

// =============================================================
// Drawing
// =============================================================

#[test]
fn draw_rectangle_commits_normalized_shape() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rectangle);
    let actions = drag(&mut core, pt(10.0, 10.0), pt(110.0, 60.0));

    let shape = created(&actions).cloned();
    assert_eq!(shape.as_ref().map(geometry), Some((10.0, 10.0, 100.0, 50.0)));
    assert_eq!(shape.as_ref().map(|s| s.kind), Some(ShapeKind::Rectangle));
    assert!(has_render_needed(&actions));
    assert_eq!(core.shapes.len(), 1);
    assert!(core.selection().is_none());
    assert!(core.input.is_idle());
}

#[test]
fn draw_up_left_normalizes_origin() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Ellipse);
    let actions = drag(&mut core, pt(110.0, 60.0), pt(10.0, 10.0));
    assert_eq!(created(&actions).map(geometry), Some((10.0, 10.0, 100.0, 50.0)));
}

#[test]
fn draw_uses_mouse_up_position() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Triangle);
    core.on_mouse_down(pt(0.0, 0.0), Button::Primary);
    core.on_mouse_move(pt(30.0, 30.0));
    let actions = core.on_mouse_up(pt(40.0, 20.0), Button::Primary);
    assert_eq!(created(&actions).map(geometry), Some((0.0, 0.0, 40.0, 20.0)));
}

#[test]
fn preview_tracks_drawing_with_signed_size() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rectangle);
    assert!(core.preview().is_none());
    core.on_mouse_down(pt(50.0, 50.0), Button::Primary);
    let actions = core.on_mouse_move(pt(20.0, 30.0));
    assert!(has_render_needed(&actions));
    let preview = core.preview();
    assert_eq!(preview.as_ref().map(geometry), Some((50.0, 50.0, -30.0, -20.0)));
    core.on_mouse_up(pt(20.0, 30.0), Button::Primary);
    assert!(core.preview().is_none());
}

#[test]
fn draw_line_records_slope() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Line);
    let actions = drag(&mut core, pt(0.0, 100.0), pt(100.0, 0.0));
    let line = created(&actions);
    assert_eq!(line.map(|s| s.slope), Some(LineSlope::Ascending));
    assert_eq!(line.map(geometry), Some((0.0, 0.0, 100.0, 100.0)));
}

#[test]
fn drawing_tool_ignores_existing_shapes() {
    let (mut core, id) = core_with_rect(0.0, 0.0, 100.0, 100.0);
    core.set_tool(Tool::Rectangle);
    let actions = drag(&mut core, pt(50.0, 50.0), pt(80.0, 80.0));
    assert!(created(&actions).is_some());
    assert_eq!(core.shapes.len(), 2);
    assert_eq!(core.shape(&id).map(geometry), Some((0.0, 0.0, 100.0, 100.0)));
}

#[test]
fn drawing_clears_selection() {
    let (mut core, id) = core_with_rect(0.0, 0.0, 50.0, 50.0);
    click(&mut core, pt(25.0, 25.0));
    assert_eq!(core.selection(), Some(id));
    core.set_tool(Tool::Ellipse);
    drag(&mut core, pt(100.0, 100.0), pt(150.0, 150.0));
    assert!(core.selection().is_none());
}

// =============================================================
// Selection
// =============================================================

#[test]
fn click_on_shape_selects_without_update() {
    let (mut core, id) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    let actions = click(&mut core, pt(50.0, 30.0));
    assert_eq!(core.selection(), Some(id));
    assert!(updated(&actions).is_none());
    assert!(has_render_needed(&actions));
}

#[test]
fn click_on_empty_space_changes_nothing() {
    let (mut core, _) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    let before = core.shapes.clone();
    let actions = click(&mut core, pt(300.0, 300.0));
    assert!(core.selection().is_none());
    assert_eq!(core.shapes, before);
    assert!(created(&actions).is_none() && updated(&actions).is_none());
}

#[test]
fn click_on_empty_space_deselects() {
    let (mut core, id) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    click(&mut core, pt(50.0, 30.0));
    assert_eq!(core.selection(), Some(id));
    click(&mut core, pt(300.0, 300.0));
    assert!(core.selection().is_none());
}

#[test]
fn click_selects_topmost() {
    let (mut core, _) = core_with_rect(0.0, 0.0, 100.0, 100.0);
    let top = Shape::new(ShapeKind::Ellipse, 50.0, 50.0, 100.0, 100.0);
    let top_id = top.id;
    core.shapes.add_shape(top);
    click(&mut core, pt(90.0, 90.0));
    assert_eq!(core.selection(), Some(top_id));
}

// =============================================================
// Dragging
// =============================================================

#[test]
fn drag_moves_shape_and_reports_update() {
    let (mut core, id) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    core.on_mouse_down(pt(50.0, 30.0), Button::Primary);
    assert!(matches!(core.input, InputState::Dragging { .. }));
    core.on_mouse_move(pt(60.0, 40.0));
    let actions = core.on_mouse_up(pt(70.0, 50.0), Button::Primary);
    assert_eq!(updated(&actions).map(geometry), Some((30.0, 30.0, 100.0, 50.0)));
    assert_eq!(core.shape(&id).map(geometry), Some((30.0, 30.0, 100.0, 50.0)));
    assert!(core.input.is_idle());
}

#[test]
fn drag_back_to_start_reports_nothing() {
    let (mut core, _) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    core.on_mouse_down(pt(50.0, 30.0), Button::Primary);
    core.on_mouse_move(pt(90.0, 70.0));
    let actions = core.on_mouse_up(pt(50.0, 30.0), Button::Primary);
    assert!(updated(&actions).is_none());
}

// =============================================================
// Resizing
// =============================================================

#[test]
fn resize_bottom_right_handle() {
    let (mut core, id) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    click(&mut core, pt(50.0, 30.0));

    core.on_mouse_down(pt(110.0, 60.0), Button::Primary);
    assert!(matches!(core.input, InputState::Resizing { anchor: ResizeAnchor::Se, .. }));
    let moved = core.on_mouse_move(pt(150.0, 90.0));
    assert!(has_render_needed(&moved));
    let actions = core.on_mouse_up(pt(150.0, 90.0), Button::Primary);

    assert_eq!(updated(&actions).map(geometry), Some((10.0, 10.0, 140.0, 80.0)));
    assert_eq!(core.shape(&id).map(geometry), Some((10.0, 10.0, 140.0, 80.0)));
    assert_eq!(core.selection(), Some(id));
}

#[test]
fn resize_top_left_handle_keeps_bottom_right() {
    let (mut core, id) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    click(&mut core, pt(50.0, 30.0));
    drag(&mut core, pt(10.0, 10.0), pt(30.0, 20.0));
    assert_eq!(core.shape(&id).map(geometry), Some((30.0, 20.0, 80.0, 40.0)));
}

#[test]
fn long_resize_gesture_does_not_drift() {
    let (mut core, id) = core_with_rect(-50.0, -40.0, 100.0, 80.0);
    click(&mut core, pt(0.0, 0.0));
    let start = core.shape(&id).cloned().expect("shape");
    let sw_before = start.anchor_position(ResizeAnchor::Sw);

    core.on_mouse_down(pt(50.0, -40.0), Button::Primary);
    assert!(matches!(core.input, InputState::Resizing { anchor: ResizeAnchor::Ne, .. }));
    let mut last = pt(50.0, -40.0);
    for i in 1..=500 {
        let t = f64::from(i);
        last = pt(50.0 + (t * 0.37).sin() * 33.3, -40.0 - t * 0.0213);
        core.on_mouse_move(last);
    }
    core.on_mouse_up(last, Button::Primary);

    let mut expected = start;
    resize_shape(&mut expected, ResizeAnchor::Ne, last);
    let shape = core.shape(&id).expect("shape");
    assert_eq!(geometry(shape), geometry(&expected));
    let sw_after = shape.anchor_position(ResizeAnchor::Sw);
    assert!((sw_after.x - sw_before.x).abs() < 1e-9);
    assert!((sw_after.y - sw_before.y).abs() < 1e-9);
}

#[test]
fn long_resize_of_rotated_shape_matches_single_step() {
    let (mut core, id) = core_with_rect(0.0, 0.0, 100.0, 40.0);
    if let Some(shape) = core.shapes.get_mut(&id) {
        shape.rotation = 0.7;
    }
    core.ui.selected_id = Some(id);
    let start = core.shape(&id).cloned().expect("shape");
    let handle = start.rotated_resize_handles()[ResizeAnchor::Se.index()];

    core.on_mouse_down(handle, Button::Primary);
    assert!(matches!(core.input, InputState::Resizing { anchor: ResizeAnchor::Se, .. }));
    let mut last = handle;
    for i in 1..=200 {
        last = pt(handle.x + f64::from(i) * 0.31, handle.y + f64::from(i) * 0.17);
        core.on_mouse_move(last);
    }
    core.on_mouse_up(last, Button::Primary);

    let mut expected = start;
    resize_shape(&mut expected, ResizeAnchor::Se, last);
    assert_eq!(core.shape(&id).map(geometry), Some(geometry(&expected)));
}

#[test]
fn handles_ignored_until_selected() {
    let (mut core, id) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    // Corner is on the body, so an unselected press starts a move instead.
    core.on_mouse_down(pt(110.0, 60.0), Button::Primary);
    assert!(matches!(core.input, InputState::Dragging { .. }));
    assert_eq!(core.selection(), Some(id));
}

// =============================================================
// Rotating
// =============================================================

#[test]
fn rotate_handle_turns_shape_from_baseline() {
    let (mut core, id) = core_with_rect(0.0, 0.0, 100.0, 50.0);
    click(&mut core, pt(50.0, 25.0));

    // Rotate handle sits 20px above the top-center.
    core.on_mouse_down(pt(50.0, -20.0), Button::Primary);
    assert!(matches!(core.input, InputState::Rotating { .. }));
    core.on_mouse_move(pt(95.0, 25.0));
    let actions = core.on_mouse_up(pt(95.0, 25.0), Button::Primary);

    let rotation = core.shape(&id).map_or(0.0, |s| s.rotation);
    assert!((rotation - FRAC_PI_2).abs() < 1e-9);
    assert!(updated(&actions).is_some());
    assert_eq!(core.shape(&id).map(geometry), Some((0.0, 0.0, 100.0, 50.0)));
}

#[test]
fn rotation_has_no_drift_across_moves() {
    let (mut core, id) = core_with_rect(0.0, 0.0, 100.0, 50.0);
    click(&mut core, pt(50.0, 25.0));
    core.on_mouse_down(pt(50.0, -20.0), Button::Primary);
    for i in 0..200 {
        let t = f64::from(i) * 0.1;
        core.on_mouse_move(pt(50.0 + 45.0 * t.cos(), 25.0 + 45.0 * t.sin()));
    }
    let actions = core.on_mouse_up(pt(50.0, -20.0), Button::Primary);
    assert_eq!(core.shape(&id).map(|s| s.rotation), Some(0.0));
    assert!(updated(&actions).is_none());
}

#[test]
fn rotation_stays_in_range() {
    let (mut core, id) = core_with_rect(0.0, 0.0, 100.0, 50.0);
    click(&mut core, pt(50.0, 25.0));
    core.on_mouse_down(pt(50.0, -20.0), Button::Primary);
    core.on_mouse_move(pt(5.0, 25.0));
    let rotation = core.shape(&id).map_or(-1.0, |s| s.rotation);
    assert!((0.0..std::f64::consts::TAU).contains(&rotation));
    assert!((rotation - 3.0 * FRAC_PI_2).abs() < 1e-9);
}

// =============================================================
// Buttons and keys
// =============================================================

#[test]
fn non_primary_buttons_are_ignored() {
    let (mut core, _) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    assert!(core.on_mouse_down(pt(50.0, 30.0), Button::Secondary).is_empty());
    assert!(core.on_mouse_down(pt(50.0, 30.0), Button::Middle).is_empty());
    assert!(core.input.is_idle());
    assert!(core.selection().is_none());
}

#[test]
fn move_while_idle_emits_nothing() {
    let mut core = EngineCore::new();
    assert!(core.on_mouse_move(pt(10.0, 10.0)).is_empty());
    assert!(core.on_mouse_up(pt(10.0, 10.0), Button::Primary).is_empty());
}

#[test]
fn escape_drops_unfinished_drawing() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Rectangle);
    core.on_mouse_down(pt(0.0, 0.0), Button::Primary);
    core.on_mouse_move(pt(40.0, 40.0));
    let actions = core.on_key_down(&key("Escape"));
    assert!(has_render_needed(&actions));
    assert!(core.input.is_idle());
    assert!(core.preview().is_none());
    assert!(core.on_mouse_up(pt(40.0, 40.0), Button::Primary).is_empty());
    assert!(core.shapes.is_empty());
}

#[test]
fn escape_reverts_drag_and_deselects() {
    let (mut core, id) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    core.on_mouse_down(pt(50.0, 30.0), Button::Primary);
    core.on_mouse_move(pt(90.0, 90.0));
    core.on_key_down(&key("Escape"));
    assert_eq!(core.shape(&id).map(geometry), Some((10.0, 10.0, 100.0, 50.0)));
    assert!(core.selection().is_none());
    assert!(core.input.is_idle());
}

#[test]
fn delete_removes_selected_shape() {
    let (mut core, id) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    click(&mut core, pt(50.0, 30.0));
    let actions = core.on_key_down(&key("Delete"));
    assert!(has_action(&actions, |a| *a == Action::ShapeDeleted { id }));
    assert!(core.shapes.is_empty());
    assert!(core.selection().is_none());
}

#[test]
fn backspace_also_deletes() {
    let (mut core, _) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    click(&mut core, pt(50.0, 30.0));
    core.on_key_down(&key("Backspace"));
    assert!(core.shapes.is_empty());
}

#[test]
fn delete_without_selection_is_noop() {
    let (mut core, _) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    assert!(core.on_key_down(&key("Delete")).is_empty());
    assert_eq!(core.shapes.len(), 1);
}

#[test]
fn other_keys_are_ignored() {
    let (mut core, id) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    click(&mut core, pt(50.0, 30.0));
    assert!(core.on_key_down(&key("a")).is_empty());
    assert_eq!(core.selection(), Some(id));
}

// =============================================================
// Data inputs
// =============================================================

#[test]
fn load_shapes_replaces_and_deselects() {
    let (mut core, _) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    click(&mut core, pt(50.0, 30.0));
    let mut next = ShapeCollection::new();
    next.add_shape(Shape::new(ShapeKind::Ellipse, 0.0, 0.0, 5.0, 5.0));
    next.add_shape(Shape::new(ShapeKind::Line, 0.0, 0.0, 5.0, 5.0));
    core.load_shapes(next);
    assert_eq!(core.shapes.len(), 2);
    assert!(core.selection().is_none());
}

#[test]
fn gesture_on_removed_shape_is_abandoned() {
    let (mut core, id) = core_with_rect(10.0, 10.0, 100.0, 50.0);
    core.on_mouse_down(pt(50.0, 30.0), Button::Primary);
    core.shapes.remove(&id);
    assert!(core.on_mouse_move(pt(60.0, 40.0)).is_empty());
    assert!(core.input.is_idle());
    assert!(core.selection().is_none());
}
