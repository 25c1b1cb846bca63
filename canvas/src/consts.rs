//! Shared numeric constants for the canvas crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Side length of the square resize handle, in pixels.
pub const HANDLE_SIZE: f64 = 10.0;

/// Distance from the top edge midpoint to the rotate handle, in pixels.
pub const ROTATION_HANDLE_OFFSET: f64 = 20.0;

/// Hit radius of the rotate handle, in pixels.
pub const ROTATION_HANDLE_RADIUS: f64 = 6.0;

/// Maximum pointer distance from a line segment that still counts as a hit.
pub const LINE_HIT_TOLERANCE: f64 = 5.0;

// ── Surface ─────────────────────────────────────────────────────

/// Default drawing surface width in pixels.
pub const DEFAULT_SURFACE_WIDTH: f64 = 500.0;

/// Default drawing surface height in pixels.
pub const DEFAULT_SURFACE_HEIGHT: f64 = 500.0;

// ── Style ───────────────────────────────────────────────────────

/// Background painted before every redraw.
pub const BACKGROUND_COLOR: &str = "#ffffff";

/// Outline and handle color for the selected shape.
pub const SELECTION_COLOR: &str = "#1E90FF";

/// Dash segment length for the selection outline.
pub const SELECTION_DASH: f64 = 4.0;

// ── Serialization ───────────────────────────────────────────────

/// Version stamped into JSON and XML snapshots.
pub const SNAPSHOT_VERSION: u32 = 1;
