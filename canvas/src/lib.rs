//! Canvas core for the visual language editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser, but every
//! piece of logic also builds natively so it can be tested without a DOM. It
//! owns the shape model, hit-testing, the mouse-driven controller that draws,
//! moves, resizes, and rotates shapes, scene rendering, and JSON/XML
//! snapshots of the drawing. The host JavaScript layer forwards DOM events to
//! the engine and reacts to the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`collection`] | Ordered shape store and JSON/XML snapshots |
//! | [`shape`] | Shape kinds, geometry, containment, and handle positions |
//! | [`transform`] | Translate, resize-by-handle, and rotate |
//! | [`input`] | Tools, buttons, keys, and the gesture state machine |
//! | [`hit`] | Hit-testing against handles and shape bodies |
//! | [`render`] | Scene rendering through the [`render::Surface`] trait |
//! | [`geometry`] | Points, boxes, and rotation helpers |
//! | [`error`] | Snapshot loading errors |
//! | [`consts`] | Shared numeric constants (handle sizes, colors, etc.) |

pub mod collection;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod render;
pub mod shape;
pub mod transform;
