//! Language definitions and their textual syntax.
//!
//! A language is edited either graphically (element and relationship
//! records) or as text (an abstract and a concrete syntax document). This
//! crate owns both representations and the compiler between them.
//!
//! | Module | Role |
//! |--------|------|
//! | [`model`] | Element, relationship, property, label, style, and restriction records |
//! | [`compiler`] | `graphical_to_textual` / `textual_to_graphical` |
//! | [`error`] | [`SyntaxError`] |

pub mod compiler;
pub mod error;
pub mod model;

pub use compiler::{graphical_to_textual, textual_to_graphical};
pub use error::{SyntaxError, SyntaxPart};
pub use model::{Element, GraphicalModel, Label, Property, Relationship, Restriction, Style, TextualSyntax};
