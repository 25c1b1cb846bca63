//! Language studio core.
//!
//! Ties the canvas and syntax crates into an editing session for one
//! language definition, plus its semantics and the backend catalog of
//! published semantics.
//!
//! | Module | Role |
//! |--------|------|
//! | [`context`] | [`context::LanguageContext`]: graphical/textual forms and mode switching |
//! | [`semantics`] | Semantics document: initialization and edits |
//! | [`catalog`] | Paginated semantics catalog, search debounce, fetch seam |
//! | [`config`] | [`config::StudioConfig`] from environment variables |

pub mod catalog;
pub mod config;
pub mod context;
pub mod semantics;

pub use config::{ConfigError, StudioConfig};
pub use context::{LanguageContext, Mode};
