// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. buffer::BufferError)
    clippy::module_name_repetitions
)]

//! # textbuf
//!
//! A minimal in-memory text document for editor front ends.
//!
//! textbuf stores a mutable text value and lets a UI address it the way a
//! cursor does:
//! - Line/column [`Position`](buffer::Position)s and half-open
//!   [`Range`](buffer::Range)s, with columns in UTF-16 code units
//! - Conversion between positions and linear offsets
//! - Insert, delete, replace, find and replace-all
//!
//! Coordinates from the caller are clamped rather than rejected, so an
//! erratic cursor can never make an edit fail.
//!
//! ## Modules
//!
//! - [`buffer`]: The text buffer, coordinates, and errors
//! - [`search`]: Literal substring matching
//! - [`session`]: Buffer owner with a revision counter and change listeners
//! - [`config`]: Saved defaults for the command-line tool
//! - [`perf`]: Timing scopes and the edit log

pub mod buffer;
pub mod config;
pub mod perf;
pub mod search;
pub mod session;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::buffer::{BufferError, Position, Range, TextBuffer};
    pub use crate::session::{Change, EditKind, Revision, Session};
}
