//! In-memory text document with line/column addressing.
//!
//! Provides a rope-backed [`TextBuffer`] that converts between
//! [`Position`]s and linear UTF-16 offsets and applies range edits.

mod error;
mod position;
mod text_buffer;

pub use error::{BufferError, Result};
pub use position::{Position, Range};
pub use text_buffer::TextBuffer;
