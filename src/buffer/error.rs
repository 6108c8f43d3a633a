use thiserror::Error;

/// Errors returned by strict line lookups on a [`TextBuffer`](super::TextBuffer).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The requested line index lies outside `[0, max]`.
    #[error("Line {line} is out of range [0, {max}]")]
    LineOutOfRange { line: i64, max: usize },
}

pub type Result<T> = std::result::Result<T, BufferError>;
