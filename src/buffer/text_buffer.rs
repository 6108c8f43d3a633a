use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use ropey::Rope;
use tracing::{debug, trace};

use super::error::{BufferError, Result};
use super::position::{Position, Range};
use crate::search;

/// A mutable text document addressed by line/column positions.
///
/// Lines are separated by `\n` only; a `\r` before it is ordinary line
/// content. Columns and offsets are measured in UTF-16 code units, with each
/// separator counting as one unit.
///
/// Coordinate-taking operations never fail: positions and offsets outside the
/// document are clamped to the nearest valid boundary. Only the indexed line
/// lookups ([`line`](Self::line) and [`line_range`](Self::line_range)) reject
/// an invalid index.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the entire content of the buffer.
    pub fn set_text(&mut self, text: &str) {
        debug!(len = text.len(), "set_text");
        self.rope = Rope::from_str(text);
    }

    /// Number of lines. An empty buffer has one empty line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Length of the text in UTF-16 code units; the largest valid offset.
    pub fn len_utf16(&self) -> usize {
        self.rope.len_utf16_cu()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Content of line `line`, without its trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::LineOutOfRange`] when `line` is negative or not
    /// less than [`line_count`](Self::line_count).
    pub fn line(&self, line: i64) -> Result<String> {
        let idx = self.checked_line(line)?;
        let content = self.rope.line(idx).to_string();
        Ok(match content.strip_suffix('\n') {
            Some(stripped) => stripped.to_string(),
            None => content,
        })
    }

    /// Length of a line in UTF-16 code units, excluding the newline.
    ///
    /// Lines past the end of the buffer have length 0.
    pub fn line_len(&self, line: usize) -> usize {
        let lines = self.rope.len_lines();
        if line >= lines {
            return 0;
        }
        let start = self.rope.line_to_char(line);
        let end = if line + 1 < lines {
            // Stop before the separator.
            self.rope.line_to_char(line + 1) - 1
        } else {
            self.rope.len_chars()
        };
        self.rope.char_to_utf16_cu(end) - self.rope.char_to_utf16_cu(start)
    }

    /// The span of line `line`, including its trailing newline if it has one.
    ///
    /// Every line but the last ends at column 0 of the following line; the
    /// last line ends at its own length.
    ///
    /// # Errors
    ///
    /// Fails under the same condition as [`line`](Self::line).
    pub fn line_range(&self, line: i64) -> Result<Range> {
        let idx = self.checked_line(line)?;
        let start = Position::new(to_i64(idx), 0);
        let end = if idx + 1 < self.line_count() {
            Position::new(to_i64(idx + 1), 0)
        } else {
            Position::new(to_i64(idx), to_i64(self.line_len(idx)))
        };
        Ok(Range::new(start, end))
    }

    /// Clamp `pos` onto the document: the line into `[0, line_count - 1]`,
    /// then the column into `[0, line length]`.
    pub fn clamp_position(&self, pos: Position) -> Position {
        let (line, column) = self.clamp_coords(pos);
        Position::new(to_i64(line), to_i64(column))
    }

    /// Linear offset of `pos` after clamping it onto the document.
    ///
    /// The result is always in `[0, len_utf16()]`.
    pub fn position_to_offset(&self, pos: Position) -> usize {
        let (line, column) = self.clamp_coords(pos);
        if to_i64(line) != pos.line || to_i64(column) != pos.column {
            trace!(%pos, line, column, "clamped position");
        }
        self.line_start(line) + column
    }

    /// Position of `offset` after clamping it into `[0, len_utf16()]`.
    ///
    /// An offset that lands on a line separator maps to the end of the line
    /// the separator terminates.
    pub fn offset_to_position(&self, offset: i64) -> Position {
        self.position_at(clamp_index(offset, self.len_utf16()))
    }

    /// Return `range` with its endpoints ordered by offset.
    pub fn normalize_range(&self, range: Range) -> Range {
        if self.position_to_offset(range.start) > self.position_to_offset(range.end) {
            range.reversed()
        } else {
            range
        }
    }

    /// The text covered by the normalized `range`.
    pub fn text_in_range(&self, range: Range) -> String {
        let (start, end) = self.range_offsets(range);
        let start = self.offset_to_char(start);
        let end = self.offset_to_char(end);
        self.rope.slice(start..end).to_string()
    }

    /// Insert `text` at the clamped position `pos`.
    pub fn insert(&mut self, pos: Position, text: &str) {
        let offset = self.position_to_offset(pos);
        debug!(offset, len = text.len(), "insert");
        self.splice(offset, offset, text);
    }

    /// Remove the text covered by the normalized `range`.
    pub fn delete_range(&mut self, range: Range) {
        let (start, end) = self.range_offsets(range);
        debug!(start, end, "delete_range");
        self.splice(start, end, "");
    }

    /// Replace the text covered by the normalized `range` with `text`.
    pub fn replace_range(&mut self, range: Range, text: &str) {
        let (start, end) = self.range_offsets(range);
        debug!(start, end, len = text.len(), "replace_range");
        self.splice(start, end, text);
    }

    /// Range of the first exact occurrence of `query`.
    ///
    /// An empty query never matches.
    pub fn find_first(&self, query: &str) -> Option<Range> {
        let text = self.text();
        let bytes = search::find_first(&text, query)?;
        let start = self.byte_to_offset(bytes.start);
        let end = self.byte_to_offset(bytes.end);
        Some(Range::new(self.position_at(start), self.position_at(end)))
    }

    /// Replace every non-overlapping occurrence of `query` with `replacement`,
    /// scanning left to right. Returns the number of replacements.
    ///
    /// The scan resumes after each matched span, so replacement text is never
    /// searched again. An empty query replaces nothing.
    pub fn replace_all(&mut self, query: &str, replacement: &str) -> usize {
        let text = self.text();
        let (replaced, count) = search::replace_all(&text, query, replacement);
        if count > 0 {
            self.rope = Rope::from_str(&replaced);
        }
        debug!(count, "replace_all");
        count
    }

    // --- Private helpers ---

    fn checked_line(&self, line: i64) -> Result<usize> {
        let max = self.line_count() - 1;
        usize::try_from(line)
            .ok()
            .filter(|&idx| idx <= max)
            .ok_or(BufferError::LineOutOfRange { line, max })
    }

    fn clamp_coords(&self, pos: Position) -> (usize, usize) {
        let line = clamp_index(pos.line, self.line_count() - 1);
        let column = clamp_index(pos.column, self.line_len(line));
        (line, column)
    }

    /// Offset of the first code unit of `line`.
    fn line_start(&self, line: usize) -> usize {
        self.rope.char_to_utf16_cu(self.rope.line_to_char(line))
    }

    /// Position of an offset already known to be in bounds.
    fn position_at(&self, offset: usize) -> Position {
        let line = self.rope.char_to_line(self.offset_to_char(offset));
        let column = offset - self.line_start(line);
        Position::new(to_i64(line), to_i64(column))
    }

    fn range_offsets(&self, range: Range) -> (usize, usize) {
        let start = self.position_to_offset(range.start);
        let end = self.position_to_offset(range.end);
        if start > end { (end, start) } else { (start, end) }
    }

    /// Char index for a UTF-16 offset. An offset between the halves of a
    /// surrogate pair resolves to the start of that character.
    fn offset_to_char(&self, offset: usize) -> usize {
        self.rope.utf16_cu_to_char(offset)
    }

    fn byte_to_offset(&self, byte: usize) -> usize {
        self.rope.char_to_utf16_cu(self.rope.byte_to_char(byte))
    }

    fn splice(&mut self, start: usize, end: usize, text: &str) {
        let start = self.offset_to_char(start);
        let end = self.offset_to_char(end);
        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
    }
}

/// Clamp a caller-supplied coordinate into `[0, max]`.
fn clamp_index(value: i64, max: usize) -> usize {
    if value < 0 {
        return 0;
    }
    usize::try_from(value).map_or(max, |v| v.min(max))
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for TextBuffer {
    fn from(text: String) -> Self {
        Self::from_text(&text)
    }
}

impl FromStr for TextBuffer {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_text(s))
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field(
                "rope",
                &format_args!(
                    "Rope({} lines, {} utf16)",
                    self.rope.len_lines(),
                    self.rope.len_utf16_cu()
                ),
            )
            .finish()
    }
}
