//! Owner of a [`TextBuffer`] that reports every mutation.
//!
//! A UI holds one [`Session`], reads through [`Session::buffer`], and edits
//! through the session's mutating methods. Each edit bumps the
//! [`Revision`] and notifies subscribers, which is the hook a view uses to
//! schedule a redraw. The buffer itself knows nothing about this.

use std::fmt;

use tracing::debug;

use crate::buffer::{Position, Range, TextBuffer};

/// Monotonic change counter, incremented once per mutating call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision(pub u64);

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// The kind of edit a [`Change`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert { at: Position },
    Delete { range: Range },
    Replace { range: Range },
    ReplaceAll { count: usize },
    SetText,
}

/// Notification delivered to subscribers after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub revision: Revision,
    pub kind: EditKind,
}

/// Handle returned by [`Session::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Change)>;

/// A buffer plus its revision counter and change subscribers.
#[derive(Default)]
pub struct Session {
    buffer: TextBuffer,
    revision: Revision,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl Session {
    pub fn new(buffer: TextBuffer) -> Self {
        Self {
            buffer,
            ..Self::default()
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(TextBuffer::from_text(text))
    }

    /// Read-only access to the underlying buffer.
    pub const fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub const fn revision(&self) -> Revision {
        self.revision
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// Register `listener` to run after every mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&Change) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Insert `text` at `pos`. The change reports the clamped position.
    pub fn insert(&mut self, pos: Position, text: &str) {
        let at = self.buffer.clamp_position(pos);
        self.buffer.insert(pos, text);
        self.commit(EditKind::Insert { at });
    }

    /// Delete `range`. The change reports the clamped, normalized range.
    pub fn delete_range(&mut self, range: Range) {
        let resolved = self.resolve(range);
        self.buffer.delete_range(range);
        self.commit(EditKind::Delete { range: resolved });
    }

    /// Replace `range` with `text`. The change reports the clamped,
    /// normalized range that was replaced.
    pub fn replace_range(&mut self, range: Range, text: &str) {
        let resolved = self.resolve(range);
        self.buffer.replace_range(range, text);
        self.commit(EditKind::Replace { range: resolved });
    }

    /// Replace all occurrences of `query`, returning the count. Subscribers
    /// are notified even when nothing matched.
    pub fn replace_all(&mut self, query: &str, replacement: &str) -> usize {
        let count = self.buffer.replace_all(query, replacement);
        self.commit(EditKind::ReplaceAll { count });
        count
    }

    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.commit(EditKind::SetText);
    }

    /// The span `range` covers in the buffer before the edit.
    fn resolve(&self, range: Range) -> Range {
        let range = self.buffer.normalize_range(range);
        Range::new(
            self.buffer.clamp_position(range.start),
            self.buffer.clamp_position(range.end),
        )
    }

    fn commit(&mut self, kind: EditKind) {
        self.revision.0 += 1;
        let change = Change {
            revision: self.revision,
            kind,
        };
        debug!(revision = %change.revision, ?kind, listeners = self.listeners.len(), "commit");
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}

impl From<TextBuffer> for Session {
    fn from(buffer: TextBuffer) -> Self {
        Self::new(buffer)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("buffer", &self.buffer)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(session: &mut Session) -> (SubscriptionId, Rc<RefCell<Vec<Change>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = session.subscribe(move |change| sink.borrow_mut().push(*change));
        (id, seen)
    }

    #[test]
    fn test_new_session_starts_at_revision_zero() {
        let session = Session::from_text("Hello\nWorld");
        assert_eq!(session.revision(), Revision(0));
        assert_eq!(session.text(), "Hello\nWorld");
        assert_eq!(session.line_count(), 2);
    }

    #[test]
    fn test_each_mutation_bumps_revision_once() {
        let mut session = Session::from_text("Initial text");
        session.insert(Position::new(0, 0), "Start: ");
        assert_eq!(session.text(), "Start: Initial text");
        session.replace_range(
            Range::new(Position::new(0, 7), Position::new(0, 14)),
            "Modified",
        );
        assert_eq!(session.text(), "Start: Modified text");
        assert_eq!(session.replace_all("t", "T"), 4);
        assert_eq!(session.text(), "STarT: Modified TexT");
        session.delete_range(Range::new(Position::new(0, 0), Position::new(0, 7)));
        session.set_text("New text\nLine 2");
        assert_eq!(session.revision(), Revision(5));
        assert_eq!(session.line_count(), 2);
    }

    #[test]
    fn test_subscribers_receive_changes_in_order() {
        let mut session = Session::from_text("foo bar foo");
        let (_, seen) = recorder(&mut session);

        let at = Position::new(0, 3);
        session.insert(at, "!");
        session.replace_all("foo", "qux");

        let seen = seen.borrow();
        assert_eq!(
            *seen,
            vec![
                Change {
                    revision: Revision(1),
                    kind: EditKind::Insert { at },
                },
                Change {
                    revision: Revision(2),
                    kind: EditKind::ReplaceAll { count: 2 },
                },
            ]
        );
    }

    #[test]
    fn test_changes_report_where_the_edit_landed() {
        let mut session = Session::from_text("ab\ncd");
        let (_, seen) = recorder(&mut session);

        session.insert(Position::new(7, 99), "!");
        session.delete_range(Range::new(Position::new(9, 9), Position::new(-1, 1)));
        assert_eq!(session.text(), "a");
        session.set_text("hello");
        session.replace_range(Range::new(Position::new(0, 40), Position::new(0, 2)), "y");

        assert_eq!(session.text(), "hey");
        let kinds: Vec<EditKind> = seen.borrow().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EditKind::Insert {
                    at: Position::new(1, 2),
                },
                EditKind::Delete {
                    range: Range::new(Position::new(0, 1), Position::new(1, 3)),
                },
                EditKind::SetText,
                EditKind::Replace {
                    range: Range::new(Position::new(0, 2), Position::new(0, 5)),
                },
            ]
        );
    }

    #[test]
    fn test_noop_edits_still_notify() {
        let mut session = Session::from_text("abc");
        let (_, seen) = recorder(&mut session);
        assert_eq!(session.replace_all("", "x"), 0);
        assert_eq!(session.replace_all("zzz", "x"), 0);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(session.text(), "abc");
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut session = Session::default();
        let (id, seen) = recorder(&mut session);
        session.set_text("one");
        assert!(session.unsubscribe(id));
        assert!(!session.unsubscribe(id));
        session.set_text("two");
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(session.revision(), Revision(2));
    }

    #[test]
    fn test_reads_see_mutations() {
        let mut session = Session::from(TextBuffer::from_text("Line 1\nLine 2\nLine 3"));
        session.insert(Position::new(1, 5), " inserted");
        assert_eq!(session.buffer().line(1).unwrap(), "Line  inserted2");
        session.replace_range(
            Range::new(Position::new(0, 0), Position::new(0, 6)),
            "Start",
        );
        assert_eq!(session.buffer().line(0).unwrap(), "Start");
    }
}
