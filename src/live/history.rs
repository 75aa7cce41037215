//! Replay history - the last few admitted announcements and a browse cursor

use std::collections::VecDeque;

/// Stable id of a history entry. Matches the admission sequence number.
pub type HistoryId = u64;

/// Which end of the history the cursor ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// Result of moving the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryStep {
    /// Nothing has been admitted yet
    Empty,
    /// Cursor moved onto this entry
    Entry(String),
    /// Cursor already at an edge; the edge entry is repeated
    Boundary { edge: Edge, text: String },
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    id: HistoryId,
    text: String,
}

/// Bounded ring of recent announcement texts
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    /// `None` means the user is not browsing
    cursor: Option<HistoryId>,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            cursor: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append, overwriting the oldest entry once full
    pub fn push(&mut self, id: HistoryId, text: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            id,
            text: text.into(),
        });
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(|e| e.text.as_str())
    }

    /// Text under the cursor, if it still exists
    pub fn current(&self) -> Option<&str> {
        let pos = self.position(self.cursor?)?;
        Some(self.entries[pos].text.as_str())
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.text.as_str())
    }

    /// Point the cursor at an entry
    pub fn seek(&mut self, id: HistoryId) {
        self.cursor = Some(id);
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    fn position(&self, id: HistoryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn land(&mut self, pos: usize) -> String {
        let entry = &self.entries[pos];
        self.cursor = Some(entry.id);
        entry.text.clone()
    }

    /// Step toward older entries
    pub fn previous(&mut self) -> HistoryStep {
        if self.entries.is_empty() {
            return HistoryStep::Empty;
        }

        let target = match self.cursor.map(|id| self.position(id)) {
            // not browsing: start from the newest entry
            None => self.entries.len() - 1,
            // at the oldest entry, or the cursor's entry was overwritten
            Some(None) | Some(Some(0)) => {
                let text = self.land(0);
                return HistoryStep::Boundary {
                    edge: Edge::Top,
                    text,
                };
            }
            Some(Some(pos)) => pos - 1,
        };

        HistoryStep::Entry(self.land(target))
    }

    /// Step toward newer entries
    pub fn next(&mut self) -> HistoryStep {
        if self.entries.is_empty() {
            return HistoryStep::Empty;
        }

        let newest = self.entries.len() - 1;
        let target = match self.cursor.map(|id| self.position(id)) {
            None => newest,
            Some(None) => 0,
            Some(Some(pos)) if pos == newest => {
                let text = self.land(newest);
                return HistoryStep::Boundary {
                    edge: Edge::Bottom,
                    text,
                };
            }
            Some(Some(pos)) => pos + 1,
        };

        HistoryStep::Entry(self.land(target))
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: u64) -> History {
        let mut history = History::new(9);
        for i in 0..n {
            history.push(i, format!("msg {}", i));
        }
        history
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::new(9);
        assert_eq!(history.previous(), HistoryStep::Empty);
        assert_eq!(history.next(), HistoryStep::Empty);
    }

    #[test]
    fn test_ring_overwrites_oldest() {
        let history = filled(12);
        assert_eq!(history.len(), 9);
        assert_eq!(history.texts().next(), Some("msg 3"));
        assert_eq!(history.latest(), Some("msg 11"));
    }

    #[test]
    fn test_previous_walks_to_top() {
        let mut history = filled(3);
        assert_eq!(history.previous(), HistoryStep::Entry("msg 2".to_string()));
        assert_eq!(history.previous(), HistoryStep::Entry("msg 1".to_string()));
        assert_eq!(history.previous(), HistoryStep::Entry("msg 0".to_string()));
        assert_eq!(
            history.previous(),
            HistoryStep::Boundary {
                edge: Edge::Top,
                text: "msg 0".to_string()
            }
        );
    }

    #[test]
    fn test_next_stops_at_bottom() {
        let mut history = filled(3);
        history.seek(1);
        assert_eq!(history.next(), HistoryStep::Entry("msg 2".to_string()));
        assert_eq!(
            history.next(),
            HistoryStep::Boundary {
                edge: Edge::Bottom,
                text: "msg 2".to_string()
            }
        );
    }

    #[test]
    fn test_seek_then_previous_moves_older() {
        let mut history = filled(3);
        history.seek(2);
        assert_eq!(history.current(), Some("msg 2"));
        assert_eq!(history.previous(), HistoryStep::Entry("msg 1".to_string()));
    }

    #[test]
    fn test_cursor_on_overwritten_entry() {
        let mut history = filled(3);
        history.seek(0);
        for i in 3..12 {
            history.push(i, format!("msg {}", i));
        }
        assert_eq!(history.current(), None);
        assert_eq!(history.next(), HistoryStep::Entry("msg 3".to_string()));

        history.seek(0);
        assert_eq!(
            history.previous(),
            HistoryStep::Boundary {
                edge: Edge::Top,
                text: "msg 3".to_string()
            }
        );
    }

    #[test]
    fn test_reset_cursor_restarts_from_newest() {
        let mut history = filled(3);
        history.seek(0);
        history.reset_cursor();
        assert_eq!(history.next(), HistoryStep::Entry("msg 2".to_string()));
    }
}
