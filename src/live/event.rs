//! Inbound change events
//!
//! Raw event names are decoded once at ingestion into `EventKind`; nothing
//! downstream compares strings.

use serde::{Deserialize, Serialize};

use super::tree::{AccessibleTree, NodeId};

/// Object replacement character used for embedded children
const EMBEDDED_OBJECT_CHAR: char = '\u{fffc}';

/// Event as delivered by the accessibility bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    pub kind: String,
    pub source: NodeId,
    #[serde(default)]
    pub payload: String,
}

/// Decoded event kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Text inserted into a node
    ContentChanged,
    /// Announcement or notification raised
    AlertAppeared,
    /// Children added or removed. User agents fire these alongside text
    /// insertions, so they are recognised but never presented.
    ChildrenChanged,
    Other(String),
}

impl EventKind {
    pub fn decode(raw: &str) -> Self {
        if raw.starts_with("object:text-changed:insert") {
            EventKind::ContentChanged
        } else if raw.starts_with("object:announcement") || raw.starts_with("object:notification") {
            EventKind::AlertAppeared
        } else if raw.starts_with("object:children-changed") {
            EventKind::ChildrenChanged
        } else {
            EventKind::Other(raw.to_string())
        }
    }

    /// Kinds that may become announcements
    pub fn is_live_change(&self) -> bool {
        matches!(self, EventKind::ContentChanged | EventKind::AlertAppeared)
    }
}

/// Event after ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveEvent {
    pub kind: EventKind,
    pub source: NodeId,
    pub payload: String,
}

impl LiveEvent {
    pub fn new(kind: EventKind, source: NodeId, payload: impl Into<String>) -> Self {
        Self {
            kind,
            source,
            payload: payload.into(),
        }
    }

    /// Text to announce for this event, or `None` if there is nothing to say.
    ///
    /// Atomic containers are read whole. Otherwise the inserted text is used
    /// with embedded object characters removed. The node name is prepended
    /// when it adds something.
    pub fn announcement_text(&self, tree: &dyn AccessibleTree) -> Option<String> {
        let content = match tree.atomic_text(self.source) {
            Some(text) => text,
            None => self
                .payload
                .chars()
                .filter(|c| *c != EMBEDDED_OBJECT_CHAR)
                .collect(),
        };

        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let name = tree.name(self.source).unwrap_or_default();
        let name = name.trim();
        if !name.is_empty() && name != content {
            Some(format!("{}. {}", name, content))
        } else {
            Some(content.to_string())
        }
    }
}

impl From<RawEvent> for LiveEvent {
    fn from(raw: RawEvent) -> Self {
        Self {
            kind: EventKind::decode(&raw.kind),
            source: raw.source,
            payload: raw.payload,
        }
    }
}
