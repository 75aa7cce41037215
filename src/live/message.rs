//! Live announcement message

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::tree::NodeId;
use super::urgency::Urgency;

/// Two messages with equal text closer than this are one announcement
pub const DUPLICATE_WINDOW_MS: i64 = 250;

/// A pending announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveMessage {
    /// Text to present
    pub text: String,
    /// Requested urgency
    pub urgency: Urgency,
    /// Originating node (identity only)
    pub source: NodeId,
    /// Arrival time
    pub timestamp: DateTime<Utc>,
}

impl LiveMessage {
    /// Create a message stamped with the current time
    pub fn new(text: impl Into<String>, urgency: Urgency, source: NodeId) -> Self {
        Self {
            text: text.into(),
            urgency,
            source,
            timestamp: Utc::now(),
        }
    }

    /// Override the arrival time
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Queue order: more urgent first, then older first
    pub fn priority_cmp(&self, other: &LiveMessage) -> Ordering {
        self.urgency
            .priority()
            .cmp(&other.urgency.priority())
            .then_with(|| self.timestamp.cmp(&other.timestamp))
    }

    /// Same text within the duplicate window. Source is not compared.
    pub fn is_duplicate_of(&self, other: Option<&LiveMessage>) -> bool {
        let Some(other) = other else {
            return false;
        };
        if self.text != other.text {
            return false;
        }
        let window = Duration::milliseconds(DUPLICATE_WINDOW_MS);
        let delta = self.timestamp - other.timestamp;
        delta <= window && delta >= -window
    }

    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now - self.timestamp
    }
}
