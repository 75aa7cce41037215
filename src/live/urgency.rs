//! Urgency classification for live announcements
//!
//! The urgency level decides how an announcement competes for the output:
//! - MOST_URGENT: interrupts, jumps ahead of everything queued
//! - NORMAL: waits politely for its turn
//! - SILENT: never announced
//!
//! Unknown markers map to SILENT. Under-announcing is the safe failure.

use serde::{Deserialize, Serialize};

/// Urgency level for live announcements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    MostUrgent,
    Normal,
    Silent,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Silent
    }
}

impl Urgency {
    pub const ALL: [Urgency; 3] = [Urgency::MostUrgent, Urgency::Normal, Urgency::Silent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::MostUrgent => "most_urgent",
            Urgency::Normal => "normal",
            Urgency::Silent => "silent",
        }
    }

    /// Ordinal used for ordering; MOST_URGENT is 0
    pub fn priority(&self) -> u8 {
        match self {
            Urgency::MostUrgent => 0,
            Urgency::Normal => 1,
            Urgency::Silent => 2,
        }
    }

    /// Parse a canonical name. Case-sensitive; anything else is `Silent`.
    pub fn from_string(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Urgency::Silent;
        };

        Self::ALL
            .into_iter()
            .find(|u| u.as_str() == value)
            .unwrap_or(Urgency::Silent)
    }

    pub fn is_more_urgent_than(&self, other: Urgency) -> bool {
        self.priority() < other.priority()
    }

    /// Next level in the user-facing cycle: silent -> normal -> most_urgent -> silent
    pub fn next_level(&self) -> Self {
        match self {
            Urgency::Silent => Urgency::Normal,
            Urgency::Normal => Urgency::MostUrgent,
            Urgency::MostUrgent => Urgency::Silent,
        }
    }
}
