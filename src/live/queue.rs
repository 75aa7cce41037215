//! Live message queue - bounded priority queue plus replay history
//!
//! ## Admission
//! 1. Compare against the most recently admitted message only (O(1)).
//!    An identical message further back in the queue is not checked.
//! 2. Insert, record in history.
//! 3. Over capacity: evict the least urgent level, oldest entry first.
//!
//! ## Purging
//! - keep-alive: stale entries are dropped before they can be spoken late
//! - priority: drop everything at or below a threshold

use chrono::{DateTime, TimeDelta, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tracing::{debug, warn};

use super::history::{History, HistoryId};
use super::message::LiveMessage;
use super::tree::NodeId;
use super::urgency::Urgency;

/// Default capacity of the pending queue and the history ring
pub const QUEUE_SIZE: usize = 9;

/// Seconds a message may wait before it is discarded
pub const MSG_KEEPALIVE_SECS: u64 = 45;

/// Result of `enqueue`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Admitted; `evicted` entries were dropped to stay within bounds
    Queued { evicted: usize },
    /// Dropped as a duplicate of the last admitted message
    Duplicate,
}

/// Queue entry. The admission sequence breaks ties so equal keys stay FIFO.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    seq: HistoryId,
    message: LiveMessage,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.message
            .priority_cmp(&other.message)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pending announcements, history and per-source urgency overrides
#[derive(Debug)]
pub struct MessageQueue {
    pending: BTreeSet<Pending>,
    max_size: usize,
    keep_alive: TimeDelta,
    next_seq: HistoryId,
    last_admitted: Option<LiveMessage>,
    history: History,
    overrides: HashMap<NodeId, Urgency>,
}

impl MessageQueue {
    pub fn new(max_size: usize) -> Self {
        Self {
            pending: BTreeSet::new(),
            max_size: max_size.max(1),
            keep_alive: TimeDelta::seconds(MSG_KEEPALIVE_SECS as i64),
            next_seq: 0,
            last_admitted: None,
            history: History::new(QUEUE_SIZE),
            overrides: HashMap::new(),
        }
    }

    /// Set the keep-alive window. Values beyond what a timestamp delta can
    /// hold are clamped to the largest delta.
    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = TimeDelta::from_std(keep_alive).unwrap_or_else(|_| {
            warn!(secs = keep_alive.as_secs(), "Keep-alive out of range, clamping");
            TimeDelta::MAX
        });
        self
    }

    /// Set the history capacity. Existing history is discarded.
    pub fn with_history_size(mut self, size: usize) -> Self {
        self.history = History::new(size);
        self
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn keep_alive(&self) -> TimeDelta {
        self.keep_alive
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Admit a message
    pub fn enqueue(&mut self, message: LiveMessage) -> Admission {
        if message.is_duplicate_of(self.last_admitted.as_ref()) {
            debug!(text = %message.text, "Ignoring duplicate live message");
            return Admission::Duplicate;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        self.history.push(seq, message.text.clone());
        self.last_admitted = Some(message.clone());
        self.pending.insert(Pending { seq, message });

        let mut evicted = 0;
        while self.pending.len() > self.max_size {
            if self.evict_one().is_none() {
                break;
            }
            evicted += 1;
        }

        if evicted > 0 {
            debug!(evicted, pending = self.pending.len(), "Live queue over capacity");
        }

        Admission::Queued { evicted }
    }

    /// Drop the oldest entry of the least urgent level present
    fn evict_one(&mut self) -> Option<LiveMessage> {
        let worst = self.pending.last()?.message.urgency;
        let victim = self
            .pending
            .iter()
            .find(|p| p.message.urgency == worst)
            .cloned()?;
        self.pending.remove(&victim);
        Some(victim.message)
    }

    /// Highest priority message, or `None` when nothing is pending
    pub fn dequeue(&mut self) -> Option<LiveMessage> {
        self.dequeue_with_id().map(|(_, message)| message)
    }

    /// Like `dequeue`, also returning the history id of the message
    pub fn dequeue_with_id(&mut self) -> Option<(HistoryId, LiveMessage)> {
        self.pending.pop_first().map(|p| (p.seq, p.message))
    }

    /// Drop pending messages. History is kept.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Drop messages older than the keep-alive window
    pub fn purge_by_keep_alive(&mut self) -> usize {
        self.purge_by_keep_alive_at(Utc::now())
    }

    /// Keep-alive purge against an explicit clock (used for testing)
    pub fn purge_by_keep_alive_at(&mut self, now: DateTime<Utc>) -> usize {
        let keep_alive = self.keep_alive;
        let before = self.pending.len();
        self.pending.retain(|p| p.message.age_at(now) <= keep_alive);

        let purged = before - self.pending.len();
        if purged > 0 {
            debug!(purged, pending = self.pending.len(), "Purged stale live messages");
        }
        purged
    }

    /// Drop messages at or below `threshold`; strictly more urgent ones stay
    pub fn purge_by_priority(&mut self, threshold: Urgency) -> usize {
        let before = self.pending.len();
        self.pending
            .retain(|p| p.message.urgency.is_more_urgent_than(threshold));

        let purged = before - self.pending.len();
        if purged > 0 {
            debug!(purged, threshold = %threshold, "Purged live messages by urgency");
        }
        purged
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn set_override(&mut self, node: NodeId, urgency: Urgency) {
        self.overrides.insert(node, urgency);
    }

    pub fn override_for(&self, node: NodeId) -> Option<Urgency> {
        self.overrides.get(&node).copied()
    }

    /// Forget per-source overrides (profile or settings change)
    pub fn reset(&mut self) {
        self.overrides.clear();
    }
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new(QUEUE_SIZE)
    }
}
