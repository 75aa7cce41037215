//! Live event classification
//!
//! Decides whether an event may become an announcement. Pure: nothing is
//! mutated and nothing is enqueued here. Checks run cheapest first.

use tracing::debug;

use super::event::{EventKind, LiveEvent};
use super::tree::{AccessibleTree, NodeId};

/// State the classifier needs from the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyContext {
    pub monitoring_enabled: bool,
    pub suspended: bool,
    pub present_from_inactive_tab: bool,
}

/// Why an event was not presentable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    UnsupportedKind(EventKind),
    MonitoringDisabled,
    Suspended,
    DeadSource,
    NotLive,
    /// Source belongs to a document that is not the active one
    BackgroundDocument { document: NodeId, active: NodeId },
    /// Source is the focused node of an alert; the alert presents it
    FocusedInAlert { alert: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Presentable,
    Rejected(RejectReason),
}

impl Classification {
    pub fn is_presentable(&self) -> bool {
        matches!(self, Classification::Presentable)
    }
}

pub fn classify(event: &LiveEvent, ctx: &ClassifyContext, tree: &dyn AccessibleTree) -> Classification {
    use Classification::Rejected;

    if !event.kind.is_live_change() {
        return Rejected(RejectReason::UnsupportedKind(event.kind.clone()));
    }

    if !ctx.monitoring_enabled {
        return Rejected(RejectReason::MonitoringDisabled);
    }
    if ctx.suspended {
        return Rejected(RejectReason::Suspended);
    }

    let source = event.source;
    if !tree.is_alive(source) {
        return Rejected(RejectReason::DeadSource);
    }
    if tree.live_marker(source).is_none() {
        return Rejected(RejectReason::NotLive);
    }

    if !ctx.present_from_inactive_tab {
        if let (Some(document), Some(active)) = (tree.document_of(source), tree.active_document()) {
            if document != active {
                return Rejected(RejectReason::BackgroundDocument { document, active });
            }
        }
    }

    if let Some(alert) = tree.alert_ancestor(source) {
        if tree.focused() == Some(source) {
            return Rejected(RejectReason::FocusedInAlert { alert });
        }
    }

    Classification::Presentable
}

/// Whether `event` may become an announcement
pub fn is_presentable(event: &LiveEvent, ctx: &ClassifyContext, tree: &dyn AccessibleTree) -> bool {
    let verdict = classify(event, ctx, tree);
    if let Classification::Rejected(reason) = &verdict {
        debug!(source = %event.source, reason = ?reason, "Live event not presentable");
    }
    verdict.is_presentable()
}
