//! Replay harness - drives a `Scheduler` from a JSONL script
//!
//! One step per line; blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! {"type": "node", "id": 1, "is_document": true}
//! {"type": "node", "id": 2, "parent": 1, "live": "normal", "name": "Chat"}
//! {"type": "active_document", "id": 1}
//! {"type": "event", "kind": "object:text-changed:insert", "source": 2, "payload": "hi"}
//! {"type": "command", "name": "present_previous"}
//! {"type": "wait", "ms": 500}
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::live::{EventOutcome, LiveEvent, NodeId, NodeInfo, RawEvent, Scheduler, StaticTree};

/// One script step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Create or replace a node
    Node {
        id: NodeId,
        #[serde(flatten)]
        info: NodeInfo,
    },
    Destroy {
        id: NodeId,
    },
    Focus {
        #[serde(default)]
        id: Option<NodeId>,
    },
    ActiveDocument {
        #[serde(default)]
        id: Option<NodeId>,
    },
    Event {
        kind: String,
        source: NodeId,
        #[serde(default)]
        payload: String,
    },
    Command {
        name: ReplayCommand,
    },
    Suspend {
        suspended: bool,
        #[serde(default)]
        reason: String,
    },
    /// Let time pass; ticks keep running
    Wait {
        ms: u64,
    },
}

/// User commands available to scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayCommand {
    ToggleMonitoring,
    PresentPrevious,
    PresentNext,
    AdvanceUrgencyThreshold,
    AdvanceSourceUrgency,
    ToggleOutputMuting,
    GoLastLiveRegion,
    Flush,
    Reset,
}

impl ReplayCommand {
    fn apply(self, scheduler: &mut Scheduler, tree: &StaticTree) -> bool {
        match self {
            ReplayCommand::ToggleMonitoring => scheduler.toggle_monitoring(),
            ReplayCommand::PresentPrevious => scheduler.present_previous(),
            ReplayCommand::PresentNext => scheduler.present_next(),
            ReplayCommand::AdvanceUrgencyThreshold => scheduler.advance_urgency_threshold(),
            ReplayCommand::AdvanceSourceUrgency => scheduler.advance_source_urgency(tree),
            ReplayCommand::ToggleOutputMuting => scheduler.toggle_output_muting(),
            ReplayCommand::GoLastLiveRegion => scheduler.go_last_live_region(tree),
            ReplayCommand::Flush => {
                scheduler.flush();
                true
            }
            ReplayCommand::Reset => {
                scheduler.reset();
                true
            }
        }
    }
}

/// Counters for a finished replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub steps: usize,
    pub events: usize,
    pub queued: usize,
    pub duplicates: usize,
    pub rejected: usize,
    pub commands: usize,
    pub commands_handled: usize,
    pub still_pending: usize,
}

/// Parse a script
pub fn parse_script(content: &str) -> Result<Vec<ReplayStep>> {
    let mut steps = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step: ReplayStep = serde_json::from_str(line)
            .with_context(|| format!("Invalid replay step on line {}", idx + 1))?;
        steps.push(step);
    }
    Ok(steps)
}

/// Read and parse a script file
pub fn load_script(path: &Path) -> Result<Vec<ReplayStep>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read replay script {}", path.display()))?;
    parse_script(&content)
}

/// Run `steps` against `scheduler`. Output channels are treated as
/// synchronous: every step is followed by `drain`.
pub async fn run(steps: Vec<ReplayStep>, scheduler: &mut Scheduler, tree: &mut StaticTree) -> ReplaySummary {
    let mut ticker = tokio::time::interval(scheduler.config().tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut summary = ReplaySummary::default();
    for step in steps {
        summary.steps += 1;
        match step {
            ReplayStep::Node { id, info } => tree.insert(id, info),
            ReplayStep::Destroy { id } => tree.destroy(id),
            ReplayStep::Focus { id } => tree.set_focus(id),
            ReplayStep::ActiveDocument { id } => tree.set_active_document(id),
            ReplayStep::Event { kind, source, payload } => {
                summary.events += 1;
                let event = LiveEvent::from(RawEvent { kind, source, payload });
                match scheduler.handle_event(&*tree, event) {
                    EventOutcome::Queued { .. } => summary.queued += 1,
                    EventOutcome::Duplicate => summary.duplicates += 1,
                    outcome => {
                        debug!(outcome = ?outcome, "Replay event not queued");
                        summary.rejected += 1;
                    }
                }
            }
            ReplayStep::Command { name } => {
                summary.commands += 1;
                if name.apply(scheduler, tree) {
                    summary.commands_handled += 1;
                }
            }
            ReplayStep::Suspend { suspended, reason } => scheduler.suspend(suspended, &reason),
            ReplayStep::Wait { ms } => {
                let deadline = tokio::time::sleep(Duration::from_millis(ms));
                tokio::pin!(deadline);
                loop {
                    tokio::select! {
                        _ = &mut deadline => break,
                        _ = ticker.tick() => {
                            scheduler.tick();
                            scheduler.drain();
                        }
                    }
                }
            }
        }
        scheduler.drain();
    }

    summary.still_pending = scheduler.queue().len();
    info!(
        steps = summary.steps,
        queued = summary.queued,
        pending = summary.still_pending,
        "Replay finished"
    );
    summary
}
