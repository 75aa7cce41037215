//! Live Region Monitor - schedules asynchronous content changes for speech
//! and braille output

pub mod config;
pub mod live;
pub mod replay;
pub mod settings;

pub use config::LiveRegionConfig;
pub use live::{
    AccessibleTree, EventOutcome, LiveEvent, LiveMessage, MessageQueue, NodeId, OutputChannel,
    RawEvent, Scheduler, SchedulerState, StaticTree, Urgency,
};
pub use replay::{ReplayStep, ReplaySummary};
pub use settings::{MemorySettings, SettingsStore};
