//! Live region presentation - decides which live content changes are
//! announced, when, and in what order
//!
//! # Flow
//! 1. `RawEvent` is decoded once into a `LiveEvent`
//! 2. `classifier` decides whether it may be announced
//! 3. Accepted events become a `LiveMessage` in the `MessageQueue`
//! 4. `Scheduler` pops the queue and hands text to every `OutputChannel`
//!
//! # Example
//! ```ignore
//! use live_region_monitor::live::{Scheduler, SpeechChannel};
//!
//! let mut scheduler = Scheduler::new(config, Box::new(MemorySettings::default()));
//! scheduler.register_channel(Arc::new(SpeechChannel::stdout()));
//! scheduler.handle_event(&tree, raw_event.into());
//! ```

pub mod channel;
pub mod channels;
pub mod classifier;
pub mod event;
pub mod history;
pub mod message;
pub mod queue;
pub mod scheduler;
pub mod status;
pub mod tree;
pub mod urgency;

pub use channel::OutputChannel;
pub use channels::{BrailleChannel, SpeechChannel};
pub use classifier::{classify, is_presentable, Classification, ClassifyContext, RejectReason};
pub use event::{EventKind, LiveEvent, RawEvent};
pub use history::{Edge, History, HistoryId, HistoryStep};
pub use message::{LiveMessage, DUPLICATE_WINDOW_MS};
pub use queue::{Admission, MessageQueue, MSG_KEEPALIVE_SECS, QUEUE_SIZE};
pub use scheduler::{EventOutcome, Scheduler, SchedulerState};
pub use tree::{AccessibleTree, NodeId, NodeInfo, StaticTree};
pub use urgency::Urgency;
