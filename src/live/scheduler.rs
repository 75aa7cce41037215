//! Live region scheduler - the single consumer of the message queue
//!
//! # States
//! - `Idle`: nothing in flight
//! - `Presenting`: one message handed to the output channels, waiting for
//!   `presentation_finished`
//! - `Suspended`: an unrelated interaction owns the output; admission goes
//!   on, presentation waits
//!
//! Each completion dispatches at most one message, so a backlog of any size
//! is worked off by the host calling back (or by `drain`) rather than by
//! recursion.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::channel::OutputChannel;
use super::classifier::{self, Classification, ClassifyContext, RejectReason};
use super::event::LiveEvent;
use super::history::{Edge, HistoryStep};
use super::message::LiveMessage;
use super::queue::{Admission, MessageQueue};
use super::status;
use super::tree::{AccessibleTree, NodeId};
use super::urgency::Urgency;
use crate::config::LiveRegionConfig;
use crate::settings::SettingsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Presenting,
    Suspended,
}

/// What happened to an inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Rejected(RejectReason),
    /// Source resolved to `Silent`
    Silenced,
    /// Not more urgent than the user's cutoff
    BelowThreshold,
    /// No text to announce
    Empty,
    Duplicate,
    Queued { evicted: usize },
}

pub struct Scheduler {
    queue: MessageQueue,
    config: LiveRegionConfig,
    settings: Box<dyn SettingsStore>,
    channels: Vec<Arc<dyn OutputChannel>>,
    state: SchedulerState,
    muted: bool,
    /// Messages must be strictly more urgent than this to be announced
    cutoff: Urgency,
    last_presented: Option<LiveMessage>,
}

impl Scheduler {
    pub fn new(config: LiveRegionConfig, settings: Box<dyn SettingsStore>) -> Self {
        let queue = MessageQueue::new(config.queue_size)
            .with_keep_alive(config.keep_alive())
            .with_history_size(config.history_size);

        Self {
            queue,
            config,
            settings,
            channels: Vec::new(),
            state: SchedulerState::Idle,
            muted: false,
            cutoff: Urgency::Silent,
            last_presented: None,
        }
    }

    pub fn register_channel(&mut self, channel: Arc<dyn OutputChannel>) {
        info!(channel = channel.name(), "Registering live region output");
        self.channels.push(channel);
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    pub fn config(&self) -> &LiveRegionConfig {
        &self.config
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.settings.live_regions_enabled()
    }

    pub fn is_suspended(&self) -> bool {
        self.state == SchedulerState::Suspended
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn urgency_cutoff(&self) -> Urgency {
        self.cutoff
    }

    pub fn last_presented(&self) -> Option<&LiveMessage> {
        self.last_presented.as_ref()
    }

    fn classify_context(&self) -> ClassifyContext {
        ClassifyContext {
            monitoring_enabled: self.monitoring_enabled(),
            suspended: self.is_suspended() && !self.config.queue_while_suspended,
            present_from_inactive_tab: self.config.present_from_inactive_tab,
        }
    }

    /// Override if set, otherwise the tree's live marker
    pub fn urgency_for(&self, tree: &dyn AccessibleTree, node: NodeId) -> Urgency {
        self.queue
            .override_for(node)
            .unwrap_or_else(|| Urgency::from_string(tree.live_marker(node).as_deref()))
    }

    // ==================== admission ====================

    /// Classify an event and admit it as a message
    pub fn handle_event(&mut self, tree: &dyn AccessibleTree, event: LiveEvent) -> EventOutcome {
        if let Classification::Rejected(reason) = classifier::classify(&event, &self.classify_context(), tree) {
            debug!(source = %event.source, reason = ?reason, "Ignoring live event");
            return EventOutcome::Rejected(reason);
        }

        let urgency = self.urgency_for(tree, event.source);
        if urgency == Urgency::Silent {
            debug!(source = %event.source, "Live region is silent");
            return EventOutcome::Silenced;
        }
        if !urgency.is_more_urgent_than(self.cutoff) {
            debug!(source = %event.source, urgency = %urgency, cutoff = %self.cutoff, "Below urgency cutoff");
            return EventOutcome::BelowThreshold;
        }

        let Some(text) = event.announcement_text(tree) else {
            return EventOutcome::Empty;
        };

        if urgency == Urgency::MostUrgent && self.config.urgent_interrupts_normal {
            self.queue.purge_by_priority(Urgency::Normal);
        }

        let message = LiveMessage::new(text, urgency, event.source);
        match self.queue.enqueue(message) {
            Admission::Duplicate => EventOutcome::Duplicate,
            Admission::Queued { evicted } => {
                self.maybe_present();
                EventOutcome::Queued { evicted }
            }
        }
    }

    // ==================== presentation ====================

    fn dispatch(&self, text: &str) {
        for channel in &self.channels {
            if let Err(e) = channel.present(text) {
                warn!(channel = channel.name(), error = %e, "Live region output failed");
            }
        }
    }

    fn announce(&self, text: &str) {
        debug!(text, "Announcing live region status");
        self.dispatch(text);
    }

    fn maybe_present(&mut self) {
        if self.state == SchedulerState::Idle && !self.muted {
            self.present_pending();
        }
    }

    fn present_pending(&mut self) {
        self.queue.purge_by_keep_alive();
        match self.queue.dequeue_with_id() {
            Some((id, message)) => {
                debug!(
                    urgency = %message.urgency,
                    source = %message.source,
                    pending = self.queue.len(),
                    "Presenting live message"
                );
                self.dispatch(&message.text);
                self.queue.history_mut().seek(id);
                self.last_presented = Some(message);
                self.state = SchedulerState::Presenting;
            }
            None => self.state = SchedulerState::Idle,
        }
    }

    /// Output finished with the message in flight
    pub fn presentation_finished(&mut self) {
        if self.state != SchedulerState::Presenting {
            return;
        }
        self.state = SchedulerState::Idle;
        if !self.muted {
            self.present_pending();
        }
    }

    /// Complete presentations until idle. For hosts whose channels finish
    /// synchronously. Returns the number of completions.
    pub fn drain(&mut self) -> usize {
        let mut completed = 0;
        while self.state == SchedulerState::Presenting {
            self.presentation_finished();
            completed += 1;
        }
        completed
    }

    /// Periodic housekeeping
    pub fn tick(&mut self) {
        self.queue.purge_by_keep_alive();
        self.maybe_present();
    }

    /// Discard pending messages. Whatever is in flight finishes.
    ///
    /// A suspended scheduler stays `Suspended`; only `suspend(false, ..)`
    /// leaves that state. Every other state ends up `Idle`.
    pub fn flush(&mut self) {
        self.queue.clear();
        if self.state == SchedulerState::Presenting {
            self.state = SchedulerState::Idle;
        }
    }

    pub fn suspend(&mut self, suspended: bool, reason: &str) {
        if suspended == self.is_suspended() {
            return;
        }

        info!(suspended, reason, "Live region presentation suspended changed");
        if suspended {
            self.state = SchedulerState::Suspended;
            return;
        }

        self.state = SchedulerState::Idle;
        self.queue.purge_by_keep_alive();
        self.maybe_present();
    }

    /// Forget per-source overrides (profile or settings change)
    pub fn reset(&mut self) {
        info!("Resetting live region overrides");
        self.queue.reset();
    }

    // ==================== commands ====================

    fn command_allowed(&self, command: &str) -> bool {
        if self.is_suspended() {
            debug!(command, "Live region command suspended");
            return false;
        }
        if !self.monitoring_enabled() {
            self.announce(status::SUPPORT_DISABLED);
            return false;
        }
        true
    }

    /// Flip the master switch
    pub fn toggle_monitoring(&mut self) -> bool {
        if !self.monitoring_enabled() {
            self.settings.set_live_regions_enabled(true);
            info!("Live region monitoring enabled");
            self.announce(status::MONITORING_ON);
            return true;
        }

        self.settings.set_live_regions_enabled(false);
        self.flush();
        self.queue.history_mut().reset_cursor();
        info!("Live region monitoring disabled");
        self.announce(status::MONITORING_OFF);
        true
    }

    pub fn present_previous(&mut self) -> bool {
        if !self.command_allowed("present_previous") {
            return false;
        }
        let step = self.queue.history_mut().previous();
        self.present_history_step(step);
        true
    }

    pub fn present_next(&mut self) -> bool {
        if !self.command_allowed("present_next") {
            return false;
        }
        let step = self.queue.history_mut().next();
        self.present_history_step(step);
        true
    }

    fn present_history_step(&self, step: HistoryStep) {
        match step {
            HistoryStep::Empty => self.announce(status::NO_MESSAGES),
            HistoryStep::Entry(text) => self.dispatch(&text),
            HistoryStep::Boundary { edge, text } => {
                let marker = match edge {
                    Edge::Top => status::LIST_TOP,
                    Edge::Bottom => status::LIST_BOTTOM,
                };
                self.announce(marker);
                self.dispatch(&text);
            }
        }
    }

    /// Present the current contents of the region that produced the last
    /// presented message. Returns false if nothing has been presented yet.
    pub fn go_last_live_region(&mut self, tree: &dyn AccessibleTree) -> bool {
        let Some(last) = self.last_presented.as_ref() else {
            debug!("No last presented live region message");
            return false;
        };
        let source = last.source;
        let fallback = last.text.clone();

        if !self.command_allowed("go_last_live_region") {
            return false;
        }
        if !tree.is_alive(source) {
            debug!(source = %source, "Last live region is gone");
            return false;
        }

        let text = tree
            .atomic_text(source)
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(fallback);
        info!(source = %source, "Returning to last live region");
        self.dispatch(&text);
        true
    }

    /// Cycle the cutoff and drop pending messages it no longer lets through
    pub fn advance_urgency_threshold(&mut self) -> bool {
        if !self.command_allowed("advance_urgency_threshold") {
            return false;
        }

        self.cutoff = self.cutoff.next_level();
        let purged = self.queue.purge_by_priority(self.cutoff);
        info!(cutoff = %self.cutoff, purged, "Live region urgency cutoff changed");
        self.announce(status::threshold_changed(self.cutoff));
        true
    }

    /// Cycle the urgency override of the focused region
    pub fn advance_source_urgency(&mut self, tree: &dyn AccessibleTree) -> bool {
        if !self.command_allowed("advance_source_urgency") {
            return false;
        }

        let Some(node) = tree.focused() else {
            debug!("No focused node for urgency override");
            return false;
        };

        let next = self.urgency_for(tree, node).next_level();
        self.queue.set_override(node, next);
        info!(node = %node, urgency = %next, "Live region urgency override");
        self.announce(status::source_level(next));
        true
    }

    /// Stop or resume live output without touching monitoring or admission
    pub fn toggle_output_muting(&mut self) -> bool {
        if !self.command_allowed("toggle_output_muting") {
            return false;
        }

        self.muted = !self.muted;
        info!(muted = self.muted, "Live region output muting changed");
        if self.muted {
            self.announce(status::OUTPUT_MUTED);
            return true;
        }

        self.announce(status::OUTPUT_RESTORED);
        self.queue.purge_by_keep_alive();
        self.maybe_present();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::event::EventKind;
    use crate::live::tree::{NodeInfo, StaticTree};
    use crate::settings::MemorySettings;
    use anyhow::Result;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingChannel {
        presented: Mutex<Vec<String>>,
    }

    impl RecordingChannel {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.presented.lock().unwrap())
        }
    }

    impl OutputChannel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }

        fn present(&self, text: &str) -> Result<()> {
            self.presented.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct FailingChannel;

    impl OutputChannel for FailingChannel {
        fn name(&self) -> &str {
            "failing"
        }

        fn present(&self, _text: &str) -> Result<()> {
            anyhow::bail!("synthesizer gone")
        }
    }

    fn tree() -> StaticTree {
        let mut tree = StaticTree::new();
        tree.insert(
            NodeId(1),
            NodeInfo {
                live: Some("normal".to_string()),
                ..Default::default()
            },
        );
        tree.insert(
            NodeId(2),
            NodeInfo {
                live: Some("most_urgent".to_string()),
                ..Default::default()
            },
        );
        tree.insert(
            NodeId(3),
            NodeInfo {
                live: Some("off".to_string()),
                ..Default::default()
            },
        );
        tree
    }

    fn setup() -> (Scheduler, Arc<RecordingChannel>) {
        let mut scheduler = Scheduler::new(
            LiveRegionConfig::default(),
            Box::new(MemorySettings::default()),
        );
        let channel = Arc::new(RecordingChannel::default());
        scheduler.register_channel(channel.clone());
        (scheduler, channel)
    }

    fn insert(source: u64, text: &str) -> LiveEvent {
        LiveEvent::new(EventKind::ContentChanged, NodeId(source), text)
    }

    #[test]
    fn test_idle_event_presented_immediately() {
        let (mut scheduler, channel) = setup();
        let tree = tree();

        let outcome = scheduler.handle_event(&tree, insert(1, "hello"));
        assert_eq!(outcome, EventOutcome::Queued { evicted: 0 });
        assert_eq!(scheduler.state(), SchedulerState::Presenting);
        assert_eq!(channel.take(), vec!["hello"]);

        scheduler.presentation_finished();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_backlog_presented_in_priority_order() {
        let mut config = LiveRegionConfig::default();
        config.urgent_interrupts_normal = false;
        let mut scheduler = Scheduler::new(config, Box::new(MemorySettings::default()));
        let channel = Arc::new(RecordingChannel::default());
        scheduler.register_channel(channel.clone());
        let tree = tree();

        scheduler.handle_event(&tree, insert(1, "first"));
        scheduler.handle_event(&tree, insert(1, "polite"));
        scheduler.handle_event(&tree, insert(2, "urgent"));
        assert_eq!(scheduler.queue().len(), 2);

        assert_eq!(scheduler.drain(), 3);
        assert_eq!(channel.take(), vec!["first", "urgent", "polite"]);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_urgent_arrival_purges_pending_normal() {
        let (mut scheduler, channel) = setup();
        let tree = tree();

        scheduler.handle_event(&tree, insert(1, "first"));
        scheduler.handle_event(&tree, insert(1, "polite"));
        scheduler.handle_event(&tree, insert(2, "urgent"));
        scheduler.drain();
        assert_eq!(channel.take(), vec!["first", "urgent"]);
    }

    #[test]
    fn test_silent_and_rejected_events() {
        let (mut scheduler, channel) = setup();
        let tree = tree();

        assert_eq!(scheduler.handle_event(&tree, insert(3, "x")), EventOutcome::Silenced);
        assert_eq!(
            scheduler.handle_event(&tree, insert(99, "x")),
            EventOutcome::Rejected(RejectReason::DeadSource)
        );
        assert_eq!(scheduler.handle_event(&tree, insert(1, "   ")), EventOutcome::Empty);
        assert!(channel.take().is_empty());
    }

    #[test]
    fn test_duplicate_burst_presented_once() {
        let (mut scheduler, channel) = setup();
        let tree = tree();

        scheduler.handle_event(&tree, insert(1, "Saved"));
        assert_eq!(scheduler.handle_event(&tree, insert(1, "Saved")), EventOutcome::Duplicate);
        scheduler.drain();
        assert_eq!(channel.take(), vec!["Saved"]);
    }

    #[test]
    fn test_failing_channel_does_not_stall() {
        let (mut scheduler, channel) = setup();
        scheduler.register_channel(Arc::new(FailingChannel));
        let tree = tree();

        scheduler.handle_event(&tree, insert(1, "a"));
        scheduler.handle_event(&tree, insert(1, "b"));
        scheduler.drain();
        assert_eq!(channel.take(), vec!["a", "b"]);
        assert!(scheduler.queue().is_empty());
    }

    #[test]
    fn test_toggle_monitoring_twice() {
        let (mut scheduler, channel) = setup();
        assert!(scheduler.monitoring_enabled());

        assert!(scheduler.toggle_monitoring());
        assert!(!scheduler.monitoring_enabled());
        assert!(scheduler.toggle_monitoring());
        assert!(scheduler.monitoring_enabled());

        assert_eq!(
            channel.take(),
            vec![status::MONITORING_OFF, status::MONITORING_ON]
        );
    }

    #[test]
    fn test_monitoring_off_rejects_and_flushes() {
        let (mut scheduler, _channel) = setup();
        let tree = tree();

        scheduler.handle_event(&tree, insert(1, "in flight"));
        scheduler.handle_event(&tree, insert(1, "pending"));
        assert_eq!(scheduler.queue().len(), 1);

        scheduler.toggle_monitoring();
        assert!(scheduler.queue().is_empty());
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(
            scheduler.handle_event(&tree, insert(1, "later")),
            EventOutcome::Rejected(RejectReason::MonitoringDisabled)
        );
    }

    #[test]
    fn test_present_previous_on_empty_history() {
        let (mut scheduler, channel) = setup();
        assert!(scheduler.present_previous());
        assert_eq!(channel.take(), vec![status::NO_MESSAGES]);
        assert!(scheduler.present_next());
        assert_eq!(channel.take(), vec![status::NO_MESSAGES]);
    }

    #[test]
    fn test_history_browse_after_presentation() {
        let (mut scheduler, channel) = setup();
        let tree = tree();

        for text in ["one", "two", "three"] {
            scheduler.handle_event(&tree, insert(1, text));
            scheduler.drain();
        }
        channel.take();

        // cursor sits on the last presented message
        assert!(scheduler.present_previous());
        assert!(scheduler.present_previous());
        assert!(scheduler.present_previous());
        assert!(scheduler.present_next());
        assert_eq!(
            channel.take(),
            vec!["two", "one", status::LIST_TOP, "one", "two"]
        );
    }

    #[test]
    fn test_commands_need_monitoring() {
        let (mut scheduler, channel) = setup();
        scheduler.toggle_monitoring();
        channel.take();

        assert!(!scheduler.present_previous());
        assert!(!scheduler.advance_urgency_threshold());
        assert!(!scheduler.toggle_output_muting());
        assert_eq!(channel.take(), vec![status::SUPPORT_DISABLED; 3]);
    }

    #[test]
    fn test_commands_ignored_while_suspended() {
        let (mut scheduler, channel) = setup();
        scheduler.suspend(true, "focus mode");
        assert!(!scheduler.present_previous());
        assert!(channel.take().is_empty());
        // the master switch still works
        assert!(scheduler.toggle_monitoring());
    }

    #[test]
    fn test_suspend_holds_presentation() {
        let (mut scheduler, channel) = setup();
        let tree = tree();

        scheduler.suspend(true, "focus mode");
        assert_eq!(scheduler.state(), SchedulerState::Suspended);
        scheduler.handle_event(&tree, insert(1, "a"));
        scheduler.handle_event(&tree, insert(1, "b"));
        scheduler.tick();
        assert!(channel.take().is_empty());
        assert_eq!(scheduler.queue().len(), 2);

        scheduler.suspend(false, "focus mode done");
        scheduler.drain();
        assert_eq!(channel.take(), vec!["a", "b"]);
    }

    #[test]
    fn test_suspend_can_reject_admission() {
        let mut config = LiveRegionConfig::default();
        config.queue_while_suspended = false;
        let mut scheduler = Scheduler::new(config, Box::new(MemorySettings::default()));
        let tree = tree();

        scheduler.suspend(true, "focus mode");
        assert_eq!(
            scheduler.handle_event(&tree, insert(1, "a")),
            EventOutcome::Rejected(RejectReason::Suspended)
        );
    }

    #[test]
    fn test_flush_keeps_history() {
        let (mut scheduler, channel) = setup();
        let tree = tree();

        scheduler.handle_event(&tree, insert(1, "a"));
        scheduler.handle_event(&tree, insert(1, "b"));
        scheduler.flush();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(scheduler.queue().is_empty());
        assert_eq!(scheduler.queue().history().len(), 2);
        assert_eq!(channel.take(), vec!["a"]);
    }

    #[test]
    fn test_advance_urgency_threshold() {
        let (mut scheduler, channel) = setup();
        let tree = tree();

        scheduler.suspend(true, "hold");
        scheduler.handle_event(&tree, insert(1, "polite"));
        scheduler.suspend(false, "hold");
        scheduler.drain();
        channel.take();

        assert!(scheduler.advance_urgency_threshold());
        assert_eq!(scheduler.urgency_cutoff(), Urgency::Normal);
        assert_eq!(
            scheduler.handle_event(&tree, insert(1, "ignored")),
            EventOutcome::BelowThreshold
        );
        assert_eq!(
            scheduler.handle_event(&tree, insert(2, "urgent")),
            EventOutcome::Queued { evicted: 0 }
        );

        scheduler.advance_urgency_threshold();
        assert_eq!(scheduler.urgency_cutoff(), Urgency::MostUrgent);
        scheduler.advance_urgency_threshold();
        assert_eq!(scheduler.urgency_cutoff(), Urgency::Silent);
    }

    #[test]
    fn test_threshold_purges_pending() {
        let (mut scheduler, _channel) = setup();
        let tree = tree();

        scheduler.handle_event(&tree, insert(1, "in flight"));
        scheduler.handle_event(&tree, insert(1, "pending"));
        assert_eq!(scheduler.queue().len(), 1);

        scheduler.advance_urgency_threshold();
        assert!(scheduler.queue().is_empty());
    }

    #[test]
    fn test_output_muting_accumulates() {
        let (mut scheduler, channel) = setup();
        let tree = tree();

        assert!(scheduler.toggle_output_muting());
        assert_eq!(channel.take(), vec![status::OUTPUT_MUTED]);

        scheduler.handle_event(&tree, insert(1, "a"));
        scheduler.handle_event(&tree, insert(1, "b"));
        assert_eq!(scheduler.queue().len(), 2);
        assert!(channel.take().is_empty());
        assert!(scheduler.monitoring_enabled());

        assert!(scheduler.toggle_output_muting());
        scheduler.drain();
        assert_eq!(channel.take(), vec![status::OUTPUT_RESTORED, "a", "b"]);
    }

    #[test]
    fn test_advance_source_urgency() {
        let (mut scheduler, channel) = setup();
        let mut tree = tree();
        tree.set_focus(Some(NodeId(3)));

        // silent -> normal
        assert!(scheduler.advance_source_urgency(&tree));
        assert_eq!(channel.take(), vec![status::source_level(Urgency::Normal)]);
        assert_eq!(
            scheduler.handle_event(&tree, insert(3, "now audible")),
            EventOutcome::Queued { evicted: 0 }
        );

        scheduler.reset();
        scheduler.drain();
        assert_eq!(scheduler.handle_event(&tree, insert(3, "silent again")), EventOutcome::Silenced);
    }

    #[test]
    fn test_advance_source_urgency_without_focus() {
        let (mut scheduler, channel) = setup();
        let tree = tree();
        assert!(!scheduler.advance_source_urgency(&tree));
        assert!(channel.take().is_empty());
    }

    fn stale_setup() -> (Scheduler, Arc<RecordingChannel>) {
        let mut config = LiveRegionConfig::default();
        config.keep_alive_secs = 0;
        let mut scheduler = Scheduler::new(config, Box::new(MemorySettings::default()));
        let channel = Arc::new(RecordingChannel::default());
        scheduler.register_channel(channel.clone());
        (scheduler, channel)
    }

    #[test]
    fn test_resume_purges_stale_backlog() {
        let (mut scheduler, channel) = stale_setup();
        let tree = tree();

        scheduler.suspend(true, "focus mode");
        scheduler.handle_event(&tree, insert(1, "old news"));
        assert_eq!(scheduler.queue().len(), 1);
        std::thread::sleep(std::time::Duration::from_millis(20));

        scheduler.suspend(false, "focus mode done");
        scheduler.drain();
        assert!(channel.take().is_empty());
        assert!(scheduler.queue().is_empty());
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_tick_purges_stale_muted_backlog() {
        let (mut scheduler, channel) = stale_setup();
        let tree = tree();

        scheduler.toggle_output_muting();
        channel.take();
        scheduler.handle_event(&tree, insert(1, "old news"));
        assert_eq!(scheduler.queue().len(), 1);
        std::thread::sleep(std::time::Duration::from_millis(20));

        scheduler.tick();
        assert!(scheduler.queue().is_empty());
        assert!(channel.take().is_empty());
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_flush_while_suspended_stays_suspended() {
        let (mut scheduler, channel) = setup();
        let tree = tree();

        scheduler.suspend(true, "menu");
        scheduler.handle_event(&tree, insert(1, "a"));
        scheduler.flush();
        assert_eq!(scheduler.state(), SchedulerState::Suspended);
        assert!(scheduler.queue().is_empty());

        scheduler.suspend(false, "menu closed");
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(channel.take().is_empty());
    }

    #[test]
    fn test_go_last_live_region_before_any_message() {
        let (mut scheduler, channel) = setup();
        let tree = tree();
        assert!(!scheduler.go_last_live_region(&tree));
        assert!(channel.take().is_empty());
    }

    #[test]
    fn test_go_last_live_region_reads_current_contents() {
        let (mut scheduler, channel) = setup();
        let mut tree = tree();
        tree.insert(
            NodeId(4),
            NodeInfo {
                live: Some("normal".to_string()),
                atomic_text: Some("Score: 1 - 0".to_string()),
                ..Default::default()
            },
        );

        scheduler.handle_event(&tree, insert(4, "1"));
        scheduler.drain();
        assert_eq!(channel.take(), vec!["Score: 1 - 0"]);
        assert_eq!(scheduler.last_presented().map(|m| m.source), Some(NodeId(4)));

        tree.insert(
            NodeId(4),
            NodeInfo {
                live: Some("normal".to_string()),
                atomic_text: Some("Score: 2 - 0".to_string()),
                ..Default::default()
            },
        );
        assert!(scheduler.go_last_live_region(&tree));
        assert_eq!(channel.take(), vec!["Score: 2 - 0"]);

        // plain regions repeat the presented text
        scheduler.handle_event(&tree, insert(1, "typing"));
        scheduler.drain();
        channel.take();
        assert!(scheduler.go_last_live_region(&tree));
        assert_eq!(channel.take(), vec!["typing"]);

        tree.destroy(NodeId(1));
        assert!(!scheduler.go_last_live_region(&tree));
        assert!(channel.take().is_empty());
    }

    #[test]
    fn test_go_last_live_region_needs_monitoring() {
        let (mut scheduler, channel) = setup();
        let tree = tree();

        scheduler.handle_event(&tree, insert(1, "hello"));
        scheduler.drain();
        scheduler.toggle_monitoring();
        channel.take();

        assert!(!scheduler.go_last_live_region(&tree));
        assert_eq!(channel.take(), vec![status::SUPPORT_DISABLED]);
    }

    #[test]
    fn test_large_backlog_drains_iteratively() {
        let mut config = LiveRegionConfig::default();
        config.queue_size = 5000;
        let mut scheduler = Scheduler::new(config, Box::new(MemorySettings::default()));
        let tree = tree();

        scheduler.suspend(true, "backlog");
        for i in 0..5000 {
            scheduler.handle_event(&tree, insert(1, &format!("update {}", i)));
        }
        scheduler.suspend(false, "backlog");
        assert_eq!(scheduler.drain(), 5000);
        assert!(scheduler.queue().is_empty());
    }
}
