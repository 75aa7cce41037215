//! Settings store seam
//!
//! The master enable switch outlives the scheduler; where it is persisted is
//! the host's business.

/// Persistent user settings read and written by the scheduler
pub trait SettingsStore {
    fn live_regions_enabled(&self) -> bool;

    fn set_live_regions_enabled(&mut self, enabled: bool);
}

/// Settings held in memory for the lifetime of the process
#[derive(Debug, Clone)]
pub struct MemorySettings {
    enabled: bool,
}

impl MemorySettings {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SettingsStore for MemorySettings {
    fn live_regions_enabled(&self) -> bool {
        self.enabled
    }

    fn set_live_regions_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
