//! Live region configuration
//!
//! Read from `<config dir>/live-region-monitor/config.json`. Every field is
//! optional; a missing file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::live::channels::braille::DEFAULT_CELLS;
use crate::live::queue::{MSG_KEEPALIVE_SECS, QUEUE_SIZE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveRegionConfig {
    /// Initial state of the master switch
    pub enabled: bool,
    /// Pending queue bound
    pub queue_size: usize,
    /// Replay history capacity
    pub history_size: usize,
    /// Seconds before a queued message is stale
    pub keep_alive_secs: u64,
    /// Period of the purge/present tick
    pub tick_interval_ms: u64,
    /// Announce updates from documents other than the active one
    pub present_from_inactive_tab: bool,
    /// A most-urgent arrival drops pending normal messages
    pub urgent_interrupts_normal: bool,
    /// Keep admitting while presentation is suspended
    pub queue_while_suspended: bool,
    /// Braille display width
    pub braille_width: usize,
}

impl Default for LiveRegionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            queue_size: QUEUE_SIZE,
            history_size: QUEUE_SIZE,
            keep_alive_secs: MSG_KEEPALIVE_SECS,
            tick_interval_ms: 100,
            present_from_inactive_tab: false,
            urgent_interrupts_normal: true,
            queue_while_suspended: true,
            braille_width: DEFAULT_CELLS,
        }
    }
}

impl LiveRegionConfig {
    /// Default config file location
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("live-region-monitor")
            .join("config.json")
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load from `path`; defaults if the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        info!(path = %path.display(), "Loaded live region config");
        Ok(config)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
