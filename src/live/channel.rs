//! Output channel trait

use anyhow::Result;

/// Audible or tactile output. Presenting is fire-and-forget: the scheduler
/// logs a failure and moves on.
pub trait OutputChannel: Send + Sync {
    /// Channel name (for logs)
    fn name(&self) -> &str;

    /// Present text
    fn present(&self, text: &str) -> Result<()>;
}
