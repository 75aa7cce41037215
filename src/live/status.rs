//! Fixed status strings announced by the live region commands

pub const MONITORING_ON: &str = "Live regions monitoring on";
pub const MONITORING_OFF: &str = "Live regions monitoring off";
pub const SUPPORT_DISABLED: &str = "Live region support is off";
pub const NO_MESSAGES: &str = "no live message saved";
pub const LIST_TOP: &str = "top of live message list";
pub const LIST_BOTTOM: &str = "bottom of live message list";
pub const OUTPUT_MUTED: &str = "All live regions set to off";
pub const OUTPUT_RESTORED: &str = "live regions politeness levels restored";

/// Announced after the user's urgency cutoff changes
pub fn threshold_changed(cutoff: super::Urgency) -> &'static str {
    use super::Urgency;
    match cutoff {
        Urgency::Silent => "announcing all live regions",
        Urgency::Normal => "announcing only most urgent live regions",
        Urgency::MostUrgent => "live region announcements off",
    }
}

/// Announced after the focused region's urgency override changes
pub fn source_level(level: super::Urgency) -> &'static str {
    use super::Urgency;
    match level {
        Urgency::Silent => "setting live region to silent",
        Urgency::Normal => "setting live region to normal",
        Urgency::MostUrgent => "setting live region to most urgent",
    }
}
