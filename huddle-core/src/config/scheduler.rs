use std::time::Duration;

/// Cadence and windows of the deadline scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Time between the starts of two consecutive sweeps.
    pub interval: Duration,
    /// How long a host has to break a tie after the voting deadline.
    pub tiebreak_window: time::Duration,
}

impl SchedulerConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);
    pub const DEFAULT_TIEBREAK_WINDOW: time::Duration = time::Duration::hours(24);
    /// One day.
    pub const MAX_INTERVAL: Duration = Duration::from_secs(86_400);
    /// One year.
    pub const MAX_TIEBREAK_WINDOW: time::Duration = time::Duration::hours(8_760);
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            tiebreak_window: Self::DEFAULT_TIEBREAK_WINDOW,
        }
    }
}
