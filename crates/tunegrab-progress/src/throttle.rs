//! Progress throttling.
//!
//! Rate-limits `downloading` ticks so a chatty fetch engine does not flood
//! the host channel. Ticks that change what the UI must show are never
//! held back.

use std::time::{Duration, Instant};

use tunegrab_core::{DEFAULT_THROTTLE_MS, OutwardProgressEvent, ProgressStatus};

/// Rate-limiter for progress delivery.
///
/// A zero interval disables throttling.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    last_status: Option<ProgressStatus>,
    min_interval: Duration,
}

impl ProgressThrottle {
    /// Create a new throttle with the specified minimum interval.
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            last_status: None,
            min_interval,
        }
    }

    /// Create a throttle with the default interval.
    pub const fn default_interval() -> Self {
        Self::new(Duration::from_millis(DEFAULT_THROTTLE_MS))
    }

    /// Check if enough time has passed to emit another progress update.
    pub fn should_emit(&mut self) -> bool {
        let now = Instant::now();
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }

    /// Decide whether `event` goes out.
    ///
    /// Status changes, anything other than `downloading`, item completions
    /// and 100% always pass; plain ticks pass once per interval.
    pub fn admit(&mut self, event: &OutwardProgressEvent, item_completed: bool) -> bool {
        let status_changed = self.last_status != Some(event.status);
        self.last_status = Some(event.status);

        let forced = status_changed
            || item_completed
            || event.status != ProgressStatus::Downloading
            || event.percentage >= 100.0;

        if forced {
            self.last_emit = Some(Instant::now());
            return true;
        }
        self.should_emit()
    }

    /// Force the next check to return true.
    pub const fn reset(&mut self) {
        self.last_emit = None;
        self.last_status = None;
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::default_interval()
    }
}
