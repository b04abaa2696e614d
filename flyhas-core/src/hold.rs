use serde::Serialize;

/// Length of a seat hold when nothing else is configured.
pub const DEFAULT_HOLD_SECONDS: u32 = 600;

/// Outcome of a single one-second tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldState {
    Running { seconds_remaining: u32 },
    /// The countdown hit zero. It has already restarted at its initial duration.
    Expired,
}

/// Countdown for a seat-selection hold.
///
/// The hold only exists locally. Expiry is not terminal: the timer goes
/// straight back to its initial duration so the user can keep picking seats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldTimer {
    initial: u32,
    remaining: u32,
}

impl HoldTimer {
    pub fn new(initial_seconds: u32) -> Self {
        let initial = initial_seconds.max(1);
        Self { initial, remaining: initial }
    }

    pub fn initial_seconds(&self) -> u32 {
        self.initial
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.remaining
    }

    pub fn tick(&mut self) -> HoldState {
        if self.remaining <= 1 {
            self.remaining = self.initial;
            return HoldState::Expired;
        }
        self.remaining -= 1;
        HoldState::Running { seconds_remaining: self.remaining }
    }

    /// `m:ss`, as shown next to the seat map.
    pub fn display(&self) -> String {
        format_countdown(self.remaining)
    }
}

impl Default for HoldTimer {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_SECONDS)
    }
}

pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
