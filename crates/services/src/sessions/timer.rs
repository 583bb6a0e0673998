use civique_core::time::format_countdown;

/// Result of delivering one tick to a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    Running { remaining_secs: u32 },
    /// This tick reached zero; the countdown is now stopped.
    Expired,
    /// The countdown was already stopped; nothing changed.
    Stopped,
}

/// One-second countdown owned by a session.
///
/// Ticks are delivered by the host; once stopped (expiry or explicit stop)
/// further ticks are ignored for good.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    budget_secs: u32,
    remaining_secs: u32,
    warning_secs: u32,
    stopped: bool,
}

impl Countdown {
    #[must_use]
    pub fn new(budget_secs: u32, warning_secs: u32) -> Self {
        Self {
            budget_secs,
            remaining_secs: budget_secs,
            warning_secs,
            stopped: budget_secs == 0,
        }
    }

    pub fn tick(&mut self) -> CountdownTick {
        if self.stopped {
            return CountdownTick::Stopped;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.stopped = true;
            return CountdownTick::Expired;
        }
        CountdownTick::Running {
            remaining_secs: self.remaining_secs,
        }
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    #[must_use]
    pub fn budget_secs(&self) -> u32 {
        self.budget_secs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.budget_secs - self.remaining_secs
    }

    /// Low-time warning; display only.
    #[must_use]
    pub fn is_low(&self) -> bool {
        self.remaining_secs <= self.warning_secs
    }

    #[must_use]
    pub fn view(&self) -> TimerView {
        TimerView {
            remaining_secs: self.remaining_secs,
            warning: self.is_low(),
        }
    }
}

/// Remaining time as polled by the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerView {
    pub remaining_secs: u32,
    pub warning: bool,
}

impl TimerView {
    /// `MM:SS`
    #[must_use]
    pub fn display(&self) -> String {
        format_countdown(self.remaining_secs)
    }
}
