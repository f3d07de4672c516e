//! Second-granularity countdown used to bound a quiz attempt.
//!
//! The countdown does not own a clock. Whoever drives it calls [`Countdown::tick`]
//! once per elapsed second; this keeps it deterministic and lets the owner tear
//! it down synchronously.

/// Remaining-seconds threshold at which the countdown reports the warning period.
pub const DEFAULT_WARNING_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountdownState {
    Running,
    Expired,
    Cancelled,
}

/// Result of feeding one second into a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// One second elapsed; time remains.
    Tick { remaining: u32, warning: bool },
    /// Remaining time just reached zero. Emitted exactly once.
    Expired,
    /// The countdown already expired or was cancelled; nothing changed.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    duration: u32,
    remaining: u32,
    warning_threshold: u32,
    state: CountdownState,
}

impl Countdown {
    /// Returns `None` for a zero duration: unlimited time has no countdown at all.
    #[must_use]
    pub fn new(duration_secs: u32) -> Option<Self> {
        (duration_secs > 0).then_some(Self {
            duration: duration_secs,
            remaining: duration_secs,
            warning_threshold: DEFAULT_WARNING_SECS,
            state: CountdownState::Running,
        })
    }

    #[must_use]
    pub fn with_warning_threshold(mut self, secs: u32) -> Self {
        self.warning_threshold = secs;
        self
    }

    pub fn tick(&mut self) -> CountdownEvent {
        if self.state != CountdownState::Running {
            return CountdownEvent::Stopped;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = CountdownState::Expired;
            return CountdownEvent::Expired;
        }

        CountdownEvent::Tick {
            remaining: self.remaining,
            warning: self.is_warning(),
        }
    }

    /// Stop the countdown. Later ticks report `Stopped`.
    pub fn cancel(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Cancelled;
        }
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.duration - self.remaining
    }

    /// Presentation hint only; has no effect on grading or submission.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.remaining <= self.warning_threshold
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.state == CountdownState::Expired
    }
}
