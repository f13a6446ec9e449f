//! Break countdown driven by the one-second tick

/// Result of advancing the countdown by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// No countdown in progress
    Idle,
    /// Counting, with seconds remaining
    Counting(u32),
    /// Countdown just reached zero
    Finished,
}

/// Optional countdown: `None -> Counting(n) -> ... -> Finished -> None`.
#[derive(Debug, Default)]
pub struct BreakCountdown {
    remaining: Option<u32>,
}

impl BreakCountdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin counting down from `seconds`. Restarting replaces any
    /// countdown already in progress.
    pub fn start(&mut self, seconds: u32) {
        self.remaining = Some(seconds);
    }

    /// Advance by one second. Reaching zero reports `Finished` exactly
    /// once and returns to idle.
    pub fn tick(&mut self) -> CountdownTick {
        match self.remaining {
            None => CountdownTick::Idle,
            Some(n) => {
                let left = n.saturating_sub(1);
                if left == 0 {
                    self.remaining = None;
                    CountdownTick::Finished
                } else {
                    self.remaining = Some(left);
                    CountdownTick::Counting(left)
                }
            }
        }
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }
}
