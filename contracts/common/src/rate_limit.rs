//! Minimum-interval rate limiting helpers.
//!
//! The limiter is pure arithmetic over timestamps: callers persist the time of
//! an identity's last limited action however they like and ask the
//! [`Cooldown`] whether a new action at `now` is admitted.

/// Configuration for a per-identity cooldown window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cooldown {
    pub interval_seconds: u64,
}

impl Cooldown {
    pub fn new(interval_seconds: u64) -> Self {
        Self { interval_seconds }
    }

    /// Returns `true` if the configuration represents an enabled limiter.
    pub fn is_enabled(&self) -> bool {
        self.interval_seconds > 0
    }

    /// Earliest timestamp at which an identity whose last action happened at
    /// `last_action_at` may act again.
    pub fn next_allowed_at(&self, last_action_at: u64) -> u64 {
        last_action_at.saturating_add(self.interval_seconds)
    }

    /// Returns `true` if an action at `now` is admitted.
    ///
    /// A clock that has not advanced past `last_action_at` is treated as zero
    /// elapsed time, never as a wrap-around.
    pub fn permits(&self, last_action_at: u64, now: u64) -> bool {
        if !self.is_enabled() {
            return true;
        }
        now >= self.next_allowed_at(last_action_at)
    }

    /// Seconds left until the window reopens, `0` when already open.
    pub fn remaining(&self, last_action_at: u64, now: u64) -> u64 {
        self.next_allowed_at(last_action_at).saturating_sub(now)
    }
}
