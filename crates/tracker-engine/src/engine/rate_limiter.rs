//! Fixed-window rate limiter for outbound platform calls
//!
//! No blocking and no queueing: a denied permit means the caller skips the
//! call (full sync defers that guild to the next cycle). The whole
//! check-and-update runs under one mutex because several reconciliation
//! paths acquire permits concurrently.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use tracker_common::RateLimitConfig;

/// Fixed-window counter with `rate` permits per `per` window
#[derive(Debug)]
pub struct RateLimiter {
    rate: u32,
    per: Duration,
    state: Mutex<WindowState>,
}

#[derive(Debug)]
struct WindowState {
    window_start: Instant,
    remaining: u32,
}

impl RateLimiter {
    /// Create a limiter allowing `rate` acquisitions per `per` window
    pub fn new(rate: u32, per: Duration) -> Self {
        Self {
            rate,
            per,
            state: Mutex::new(WindowState {
                window_start: Instant::now(),
                remaining: rate,
            }),
        }
    }

    /// Create a limiter from the loaded application configuration
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.rate, config.window())
    }

    /// Try to acquire one permit
    ///
    /// Returns false when the current window is exhausted; the window resets
    /// once `per` has elapsed since it opened.
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    /// Time-injected acquisition, used by callers that control the clock
    pub fn try_acquire_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock();

        if now > state.window_start + self.per {
            // First acquisition of a fresh window
            state.window_start = now;
            state.remaining = self.rate.saturating_sub(1);
            return true;
        }

        if state.remaining > 0 {
            state.remaining -= 1;
            return true;
        }

        false
    }
}
