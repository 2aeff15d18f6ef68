//! # Poll Policy
//!
//! Bounded exponential backoff between status queries.
//!
//! ```text
//! delay(n) = min(initial * multiplier^n, max_interval)
//! ```
//!
//! Delays never decrease. Polling stops after `max_attempts` queries or once
//! `timeout` has elapsed, whichever comes first.

use std::time::Duration;

/// Default first delay.
pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_millis(500);
/// Default delay ceiling.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(5);
/// Default growth factor.
pub const DEFAULT_MULTIPLIER: u32 = 2;
/// Default query budget.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;
/// Default overall deadline.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(300);

/// Retry schedule for `poll_until_terminal`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay after the first query.
    pub initial_interval: Duration,
    /// Growth factor per attempt (1 = constant).
    pub multiplier: u32,
    /// Ceiling on any single delay.
    pub max_interval: Duration,
    /// Maximum number of status queries.
    pub max_attempts: u32,
    /// Overall deadline measured from the first query.
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            multiplier: DEFAULT_MULTIPLIER,
            max_interval: DEFAULT_MAX_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: Some(DEFAULT_POLL_TIMEOUT),
        }
    }
}

impl PollPolicy {
    /// Fixed interval, fixed budget, no deadline.
    pub fn fixed(interval: Duration, max_attempts: u32) -> Self {
        Self {
            initial_interval: interval,
            multiplier: 1,
            max_interval: interval,
            max_attempts,
            timeout: None,
        }
    }

    /// Delay to wait after the zero-based `attempt`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(1).checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial_interval
            .checked_mul(factor)
            .unwrap_or(Duration::MAX)
            .min(self.max_interval.max(self.initial_interval))
    }

    /// Whether another query is allowed after `attempts` queries and
    /// `elapsed` time.
    pub fn allows(&self, attempts: u32, elapsed: Duration) -> bool {
        if attempts >= self.max_attempts {
            return false;
        }
        match self.timeout {
            Some(timeout) => elapsed < timeout,
            None => true,
        }
    }
}
