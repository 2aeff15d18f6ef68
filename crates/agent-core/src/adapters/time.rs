//! Wall-clock `TimeSource` backed by `SystemTime`.

use crate::ports::TimeSource;

// ============================================================================
// SystemTimeSource - Production Time Source
// ============================================================================

/// Production time source using the system clock.
///
/// For tests, use `FixedTimeSource` or `ManualTimeSource` from `test_utils`.
///
/// # Example
///
/// ```rust
/// use agent_core::adapters::SystemTimeSource;
/// use agent_core::ports::TimeSource;
///
/// let clock = SystemTimeSource::new();
/// assert!(clock.now_ms() > 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    /// Create a new system time source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};

        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();

        u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
    }
}
