//! Exponential backoff policy shared by all coordinators

use std::time::Duration;

/// Retries after the initial attempt (4 total attempts)
pub const MAX_RETRIES: u32 = 3;

/// Base delay before the first retry
pub const BASE_DELAY_MS: u64 = 1000;

/// Backoff configuration consumed by the retry runner.
///
/// One shared policy object replaces per-action copies of the retry
/// constants, so every operation observes the same budget.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    /// Maximum retries after the initial attempt
    pub max_retries: u32,
    /// Base delay in milliseconds; doubles each attempt
    pub base_delay_ms: u64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            base_delay_ms: BASE_DELAY_MS,
        }
    }
}

impl BackoffPolicy {
    /// Delay before the given attempt: `base_delay_ms * 2^attempt`.
    ///
    /// Pure and deterministic, no jitter. Unbounded on paper but bounded in
    /// practice by `max_retries`; saturating arithmetic keeps large attempt
    /// numbers from overflowing.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_per_attempt() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay(0), Duration::from_millis(1000));
        assert_eq!(policy.delay(1), Duration::from_millis(2000));
        assert_eq!(policy.delay(2), Duration::from_millis(4000));
        assert_eq!(policy.delay(3), Duration::from_millis(8000));
    }

    #[test]
    fn test_delay_law() {
        let policy = BackoffPolicy::default();
        for attempt in 0..10 {
            assert_eq!(
                policy.delay(attempt),
                Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt))
            );
        }
    }

    #[test]
    fn test_delay_saturates_instead_of_overflowing() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay(64), Duration::from_millis(u64::MAX));
        assert_eq!(policy.delay(u32::MAX), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_custom_base() {
        let policy = BackoffPolicy {
            max_retries: 2,
            base_delay_ms: 250,
        };
        assert_eq!(policy.delay(2), Duration::from_millis(1000));
    }
}
