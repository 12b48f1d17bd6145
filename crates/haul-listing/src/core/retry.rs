use std::time::Duration;

use crate::error::ConfigError;

/// Calculate the wait before a retry attempt using exponential backoff.
///
/// The delay formula is: `base * 2^retry_count`
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use haul_listing::retry_delay;
///
/// // First retry: base * 2^0 = base
/// assert_eq!(retry_delay(0, Duration::from_secs(5)), Duration::from_secs(5));
///
/// // Second retry: base * 2^1
/// assert_eq!(retry_delay(1, Duration::from_secs(5)), Duration::from_secs(10));
/// ```
pub fn retry_delay(retry_count: u32, base: Duration) -> Duration {
    let multiplier = 2_u32.saturating_pow(retry_count);
    base.saturating_mul(multiplier)
}

/// Backoff applied when a server answers 429 Too Many Requests.
///
/// Waits double on every retry starting from `initial`. A retry whose wait
/// would exceed `max_wait` is not attempted and the fetch gives up, so a
/// server that keeps rate-limiting cannot block a caller forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    initial: Duration,
    max_wait: Duration,
}

impl BackoffPolicy {
    pub const DEFAULT_INITIAL: Duration = Duration::from_secs(5);
    pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(180);
    /// Hard cap on waits, independent of `max_wait`.
    pub const RETRY_LIMIT: u32 = 32;

    /// Create a policy. `initial` must be at least one second and
    /// `max_wait` must not be below it.
    pub fn new(initial: Duration, max_wait: Duration) -> Result<Self, ConfigError> {
        if initial < Duration::from_secs(1) {
            return Err(ConfigError::InitialBackoffTooShort);
        }
        if max_wait < initial {
            return Err(ConfigError::MaxBelowInitial {
                initial_secs: initial.as_secs(),
                max_secs: max_wait.as_secs(),
            });
        }
        Ok(Self { initial, max_wait })
    }

    pub fn from_secs(initial_secs: u64, max_wait_secs: u64) -> Result<Self, ConfigError> {
        Self::new(
            Duration::from_secs(initial_secs),
            Duration::from_secs(max_wait_secs),
        )
    }

    pub fn initial(&self) -> Duration {
        self.initial
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Wait before retry number `retry` (0-based).
    pub fn wait(&self, retry: u32) -> Duration {
        retry_delay(retry, self.initial)
    }

    /// Whether retry number `retry` (0-based) may happen at all.
    ///
    /// A retry is permitted while its wait does not exceed `max_wait` and
    /// fewer than [`RETRY_LIMIT`](Self::RETRY_LIMIT) retries came before it.
    pub fn permits(&self, retry: u32) -> bool {
        retry < Self::RETRY_LIMIT && self.wait(retry) <= self.max_wait
    }

    /// Number of retries a persistently rate-limited fetch performs before
    /// giving up.
    pub fn max_retries(&self) -> u32 {
        let mut retry = 0;
        while self.permits(retry) {
            retry += 1;
        }
        retry
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Self::DEFAULT_INITIAL,
            max_wait: Self::DEFAULT_MAX_WAIT,
        }
    }
}
