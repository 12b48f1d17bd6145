use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};

/// Username presented alongside a token when it travels as Basic auth.
///
/// Repository managers accepting tokens over Basic auth look for this
/// sentinel instead of a real account name.
pub const TOKEN_USERNAME: &str = "~~~Token~~~";

/// A bearer token together with the instant it was issued.
///
/// Equality and hashing cover the token and the issue time, so two
/// credentials minted from the same token at different times are distinct.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TokenCredential {
    token: String,
    issued_at_millis: i64,
}

impl TokenCredential {
    /// Create a credential from a token and its issue time in milliseconds
    /// since the Unix epoch.
    pub fn new(token: impl Into<String>, issued_at_millis: i64) -> Self {
        Self {
            token: token.into(),
            issued_at_millis,
        }
    }

    /// Create a credential stamped with the current system time.
    pub fn issued_now(token: impl Into<String>) -> Self {
        Self::issued_now_with(token, &SystemClock)
    }

    /// Create a credential stamped with the time reported by `clock`.
    pub fn issued_now_with(token: impl Into<String>, clock: &impl Clock) -> Self {
        Self::new(token, clock.now_millis())
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn username(&self) -> &'static str {
        TOKEN_USERNAME
    }

    pub fn issued_at_millis(&self) -> i64 {
        self.issued_at_millis
    }

    /// Issue time as a UTC timestamp, `None` if the stored value is out of
    /// chrono's representable range.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.issued_at_millis)
    }

    /// Returns `true` once more than `max_age` has elapsed since issue.
    ///
    /// The system clock is read on every call, so the same value can turn
    /// from fresh to expired between two calls.
    pub fn is_expired(&self, max_age: Duration) -> bool {
        self.is_expired_with(max_age, &SystemClock)
    }

    /// Same as [`is_expired`](Self::is_expired) against an explicit clock.
    pub fn is_expired_with(&self, max_age: Duration, clock: &impl Clock) -> bool {
        let max_age_millis = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        let age = clock.now_millis().saturating_sub(self.issued_at_millis);
        age > max_age_millis
    }
}

impl fmt::Debug for TokenCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCredential")
            .field("username", &TOKEN_USERNAME)
            .field("token", &"<redacted>")
            .field("issued_at_millis", &self.issued_at_millis)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }

    fn hash_of(credential: &TokenCredential) -> u64 {
        let mut hasher = DefaultHasher::new();
        credential.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_not_expired_at_issue_time() {
        let credential = TokenCredential::new("abc", 1_000);
        let clock = FixedClock(1_000);

        assert!(!credential.is_expired_with(Duration::ZERO, &clock));
        assert!(!credential.is_expired_with(Duration::from_secs(60), &clock));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let credential = TokenCredential::new("abc", 1_000);
        let max_age = Duration::from_millis(500);

        assert!(!credential.is_expired_with(max_age, &FixedClock(1_500)));
        assert!(credential.is_expired_with(max_age, &FixedClock(1_501)));
    }

    #[test]
    fn test_clock_before_issue_is_not_expired() {
        let credential = TokenCredential::new("abc", 10_000);
        assert!(!credential.is_expired_with(Duration::ZERO, &FixedClock(5_000)));
    }

    #[test]
    fn test_huge_max_age_never_expires() {
        let credential = TokenCredential::new("abc", 0);
        assert!(!credential.is_expired_with(Duration::MAX, &FixedClock(i64::MAX)));
    }

    #[test]
    fn test_fresh_credential_with_system_clock() {
        let credential = TokenCredential::issued_now("abc");
        assert!(!credential.is_expired(Duration::from_secs(3600)));
    }

    #[test]
    fn test_long_issued_credential_is_expired() {
        let credential = TokenCredential::new("abc", 0);
        assert!(credential.is_expired(Duration::from_secs(60)));
    }

    #[test]
    fn test_equality_is_structural() {
        let a = TokenCredential::new("abc", 42);
        let b = TokenCredential::new(String::from("abc"), 42);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_differing_fields_are_unequal() {
        let base = TokenCredential::new("abc", 42);

        assert_ne!(base, TokenCredential::new("abd", 42));
        assert_ne!(base, TokenCredential::new("abc", 43));
    }

    #[test]
    fn test_issued_at_timestamp() {
        let credential = TokenCredential::new("abc", 1_700_000_000_123);
        let issued_at = credential.issued_at().unwrap();

        assert_eq!(issued_at.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn test_issued_now_with_clock() {
        let credential = TokenCredential::issued_now_with("abc", &FixedClock(77));
        assert_eq!(credential.issued_at_millis(), 77);
        assert_eq!(credential.username(), TOKEN_USERNAME);
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = TokenCredential::new("super-secret", 1);
        let debug = format!("{:?}", credential);

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
