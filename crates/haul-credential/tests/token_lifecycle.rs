use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use haul_credential::{
    BasicAuth, Clock, CredentialError, Result, TOKEN_USERNAME, TokenCredential, TokenSlot,
};

#[derive(Clone, Default)]
struct SharedClock(Arc<AtomicI64>);

impl SharedClock {
    fn advance(&self, millis: i64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for SharedClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[test]
fn test_token_rides_basic_auth() {
    let credential = TokenCredential::new("abc123", 1_700_000_000_000);
    let auth = BasicAuth::from(&credential);

    assert_eq!(auth.username(), TOKEN_USERNAME);
    assert_eq!(auth.password(), "abc123");

    let encoded = auth.header_value();
    let decoded = STANDARD
        .decode(encoded.strip_prefix("Basic ").unwrap())
        .unwrap();
    assert_eq!(decoded, b"~~~Token~~~:abc123");
}

#[test]
fn test_slot_rotates_expired_tokens() {
    let clock = SharedClock::default();
    let issued = Arc::new(AtomicUsize::new(0));

    let source = {
        let clock = clock.clone();
        let issued = Arc::clone(&issued);
        move || -> Result<TokenCredential> {
            let n = issued.fetch_add(1, Ordering::SeqCst);
            Ok(TokenCredential::issued_now_with(format!("token-{n}"), &clock))
        }
    };
    let slot = TokenSlot::with_clock(source, Duration::from_secs(60), clock.clone());

    assert_eq!(slot.credential().unwrap().token(), "token-0");
    clock.advance(60_000);
    assert_eq!(slot.credential().unwrap().token(), "token-0");

    clock.advance(1);
    let rotated = slot.credential().unwrap();
    assert_eq!(rotated.token(), "token-1");
    assert_eq!(rotated.issued_at_millis(), 60_001);

    slot.invalidate();
    assert_eq!(slot.credential().unwrap().token(), "token-2");
    assert_eq!(issued.load(Ordering::SeqCst), 3);
}

#[test]
fn test_source_failure_propagates() {
    let source = || -> Result<TokenCredential> {
        Err(CredentialError::from_source(std::io::Error::other(
            "token service unavailable",
        )))
    };
    let slot = TokenSlot::new(source, Duration::from_secs(60));

    let err = slot.credential().unwrap_err();
    assert!(matches!(err, CredentialError::Source(_)));
    assert!(slot.peek().is_none());
}
