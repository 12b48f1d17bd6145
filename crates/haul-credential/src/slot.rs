use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::{CredentialError, Result};
use crate::token::TokenCredential;

/// Something that can mint a fresh token, typically a call to an external
/// token service.
pub trait TokenSource: Send + Sync {
    fn issue(&self) -> Result<TokenCredential>;
}

impl<F> TokenSource for F
where
    F: Fn() -> Result<TokenCredential> + Send + Sync,
{
    fn issue(&self) -> Result<TokenCredential> {
        self()
    }
}

/// Holds the current credential and replaces it once it expires.
///
/// Credentials are never mutated in place: an expired one is dropped and a
/// new value is issued by the [`TokenSource`].
pub struct TokenSlot<S, C = SystemClock> {
    source: S,
    clock: C,
    max_age: Duration,
    current: Mutex<Option<TokenCredential>>,
}

impl<S: TokenSource> TokenSlot<S> {
    pub fn new(source: S, max_age: Duration) -> Self {
        Self::with_clock(source, max_age, SystemClock)
    }
}

impl<S: TokenSource, C: Clock> TokenSlot<S, C> {
    pub fn with_clock(source: S, max_age: Duration, clock: C) -> Self {
        Self {
            source,
            clock,
            max_age,
            current: Mutex::new(None),
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Return a credential that is not expired, issuing a new one if needed.
    pub fn credential(&self) -> Result<TokenCredential> {
        let mut current = self.lock();

        if let Some(credential) = current.as_ref()
            && !credential.is_expired_with(self.max_age, &self.clock)
        {
            return Ok(credential.clone());
        }

        let fresh = self.source.issue()?;
        if fresh.is_expired_with(self.max_age, &self.clock) {
            return Err(CredentialError::ExpiredOnIssue {
                issued_at_millis: fresh.issued_at_millis(),
            });
        }

        debug!(issued_at_millis = fresh.issued_at_millis(), "issued new token credential");
        *current = Some(fresh.clone());
        Ok(fresh)
    }

    /// Drop the held credential so the next call issues a new one.
    ///
    /// Used when a server rejects a credential before its age runs out.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    /// The held credential, if any, regardless of expiry.
    pub fn peek(&self) -> Option<TokenCredential> {
        self.lock().clone()
    }

    // The slot is only assigned after a successful issue, so a panic in the
    // source never leaves it half-written.
    fn lock(&self) -> MutexGuard<'_, Option<TokenCredential>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
