//! Error types for credential operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("token source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("token source returned an already expired token (issued at {issued_at_millis} ms)")]
    ExpiredOnIssue { issued_at_millis: i64 },
}

impl CredentialError {
    /// Wrap any error raised by a [`crate::TokenSource`].
    pub fn from_source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CredentialError::Source(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, CredentialError>;
