//! Error types for haul-listing.

use std::fmt;
use std::io;

use thiserror::Error;

/// Outcome of a listing request that did not produce entries.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{reason}: {url}")]
    Authorization {
        url: String,
        reason: AuthorizationFailure,
    },

    #[error("resource does not exist: {url}")]
    NotFound { url: String },

    #[error("failed to transfer {url}: {cause}")]
    TransferFailed {
        url: String,
        #[source]
        cause: TransferFailure,
    },
}

/// Coarse classification of a [`FetchError`].
///
/// Lets callers decide between prompting for other credentials, treating
/// the path as absent, or aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authorization,
    NotFound,
    TransferFailed,
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Authorization { .. } => ErrorKind::Authorization,
            FetchError::NotFound { .. } => ErrorKind::NotFound,
            FetchError::TransferFailed { .. } => ErrorKind::TransferFailed,
        }
    }

    /// The request URL the failure refers to.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Authorization { url, .. }
            | FetchError::NotFound { url }
            | FetchError::TransferFailed { url, .. } => url,
        }
    }

    pub(crate) fn transfer(url: &str, cause: TransferFailure) -> Self {
        FetchError::TransferFailed {
            url: url.to_string(),
            cause,
        }
    }
}

/// Why the server refused access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationFailure {
    /// 403 Forbidden.
    AccessDenied,
    /// 401 Unauthorized.
    NotAuthorized,
    /// 407 Proxy Authentication Required.
    NotAuthorizedByProxy,
}

impl fmt::Display for AuthorizationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizationFailure::AccessDenied => write!(f, "access denied"),
            AuthorizationFailure::NotAuthorized => write!(f, "not authorized"),
            AuthorizationFailure::NotAuthorizedByProxy => write!(f, "not authorized by proxy"),
        }
    }
}

/// Underlying cause of a [`FetchError::TransferFailed`].
#[derive(Debug, Error)]
pub enum TransferFailure {
    #[error("unexpected status code {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("could not read response body: {0}")]
    Io(#[source] io::Error),

    #[error("could not parse listing: {0}")]
    Parse(#[source] ParseError),

    #[error("interrupted while waiting to retry")]
    Interrupted,

    #[error("still rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },
}

/// Failure raised by a [`crate::ListingParser`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("initial backoff must be at least one second")]
    InitialBackoffTooShort,

    #[error("maximum backoff ({max_secs}s) is below the initial backoff ({initial_secs}s)")]
    MaxBelowInitial { initial_secs: u64, max_secs: u64 },

    #[error("failed to load configuration: {0}")]
    Load(#[source] Box<figment::Error>),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Load(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
