//! Repository directory listings over HTTP with rate-limit backoff.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`] - Pure transformations (URL building, status classification, backoff)
//! - [`effects`] - I/O operations with trait abstraction
//!
//! The HTTP client, the listing parser and the retry sleep are all seams
//! ([`HttpTransport`], [`ListingParser`], [`Sleeper`]), so the fetcher can be
//! driven entirely by mocks.
//!
//! # Example
//!
//! ```no_run
//! use haul_credential::{BasicAuth, TokenCredential};
//! use haul_listing::{ListingFetcher, ListingOptions, ReqwestTransport};
//!
//! let credential = TokenCredential::issued_now("token-from-sso");
//! let options = ListingOptions::default().basic_auth(&BasicAuth::from(&credential));
//!
//! let fetcher = ListingFetcher::new(ReqwestTransport::new()?, "https://repo.example/releases")
//!     .with_options(options);
//!
//! for entry in fetcher.fetch("com/acme/lib")? {
//!     println!("{entry}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod data;
pub mod effects;
pub mod parse;

mod error;

pub use self::core::{
    BackoffPolicy, StatusClass, classify_status, listing_url, normalize_directory, retry_delay,
};
pub use self::data::{DebugSink, ListingConfig, ListingOptions};
pub use self::effects::{
    CancelHandle, CancellableSleeper, HttpResponse, HttpTransport, Interrupted, ListingFetcher,
    Sleeper, ThreadSleeper,
};
pub use self::error::{
    AuthorizationFailure, ConfigError, ErrorKind, FetchError, ParseError, Result, TransferFailure,
};
pub use self::parse::{HtmlListingParser, ListingParser};

#[cfg(feature = "reqwest")]
pub use self::effects::{ReqwestResponse, ReqwestTransport};
