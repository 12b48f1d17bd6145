//! Time-scoped bearer token credentials.
//!
//! # Architecture
//!
//! A token is a plain value. It never refreshes itself and never mutates;
//! expiry is a predicate evaluated against a [`Clock`] at call time.
//! Transports that only understand username/password pairs receive the token
//! through [`BasicAuth`], with the username fixed to [`TOKEN_USERNAME`].
//!
//! [`TokenSlot`] is the policy piece: it holds the current credential and
//! swaps it for a freshly issued one once it expires.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use haul_credential::{BasicAuth, TokenCredential};
//!
//! let credential = TokenCredential::issued_now("secret-token");
//! assert!(!credential.is_expired(Duration::from_secs(3600)));
//!
//! let auth = BasicAuth::from(&credential);
//! assert_eq!(auth.username(), "~~~Token~~~");
//! assert!(auth.header_value().starts_with("Basic "));
//! ```

pub use basic::BasicAuth;
pub use clock::{Clock, SystemClock};
pub use error::{CredentialError, Result};
pub use slot::{TokenSlot, TokenSource};
pub use token::{TOKEN_USERNAME, TokenCredential};

mod basic;
mod clock;
mod error;
mod slot;
mod token;
