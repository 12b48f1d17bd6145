//! Immutable configuration for listing requests.
//!
//! [`ListingOptions`] is what a [`crate::ListingFetcher`] runs with;
//! [`ListingConfig`] is the on-disk/environment form it is usually built from.

pub mod config;
pub mod options;

pub use config::ListingConfig;
pub use options::{DebugSink, ListingOptions};
