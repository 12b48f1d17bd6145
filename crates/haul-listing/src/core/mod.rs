//! Pure transformations for listing requests.
//!
//! Nothing in here performs I/O: URL construction, status classification
//! and the backoff schedule are all plain functions over their inputs.

mod path;
mod retry;
mod status;

pub use path::{listing_url, normalize_directory};
pub use retry::{BackoffPolicy, retry_delay};
pub use status::{StatusClass, classify_status};
