//! I/O side of listing: the HTTP and sleep seams and the fetcher driving them.

pub mod fetcher;
pub mod http;
pub mod sleep;

pub use fetcher::ListingFetcher;
#[cfg(feature = "reqwest")]
pub use http::{ReqwestResponse, ReqwestTransport};
pub use http::{HttpResponse, HttpTransport};
pub use sleep::{CancelHandle, CancellableSleeper, Interrupted, Sleeper, ThreadSleeper};
