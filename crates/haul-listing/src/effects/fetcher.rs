use std::io::{BufRead, BufReader};

use tracing::{debug, warn};

use crate::core::{StatusClass, classify_status, listing_url};
#[cfg(feature = "reqwest")]
use crate::data::ListingConfig;
use crate::data::ListingOptions;
#[cfg(feature = "reqwest")]
use crate::effects::http::ReqwestTransport;
use crate::effects::http::{HttpResponse, HttpTransport};
use crate::effects::sleep::{Sleeper, ThreadSleeper};
#[cfg(feature = "reqwest")]
use crate::error::ConfigError;
use crate::error::{FetchError, Result, TransferFailure};
use crate::parse::{HtmlListingParser, ListingParser};

/// Result of one request/response round trip.
enum Attempt {
    Listed(Vec<String>),
    RateLimited,
}

/// Fetches directory listings below a repository base URL.
///
/// The fetcher holds configuration only. Every [`fetch`](Self::fetch) is
/// independent, so a single instance can serve concurrent callers.
#[derive(Debug)]
pub struct ListingFetcher<T, P = HtmlListingParser, S = ThreadSleeper> {
    transport: T,
    parser: P,
    sleeper: S,
    base_url: String,
    options: ListingOptions,
}

impl<T: HttpTransport> ListingFetcher<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            parser: HtmlListingParser::new(),
            sleeper: ThreadSleeper,
            base_url: base_url.into(),
            options: ListingOptions::default(),
        }
    }
}

#[cfg(feature = "reqwest")]
impl ListingFetcher<ReqwestTransport> {
    /// Build a fetcher for `config.repository_url` with the configured
    /// backoff, timeout and user agent.
    pub fn from_config(config: &ListingConfig) -> std::result::Result<Self, ConfigError> {
        let backoff = config.backoff()?;
        let transport =
            ReqwestTransport::from_config(config).map_err(|e| ConfigError::Client(Box::new(e)))?;

        Ok(Self::new(transport, config.repository_url.clone())
            .with_options(ListingOptions::default().backoff(backoff)))
    }
}

impl<T, P, S> ListingFetcher<T, P, S>
where
    T: HttpTransport,
    P: ListingParser,
    S: Sleeper,
{
    pub fn with_options(mut self, options: ListingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_parser<P2: ListingParser>(self, parser: P2) -> ListingFetcher<T, P2, S> {
        ListingFetcher {
            transport: self.transport,
            parser,
            sleeper: self.sleeper,
            base_url: self.base_url,
            options: self.options,
        }
    }

    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> ListingFetcher<T, P, S2> {
        ListingFetcher {
            transport: self.transport,
            parser: self.parser,
            sleeper,
            base_url: self.base_url,
            options: self.options,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ListingOptions {
        &self.options
    }

    /// List the entries of the directory `path` below the base URL.
    ///
    /// A `429 Too Many Requests` answer is retried with the configured
    /// [`BackoffPolicy`](crate::BackoffPolicy); every other non-200 status is
    /// terminal. Blocks the calling thread while waiting.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Authorization`] on 401, 403 and 407
    /// - [`FetchError::NotFound`] on 404
    /// - [`FetchError::TransferFailed`] on any other status, transport or
    ///   body failure, an interrupted wait, or when the backoff ceiling is hit
    pub fn fetch(&self, path: &str) -> Result<Vec<String>> {
        let url = listing_url(&self.base_url, path);
        let backoff = self.options.backoff;
        let mut retry = 0;

        loop {
            match self.attempt(&url)? {
                Attempt::Listed(entries) => return Ok(entries),
                Attempt::RateLimited => {
                    if !backoff.permits(retry) {
                        return Err(FetchError::transfer(
                            &url,
                            TransferFailure::RateLimited { attempts: retry + 1 },
                        ));
                    }

                    let wait = backoff.wait(retry);
                    warn!(url = %url, retry, wait_secs = wait.as_secs(), "rate limited, backing off");

                    self.sleeper
                        .sleep(wait)
                        .map_err(|_| FetchError::transfer(&url, TransferFailure::Interrupted))?;
                    retry += 1;
                }
            }
        }
    }

    /// One GET. The response is dropped before this returns, whatever the
    /// outcome.
    fn attempt(&self, url: &str) -> Result<Attempt> {
        let mut response = self
            .transport
            .get(url, &self.options.headers)
            .map_err(|e| FetchError::transfer(url, TransferFailure::Transport(Box::new(e))))?;

        let status = response.status();
        debug!(url = %url, status, "listing request");
        self.options.emit_debug(&format!("{url} - Status code: {status}"));

        match classify_status(status) {
            StatusClass::Success => self.read_listing(url, &mut response).map(Attempt::Listed),
            StatusClass::RateLimited => Ok(Attempt::RateLimited),
            StatusClass::Unauthorized(reason) => Err(FetchError::Authorization {
                url: url.to_string(),
                reason,
            }),
            StatusClass::NotFound => Err(FetchError::NotFound {
                url: url.to_string(),
            }),
            StatusClass::Unexpected(code) => {
                Err(FetchError::transfer(url, TransferFailure::Status(code)))
            }
        }
    }

    fn read_listing(&self, url: &str, response: &mut T::Response) -> Result<Vec<String>> {
        let Some(body) = response.body() else {
            return Ok(Vec::new());
        };

        let mut reader = BufReader::new(body);
        let is_empty = reader
            .fill_buf()
            .map_err(|e| FetchError::transfer(url, TransferFailure::Io(e)))?
            .is_empty();
        if is_empty {
            return Ok(Vec::new());
        }

        self.parser
            .parse(url, &mut reader)
            .map_err(|e| FetchError::transfer(url, TransferFailure::Parse(e)))
    }
}
