use std::io::Read;

/// A response owned by exactly one listing attempt.
///
/// Dropping the response releases it (connection, buffers). Listing code
/// never holds a response across a retry wait.
pub trait HttpResponse {
    fn status(&self) -> u16;

    /// The response body, or `None` if the response carries none.
    fn body(&mut self) -> Option<&mut dyn Read>;
}

/// Blocking HTTP client abstraction.
///
/// This trait provides the minimal interface needed for listing requests.
/// Implementations handle their own redirect following, proxy and TLS
/// configuration, and report only transport-level failures as errors: HTTP
/// error statuses are returned as ordinary responses.
///
/// # Implementations
///
/// - [`ReqwestTransport`]: Production implementation using `reqwest::blocking`
/// - Mock implementations for testing
pub trait HttpTransport: Send + Sync {
    type Response: HttpResponse;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue a GET for `url` with the given extra headers.
    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<Self::Response, Self::Error>;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use std::time::Duration;

    use reqwest::blocking::{Client, Response};

    use crate::data::ListingConfig;

    /// Production transport built on `reqwest::blocking`.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        /// Create a transport with reqwest's default configuration.
        pub fn new() -> Result<Self, reqwest::Error> {
            let client = Client::builder().build()?;
            Ok(Self { client })
        }

        /// Wrap an already configured client.
        pub fn with_client(client: Client) -> Self {
            Self { client }
        }

        /// Apply the timeout and user agent from `config`.
        pub fn from_config(config: &ListingConfig) -> Result<Self, reqwest::Error> {
            Self::build(config.timeout(), config.user_agent.as_deref())
        }

        fn build(timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self, reqwest::Error> {
            let mut builder = Client::builder();
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(user_agent) = user_agent {
                builder = builder.user_agent(user_agent);
            }
            Ok(Self {
                client: builder.build()?,
            })
        }
    }

    /// A `reqwest` response; the connection is returned to the pool on drop.
    #[derive(Debug)]
    pub struct ReqwestResponse {
        inner: Response,
    }

    impl HttpResponse for ReqwestResponse {
        fn status(&self) -> u16 {
            self.inner.status().as_u16()
        }

        fn body(&mut self) -> Option<&mut dyn Read> {
            match self.inner.content_length() {
                Some(0) => None,
                _ => Some(&mut self.inner as &mut dyn Read),
            }
        }
    }

    impl HttpTransport for ReqwestTransport {
        type Response = ReqwestResponse;
        type Error = reqwest::Error;

        fn get(&self, url: &str, headers: &[(String, String)]) -> Result<Self::Response, Self::Error> {
            let mut request = self.client.get(url);

            for (key, value) in headers {
                request = request.header(key, value);
            }

            let inner = request.send()?;
            Ok(ReqwestResponse { inner })
        }
    }

}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::{ReqwestResponse, ReqwestTransport};
