use std::fmt;
use std::sync::Arc;

use haul_credential::BasicAuth;

use crate::core::BackoffPolicy;

/// Callback receiving one human-readable line per request attempt.
pub type DebugSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Configuration for listing requests.
///
/// # Examples
///
/// ```
/// use haul_credential::{BasicAuth, TokenCredential};
/// use haul_listing::{BackoffPolicy, ListingOptions};
///
/// let credential = TokenCredential::issued_now("token");
/// let options = ListingOptions::default()
///     .backoff(BackoffPolicy::from_secs(2, 60).unwrap())
///     .basic_auth(&BasicAuth::from(&credential))
///     .header("User-Agent", "haul/0.1");
///
/// assert_eq!(options.headers.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct ListingOptions {
    /// Backoff used when the server answers 429 Too Many Requests.
    ///
    /// Default: 5s initial wait, giving up once the next wait would exceed 180s.
    pub backoff: BackoffPolicy,

    /// Headers sent with every attempt, retries included.
    ///
    /// Default: empty
    pub headers: Arc<[(String, String)]>,

    /// Receives `"<url> - Status code: <status>"` after each attempt.
    ///
    /// Default: None
    pub on_debug: Option<DebugSink>,
}

impl fmt::Debug for ListingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("ListingOptions")
            .field("backoff", &self.backoff)
            .field("headers", &header_names)
            .field("on_debug", &self.on_debug.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl ListingOptions {
    #[must_use]
    pub fn backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Add a single header. An existing header with the same name
    /// (case-insensitive) is replaced.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let mut headers: Vec<_> = self
            .headers
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case(&key))
            .cloned()
            .collect();
        headers.push((key, value.into()));
        self.headers = Arc::from(headers);
        self
    }

    /// Replace all headers.
    #[must_use]
    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = Arc::from(headers);
        self
    }

    /// Send `auth` as the `Authorization` header.
    #[must_use]
    pub fn basic_auth(self, auth: &BasicAuth) -> Self {
        let (key, value) = auth.header();
        self.header(key, value)
    }

    #[must_use]
    pub fn on_debug(mut self, on_debug: DebugSink) -> Self {
        self.on_debug = Some(on_debug);
        self
    }

    pub(crate) fn emit_debug(&self, line: &str) {
        if let Some(ref sink) = self.on_debug {
            sink(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_defaults() {
        let options = ListingOptions::default();
        assert_eq!(options.backoff, BackoffPolicy::default());
        assert!(options.headers.is_empty());
        assert!(options.on_debug.is_none());
    }

    #[test]
    fn test_header_replaces_same_name() {
        let options = ListingOptions::default()
            .header("Authorization", "Basic old")
            .header("X-Trace", "1")
            .header("authorization", "Basic new");

        assert_eq!(options.headers.len(), 2);
        assert!(options.headers.iter().any(|(k, v)| k == "authorization" && v == "Basic new"));
    }

    #[test]
    fn test_basic_auth_installs_authorization_header() {
        let options = ListingOptions::default().basic_auth(&BasicAuth::new("u", "p"));
        assert_eq!(
            options.headers.as_ref(),
            &[("Authorization".to_string(), "Basic dTpw".to_string())]
        );
    }

    #[test]
    fn test_debug_hides_header_values() {
        let options = ListingOptions::default().basic_auth(&BasicAuth::new("u", "secret"));
        let debug = format!("{:?}", options);

        assert!(debug.contains("Authorization"));
        assert!(!debug.contains("Basic"));
    }

    #[test]
    fn test_emit_debug_reaches_sink() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&lines);
        let options = ListingOptions::default().on_debug(Arc::new(move |line: &str| {
            captured.lock().unwrap().push(line.to_string());
        }));

        options.emit_debug("hello");
        assert_eq!(*lines.lock().unwrap(), vec!["hello".to_string()]);
    }
}
