use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::token::TokenCredential;

/// Username/password pair encoded as an HTTP Basic `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub const HEADER: &'static str = "Authorization";

    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// `Basic base64(username:password)`.
    pub fn header_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }

    /// The full `(name, value)` header pair.
    pub fn header(&self) -> (String, String) {
        (Self::HEADER.to_string(), self.header_value())
    }
}

impl From<&TokenCredential> for BasicAuth {
    fn from(credential: &TokenCredential) -> Self {
        Self::new(credential.username(), credential.token())
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_rfc7617_example() {
        let auth = BasicAuth::new("Aladdin", "open sesame");
        assert_eq!(auth.header_value(), "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
    }

    #[test]
    fn test_token_credential_uses_sentinel_username() {
        let credential = TokenCredential::new("tok", 0);
        let auth = BasicAuth::from(&credential);

        assert_eq!(auth.username(), "~~~Token~~~");
        assert_eq!(auth.password(), "tok");

        let expected = format!("Basic {}", STANDARD.encode("~~~Token~~~:tok"));
        assert_eq!(auth.header_value(), expected);
    }

    #[test]
    fn test_header_pair() {
        let (name, value) = BasicAuth::new("u", "p").header();
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Basic dTpw");
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", BasicAuth::new("user", "hunter2"));
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }
}
