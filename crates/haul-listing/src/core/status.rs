use crate::error::AuthorizationFailure;

/// What a listing request should do with an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 200: parse the body.
    Success,
    /// 401, 403 or 407: fail without retrying.
    Unauthorized(AuthorizationFailure),
    /// 404: the directory does not exist.
    NotFound,
    /// 429: wait and retry.
    RateLimited,
    /// Anything else.
    Unexpected(u16),
}

impl StatusClass {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StatusClass::RateLimited)
    }
}

/// Classify an HTTP status code returned by a listing request.
///
/// Only `200 OK` counts as success. Other 2xx codes and redirects the
/// transport did not follow are treated as unexpected.
///
/// # Examples
///
/// ```
/// use haul_listing::{classify_status, StatusClass};
///
/// assert_eq!(classify_status(200), StatusClass::Success);
/// assert_eq!(classify_status(429), StatusClass::RateLimited);
/// assert_eq!(classify_status(503), StatusClass::Unexpected(503));
/// ```
pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200 => StatusClass::Success,
        401 => StatusClass::Unauthorized(AuthorizationFailure::NotAuthorized),
        403 => StatusClass::Unauthorized(AuthorizationFailure::AccessDenied),
        407 => StatusClass::Unauthorized(AuthorizationFailure::NotAuthorizedByProxy),
        404 => StatusClass::NotFound,
        429 => StatusClass::RateLimited,
        other => StatusClass::Unexpected(other),
    }
}
