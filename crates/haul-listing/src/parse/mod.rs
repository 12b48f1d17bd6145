//! Turning a directory index page into entry names.

use std::io::Read;

use crate::error::ParseError;

mod html;

pub use html::HtmlListingParser;

/// Extracts directory entries from a listing response body.
///
/// `base_url` is the URL the body was fetched from. Entries are returned in
/// the order the implementation finds them; callers must not assume sorting.
pub trait ListingParser: Send + Sync {
    fn parse(&self, base_url: &str, body: &mut dyn Read) -> Result<Vec<String>, ParseError>;
}

impl<F> ListingParser for F
where
    F: Fn(&str, &mut dyn Read) -> Result<Vec<String>, ParseError> + Send + Sync,
{
    fn parse(&self, base_url: &str, body: &mut dyn Read) -> Result<Vec<String>, ParseError> {
        self(base_url, body)
    }
}
