use std::collections::HashSet;
use std::io::Read;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

use super::ListingParser;
use crate::error::ParseError;

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("href pattern is valid")
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z]+));")
        .expect("entity pattern is valid")
});

/// Parser for the HTML index pages served by Apache, nginx and most
/// repository managers.
///
/// Every `<a href>` is resolved against the listing URL. A link becomes an
/// entry only if it points at a direct child of that URL: sort links
/// (`?C=N;O=D`), parent links, links to other hosts and links into deeper
/// directories are dropped. Query strings are stripped, so `a.jar?sha=1`
/// lists as `a.jar`. Directory entries keep their trailing `/`. Entries are
/// percent-decoded and deduplicated in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlListingParser;

impl HtmlListingParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an in-memory page.
    pub fn parse_str(&self, base_url: &str, html: &str) -> Result<Vec<String>, ParseError> {
        let base = directory_base(base_url)?;
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for caps in HREF.captures_iter(html) {
            let Some(href) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
                continue;
            };
            let href = decode_entities(href.as_str());

            if let Some(entry) = entry_name(&base, &href)
                && seen.insert(entry.clone())
            {
                entries.push(entry);
            }
        }

        Ok(entries)
    }
}

impl ListingParser for HtmlListingParser {
    fn parse(&self, base_url: &str, body: &mut dyn Read) -> Result<Vec<String>, ParseError> {
        let mut raw = Vec::new();
        body.read_to_end(&mut raw)?;
        self.parse_str(base_url, &String::from_utf8_lossy(&raw))
    }
}

fn directory_base(base_url: &str) -> Result<Url, ParseError> {
    let mut base = Url::parse(base_url).map_err(|source| ParseError::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);
    Ok(base)
}

fn entry_name(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    // Sort links (`?C=N;O=D`) resolve to the base itself and are dropped below.
    let mut resolved = base.join(href).ok()?;
    resolved.set_query(None);
    resolved.set_fragment(None);

    if resolved.scheme() != base.scheme()
        || resolved.host_str() != base.host_str()
        || resolved.port_or_known_default() != base.port_or_known_default()
    {
        return None;
    }

    let rest = resolved.path().strip_prefix(base.path())?;
    let entry = percent_decode_str(rest).decode_utf8_lossy().into_owned();

    let name = entry.strip_suffix('/').unwrap_or(&entry);
    if name.is_empty() || name.contains('/') || name == "." || name == ".." {
        return None;
    }

    Some(entry)
}

/// Decode named and numeric character references in an attribute value.
///
/// Unknown names and invalid code points are left as written.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    ENTITY
        .replace_all(raw, |caps: &regex::Captures<'_>| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else {
                caps.get(3).and_then(|name| named_entity(name.as_str()))
            };

            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}
