/// Ensure a non-empty directory path ends with `/`.
///
/// The empty path (the repository root) is left untouched.
pub fn normalize_directory(path: &str) -> String {
    if path.is_empty() || path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

/// Build the listing URL for `path` below `base_url`.
///
/// The result is `base_url + "/" + normalize_directory(path)`; no other
/// rewriting of either part happens.
///
/// # Examples
///
/// ```
/// use haul_listing::listing_url;
///
/// assert_eq!(
///     listing_url("https://repo.example/releases", "com/acme/lib"),
///     "https://repo.example/releases/com/acme/lib/"
/// );
/// assert_eq!(listing_url("https://repo.example/releases", ""), "https://repo.example/releases/");
/// ```
pub fn listing_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url, normalize_directory(path))
}
