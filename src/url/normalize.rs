use url::Url;

/// Canonicalizes a URL into the identity used for every dedup decision
///
/// # Normalization Steps
///
/// 1. Parse the URL; input that does not parse is returned trimmed but
///    otherwise untouched, so it still has a stable identity
/// 2. Remove fragment (everything after #)
/// 3. Remove the query string
/// 4. Empty path becomes /
/// 5. Remove trailing slashes (except for root /)
///
/// Host lowercasing and dot-segment removal come from the URL parser itself.
/// The function is idempotent: normalizing a normalized URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use sumi_frame::url::normalize_url;
///
/// assert_eq!(
///     normalize_url("https://EXAMPLE.com/page/?utm_source=x#top"),
///     "https://example.com/page"
/// );
/// ```
pub fn normalize_url(url_str: &str) -> String {
    let trimmed = url_str.trim();
    let mut url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(_) => return trimmed.to_string(),
    };

    url.set_fragment(None);
    url.set_query(None);

    let path = normalize_path(url.path());
    url.set_path(&path);

    url.to_string()
}

/// Strips trailing slashes from a non-root path
fn normalize_path(path: &str) -> String {
    let stripped = path.trim_end_matches('/');
    if stripped.is_empty() {
        "/".to_string()
    } else {
        stripped.to_string()
    }
}
