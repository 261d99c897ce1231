use crate::{UrlError, UrlResult};
use url::Url;

/// File extensions that are never treated as capturable pages
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".zip", ".rar", ".exe", ".dmg", ".pkg", ".mp4",
    ".avi", ".mov", ".mp3", ".wav", ".jpg", ".jpeg", ".png", ".gif", ".svg",
];

/// Pseudo-schemes rejected wherever they appear in a raw link
const PSEUDO_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:"];

/// Checks whether a candidate URL belongs to the crawl target
///
/// A candidate is in scope when it has the same scheme, host and port as
/// `base`, its path does not end in an excluded file extension, and the raw
/// string carries no `mailto:`, `tel:` or `javascript:` pseudo-scheme.
///
/// # Arguments
///
/// * `candidate` - Absolute URL string to check
/// * `base` - The crawl target's base URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_frame::url::is_in_scope;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// assert!(is_in_scope("https://example.com/about", &base));
/// assert!(!is_in_scope("https://other.com/about", &base));
/// assert!(!is_in_scope("https://example.com/brochure.PDF", &base));
/// ```
pub fn is_in_scope(candidate: &str, base: &Url) -> bool {
    let lowered = candidate.to_ascii_lowercase();
    if PSEUDO_SCHEMES.iter().any(|scheme| lowered.contains(scheme)) {
        return false;
    }

    let url = match Url::parse(candidate) {
        Ok(url) => url,
        Err(_) => return false,
    };

    if url.scheme() != base.scheme()
        || url.host_str() != base.host_str()
        || url.port_or_known_default() != base.port_or_known_default()
    {
        return false;
    }

    !has_excluded_extension(url.path())
}

/// Returns true if the path ends in one of [`EXCLUDED_EXTENSIONS`] (case-insensitive)
pub fn has_excluded_extension(path: &str) -> bool {
    let lowered = path.to_ascii_lowercase();
    EXCLUDED_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

/// Resolves a link found on a page against a base URL
///
/// Absolute http(s) links are returned unchanged; anything else is joined
/// onto `base` using standard reference resolution.
pub fn resolve_link(link: &str, base: &Url) -> UrlResult<String> {
    let link = link.trim();
    let lowered = link.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        return Ok(link.to_string());
    }

    base.join(link)
        .map(|url| url.to_string())
        .map_err(|e| UrlError::Parse(format!("{}: {}", link, e)))
}

/// Parses and checks a crawl target URL
///
/// # Returns
///
/// * `Ok(Url)` - An http(s) URL with a host
/// * `Err(UrlError)` - The URL is malformed, uses another scheme, or has no host
pub fn parse_base_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Prefixes `https://` when the input carries no scheme
pub fn ensure_scheme(url_str: &str) -> String {
    if url_str.contains("://") || url_str.is_empty() {
        url_str.to_string()
    } else {
        format!("https://{}", url_str)
    }
}
