/// Checks if a URL matches any configured skip pattern
///
/// Patterns are plain substrings compared case-insensitively against the raw
/// URL, so `/wp-admin` matches `https://example.com/WP-Admin/login`.
///
/// # Arguments
///
/// * `url` - The URL to test
/// * `patterns` - Skip patterns from the crawler configuration
///
/// # Returns
///
/// * `true` - If any pattern is contained in the URL
/// * `false` - Otherwise, including when `patterns` is empty
///
/// # Examples
///
/// ```
/// use sumi_frame::url::matches_skip_pattern;
///
/// let patterns = vec!["/wp-admin".to_string()];
/// assert!(matches_skip_pattern("https://example.com/wp-admin/login", &patterns));
/// assert!(!matches_skip_pattern("https://example.com/blog", &patterns));
/// ```
pub fn matches_skip_pattern(url: &str, patterns: &[String]) -> bool {
    let lowered = url.to_lowercase();
    patterns
        .iter()
        .filter(|pattern| !pattern.is_empty())
        .any(|pattern| lowered.contains(&pattern.to_lowercase()))
}
