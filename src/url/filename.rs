use chrono::Utc;
use url::Url;

/// Extension appended to every capture filename
pub const CAPTURE_EXTENSION: &str = ".png";

const MAX_STEM_LEN: usize = 200;

/// Derives the capture filename for a page URL
///
/// The path's `/` separators become `_` (the root maps to `homepage`), a
/// query string is appended with its `=`/`&` turned into `_`, and the result
/// is reduced to `[A-Za-z0-9_-]`, with runs of `_` collapsed, edges trimmed
/// and length capped at 200. A name that sanitizes to nothing falls back to a
/// timestamp so captures never collide silently on an empty stem.
///
/// # Examples
///
/// ```
/// use sumi_frame::url::derive_filename;
///
/// assert_eq!(derive_filename("https://example.com/"), "homepage.png");
/// assert_eq!(derive_filename("https://example.com/blog/post-1"), "blog_post-1.png");
/// assert_eq!(derive_filename("https://example.com/search?q=rust&p=2"), "search_q_rust_p_2.png");
/// ```
pub fn derive_filename(url_str: &str) -> String {
    let url = match Url::parse(url_str) {
        Ok(url) => url,
        Err(_) => return format!("{}{}", timestamp_stem(), CAPTURE_EXTENSION),
    };

    let mut stem = url.path().replace('/', "_");
    if stem.is_empty() || stem == "_" {
        stem = "homepage".to_string();
    }

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        stem.push('_');
        stem.push_str(&query.replace(['=', '&'], "_"));
    }

    let mut stem = sanitize_stem(&stem);
    if stem.is_empty() {
        stem = timestamp_stem();
    }

    format!("{}{}", stem, CAPTURE_EXTENSION)
}

/// Restricts a filename stem to `[A-Za-z0-9_-]`
fn sanitize_stem(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches('_');
    trimmed.chars().take(MAX_STEM_LEN).collect()
}

fn timestamp_stem() -> String {
    format!("page_{}", Utc::now().format("%Y%m%d_%H%M%S"))
}
