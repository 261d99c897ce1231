//! Sitemap document parsing
//!
//! Only `<loc>` values matter for discovery, so documents are scanned for
//! them directly instead of being deserialized. Both `<urlset>` and
//! `<sitemapindex>` documents are recognized.

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: page URLs
    UrlSet(Vec<String>),

    /// `<sitemapindex>`: URLs of further sitemaps
    Index(Vec<String>),
}

impl SitemapDocument {
    /// Parses a sitemap body
    ///
    /// # Returns
    ///
    /// * `Some(SitemapDocument)` - The body is a urlset or a sitemap index
    /// * `None` - The body is neither (an HTML error page, for instance)
    pub fn parse(xml: &str) -> Option<Self> {
        if xml.contains("<sitemapindex") {
            Some(Self::Index(extract_loc_values(xml)))
        } else if xml.contains("<urlset") {
            Some(Self::UrlSet(extract_loc_values(xml)))
        } else {
            None
        }
    }
}

/// Extracts the text of every `<loc>` element, decoded
pub fn extract_loc_values(xml: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0usize;
    while let Some(open_idx) = xml[start..].find("<loc>") {
        let open = start + open_idx + "<loc>".len();
        let Some(close_rel) = xml[open..].find("</loc>") else {
            break;
        };
        let close = open + close_rel;
        let value = decode_text(xml[open..close].trim());
        if !value.is_empty() {
            out.push(value);
        }
        start = close + "</loc>".len();
    }
    out
}

/// Unwraps a CDATA section and decodes the predefined XML entities
fn decode_text(raw: &str) -> String {
    if let Some(inner) = raw
        .strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
    {
        return inner.trim().to_string();
    }

    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
