//! URL discovery from auxiliary sources
//!
//! Discovery seeds the frontier with URLs the link graph may never reach:
//! - `<origin>/sitemap.xml`
//! - sitemaps referenced by `Sitemap:` lines in `<origin>/robots.txt`
//! - one level of `<sitemapindex>` children for either source
//!
//! Discovery is best-effort. Every fetch or parse failure is logged and
//! contributes nothing; it never fails the run.

mod robots;
mod sitemap;

pub use robots::sitemap_references;
pub use sitemap::{extract_loc_values, SitemapDocument};

use crate::crawler::{build_http_client, fetch_text};
use crate::url::{is_in_scope, normalize_url, resolve_link};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Maximum child sitemaps fetched from one sitemap index
pub const MAX_CHILD_SITEMAPS: usize = 50;

/// Timeout for each discovery request
const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Which auxiliary sources to consult
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    pub sitemap: bool,
    pub robots: bool,
}

impl From<&crate::config::DiscoveryConfig> for DiscoveryOptions {
    fn from(config: &crate::config::DiscoveryConfig) -> Self {
        Self {
            sitemap: config.sitemap,
            robots: config.robots,
        }
    }
}

/// A source of candidate URLs for the initial frontier
#[async_trait]
pub trait DiscoveryProvider: Send + Sync {
    /// Returns in-scope, normalized URLs without duplicates, in discovery order
    ///
    /// Failures degrade to fewer (or zero) URLs rather than an error.
    async fn discover(&self, base: &Url, options: DiscoveryOptions) -> Vec<String>;
}

/// Discovery over HTTP from sitemap.xml and robots.txt
#[derive(Debug, Clone)]
pub struct HttpDiscovery {
    client: Client,
    max_child_sitemaps: usize,
}

impl HttpDiscovery {
    /// Creates a provider that identifies itself with `user_agent`
    pub fn new(user_agent: &str) -> crate::Result<Self> {
        let client = build_http_client(user_agent, DISCOVERY_TIMEOUT)?;
        Ok(Self::with_client(client))
    }

    /// Creates a provider around an existing HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            max_child_sitemaps: MAX_CHILD_SITEMAPS,
        }
    }

    /// Caps how many children of a sitemap index are fetched
    pub fn with_max_child_sitemaps(mut self, max: usize) -> Self {
        self.max_child_sitemaps = max;
        self
    }

    /// Fetches a sitemap and, for an index, its children
    ///
    /// # Returns
    ///
    /// Raw `<loc>` page URLs; empty on any failure
    async fn collect_sitemap(&self, sitemap_url: &str) -> Vec<String> {
        let children = match self.fetch_document(sitemap_url).await {
            Some(SitemapDocument::UrlSet(urls)) => return urls,
            Some(SitemapDocument::Index(children)) => children,
            None => return Vec::new(),
        };

        if children.len() > self.max_child_sitemaps {
            tracing::warn!(
                "Sitemap index {} lists {} sitemaps, reading the first {}",
                sitemap_url,
                children.len(),
                self.max_child_sitemaps
            );
        }

        let mut urls = Vec::new();
        for child in children.iter().take(self.max_child_sitemaps) {
            match self.fetch_document(child).await {
                Some(SitemapDocument::UrlSet(child_urls)) => urls.extend(child_urls),
                Some(SitemapDocument::Index(_)) => {
                    tracing::debug!("Ignoring nested sitemap index {}", child);
                }
                None => {}
            }
        }
        urls
    }

    async fn fetch_document(&self, sitemap_url: &str) -> Option<SitemapDocument> {
        let body = match fetch_text(&self.client, sitemap_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Sitemap fetch error ({}): {}", sitemap_url, e);
                return None;
            }
        };

        let document = SitemapDocument::parse(&body);
        if document.is_none() {
            tracing::warn!("Sitemap parse error ({}): not a urlset or sitemap index", sitemap_url);
        }
        document
    }

    async fn collect_robots(&self, base: &Url) -> Vec<String> {
        let robots_url = match base.join("/robots.txt") {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot build robots.txt URL for {}: {}", base, e);
                return Vec::new();
            }
        };

        let content = match fetch_text(&self.client, robots_url.as_str()).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Robots.txt fetch error: {}", e);
                return Vec::new();
            }
        };

        let sitemaps = sitemap_references(&content);
        tracing::debug!("robots.txt references {} sitemap(s)", sitemaps.len());

        let mut urls = Vec::new();
        for sitemap_url in sitemaps {
            urls.extend(self.collect_sitemap(&sitemap_url).await);
        }
        urls
    }
}

#[async_trait]
impl DiscoveryProvider for HttpDiscovery {
    async fn discover(&self, base: &Url, options: DiscoveryOptions) -> Vec<String> {
        let mut candidates = Vec::new();

        if options.sitemap {
            let urls = match base.join("/sitemap.xml") {
                Ok(sitemap_url) => self.collect_sitemap(sitemap_url.as_str()).await,
                Err(e) => {
                    tracing::warn!("Cannot build sitemap URL for {}: {}", base, e);
                    Vec::new()
                }
            };
            tracing::info!("Sitemap discovery: {} URLs found", urls.len());
            candidates.extend(urls);
        }

        if options.robots {
            let urls = self.collect_robots(base).await;
            tracing::info!("Robots.txt discovery: {} URLs found", urls.len());
            candidates.extend(urls);
        }

        filter_candidates(candidates, base)
    }
}

/// Resolves, scope-checks and normalizes candidates, keeping first occurrences
pub fn filter_candidates<I>(candidates: I, base: &Url) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for candidate in candidates {
        let Ok(resolved) = resolve_link(&candidate, base) else {
            tracing::trace!("Dropping unresolvable discovery candidate {}", candidate);
            continue;
        };
        if !is_in_scope(&resolved, base) {
            tracing::trace!("Dropping out-of-scope discovery candidate {}", resolved);
            continue;
        }
        let normalized = normalize_url(&resolved);
        if seen.insert(normalized.clone()) {
            urls.push(normalized);
        }
    }

    urls
}
