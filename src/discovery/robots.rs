//! Robots.txt sitemap references
//!
//! Discovery only needs the `Sitemap:` lines of robots.txt; line parsing is
//! left to the robotstxt crate.

use robotstxt::{parse_robotstxt, RobotsParseHandler};

/// Collects `Sitemap:` values while robots.txt is parsed
#[derive(Debug, Default)]
struct SitemapCollector {
    sitemaps: Vec<String>,
}

impl RobotsParseHandler for SitemapCollector {
    fn handle_robots_start(&mut self) {}

    fn handle_robots_end(&mut self) {}

    fn handle_user_agent(&mut self, _line_num: u32, _user_agent: &str) {}

    fn handle_allow(&mut self, _line_num: u32, _value: &str) {}

    fn handle_disallow(&mut self, _line_num: u32, _value: &str) {}

    fn handle_sitemap(&mut self, _line_num: u32, value: &str) {
        let value = value.trim();
        if value.to_ascii_lowercase().starts_with("http") && !self.sitemaps.iter().any(|s| s == value) {
            self.sitemaps.push(value.to_string());
        }
    }

    fn handle_unknown_action(&mut self, _line_num: u32, _action: &str, _value: &str) {}
}

/// Extracts absolute sitemap URLs referenced by robots.txt content
///
/// # Arguments
///
/// * `content` - The raw robots.txt file content
///
/// # Returns
///
/// Sitemap URLs in file order, without duplicates. Relative references are
/// dropped.
pub fn sitemap_references(content: &str) -> Vec<String> {
    let mut collector = SitemapCollector::default();
    parse_robotstxt(content, &mut collector);
    collector.sitemaps
}
