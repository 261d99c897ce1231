use serde::Deserialize;
use std::path::PathBuf;

/// Default skip patterns applied when the config does not list any
pub const DEFAULT_SKIP_PATTERNS: &[&str] = &["/wp-admin"];

/// Default browser user agent presented by the renderer
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Main configuration structure for Sumi-Frame
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub target: TargetConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration with defaults for everything except the target
    pub fn for_target(base_url: &str) -> Self {
        Self {
            target: TargetConfig {
                base_url: base_url.to_string(),
            },
            crawler: CrawlerConfig::default(),
            discovery: DiscoveryConfig::default(),
            renderer: RendererConfig::default(),
            output: OutputConfig::default(),
        }
    }

    /// Path of the persisted JSON report
    pub fn report_path(&self) -> PathBuf {
        self.output.directory.join(&self.output.report_file)
    }

    /// Path of the human-readable summary
    pub fn summary_path(&self) -> PathBuf {
        self.output.directory.join(&self.output.summary_file)
    }
}

/// The site being crawled
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Root URL of the site; also the crawl seed
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of link hops from the seed
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of captures in flight; 1 selects sequential mode
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Fixed delay between page dispatches (milliseconds)
    #[serde(rename = "request-delay", default = "default_request_delay")]
    pub request_delay: u64,

    /// Case-insensitive substrings; matching URLs are never captured
    #[serde(rename = "skip-patterns", default = "default_skip_patterns")]
    pub skip_patterns: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            concurrency: default_concurrency(),
            request_delay: default_request_delay(),
            skip_patterns: default_skip_patterns(),
        }
    }
}

impl CrawlerConfig {
    /// Returns true when pages are captured one at a time
    pub fn is_sequential(&self) -> bool {
        self.concurrency <= 1
    }
}

/// Auxiliary URL sources used to seed the frontier
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Read `<origin>/sitemap.xml`
    #[serde(default = "default_true")]
    pub sitemap: bool,

    /// Follow `Sitemap:` references in `<origin>/robots.txt`
    #[serde(default = "default_true")]
    pub robots: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            sitemap: true,
            robots: true,
        }
    }
}

impl DiscoveryConfig {
    pub fn is_enabled(&self) -> bool {
        self.sitemap || self.robots
    }
}

/// Headless browser settings for page capture
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// W3C WebDriver endpoint (e.g. chromedriver)
    #[serde(rename = "webdriver-url", default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// User agent for both the browser and plain HTTP fetches
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    #[serde(rename = "viewport-width", default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(rename = "viewport-height", default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Time to let the page settle after navigation (milliseconds)
    #[serde(rename = "settle-delay", default = "default_settle_delay")]
    pub settle_delay: u64,

    /// Upper bound for one whole capture (milliseconds)
    #[serde(rename = "page-timeout", default = "default_page_timeout")]
    pub page_timeout: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            user_agent: default_user_agent(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            settle_delay: default_settle_delay(),
            page_timeout: default_page_timeout(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving captures, the report and the summary
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    #[serde(rename = "report-file", default = "default_report_file")]
    pub report_file: String,

    #[serde(rename = "summary-file", default = "default_summary_file")]
    pub summary_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            report_file: default_report_file(),
            summary_file: default_summary_file(),
        }
    }
}

fn default_max_depth() -> u32 {
    5
}

fn default_concurrency() -> u32 {
    5
}

fn default_request_delay() -> u64 {
    1000
}

fn default_skip_patterns() -> Vec<String> {
    DEFAULT_SKIP_PATTERNS.iter().map(|p| p.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_webdriver_url() -> String {
    "http://127.0.0.1:9515".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_viewport_width() -> u32 {
    1920
}

fn default_viewport_height() -> u32 {
    1080
}

fn default_settle_delay() -> u64 {
    3000
}

fn default_page_timeout() -> u64 {
    30_000
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("screenshots")
}

fn default_report_file() -> String {
    "report.json".to_string()
}

fn default_summary_file() -> String {
    "summary.txt".to_string()
}
