//! Crawler module for page capture and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - The page renderer contract and its WebDriver implementation
//! - HTTP fetching and HTML link extraction
//! - Frontier scheduling, sequential or bounded-parallel
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod parser;
mod renderer;
mod scheduler;
mod webdriver;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, check_reachable, fetch_text, fetch_url, FetchResult};
pub use parser::extract_links;
pub use renderer::{CaptureResponse, PageRenderer};
pub use scheduler::{CrawlOutcome, Scheduler};
pub use webdriver::WebDriverRenderer;

use crate::config::Config;
use crate::report::Report;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Check the output directory and the renderer
/// 2. Load the prior report, if any
/// 3. Seed the frontier from the site root and discovery
/// 4. Capture pages and follow their links
/// 5. Merge and save the report and summary
///
/// # Arguments
///
/// * `config` - A validated configuration
///
/// # Returns
///
/// * `Ok(Report)` - The merged report
/// * `Err(FrameError)` - Startup failed or the report could not be written
pub async fn crawl(config: Config) -> Result<Report> {
    run_crawl(config).await
}
