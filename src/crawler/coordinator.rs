//! Crawler coordinator - run lifecycle orchestration
//!
//! This module wires the collaborators of one run together:
//! - Startup checks (base URL, output directory, renderer reachability)
//! - Loading the prior report and deriving the pre-existing URL set
//! - Seeding the frontier from the site root and discovery
//! - Driving the scheduler until the frontier drains or shutdown is requested
//! - Merging and persisting the report and its summary

use crate::config::Config;
use crate::crawler::renderer::PageRenderer;
use crate::crawler::scheduler::{CrawlOutcome, Scheduler};
use crate::crawler::webdriver::WebDriverRenderer;
use crate::discovery::{DiscoveryProvider, HttpDiscovery};
use crate::output::write_summary;
use crate::report::{merge, Report};
use crate::state::Frontier;
use crate::storage::{preexisting_urls, JsonReportStore, ReportStore};
use crate::url::parse_base_url;
use crate::Result;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    renderer: Arc<dyn PageRenderer>,
    discovery: Arc<dyn DiscoveryProvider>,
    store: JsonReportStore,
    shutdown: Arc<AtomicBool>,
}

impl Coordinator {
    /// Creates a coordinator backed by WebDriver capture and HTTP discovery
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Collaborators were built
    /// * `Err(FrameError)` - An HTTP client could not be created
    pub fn new(config: Config) -> Result<Self> {
        let renderer = WebDriverRenderer::new(&config.renderer, &config.output.directory)?;
        let discovery = HttpDiscovery::new(&config.renderer.user_agent)?;
        Ok(Self::with_collaborators(
            config,
            Arc::new(renderer),
            Arc::new(discovery),
        ))
    }

    /// Creates a coordinator around caller-supplied collaborators
    pub fn with_collaborators(
        config: Config,
        renderer: Arc<dyn PageRenderer>,
        discovery: Arc<dyn DiscoveryProvider>,
    ) -> Self {
        let store = JsonReportStore::from_config(&config.output);
        Self {
            config,
            renderer,
            discovery,
            store,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops dispatching new captures once set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn store(&self) -> &JsonReportStore {
        &self.store
    }

    /// Runs one crawl and persists the merged report
    ///
    /// Startup failures (invalid base URL, output directory, unreachable
    /// renderer, corrupt prior report) abort before anything is captured.
    /// Per-page failures are recorded in the report instead.
    ///
    /// # Returns
    ///
    /// * `Ok(Report)` - The merged report, already written with its summary
    /// * `Err(FrameError)` - A startup check failed or the report could not be written
    pub async fn run(&self) -> Result<Report> {
        let base_url = parse_base_url(&self.config.target.base_url)?;
        tracing::info!("Starting crawl run for {}", base_url);

        self.store.ensure_output_dir()?;
        self.renderer.test_connection(base_url.as_str()).await?;
        tracing::info!("Connection test passed");

        let previous = self.store.load()?;
        if let Some(report) = &previous {
            tracing::info!(
                "Loaded previous report: {} pages ({} successful)",
                report.total_pages,
                report.successful_screenshots
            );
        }

        let mut frontier = Frontier::new(preexisting_urls(previous.as_ref()));
        if frontier.preexisting_count() > 0 {
            tracing::info!(
                "{} pages from previous runs will not be captured again",
                frontier.preexisting_count()
            );
        }

        if !frontier.enqueue(base_url.as_str(), 0) {
            tracing::info!("Seed {} was captured in a previous run", base_url);
        }

        if self.config.discovery.is_enabled() {
            let discovered = self
                .discovery
                .discover(&base_url, (&self.config.discovery).into())
                .await;
            let added = discovered
                .iter()
                .filter(|url| frontier.enqueue(url, 1))
                .count();
            tracing::info!(
                "Discovery queued {} of {} URLs",
                added,
                discovered.len()
            );
        }

        let scheduler = Scheduler::new(
            self.config.crawler.clone(),
            base_url.clone(),
            Arc::clone(&self.renderer),
            Arc::clone(&self.shutdown),
        );

        match scheduler.run(&mut frontier).await {
            CrawlOutcome::Drained => tracing::info!("Frontier is empty, crawl complete"),
            CrawlOutcome::Cancelled => {
                tracing::warn!("Crawl interrupted, saving partial report")
            }
        }

        let stats = frontier.stats();
        tracing::info!(
            "Session: {} pages captured ({} successful, {} failed) in {:.1}s",
            stats.total,
            stats.success,
            stats.failed,
            frontier.elapsed().as_secs_f64()
        );

        let report = merge(
            &self.config.target.base_url,
            previous,
            frontier.into_results(),
        );
        self.store.save(&report)?;
        write_summary(&self.store, &report)?;
        tracing::info!("Report saved to {}", self.store.report_path().display());

        Ok(report)
    }
}

/// Runs a complete crawl with the default collaborators
pub async fn run_crawl(config: Config) -> Result<Report> {
    Coordinator::new(config)?.run().await
}
