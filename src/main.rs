//! Sumi-Frame main entry point
//!
//! This is the command-line interface for the Sumi-Frame page capture crawler.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use sumi_frame::config::{compute_config_hash, parse_config, validate, Config};
use sumi_frame::crawler::Coordinator;
use sumi_frame::output::{print_statistics, write_summary, CrawlStatistics};
use sumi_frame::storage::{JsonReportStore, ReportStore};
use sumi_frame::url::ensure_scheme;
use tracing_subscriber::EnvFilter;

/// Sumi-Frame: a same-origin page capture crawler
///
/// Sumi-Frame crawls one website breadth-first, captures every page it
/// reaches through a headless browser, and keeps a report that grows with
/// each run. Pages captured by earlier runs are not captured again.
#[derive(Parser, Debug)]
#[command(name = "sumi-frame")]
#[command(version = "1.0.0")]
#[command(about = "A same-origin page capture crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Site to crawl; required without a configuration file
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Maximum link hops from the site root (1-10)
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Maximum captures in flight (1-10, 1 is sequential)
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Delay between page dispatches in milliseconds
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Extra skip pattern, may be repeated
    #[arg(long = "skip", value_name = "PATTERN")]
    skip: Vec<String>,

    /// Do not read sitemap.xml
    #[arg(long)]
    no_sitemap: bool,

    /// Do not follow sitemap references in robots.txt
    #[arg(long)]
    no_robots: bool,

    /// Output directory for captures, report and summary
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show statistics from the persisted report and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Regenerate the summary from the persisted report and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
        Ok(())
    } else if cli.stats {
        handle_stats(&config)
    } else if cli.export_summary {
        handle_export_summary(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_frame=info,warn"),
            1 => EnvFilter::new("sumi_frame=debug,info"),
            2 => EnvFilter::new("sumi_frame=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (or defaults), applies overrides, and validates
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("cannot parse {}", path.display()))?;
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            let url = cli
                .url
                .as_deref()
                .context("either a CONFIG file or --url is required")?;
            Config::for_target(&ensure_scheme(url.trim()))
        }
    };

    apply_overrides(&mut config, cli);
    validate(&config)?;
    Ok(config)
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.url {
        config.target.base_url = ensure_scheme(url.trim());
    }
    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(delay) = cli.delay {
        config.crawler.request_delay = delay;
    }
    config.crawler.skip_patterns.extend(cli.skip.iter().cloned());
    if cli.no_sitemap {
        config.discovery.sitemap = false;
    }
    if cli.no_robots {
        config.discovery.robots = false;
    }
    if let Some(output) = &cli.output {
        config.output.directory = output.clone();
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Frame Dry Run ===\n");

    println!("Target: {}", config.target.base_url);

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    if config.crawler.is_sequential() {
        println!("  Mode: sequential");
    } else {
        println!("  Mode: parallel ({} captures)", config.crawler.concurrency);
    }
    println!("  Request delay: {}ms", config.crawler.request_delay);
    println!("  Skip patterns ({}):", config.crawler.skip_patterns.len());
    for pattern in &config.crawler.skip_patterns {
        println!("    - {}", pattern);
    }

    println!("\nDiscovery:");
    println!("  Sitemap: {}", enabled(config.discovery.sitemap));
    println!("  Robots.txt: {}", enabled(config.discovery.robots));

    println!("\nRenderer:");
    println!("  WebDriver: {}", config.renderer.webdriver_url);
    println!(
        "  Viewport: {}x{}",
        config.renderer.viewport_width, config.renderer.viewport_height
    );
    println!("  Settle delay: {}ms", config.renderer.settle_delay);
    println!("  Page timeout: {}ms", config.renderer.page_timeout);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());
    println!("  Report: {}", config.report_path().display());
    println!("  Summary: {}", config.summary_path().display());

    println!("\n✓ Configuration is valid");
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}

/// Handles the --stats mode: shows statistics of the persisted report
fn handle_stats(config: &Config) -> Result<()> {
    let store = JsonReportStore::from_config(&config.output);
    println!("Report: {}\n", store.report_path().display());

    match store.load()? {
        Some(report) => print_statistics(&CrawlStatistics::from_report(&report)),
        None => println!("No report found. Run a crawl first."),
    }

    Ok(())
}

/// Handles the --export-summary mode: rewrites the summary from the report
fn handle_export_summary(config: &Config) -> Result<()> {
    let store = JsonReportStore::from_config(&config.output);

    println!("=== Exporting Crawl Summary ===\n");
    println!("Report: {}", store.report_path().display());
    println!("Output: {}", store.summary_path().display());
    println!();

    let report = store
        .load()?
        .with_context(|| format!("no report at {}", store.report_path().display()))?;

    write_summary(&store, &report)?;
    println!("✓ Summary exported to: {}", store.summary_path().display());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> Result<()> {
    tracing::info!(
        "Crawling {} (max depth {}, concurrency {})",
        config.target.base_url,
        config.crawler.max_depth,
        config.crawler.concurrency
    );

    let coordinator = Coordinator::new(config).context("cannot start crawler")?;

    let shutdown = coordinator.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, waiting for in-flight captures");
            shutdown.store(true, Ordering::SeqCst);
        }
    });

    match coordinator.run().await {
        Ok(report) => {
            tracing::info!(
                "Crawl completed successfully: {} new pages, {} total",
                report.new_pages_in_this_run,
                report.total_pages
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
