//! Statistics derived from a persisted report
//!
//! This module backs the `--stats` view of the CLI.

use crate::report::Report;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    pub base_url: String,

    /// Outcomes across all runs
    pub total_pages: usize,

    pub successful: usize,
    pub failed: usize,

    /// Outcomes added by the latest run
    pub new_in_last_run: usize,

    /// Distinct URLs across all runs
    pub unique_urls: usize,

    /// Total capture time in milliseconds
    pub total_duration: u64,

    /// Bytes written by successful captures
    pub total_size: u64,

    pub average_page_size: u64,

    /// Failure reasons and how often they occurred
    pub error_summary: BTreeMap<String, usize>,
}

impl CrawlStatistics {
    /// Computes statistics from a report
    pub fn from_report(report: &Report) -> Self {
        let mut error_summary = BTreeMap::new();
        for failure in report.failures() {
            *error_summary
                .entry(failure.error_text().to_string())
                .or_insert(0) += 1;
        }

        let unique_urls = report
            .results
            .iter()
            .map(|r| crate::url::normalize_url(&r.url))
            .collect::<std::collections::HashSet<_>>()
            .len();

        Self {
            base_url: report.base_url.clone(),
            total_pages: report.total_pages,
            successful: report.successful_screenshots,
            failed: report.failed_screenshots,
            new_in_last_run: report.new_pages_in_this_run,
            unique_urls,
            total_duration: report.total_duration,
            total_size: report.total_success_size(),
            average_page_size: report.average_page_size,
            error_summary,
        }
    }

    /// Percentage of outcomes that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.total_pages > 0 {
            (self.successful as f64 / self.total_pages as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Site: {}", stats.base_url);
    println!("  Total captures: {}", stats.total_pages);
    println!("  Unique URLs: {}", stats.unique_urls);
    println!("  New in last run: {}", stats.new_in_last_run);
    println!();

    println!("Captures:");
    println!("  Successful: {}", stats.successful);
    println!("  Failed: {}", stats.failed);
    println!(
        "  Total duration: {:.2} seconds",
        stats.total_duration as f64 / 1000.0
    );
    println!(
        "  Total size: {:.2} KB (average {:.2} KB)",
        stats.total_size as f64 / 1024.0,
        stats.average_page_size as f64 / 1024.0
    );
    println!();

    if !stats.error_summary.is_empty() {
        println!("Error Summary:");
        let mut error_counts: Vec<_> = stats.error_summary.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (reason, count) in error_counts {
            println!("  {}: {}", reason, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} captures succeeded)",
        stats.success_rate(),
        stats.successful,
        stats.total_pages
    );
}
