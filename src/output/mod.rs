//! Output module for crawl summaries and statistics
//!
//! This module handles:
//! - Generating the plain-text summary written next to the report
//! - Printing statistics of a persisted report to the terminal

mod summary;
pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};
pub use summary::{format_summary, write_summary};
