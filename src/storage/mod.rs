//! Storage module for persisting crawl reports
//!
//! This module handles the output location of a crawl:
//! - output directory creation
//! - loading the prior report and saving the merged one atomically
//! - writing the derived summary text
//! - deriving the pre-existing URL set from a prior report

mod json;
mod traits;

pub use json::JsonReportStore;
pub use traits::{ReportStore, StorageError, StorageResult};

use crate::report::Report;
use crate::url::normalize_url;
use std::collections::HashSet;

/// Normalized URLs captured successfully in a prior report
///
/// # Arguments
///
/// * `report` - The loaded report, if any
///
/// # Returns
///
/// The set handed to the frontier as its pre-existing URLs; empty when there
/// is no prior report
pub fn preexisting_urls(report: Option<&Report>) -> HashSet<String> {
    report
        .map(|report| report.successful_urls().map(normalize_url).collect())
        .unwrap_or_default()
}
