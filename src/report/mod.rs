//! Persisted crawl report and the merge that extends it run over run
//!
//! The report is a superset of every run's outcomes. Merging appends the
//! current run's outcomes to the prior list without de-duplication and
//! recomputes every aggregate from the merged list.

mod merge;

pub use merge::merge;

use crate::state::CaptureOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted record of all captures made for a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub base_url: String,
    pub total_pages: usize,
    pub successful_screenshots: usize,
    pub failed_screenshots: usize,

    /// Time the report was produced
    pub timestamp: DateTime<Utc>,

    /// Set only when the producing run added outcomes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,

    pub new_pages_in_this_run: usize,

    /// Sum of every outcome's duration (milliseconds)
    pub total_duration: u64,

    /// Mean artifact size over successful outcomes (bytes)
    pub average_page_size: u64,

    #[serde(default)]
    pub results: Vec<CaptureOutcome>,
}

impl Report {
    /// Outcomes appended by the run that produced this report
    pub fn new_results(&self) -> &[CaptureOutcome] {
        let start = self.results.len().saturating_sub(self.new_pages_in_this_run);
        &self.results[start..]
    }

    /// Total bytes written by successful captures
    pub fn total_success_size(&self) -> u64 {
        self.results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.file_size)
            .sum()
    }

    /// URLs whose capture succeeded in any run
    pub fn successful_urls(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.url.as_str())
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaptureOutcome> {
        self.results.iter().filter(|r| !r.success)
    }
}
