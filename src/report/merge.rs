use crate::report::Report;
use crate::state::CaptureOutcome;
use chrono::Utc;

/// Combines a prior report with this run's outcomes
///
/// The merged result list is the previous list followed by `this_run`, with
/// no de-duplication. Counts, total duration and the average artifact size
/// (over successful outcomes only, zero when there are none) are recomputed
/// from the merged list. `last_update` is set only when `this_run` is
/// non-empty.
///
/// # Arguments
///
/// * `base_url` - Site the report describes
/// * `previous` - The persisted report, if one exists
/// * `this_run` - Outcomes recorded during the current run
///
/// # Example
///
/// ```
/// use sumi_frame::{merge, CaptureOutcome};
///
/// let run = vec![CaptureOutcome::succeeded("https://example.com/", "homepage.png", 1024, 900)];
/// let report = merge("https://example.com", None, run);
/// assert_eq!(report.total_pages, 1);
/// assert_eq!(report.average_page_size, 1024);
/// ```
pub fn merge(base_url: &str, previous: Option<Report>, this_run: Vec<CaptureOutcome>) -> Report {
    let new_pages = this_run.len();

    let mut results = previous.map(|report| report.results).unwrap_or_default();
    results.extend(this_run);

    let mut successful = 0usize;
    let mut total_duration = 0u64;
    let mut success_size = 0u64;
    for result in &results {
        if result.success {
            successful += 1;
            success_size += result.file_size;
        }
        total_duration += result.duration;
    }

    let average_page_size = if successful > 0 {
        success_size / successful as u64
    } else {
        0
    };

    let timestamp = Utc::now();

    Report {
        base_url: base_url.to_string(),
        total_pages: results.len(),
        successful_screenshots: successful,
        failed_screenshots: results.len() - successful,
        timestamp,
        last_update: (new_pages > 0).then_some(timestamp),
        new_pages_in_this_run: new_pages,
        total_duration,
        average_page_size,
        results,
    }
}
