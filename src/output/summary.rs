//! Plain-text summary generation
//!
//! The summary is a derived view of the persisted report: aggregate numbers,
//! the pages added by the latest run, every successful page, and every
//! failure with its reason.

use crate::report::Report;
use crate::state::CaptureOutcome;
use crate::storage::{ReportStore, StorageResult};

/// Formats a report as summary text
///
/// # Arguments
///
/// * `report` - The merged report
/// * `new_results` - Outcomes added by the run that produced `report`
///
/// # Returns
///
/// The summary, with no terminal escape sequences
pub fn format_summary(report: &Report, new_results: &[CaptureOutcome]) -> String {
    let mut text = String::new();

    text.push_str(&format!("> Site: {}\n", report.base_url));
    text.push_str(&format!(
        "> Generated: {}\n",
        report.timestamp.format("%Y-%m-%d %H:%M:%S")
    ));
    text.push_str(&format!("> Total Pages: {}\n", report.total_pages));
    text.push_str(&format!("> Successful: {}\n", report.successful_screenshots));
    text.push_str(&format!("> Failed: {}\n", report.failed_screenshots));
    text.push_str(&format!("> New in this run: {}\n", report.new_pages_in_this_run));
    text.push_str(&format!(
        "> Total Duration: {:.2} seconds\n",
        report.total_duration as f64 / 1000.0
    ));
    text.push_str(&format!(
        "> Average Page Size: {:.2} KB\n\n",
        kilobytes(report.average_page_size)
    ));

    if !new_results.is_empty() {
        text.push_str(&format!("> Newly added pages ({}):\n", new_results.len()));
        for result in new_results {
            if result.success {
                text.push_str(&format!(
                    "> SUCCESS {} -> {} ({:.2}KB, {}ms)\n",
                    result.url,
                    result.filename,
                    kilobytes(result.file_size),
                    result.duration
                ));
            } else {
                text.push_str(&format!(
                    "> FAILED {} -> {} ({})\n",
                    result.url,
                    result.filename,
                    result.error_text()
                ));
            }
        }
        text.push('\n');
    }

    text.push_str("> All successful pages:\n");
    for result in report.results.iter().filter(|r| r.success) {
        text.push_str(&format!(
            "> SUCCESS {} -> {} ({:.2}KB)\n",
            result.url,
            result.filename,
            kilobytes(result.file_size)
        ));
    }

    if report.failed_screenshots > 0 {
        text.push_str("\n> Failed pages:\n");
        for result in report.failures() {
            text.push_str(&format!("> FAILED {} - {}\n", result.url, result.error_text()));
        }
    }

    text
}

/// Formats the report's summary and writes it through the store
pub fn write_summary(store: &dyn ReportStore, report: &Report) -> StorageResult<()> {
    let summary = format_summary(report, report.new_results());
    store.write_summary(&summary)
}

fn kilobytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}
