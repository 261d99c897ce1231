//! Per-page capture outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The result of one capture attempt
///
/// Success and error are mutually exclusive: a successful outcome never
/// carries an error message and a failed one always does. Outcomes are
/// immutable once recorded in the frontier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOutcome {
    pub url: String,
    pub filename: String,
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Completion time of the capture
    pub timestamp: DateTime<Utc>,

    /// Size of the written artifact in bytes
    #[serde(default, skip_serializing_if = "is_zero")]
    pub file_size: u64,

    /// Capture duration in milliseconds
    #[serde(default, skip_serializing_if = "is_zero")]
    pub duration: u64,
}

impl CaptureOutcome {
    /// Builds a successful outcome stamped with the current time
    pub fn succeeded(url: &str, filename: &str, file_size: u64, duration: u64) -> Self {
        Self {
            url: url.to_string(),
            filename: filename.to_string(),
            success: true,
            error: None,
            timestamp: Utc::now(),
            file_size,
            duration,
        }
    }

    /// Builds a failed outcome stamped with the current time
    ///
    /// An empty reason is replaced so a failure is never recorded without one.
    pub fn failed(url: &str, filename: &str, error: &str, duration: u64) -> Self {
        let error = if error.trim().is_empty() {
            "unknown error".to_string()
        } else {
            error.to_string()
        };

        Self {
            url: url.to_string(),
            filename: filename.to_string(),
            success: false,
            error: Some(error),
            timestamp: Utc::now(),
            file_size: 0,
            duration,
        }
    }

    /// Failure reason, or an empty string for successes
    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}
