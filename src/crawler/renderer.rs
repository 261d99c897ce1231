//! The page renderer contract
//!
//! A renderer turns a URL into a captured artifact and reports the page's
//! outbound links. The scheduler calls it concurrently up to the configured
//! pool size, so implementations must not share mutable state across calls.

use crate::state::CaptureOutcome;
use crate::Result;
use async_trait::async_trait;

/// What a renderer reports for one capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResponse {
    pub success: bool,
    pub filename: String,
    pub byte_size: u64,
    pub duration_ms: u64,
    pub error: Option<String>,
}

impl CaptureResponse {
    pub fn succeeded(filename: impl Into<String>, byte_size: u64, duration_ms: u64) -> Self {
        Self {
            success: true,
            filename: filename.into(),
            byte_size,
            duration_ms,
            error: None,
        }
    }

    pub fn failed(filename: impl Into<String>, error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            success: false,
            filename: filename.into(),
            byte_size: 0,
            duration_ms,
            error: Some(error.into()),
        }
    }

    /// Converts the response into the outcome recorded for `url`
    pub fn into_outcome(self, url: &str) -> CaptureOutcome {
        if self.success {
            CaptureOutcome::succeeded(url, &self.filename, self.byte_size, self.duration_ms)
        } else {
            CaptureOutcome::failed(
                url,
                &self.filename,
                self.error.as_deref().unwrap_or_default(),
                self.duration_ms,
            )
        }
    }
}

/// Captures pages and lists their links
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Captures `url`; failures are reported in the response, never as `Err`
    async fn capture(&self, url: &str) -> CaptureResponse;

    /// Lists the links on `url`, absolute or relative, in document order
    async fn extract_links(&self, url: &str) -> Result<Vec<String>>;

    /// One-time reachability check before a run starts
    async fn test_connection(&self, url: &str) -> Result<()>;
}
