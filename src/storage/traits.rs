//! Storage traits and error types
//!
//! This module defines the trait interface for report storage backends and
//! associated error types.

use crate::report::Report;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Report at {path} is unreadable: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for report storage backends
///
/// A store owns one output location: the directory captures are written to,
/// the persisted report, and the derived summary text.
pub trait ReportStore {
    /// Creates the output location if it does not exist
    fn ensure_output_dir(&self) -> StorageResult<()>;

    /// Loads the persisted report
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Report))` - A prior report exists and parsed
    /// * `Ok(None)` - No prior report
    /// * `Err(StorageError::Corrupt)` - A report exists but cannot be parsed
    fn load(&self) -> StorageResult<Option<Report>>;

    /// Persists the report, replacing any previous one
    fn save(&self, report: &Report) -> StorageResult<()>;

    /// Writes the human-readable summary
    fn write_summary(&self, summary: &str) -> StorageResult<()>;

    /// Location of the persisted report
    fn report_path(&self) -> PathBuf;
}
