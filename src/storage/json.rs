use crate::config::OutputConfig;
use crate::report::Report;
use crate::storage::traits::{ReportStore, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Report storage as pretty-printed JSON in the output directory
#[derive(Debug, Clone)]
pub struct JsonReportStore {
    directory: PathBuf,
    report_file: String,
    summary_file: String,
}

impl JsonReportStore {
    /// Creates a store for the given output directory and file names
    pub fn new(directory: impl Into<PathBuf>, report_file: &str, summary_file: &str) -> Self {
        Self {
            directory: directory.into(),
            report_file: report_file.to_string(),
            summary_file: summary_file.to_string(),
        }
    }

    /// Creates a store from the output section of the configuration
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.directory.clone(), &config.report_file, &config.summary_file)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn summary_path(&self) -> PathBuf {
        self.directory.join(&self.summary_file)
    }

    /// Writes `contents` beside `target` and renames it into place
    fn write_atomic(&self, target: &Path, contents: &[u8]) -> StorageResult<()> {
        let mut tmp_name = target
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = target.with_file_name(tmp_name);

        fs::write(&tmp_path, contents)?;
        if let Err(e) = fs::rename(&tmp_path, target) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

impl ReportStore for JsonReportStore {
    fn ensure_output_dir(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.directory).map_err(|source| StorageError::OutputDir {
            path: self.directory.clone(),
            source,
        })
    }

    fn load(&self) -> StorageResult<Option<Report>> {
        let path = self.report_path();
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let report = serde_json::from_str(&data)
            .map_err(|source| StorageError::Corrupt { path, source })?;
        Ok(Some(report))
    }

    fn save(&self, report: &Report) -> StorageResult<()> {
        let json = serde_json::to_vec_pretty(report)?;
        let path = self.report_path();
        self.write_atomic(&path, &json)?;
        tracing::debug!("Saved report with {} results to {}", report.total_pages, path.display());
        Ok(())
    }

    fn write_summary(&self, summary: &str) -> StorageResult<()> {
        self.write_atomic(&self.summary_path(), summary.as_bytes())
    }

    fn report_path(&self) -> PathBuf {
        self.directory.join(&self.report_file)
    }
}
