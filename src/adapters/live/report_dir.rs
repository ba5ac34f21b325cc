//! Live adapter for the `ReportSink` port writing JSON files.

use std::path::PathBuf;

use crate::ports::report::ReportSink;
use crate::report::Report;

/// Writes each report to `<dir>/<report-id>.json`, creating `dir` as needed.
pub struct DirReportSink {
    dir: PathBuf,
}

impl DirReportSink {
    /// Creates a sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReportSink for DirReportSink {
    fn write_report(
        &self,
        report: &Report,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.json", report.id));
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&path, json)?;
        Ok(path.display().to_string())
    }
}
