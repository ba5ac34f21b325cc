//! Report sink port for durable diagnostic capture.

use crate::report::Report;

/// Persists a check report somewhere a human can inspect it later.
pub trait ReportSink: Send + Sync {
    /// Writes `report` and returns where it ended up (a path or URL).
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be serialized or stored.
    fn write_report(
        &self,
        report: &Report,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}
