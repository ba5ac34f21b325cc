//! Recording adapter for the `ReportSink` port.

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::ports::report::ReportSink;
use crate::report::Report;

/// Records written reports while delegating to an inner sink.
pub struct RecordingReportSink {
    inner: Box<dyn ReportSink>,
    recorder: SharedRecorder,
}

impl RecordingReportSink {
    /// Creates a recording sink wrapping `inner`.
    pub fn new(inner: Box<dyn ReportSink>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl ReportSink for RecordingReportSink {
    fn write_report(
        &self,
        report: &Report,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.write_report(report);
        record_result(&self.recorder, "reports", "write_report", report, &result);
        result
    }
}
