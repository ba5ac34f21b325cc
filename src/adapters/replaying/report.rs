//! Replaying adapter for the `ReportSink` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::report::ReportSink;
use crate::report::Report;

/// Answers report writes with the locations recorded in a cassette,
/// without touching storage.
pub struct ReplayingReportSink {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingReportSink {
    /// Creates a replaying sink from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ReportSink for ReplayingReportSink {
    fn write_report(
        &self,
        _report: &Report,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let output = next_output(&self.replayer, "reports", "write_report");
        replay_result(output, "reports::write_report")
    }
}
