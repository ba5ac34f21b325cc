//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::{
    DirReportSink, GraphqlRowSource, LiveClock, LiveIdGenerator, SnapshotRowSource,
};
use crate::adapters::recording::{
    RecordingClock, RecordingIdGenerator, RecordingReportSink, RecordingRowSource,
};
use crate::adapters::replaying::{
    ReplayingClock, ReplayingIdGenerator, ReplayingReportSink, ReplayingRowSource,
};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::config::{Config, SourceSpec};
use crate::ports::{Clock, IdGenerator, ReportSink, RowSource, RowsFuture};
use crate::report::Report;

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up live, recording, or replaying adapters; the
/// commands only ever see the traits.
pub struct ServiceContext {
    /// Source of the node, link, and index rows.
    pub rows: Box<dyn RowSource>,
    /// Destination for diagnostic reports.
    pub reports: Box<dyn ReportSink>,
    /// Clock for report timestamps.
    pub clock: Box<dyn Clock>,
    /// ID generator for report ids.
    pub id_gen: Box<dyn IdGenerator>,
}

/// Builds the live row source described by `spec`.
#[must_use]
pub fn live_row_source(spec: &SourceSpec) -> Box<dyn RowSource> {
    match spec {
        SourceSpec::Snapshot(path) => {
            tracing::info!(path = %path.display(), "reading rows from snapshot");
            Box::new(SnapshotRowSource::new(path))
        }
        SourceSpec::Graphql { url, admin_secret } => {
            tracing::info!(endpoint = %url, "reading rows from GraphQL endpoint");
            Box::new(GraphqlRowSource::new(url.clone(), admin_secret.clone()))
        }
    }
}

impl ServiceContext {
    /// Creates a live context from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if no row source is configured.
    pub fn live(config: &Config) -> Result<Self, String> {
        let source = config.source()?;
        Ok(Self {
            rows: live_row_source(&source),
            reports: Box::new(DirReportSink::new(&config.report_dir)),
            clock: Box::new(LiveClock),
            id_gen: Box::new(LiveIdGenerator),
        })
    }

    /// Creates a live context whose every call is captured by `session`.
    ///
    /// Drop the context before calling [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if no row source is configured.
    pub fn recording(config: &Config, session: &RecordingSession) -> Result<Self, String> {
        Ok(Self::live(config)?.recorded_by(session))
    }

    /// Wraps every port of this context in a recording adapter for `session`.
    #[must_use]
    pub fn recorded_by(self, session: &RecordingSession) -> Self {
        Self {
            rows: Box::new(RecordingRowSource::new(self.rows, session.rows.clone())),
            reports: Box::new(RecordingReportSink::new(self.reports, session.reports.clone())),
            clock: Box::new(RecordingClock::new(self.clock, session.clock.clone())),
            id_gen: Box::new(RecordingIdGenerator::new(self.id_gen, session.id_gen.clone())),
        }
    }

    /// Creates a replaying context from a single cassette file holding every port.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        Self::replaying_from(&CassetteConfig::monolithic(path))
    }

    /// Creates a replaying context from per-port cassettes.
    ///
    /// Ports without a cassette panic when called.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured cassette cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        Ok(Self {
            rows: match replayers.rows {
                Some(r) => Box::new(ReplayingRowSource::new(r)),
                None => Box::new(PanickingRowSource),
            },
            reports: match replayers.reports {
                Some(r) => Box::new(ReplayingReportSink::new(r)),
                None => Box::new(PanickingReportSink),
            },
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(PanickingClock),
            },
            id_gen: match replayers.id_gen {
                Some(r) => Box::new(ReplayingIdGenerator::new(r)),
                None => Box::new(PanickingIdGenerator),
            },
        })
    }
}

// --- Panicking adapters for unspecified ports ---

struct PanickingRowSource;
impl RowSource for PanickingRowSource {
    fn fetch_all(&self) -> RowsFuture<'_> {
        panic!("RowSource port not configured in CassetteConfig: no cassette loaded for rows");
    }
}

struct PanickingReportSink;
impl ReportSink for PanickingReportSink {
    fn write_report(
        &self,
        _report: &Report,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        panic!("ReportSink port not configured in CassetteConfig: no cassette loaded for reports");
    }
}

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        panic!("Clock port not configured in CassetteConfig: no cassette loaded for clock");
    }
}

struct PanickingIdGenerator;
impl IdGenerator for PanickingIdGenerator {
    fn generate_id(&self) -> String {
        panic!("IdGenerator port not configured in CassetteConfig: no cassette loaded for id_gen");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use serde_json::json;

    #[test]
    fn replaying_context_from_monolithic_cassette() {
        let dir = std::env::temp_dir().join("reachcheck_ctx_test_mono");
        let path = dir.join("full.cassette.yaml");
        let mut rec = CassetteRecorder::new(&path, "full", "abc");
        rec.record("clock", "now", json!(null), json!("2024-06-15T10:30:00Z"));
        rec.record("id_gen", "generate_id", json!(null), json!("report-001"));
        rec.finish().unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert_eq!(ctx.clock.now().to_rfc3339(), "2024-06-15T10:30:00+00:00");
        assert_eq!(ctx.id_gen.generate_id(), "report-001");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn live_context_requires_a_source() {
        let Err(err) = ServiceContext::live(&Config::default()) else {
            panic!("expected an error without a row source");
        };
        assert!(err.contains("No row source configured"));
    }

    #[test]
    fn live_context_with_snapshot() {
        let config = Config { snapshot: Some("rows.json".into()), ..Config::default() };
        assert!(ServiceContext::live(&config).is_ok());
    }

    #[test]
    #[should_panic(expected = "not configured in CassetteConfig")]
    fn unspecified_port_panics_with_clear_message() {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::panic_on_unspecified()).unwrap();
        let _ = ctx.clock.now();
    }
}
