//! `reachcheck check` command.

use super::fetch_rows;
use crate::context::ServiceContext;
use crate::graph::{check, link};
use crate::report::{format_report, Report};

/// What a check run produced.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// The full report.
    pub report: Report,
    /// Where the report sink stored it, if it was written.
    pub location: Option<String>,
    /// Why the report sink refused the report, if it did.
    pub write_error: Option<String>,
}

/// Fetches, links, and checks the graph, handing the report to the sink
/// when there are findings (or always, with `always_report`).
///
/// Findings are data here, not errors. A failed write is kept in the
/// outcome next to the report so the findings are not lost.
///
/// # Errors
///
/// Returns an error string if fetching rows fails.
pub fn run_with_context(ctx: &ServiceContext, always_report: bool) -> Result<CheckOutcome, String> {
    let rows = fetch_rows(ctx)?;
    let graph = link(&rows);
    let findings = check(&graph);

    let id = ctx.id_gen.generate_id();
    let report = Report::build(id, ctx.clock.now(), &rows, &graph, findings);
    if report.passed {
        tracing::info!(report = %report.id, "index is consistent");
    } else {
        tracing::warn!(
            report = %report.id,
            findings = report.findings.len(),
            "index is inconsistent"
        );
    }

    let mut outcome = CheckOutcome { report, location: None, write_error: None };
    if !outcome.report.passed || always_report {
        match ctx.reports.write_report(&outcome.report) {
            Ok(location) => {
                tracing::info!(%location, "report written");
                outcome.location = Some(location);
            }
            Err(e) => {
                let message = format!("Failed to write report {}: {e}", outcome.report.id);
                tracing::error!("{message}");
                outcome.write_error = Some(message);
            }
        }
    }

    Ok(outcome)
}

/// Execute the `check` command, printing the report.
///
/// # Errors
///
/// Returns an error string if the run fails, the report could not be
/// written, or the check produced findings.
pub fn run(ctx: &ServiceContext, always_report: bool) -> Result<(), String> {
    let outcome = run_with_context(ctx, always_report)?;
    println!("{}", format_report(&outcome.report));
    if let Some(location) = &outcome.location {
        println!("Report written to: {location}");
    }

    if let Some(err) = outcome.write_error {
        Err(err)
    } else if outcome.report.passed {
        Ok(())
    } else {
        Err(format!("Index check failed with {} finding(s)", outcome.report.findings.len()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Utc};

    use super::*;
    use crate::graph::{FindingKind, IndexRow, NodeRow, Rows};
    use crate::ports::{Clock, IdGenerator, ReportSink, RowSource, RowsFuture};

    struct FixedRows(Rows);
    impl RowSource for FixedRows {
        fn fetch_all(&self) -> RowsFuture<'_> {
            let rows = self.0.clone();
            Box::pin(std::future::ready(Ok::<_, Box<dyn std::error::Error + Send + Sync>>(rows)))
        }
    }

    struct FailingRows;
    impl RowSource for FailingRows {
        fn fetch_all(&self) -> RowsFuture<'_> {
            let err: Box<dyn std::error::Error + Send + Sync> = "connection refused".into();
            Box::pin(std::future::ready(Err::<Rows, _>(err)))
        }
    }

    /// Keeps written reports in memory.
    #[derive(Clone, Default)]
    struct MemSink(Arc<Mutex<Vec<Report>>>);
    impl ReportSink for MemSink {
        fn write_report(
            &self,
            report: &Report,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            self.0.lock().unwrap().push(report.clone());
            Ok(format!("mem://{}", report.id))
        }
    }

    struct FullDisk;
    impl ReportSink for FullDisk {
        fn write_report(
            &self,
            _report: &Report,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            Err("disk full".into())
        }
    }

    struct FixedClock;
    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            "2025-03-15T14:30:00Z".parse().unwrap()
        }
    }

    struct FixedId;
    impl IdGenerator for FixedId {
        fn generate_id(&self) -> String {
            "run-1".to_string()
        }
    }

    fn context(rows: Box<dyn RowSource>, sink: &MemSink) -> ServiceContext {
        ServiceContext {
            rows,
            reports: Box::new(sink.clone()),
            clock: Box::new(FixedClock),
            id_gen: Box::new(FixedId),
        }
    }

    fn root_only() -> Rows {
        Rows {
            nodes: vec![NodeRow { id: "r".into() }],
            links: Vec::new(),
            indexes: vec![IndexRow {
                id: "1".into(),
                list_node_id: Some("r".into()),
                index_node_id: Some("r".into()),
                index_link_id: None,
                list_id: "l".into(),
                depth: 0,
            }],
        }
    }

    #[test]
    fn consistent_graph_writes_no_report() {
        let sink = MemSink::default();
        let ctx = context(Box::new(FixedRows(root_only())), &sink);
        let outcome = run_with_context(&ctx, false).unwrap();
        assert!(outcome.report.passed);
        assert_eq!(outcome.location, None);
        assert_eq!(outcome.write_error, None);
        assert!(sink.0.lock().unwrap().is_empty());
        assert!(run(&ctx, false).is_ok());
    }

    #[test]
    fn always_report_writes_passing_report() {
        let sink = MemSink::default();
        let ctx = context(Box::new(FixedRows(root_only())), &sink);
        let outcome = run_with_context(&ctx, true).unwrap();
        assert_eq!(outcome.location.as_deref(), Some("mem://run-1"));
        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn findings_are_reported_and_fail_the_run() {
        let mut rows = root_only();
        rows.indexes.clear();
        let sink = MemSink::default();
        let ctx = context(Box::new(FixedRows(rows.clone())), &sink);

        let err = run(&ctx, false).unwrap_err();
        assert_eq!(err, "Index check failed with 3 finding(s)");

        let written = sink.0.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].graph, rows);
        let kinds: Vec<FindingKind> = written[0].findings.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FindingKind::UnindexedNode,
                FindingKind::RootListCount,
                FindingKind::NodesWithoutIndexes
            ]
        );
    }

    #[test]
    fn fetch_failure_is_an_error_not_a_finding() {
        let sink = MemSink::default();
        let ctx = context(Box::new(FailingRows), &sink);
        let err = run_with_context(&ctx, false).unwrap_err();
        assert_eq!(err, "Failed to fetch rows: connection refused");
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_write_keeps_the_findings() {
        let rows = Rows { nodes: vec![NodeRow { id: "a".into() }], ..Rows::default() };
        let ctx = ServiceContext {
            rows: Box::new(FixedRows(rows)),
            reports: Box::new(FullDisk),
            clock: Box::new(FixedClock),
            id_gen: Box::new(FixedId),
        };

        let outcome = run_with_context(&ctx, false).unwrap();
        assert_eq!(outcome.location, None);
        assert_eq!(outcome.write_error.as_deref(), Some("Failed to write report run-1: disk full"));
        let text = format_report(&outcome.report);
        assert!(text.contains("!node.indexes_by_index.length"));
        assert!(text.contains("Result: FAILED"));

        let err = run(&ctx, false).unwrap_err();
        assert_eq!(err, "Failed to write report run-1: disk full");
    }
}
