//! Check reports: the `{findings, graph}` payload handed to a report sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::{Dangling, Finding, GraphStats, LinkedGraph, RowId, Rows};

/// Outcome of one check run, including the snapshot it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Unique report id.
    pub id: String,
    /// When the check ran.
    pub created_at: DateTime<Utc>,
    /// `true` when there are no findings.
    pub passed: bool,
    /// Summary of the checked graph.
    pub stats: GraphStats,
    /// Invariant violations in check order.
    pub findings: Vec<Finding>,
    /// Foreign keys that matched no row.
    pub dangling: Vec<Dangling>,
    /// The rows the graph was linked from.
    pub graph: Rows,
}

impl Report {
    /// Assembles a report from a finished check.
    #[must_use]
    pub fn build(
        id: String,
        created_at: DateTime<Utc>,
        rows: &Rows,
        graph: &LinkedGraph,
        findings: Vec<Finding>,
    ) -> Self {
        Self {
            id,
            created_at,
            passed: findings.is_empty(),
            stats: GraphStats::collect(graph),
            findings,
            dangling: graph.dangling().to_vec(),
            graph: rows.clone(),
        }
    }
}

fn join_ids(ids: &[RowId]) -> String {
    ids.iter().map(RowId::as_str).collect::<Vec<_>>().join(", ")
}

/// Formats a [`Report`] as a human-readable summary.
#[must_use]
pub fn format_report(report: &Report) -> String {
    let stats = &report.stats;
    let mut lines = Vec::new();
    lines.push(format!("Report: {}", report.id));
    lines.push(format!(
        "Graph: {} node(s), {} link(s), {} index entr{}",
        stats.nodes,
        stats.links,
        stats.entries,
        if stats.entries == 1 { "y" } else { "ies" }
    ));
    lines.push(String::new());

    for finding in &report.findings {
        let mut subject = Vec::new();
        if let Some(nodes) = &finding.nodes {
            subject.push(format!("node {}", join_ids(nodes)));
        }
        if let Some(links) = &finding.links {
            subject.push(format!("link {}", join_ids(links)));
        }
        let subject = if subject.is_empty() { "graph".to_string() } else { subject.join("; ") };
        lines.push(format!("  [FAIL] {} ({subject})", finding.kind.as_str()));
        for message in &finding.messages {
            lines.push(format!("         {message}"));
        }
    }

    if !report.dangling.is_empty() {
        lines.push(format!("  {} unresolved reference(s):", report.dangling.len()));
        for d in &report.dangling {
            lines.push(format!(
                "         {}.{} of {} -> {}",
                d.table, d.column, d.row_id, d.missing_id
            ));
        }
    }

    lines.push(String::new());
    let overall = if report.passed { "PASSED" } else { "FAILED" };
    lines.push(format!("Result: {overall} ({} finding(s))", report.findings.len()));
    lines.join("\n")
}
