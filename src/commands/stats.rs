//! `reachcheck stats` command.

use super::fetch_rows;
use crate::context::ServiceContext;
use crate::graph::{link, GraphStats};

/// Renders stats as aligned `label  value` lines.
#[must_use]
pub fn format_stats(stats: &GraphStats) -> String {
    let max_depth = stats.max_depth.map_or_else(|| "-".to_string(), |d| d.to_string());
    let rows = [
        ("nodes", stats.nodes.to_string()),
        ("links", stats.links.to_string()),
        ("index entries", stats.entries.to_string()),
        ("roots", stats.roots.to_string()),
        ("lists", stats.lists.to_string()),
        ("max depth", max_depth),
        ("dangling refs", stats.dangling.to_string()),
    ];
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(label, value)| format!("{label:<width$}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Execute the `stats` command.
///
/// # Errors
///
/// Returns an error string if fetching rows fails.
pub fn run(ctx: &ServiceContext) -> Result<(), String> {
    let rows = fetch_rows(ctx)?;
    let stats = GraphStats::collect(&link(&rows));
    println!("{}", format_stats(&stats));
    Ok(())
}
