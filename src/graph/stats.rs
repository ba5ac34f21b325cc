//! Summary numbers for a linked graph.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::LinkedGraph;

/// Counts describing a linked graph snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub nodes: usize,
    /// Number of links.
    pub links: usize,
    /// Number of index entries.
    pub entries: usize,
    /// Nodes without incoming links.
    pub roots: usize,
    /// Distinct `list_id` values across all entries.
    pub lists: usize,
    /// Largest entry depth, `None` when the index is empty.
    pub max_depth: Option<i64>,
    /// Foreign keys that matched no row.
    pub dangling: usize,
}

impl GraphStats {
    /// Collects stats from `graph`.
    #[must_use]
    pub fn collect(graph: &LinkedGraph) -> Self {
        let lists: BTreeSet<_> = graph.entries().iter().map(|e| &e.row.list_id).collect();
        Self {
            nodes: graph.nodes().len(),
            links: graph.links().len(),
            entries: graph.entries().len(),
            roots: graph.roots().count(),
            lists: lists.len(),
            max_depth: graph.entries().iter().map(|e| e.row.depth).max(),
            dangling: graph.dangling().len(),
        }
    }
}
