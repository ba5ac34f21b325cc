//! Consistency checks between the live edge set and the reachability index.

use serde::{Deserialize, Serialize};

use super::model::{LinkedGraph, LinkedNode, RowId};

/// The invariant a [`Finding`] reports a violation of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    /// A node is not the subject of any index entry.
    UnindexedNode,
    /// A non-root node owns a different number of entries than its parents imply.
    IndexCount,
    /// A root node does not own exactly one entry.
    RootListCount,
    /// A link contributed to no index entry.
    UnindexedLink,
    /// Index entries exist while the node set is empty.
    IndexesWithoutNodes,
    /// Nodes exist while the index is empty.
    NodesWithoutIndexes,
}

impl FindingKind {
    /// Label used in rendered reports, identical to the serialized name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnindexedNode => "unindexed-node",
            Self::IndexCount => "index-count",
            Self::RootListCount => "root-list-count",
            Self::UnindexedLink => "unindexed-link",
            Self::IndexesWithoutNodes => "indexes-without-nodes",
            Self::NodesWithoutIndexes => "nodes-without-indexes",
        }
    }
}

/// One invariant violation with the entities it implicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Which check produced this finding.
    pub kind: FindingKind,
    /// Offending nodes, when the check is about nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<RowId>>,
    /// Offending links, when the check is about links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<RowId>>,
    /// Human-readable descriptions.
    pub messages: Vec<String>,
}

impl Finding {
    fn node(kind: FindingKind, id: &RowId, message: String) -> Self {
        Self { kind, nodes: Some(vec![id.clone()]), links: None, messages: vec![message] }
    }

    fn link(kind: FindingKind, id: &RowId, message: String) -> Self {
        Self { kind, nodes: None, links: Some(vec![id.clone()]), messages: vec![message] }
    }

    fn global(kind: FindingKind, message: &str) -> Self {
        Self { kind, nodes: None, links: None, messages: vec![message.to_string()] }
    }
}

/// Runs every check over `graph` and returns the findings in a stable order:
/// per-node checks in node order, per-link checks in link order, then the two
/// global checks. An empty result means the index is consistent.
#[must_use]
pub fn check(graph: &LinkedGraph) -> Vec<Finding> {
    let mut findings = Vec::new();

    for node in graph.nodes() {
        if node.index_entries.is_empty() {
            findings.push(Finding::node(
                FindingKind::UnindexedNode,
                node.id(),
                "!node.indexes_by_index.length".to_string(),
            ));
        }

        if node.is_root() {
            if node.list_entries.len() != 1 {
                findings.push(Finding::node(
                    FindingKind::RootListCount,
                    node.id(),
                    "root node must have only one index in they list".to_string(),
                ));
            }
        } else {
            let counts = expected_counts(graph, node);
            if counts.expected != node.list_entries.len() {
                findings.push(Finding::node(
                    FindingKind::IndexCount,
                    node.id(),
                    format!(
                        "invalid indexes count rI: {} nI: {} i_by_l: {}",
                        counts.parent_entries,
                        counts.expected,
                        node.list_entries.len()
                    ),
                ));
            }
        }
    }

    for link in graph.links() {
        if link.entries.is_empty() {
            findings.push(Finding::link(
                FindingKind::UnindexedLink,
                link.id(),
                "!link.indexes.length".to_string(),
            ));
        }
    }

    let has_nodes = !graph.nodes().is_empty();
    let has_entries = !graph.entries().is_empty();
    if has_entries && !has_nodes {
        findings.push(Finding::global(
            FindingKind::IndexesWithoutNodes,
            "indexes.length && !nodes.length",
        ));
    }
    if !has_entries && has_nodes {
        findings.push(Finding::global(
            FindingKind::NodesWithoutIndexes,
            "!indexes.length && nodes.length",
        ));
    }

    tracing::debug!(findings = findings.len(), "checked graph");
    findings
}

/// Sums over incoming links, never over distinct ancestors, so a parent
/// reached through two links counts twice.
struct ExpectedCounts {
    /// `rI`: entries owned by all parents.
    parent_entries: usize,
    /// `nI`: `rI` plus one per distinct list of each parent.
    expected: usize,
}

fn expected_counts(graph: &LinkedGraph, node: &LinkedNode) -> ExpectedCounts {
    let mut counts = ExpectedCounts { parent_entries: 0, expected: 0 };
    for &link in &node.in_links {
        // An unresolved source contributes nothing.
        let Some(source) = graph.link(link).source else {
            continue;
        };
        let parent = graph.node(source);
        let owned = parent.list_entries.len();
        counts.parent_entries += owned;
        counts.expected += owned + graph.distinct_lists(parent).len();
    }
    counts
}
