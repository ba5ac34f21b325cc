//! Row types fetched from the store and the linked arena built from them.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a row in one of the three tables.
///
/// Stores hand out ids as strings or integers depending on the column type,
/// so both are accepted on input. The id is always serialized as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Signed(n) => Self(n.to_string()),
            Raw::Unsigned(n) => Self(n.to_string()),
        })
    }
}

/// A graph vertex as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRow {
    /// Unique node id.
    pub id: RowId,
}

/// A directed, typed edge as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRow {
    /// Unique link id.
    pub id: RowId,
    /// Node the edge leaves from.
    #[serde(default)]
    pub source_id: Option<RowId>,
    /// Node the edge points to.
    #[serde(default)]
    pub target_id: Option<RowId>,
    /// Edge type discriminator.
    #[serde(default)]
    pub type_id: Option<RowId>,
    /// Optional auxiliary node participating in the edge.
    #[serde(default)]
    pub node_id: Option<RowId>,
}

/// One row of the materialized reachability index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRow {
    /// Unique entry id.
    pub id: RowId,
    /// Node owning the list this entry belongs to.
    #[serde(default)]
    pub list_node_id: Option<RowId>,
    /// Node recorded as reachable by this entry.
    #[serde(default)]
    pub index_node_id: Option<RowId>,
    /// Link whose traversal produced this entry.
    #[serde(default)]
    pub index_link_id: Option<RowId>,
    /// Groups all entries of one list.
    pub list_id: RowId,
    /// Distance from the list owner. A null column reads as 0.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub depth: i64,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
}

/// The three flat collections supplied by a row source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rows {
    /// All nodes.
    #[serde(default)]
    pub nodes: Vec<NodeRow>,
    /// All links.
    #[serde(default)]
    pub links: Vec<LinkRow>,
    /// All index entries.
    #[serde(default)]
    pub indexes: Vec<IndexRow>,
}

/// Position of a node in [`LinkedGraph::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub usize);

/// Position of a link in [`LinkedGraph::links`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkIdx(pub usize);

/// Position of an index entry in [`LinkedGraph::entries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryIdx(pub usize);

/// A node with its back-references resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedNode {
    /// The stored row.
    pub row: NodeRow,
    /// Links where this node is the source.
    pub out_links: Vec<LinkIdx>,
    /// Links where this node is the target.
    pub in_links: Vec<LinkIdx>,
    /// Links referencing this node as the auxiliary participant.
    pub aux_links: Vec<LinkIdx>,
    /// Entries where this node is the indexed subject.
    pub index_entries: Vec<EntryIdx>,
    /// Entries where this node owns the list.
    pub list_entries: Vec<EntryIdx>,
}

impl LinkedNode {
    pub(crate) fn new(row: NodeRow) -> Self {
        Self {
            row,
            out_links: Vec::new(),
            in_links: Vec::new(),
            aux_links: Vec::new(),
            index_entries: Vec::new(),
            list_entries: Vec::new(),
        }
    }

    /// Shorthand for `self.row.id`.
    #[must_use]
    pub fn id(&self) -> &RowId {
        &self.row.id
    }

    /// A node without incoming links.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.in_links.is_empty()
    }
}

/// A link with its endpoints resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedLink {
    /// The stored row.
    pub row: LinkRow,
    /// Resolved source node, if `source_id` matched a node.
    pub source: Option<NodeIdx>,
    /// Resolved target node, if `target_id` matched a node.
    pub target: Option<NodeIdx>,
    /// Resolved auxiliary node, if `node_id` matched a node.
    pub node: Option<NodeIdx>,
    /// Index entries recording this link's contribution to some list.
    pub entries: Vec<EntryIdx>,
}

impl LinkedLink {
    /// Shorthand for `self.row.id`.
    #[must_use]
    pub fn id(&self) -> &RowId {
        &self.row.id
    }
}

/// An index entry with its foreign keys resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedEntry {
    /// The stored row.
    pub row: IndexRow,
    /// Resolved producing link.
    pub link: Option<LinkIdx>,
    /// Resolved subject node.
    pub index_node: Option<NodeIdx>,
    /// Resolved list owner.
    pub list_node: Option<NodeIdx>,
}

/// Which foreign key of which row failed to resolve during linking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dangling {
    /// Table of the referencing row (`links` or `indexes`).
    pub table: String,
    /// Id of the referencing row.
    pub row_id: RowId,
    /// Column holding the unresolved key.
    pub column: String,
    /// The key that matched nothing.
    pub missing_id: RowId,
}

/// Snapshot of the graph with every cross-reference resolved.
///
/// Entities are stored in arena vectors in their fetch order and addressed by
/// index handles, so the cyclic node/link/entry relations never own each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedGraph {
    pub(crate) nodes: Vec<LinkedNode>,
    pub(crate) links: Vec<LinkedLink>,
    pub(crate) entries: Vec<LinkedEntry>,
    pub(crate) nodes_by_id: HashMap<RowId, NodeIdx>,
    pub(crate) links_by_id: HashMap<RowId, LinkIdx>,
    pub(crate) entries_by_id: HashMap<RowId, EntryIdx>,
    pub(crate) dangling: Vec<Dangling>,
}

impl LinkedGraph {
    /// All nodes in fetch order.
    #[must_use]
    pub fn nodes(&self) -> &[LinkedNode] {
        &self.nodes
    }

    /// All links in fetch order.
    #[must_use]
    pub fn links(&self) -> &[LinkedLink] {
        &self.links
    }

    /// All index entries in fetch order.
    #[must_use]
    pub fn entries(&self) -> &[LinkedEntry] {
        &self.entries
    }

    /// Unresolved foreign keys found while linking.
    #[must_use]
    pub fn dangling(&self) -> &[Dangling] {
        &self.dangling
    }

    /// Node at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` did not come from this graph.
    #[must_use]
    pub fn node(&self, idx: NodeIdx) -> &LinkedNode {
        &self.nodes[idx.0]
    }

    /// Link at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` did not come from this graph.
    #[must_use]
    pub fn link(&self, idx: LinkIdx) -> &LinkedLink {
        &self.links[idx.0]
    }

    /// Entry at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` did not come from this graph.
    #[must_use]
    pub fn entry(&self, idx: EntryIdx) -> &LinkedEntry {
        &self.entries[idx.0]
    }

    /// Looks up a node handle by id.
    #[must_use]
    pub fn node_by_id(&self, id: &RowId) -> Option<NodeIdx> {
        self.nodes_by_id.get(id).copied()
    }

    /// Looks up a link handle by id.
    #[must_use]
    pub fn link_by_id(&self, id: &RowId) -> Option<LinkIdx> {
        self.links_by_id.get(id).copied()
    }

    /// Looks up an entry handle by id.
    #[must_use]
    pub fn entry_by_id(&self, id: &RowId) -> Option<EntryIdx> {
        self.entries_by_id.get(id).copied()
    }

    /// Handles of all nodes without incoming links, in fetch order.
    pub fn roots(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.nodes.iter().enumerate().filter(|(_, n)| n.is_root()).map(|(i, _)| NodeIdx(i))
    }

    /// Distinct `list_id`s among the entries `node` owns.
    #[must_use]
    pub fn distinct_lists(&self, node: &LinkedNode) -> BTreeSet<&RowId> {
        node.list_entries.iter().map(|&e| &self.entry(e).row.list_id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_ids_accept_strings_and_integers() {
        let ids: Vec<RowId> = serde_json::from_str(r#"["n1", 7, 18446744073709551615]"#).unwrap();
        assert_eq!(ids, vec![RowId::from("n1"), RowId::from(7), "18446744073709551615".into()]);
        assert_eq!(serde_json::to_string(&ids[1]).unwrap(), r#""7""#);
    }

    #[test]
    fn index_depth_tolerates_null_and_absence() {
        let rows: Rows = serde_json::from_str(
            r#"{"indexes": [
                {"id": 1, "list_id": "l", "depth": null},
                {"id": 2, "list_id": "l"},
                {"id": 3, "list_id": "l", "depth": 4}
            ]}"#,
        )
        .unwrap();
        let depths: Vec<i64> = rows.indexes.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 0, 4]);
        assert_eq!(rows.indexes[0].list_node_id, None);
    }
}
