//! Denormalizes flat rows into a [`LinkedGraph`].
//!
//! Three passes in fixed order: nodes, then links (which reference nodes),
//! then index entries (which reference both). Unknown foreign keys are left
//! unresolved and noted in [`LinkedGraph::dangling`]; nothing here fails.

use std::collections::HashMap;

use super::model::{
    Dangling, EntryIdx, LinkIdx, LinkedEntry, LinkedGraph, LinkedLink, LinkedNode, NodeIdx, RowId,
    Rows,
};

/// Links the three flat collections into one graph snapshot.
#[must_use]
pub fn link(rows: &Rows) -> LinkedGraph {
    let mut graph = LinkedGraph::default();

    for (i, row) in rows.nodes.iter().enumerate() {
        graph.nodes_by_id.insert(row.id.clone(), NodeIdx(i));
        graph.nodes.push(LinkedNode::new(row.clone()));
    }

    for (i, row) in rows.links.iter().enumerate() {
        let idx = LinkIdx(i);
        graph.links_by_id.insert(row.id.clone(), idx);

        let source = resolve(
            &graph.nodes_by_id,
            &mut graph.dangling,
            "links",
            &row.id,
            "source_id",
            row.source_id.as_ref(),
        );
        let target = resolve(
            &graph.nodes_by_id,
            &mut graph.dangling,
            "links",
            &row.id,
            "target_id",
            row.target_id.as_ref(),
        );
        let node = resolve(
            &graph.nodes_by_id,
            &mut graph.dangling,
            "links",
            &row.id,
            "node_id",
            row.node_id.as_ref(),
        );

        if let Some(n) = source {
            graph.nodes[n.0].out_links.push(idx);
        }
        if let Some(n) = target {
            graph.nodes[n.0].in_links.push(idx);
        }
        if let Some(n) = node {
            graph.nodes[n.0].aux_links.push(idx);
        }

        graph.links.push(LinkedLink {
            row: row.clone(),
            source,
            target,
            node,
            entries: Vec::new(),
        });
    }

    for (i, row) in rows.indexes.iter().enumerate() {
        let idx = EntryIdx(i);
        graph.entries_by_id.insert(row.id.clone(), idx);

        let link = resolve(
            &graph.links_by_id,
            &mut graph.dangling,
            "indexes",
            &row.id,
            "index_link_id",
            row.index_link_id.as_ref(),
        );
        let index_node = resolve(
            &graph.nodes_by_id,
            &mut graph.dangling,
            "indexes",
            &row.id,
            "index_node_id",
            row.index_node_id.as_ref(),
        );
        let list_node = resolve(
            &graph.nodes_by_id,
            &mut graph.dangling,
            "indexes",
            &row.id,
            "list_node_id",
            row.list_node_id.as_ref(),
        );

        if let Some(l) = link {
            graph.links[l.0].entries.push(idx);
        }
        if let Some(n) = index_node {
            graph.nodes[n.0].index_entries.push(idx);
        }
        if let Some(n) = list_node {
            graph.nodes[n.0].list_entries.push(idx);
        }

        graph.entries.push(LinkedEntry { row: row.clone(), link, index_node, list_node });
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        entries = graph.entries.len(),
        dangling = graph.dangling.len(),
        "linked graph"
    );

    graph
}

/// Looks up `key` in `table`, noting a dangling reference when it is set but unknown.
fn resolve<H: Copy>(
    table: &HashMap<RowId, H>,
    dangling: &mut Vec<Dangling>,
    table_name: &str,
    row_id: &RowId,
    column: &str,
    key: Option<&RowId>,
) -> Option<H> {
    let key = key?;
    let found = table.get(key).copied();
    if found.is_none() {
        dangling.push(Dangling {
            table: table_name.to_string(),
            row_id: row_id.clone(),
            column: column.to_string(),
            missing_id: key.clone(),
        });
    }
    found
}
