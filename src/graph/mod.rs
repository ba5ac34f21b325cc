//! In-memory graph rebuilt from store rows, and the index consistency checks.

pub mod checker;
pub mod linker;
pub mod model;
pub mod stats;

pub use checker::{check, Finding, FindingKind};
pub use linker::link;
pub use model::{
    Dangling, EntryIdx, IndexRow, LinkIdx, LinkRow, LinkedEntry, LinkedGraph, LinkedLink,
    LinkedNode, NodeIdx, NodeRow, RowId, Rows,
};
pub use stats::GraphStats;
