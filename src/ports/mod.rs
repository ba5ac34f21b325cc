//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the checking core and an
//! external system (time, IDs, the row store, report storage).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod id_gen;
pub mod report;
pub mod rows;

pub use clock::Clock;
pub use id_gen::IdGenerator;
pub use report::ReportSink;
pub use rows::{RowSource, RowsFuture};
