//! Live adapters for real external interactions.

pub mod clock;
pub mod graphql;
pub mod id_gen;
pub mod report_dir;
pub mod snapshot;

pub use clock::LiveClock;
pub use graphql::GraphqlRowSource;
pub use id_gen::LiveIdGenerator;
pub use report_dir::DirReportSink;
pub use snapshot::SnapshotRowSource;
