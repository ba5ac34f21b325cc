//! Recording adapter for the `RowSource` port.

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::graph::Rows;
use crate::ports::rows::{RowSource, RowsFuture};

/// Records fetched snapshots while delegating to an inner row source.
pub struct RecordingRowSource {
    inner: Box<dyn RowSource>,
    recorder: SharedRecorder,
}

impl RecordingRowSource {
    /// Creates a recording row source wrapping `inner`.
    pub fn new(inner: Box<dyn RowSource>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }

    async fn fetch(&self) -> Result<Rows, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.fetch_all().await;
        record_result(&self.recorder, "rows", "fetch_all", &(), &result);
        result
    }
}

impl RowSource for RecordingRowSource {
    fn fetch_all(&self) -> RowsFuture<'_> {
        Box::pin(self.fetch())
    }
}
