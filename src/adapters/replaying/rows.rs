//! Replaying adapter for the `RowSource` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::graph::Rows;
use crate::ports::rows::{RowSource, RowsFuture};

/// Serves recorded row snapshots from a cassette.
pub struct ReplayingRowSource {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingRowSource {
    /// Creates a replaying row source from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl RowSource for ReplayingRowSource {
    fn fetch_all(&self) -> RowsFuture<'_> {
        let output = next_output(&self.replayer, "rows", "fetch_all");
        Box::pin(std::future::ready(replay_result::<Rows>(output, "rows::fetch_all")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(outputs: Vec<serde_json::Value>) -> CassetteReplayer {
        let interactions = outputs
            .into_iter()
            .enumerate()
            .map(|(seq, output)| Interaction {
                seq: seq as u64,
                port: "rows".into(),
                method: "fetch_all".into(),
                input: json!(null),
                output,
            })
            .collect();
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        })
    }

    #[tokio::test]
    async fn serves_recorded_rows_then_recorded_error() {
        let source = ReplayingRowSource::new(make_replayer(vec![
            json!({"Ok": {"nodes": [{"id": 1}], "links": [], "indexes": []}}),
            json!({"Err": "timeout"}),
        ]));

        let rows = source.fetch_all().await.unwrap();
        assert_eq!(rows.nodes[0].id.as_str(), "1");

        let err = source.fetch_all().await.unwrap_err();
        assert_eq!(err.to_string(), "timeout");
    }
}
