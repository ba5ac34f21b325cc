//! Live adapter for the `RowSource` port reading a JSON snapshot file.

use std::path::PathBuf;

use crate::graph::Rows;
use crate::ports::rows::{RowSource, RowsFuture};

/// Row source backed by a `{"nodes": [...], "links": [...], "indexes": [...]}` file.
///
/// A GraphQL-style `{"data": {...}}` envelope is accepted too, so a saved
/// endpoint response can be checked offline.
pub struct SnapshotRowSource {
    path: PathBuf,
}

impl SnapshotRowSource {
    /// Creates a row source reading `path` on every fetch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn parse_snapshot(text: &str) -> Result<Rows, serde_json::Error> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Snapshot {
        Envelope { data: Rows },
        Bare(Rows),
    }

    Ok(match serde_json::from_str(text)? {
        Snapshot::Envelope { data } => data,
        Snapshot::Bare(rows) => rows,
    })
}

impl SnapshotRowSource {
    fn read(&self) -> Result<Rows, Box<dyn std::error::Error + Send + Sync>> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read snapshot {}: {e}", self.path.display()))?;
        let rows = parse_snapshot(&text)
            .map_err(|e| format!("Failed to parse snapshot {}: {e}", self.path.display()))?;
        Ok(rows)
    }
}

impl RowSource for SnapshotRowSource {
    fn fetch_all(&self) -> RowsFuture<'_> {
        Box::pin(std::future::ready(self.read()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_bare_snapshot() {
        let dir = std::env::temp_dir().join("reachcheck_snapshot_bare");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rows.json");
        std::fs::write(&path, r#"{"nodes": [{"id": "a"}], "indexes": []}"#).unwrap();

        let rows = SnapshotRowSource::new(&path).fetch_all().await.unwrap();
        assert_eq!(rows.nodes.len(), 1);
        assert!(rows.links.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn accepts_data_envelope() {
        let rows = parse_snapshot(r#"{"data": {"nodes": [{"id": 5}]}}"#).unwrap();
        assert_eq!(rows.nodes[0].id.as_str(), "5");
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let err = SnapshotRowSource::new("/nonexistent/reachcheck.json")
            .fetch_all()
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("/nonexistent/reachcheck.json"));
    }
}
