//! Replaying adapters that serve recorded interactions from cassettes.

pub mod clock;
pub mod id_gen;
pub mod report;
pub mod rows;

pub use clock::ReplayingClock;
pub use id_gen::ReplayingIdGenerator;
pub use report::ReplayingReportSink;
pub use rows::ReplayingRowSource;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

/// Pops the next recorded output for `port`/`method`.
///
/// # Panics
///
/// Panics if the cassette holds no further interaction for the pair.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).output
}

/// Decodes a recorded plain value.
///
/// # Panics
///
/// Panics if the recorded output does not have the expected shape; a
/// mismatched cassette is a broken fixture, not a runtime condition.
pub(crate) fn next_value<T: DeserializeOwned>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> T {
    let output = next_output(replayer, port, method);
    serde_json::from_value(output)
        .unwrap_or_else(|e| panic!("{port}::{method}: recorded output has the wrong shape: {e}"))
}

/// Decodes a recorded `{"Ok": v}` / `{"Err": "message"}` result.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("Err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("Ok").cloned().unwrap_or(output);
    serde_json::from_value(value)
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_and_bare_values_decode() {
        let ok: Result<String, _> = replay_result(json!({"Ok": "x"}), "t");
        assert_eq!(ok.unwrap(), "x");
        let bare: Result<u32, _> = replay_result(json!(7), "t");
        assert_eq!(bare.unwrap(), 7);
    }

    #[test]
    fn err_decodes_to_message() {
        let err: Result<String, _> = replay_result(json!({"Err": "connection refused"}), "t");
        assert_eq!(err.unwrap_err().to_string(), "connection refused");
    }

    #[test]
    fn wrong_shape_is_an_error() {
        let err: Result<u32, _> = replay_result(json!({"Ok": "nope"}), "rows::fetch_all");
        assert!(err.unwrap_err().to_string().starts_with("rows::fetch_all: failed to deserialize"));
    }
}
