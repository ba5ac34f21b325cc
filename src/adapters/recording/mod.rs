//! Recording adapters that wrap a live adapter and capture every call.

pub mod clock;
pub mod id_gen;
pub mod report;
pub mod rows;

pub use clock::RecordingClock;
pub use id_gen::RecordingIdGenerator;
pub use report::RecordingReportSink;
pub use rows::RecordingRowSource;

use serde::Serialize;

use crate::cassette::session::SharedRecorder;

/// Records a call whose return value is not a `Result`.
///
/// Mirror of `replaying::next_value`.
pub(crate) fn record_interaction<I, O>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let input_json = serde_json::to_value(input).unwrap_or(serde_json::Value::Null);
    let output_json = serde_json::to_value(output).unwrap_or(serde_json::Value::Null);
    push(recorder, port, method, input_json, output_json);
}

/// Records a `Result` as `{"Ok": v}` or `{"Err": "message"}`.
///
/// Mirror of `replaying::replay_result`.
pub(crate) fn record_result<T, E, I>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).unwrap_or(serde_json::Value::Null);
    let output_json = match result {
        Ok(v) => match serde_json::to_value(v) {
            Ok(inner) => serde_json::json!({ "Ok": inner }),
            Err(e) => serde_json::json!({ "Err": format!("unrecordable output: {e}") }),
        },
        Err(e) => serde_json::json!({ "Err": e.to_string() }),
    };
    push(recorder, port, method, input_json, output_json);
}

fn push(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: serde_json::Value,
    output: serde_json::Value,
) {
    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input, output),
        Err(_) => tracing::warn!(port, method, "recorder lock poisoned, interaction dropped"),
    }
}
