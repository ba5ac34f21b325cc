//! Replaying adapter for the `Clock` port.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::next_value;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::clock::Clock;

/// Replays recorded clock values from a cassette.
pub struct ReplayingClock {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingClock {
    /// Creates a new replaying clock from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<Utc> {
        next_value(&self.replayer, "clock", "now")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use serde_json::json;

    #[test]
    fn replaying_clock_serves_recorded_times_in_order() {
        let interactions = ["2024-01-01T00:00:00Z", "2024-01-01T00:01:00Z"]
            .iter()
            .enumerate()
            .map(|(seq, ts)| Interaction {
                seq: seq as u64,
                port: "clock".into(),
                method: "now".into(),
                input: json!(null),
                output: json!(ts),
            })
            .collect();
        let replayer = CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        });
        let clock = ReplayingClock::new(replayer);
        assert_eq!(clock.now().to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(clock.now().to_rfc3339(), "2024-01-01T00:01:00+00:00");
    }
}
