//! Port implementations: live I/O, cassette recording, and cassette replay.

pub mod live;
pub mod recording;
pub mod replaying;
