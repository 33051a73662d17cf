//! Testability harness utilities.
//!
//! Kept in the main build because the desktop CLI replays traces against the
//! same recording host the tests use.

mod recording_host;

pub use recording_host::{HostCall, RecordingHost};
