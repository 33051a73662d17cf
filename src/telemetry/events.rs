//! Telemetry event types describing what the clap session did, exposed to
//! the CLI and to flutter_rust_bridge callers.

use serde::{Deserialize, Serialize};

/// Session and feedback events worth keeping for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MetricEvent {
    SessionStarted {
        max_range: f32,
    },
    SensorUnavailable,
    HandNear,
    Clap {
        count: u32,
    },
    ClapSuppressed {
        count: u32,
    },
    CooldownElapsed,
    /// Sound played only after the player was recreated
    SoundRecovered,
    SoundFailed {
        code: i32,
        message: String,
    },
    HapticSkipped,
    SessionClosed {
        clap_count: u32,
    },
}
