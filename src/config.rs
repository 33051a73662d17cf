//! Configuration management for the clap detector
//!
//! Defaults reproduce the fixed product policy (500 ms cooldown, 50 ms
//! haptic pulse, half-range threshold). A JSON file can override them for
//! desktop replay and experimentation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Gesture detection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Window after a clap during which further claps are suppressed
    pub cooldown_ms: u32,
    /// Length of the haptic pulse emitted on each clap
    pub haptic_duration_ms: u32,
    /// Fraction of the sensor's max range below which a sample is "near"
    pub near_threshold_ratio: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 500,
            haptic_duration_ms: 50,
            near_threshold_ratio: 0.5,
        }
    }
}

/// Telemetry hub sizing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Broadcast channel capacity for live subscribers
    pub channel_capacity: usize,
    /// Number of recent events kept for snapshots
    pub history_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            history_capacity: 64,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// Falls back to the default configuration (with a warning) when the
    /// file is missing or cannot be parsed.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Android ships no config file; the fixed policy applies.
    #[cfg(target_os = "android")]
    pub fn load_android() -> Self {
        log::info!("[Config] Using default configuration on Android");
        Self::default()
    }

    /// Load configuration for non-Android platforms
    #[cfg(not(target_os = "android"))]
    pub fn load() -> Self {
        Self::load_from_file("assets/clap_config.json")
    }

    /// Load the configuration appropriate for the current platform
    pub fn load_platform() -> Self {
        #[cfg(target_os = "android")]
        {
            Self::load_android()
        }

        #[cfg(not(target_os = "android"))]
        {
            Self::load()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.detector.cooldown_ms, 500);
        assert_eq!(config.detector.haptic_duration_ms, 50);
        assert_eq!(config.detector.near_threshold_ratio, 0.5);
        assert_eq!(config.telemetry.history_capacity, 64);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{ "detector": { "cooldown_ms": 250, "haptic_duration_ms": 30, "near_threshold_ratio": 0.4 } }"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.detector.cooldown_ms, 250);
        assert_eq!(parsed.telemetry, TelemetryConfig::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_from_file("definitely/not/here.json");
        assert_eq!(config, AppConfig::default());
    }
}
