// Public API for flutter_rust_bridge integration
// The Dart host owns the sensor listener, the sound player, the vibrator and
// the cooldown timer. Every call returns the effects the host must apply.

use std::sync::{Mutex, MutexGuard};

use anyhow::Result;
use once_cell::sync::Lazy;

use crate::config::AppConfig;
use crate::detector::{ClapDetector, Effect};
use crate::error::SessionError;
use crate::telemetry::{self, TelemetryHub};

// Re-export error code constants for FFI exposure
pub use crate::error::{FeedbackErrorCodes, SessionErrorCodes};

/// Detector shared by all FFI calls; replaced on every `start_session`.
static DETECTOR: Lazy<Mutex<ClapDetector>> =
    Lazy::new(|| Mutex::new(ClapDetector::new(AppConfig::load_platform().detector)));

fn detector() -> Result<MutexGuard<'static, ClapDetector>, SessionError> {
    DETECTOR.lock().map_err(|_| SessionError::LockPoisoned {
        component: "ClapDetector".to_string(),
    })
}

/// Get the version of the clap core
#[flutter_rust_bridge::frb(sync)]
pub fn get_version() -> Result<String> {
    Ok(env!("CARGO_PKG_VERSION").to_string())
}

/// Begin a fresh session.
///
/// Pass the proximity sensor's maximum range, or `None` when the device has
/// no proximity sensor. Any previous session state is discarded.
///
/// # Returns
/// * `Ok(effects)` - Initial display and instruction texts
/// * `Err(SessionError::LockPoisoned)` - Shared detector unusable
#[flutter_rust_bridge::frb(sync)]
pub fn start_session(max_range: Option<f32>) -> Result<Vec<Effect>, SessionError> {
    let mut guard = detector()?;
    let config = *guard.config();
    *guard = ClapDetector::new(config);
    Ok(begin(&mut guard, &telemetry::hub(), max_range))
}

/// Start `detector`, recording the start only when it took effect.
fn begin(
    detector: &mut ClapDetector,
    telemetry: &TelemetryHub,
    max_range: Option<f32>,
) -> Vec<Effect> {
    let effects = detector.start(max_range);
    if !effects.is_empty() {
        telemetry.record_start(max_range);
    }
    effects
}

/// Feed one proximity reading.
///
/// When the result contains `ScheduleCooldown`, the host must call
/// [`on_cooldown_elapsed`] after the given delay.
#[flutter_rust_bridge::frb(sync)]
pub fn on_distance_sample(distance: f32) -> Result<Vec<Effect>, SessionError> {
    let mut guard = detector()?;
    let transition = guard.on_distance_sample(distance);
    telemetry::hub().record_outcome(transition.outcome, transition.state.clap_count);
    Ok(transition.effects)
}

/// Cooldown timer callback scheduled by a previous clap.
#[flutter_rust_bridge::frb(sync)]
pub fn on_cooldown_elapsed() -> Result<Vec<Effect>, SessionError> {
    let mut guard = detector()?;
    let transition = guard.on_cooldown_elapsed();
    telemetry::hub().record_outcome(transition.outcome, transition.state.clap_count);
    Ok(transition.effects)
}

/// User pressed close. Returns `Finish` the first time.
#[flutter_rust_bridge::frb(sync)]
pub fn close_session() -> Result<Vec<Effect>, SessionError> {
    let mut guard = detector()?;
    let effects = guard.close();
    if !effects.is_empty() {
        telemetry::hub().record_close(guard.clap_count());
    }
    Ok(effects)
}

/// Claps counted in the current session
#[flutter_rust_bridge::frb(sync)]
pub fn clap_count() -> Result<u32, SessionError> {
    Ok(detector()?.clap_count())
}

/// Recent telemetry as JSON, for a debug overlay
#[flutter_rust_bridge::frb(sync)]
pub fn telemetry_snapshot_json() -> Result<String> {
    Ok(serde_json::to_string(&telemetry::hub().snapshot())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use crate::telemetry::MetricEvent;

    #[test]
    fn repeated_start_records_once() {
        let hub = TelemetryHub::default();
        let mut detector = ClapDetector::new(DetectorConfig::default());

        assert!(!begin(&mut detector, &hub, Some(5.0)).is_empty());
        assert!(begin(&mut detector, &hub, Some(5.0)).is_empty());

        assert_eq!(
            hub.snapshot().recent,
            vec![MetricEvent::SessionStarted { max_range: 5.0 }]
        );
    }

    // The detector is global, so the whole FFI flow lives in one test.
    #[test]
    fn ffi_session_flow() {
        let effects = start_session(Some(10.0)).unwrap();
        assert_eq!(effects[0], Effect::display("Ready to clap"));

        assert_eq!(
            on_distance_sample(1.0).unwrap(),
            vec![Effect::display("Hand Near")]
        );
        let clap = on_distance_sample(9.0).unwrap();
        assert!(clap.contains(&Effect::ScheduleCooldown { delay_ms: 500 }));
        assert_eq!(clap_count().unwrap(), 1);

        assert!(on_cooldown_elapsed().unwrap().is_empty());
        assert_eq!(close_session().unwrap(), vec![Effect::Finish]);
        assert!(close_session().unwrap().is_empty());

        // A new session starts from zero.
        start_session(None).unwrap();
        assert_eq!(clap_count().unwrap(), 0);
        assert!(on_distance_sample(1.0).unwrap().is_empty());

        assert!(!get_version().unwrap().is_empty());
        assert!(telemetry_snapshot_json().unwrap().contains("recent"));
    }
}
