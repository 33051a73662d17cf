//! Haptic pulse on clap.

use std::time::Duration;

use crate::error::{log_feedback_error, FeedbackError};

/// Platform vibration service
pub trait Haptics {
    /// Whether the device can vibrate at all.
    fn has_vibrator(&self) -> bool;

    fn vibrate(&mut self, duration: Duration) -> Result<(), FeedbackError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum HapticOutcome {
    Vibrated,
    /// Capability checked up front and missing; not an error.
    NoVibrator,
    Failed(FeedbackError),
}

/// Vibrate for `duration_ms` if the device supports it.
pub fn pulse(haptics: &mut dyn Haptics, duration_ms: u32) -> HapticOutcome {
    if !haptics.has_vibrator() {
        log::debug!("[Haptics] No vibrator, skipping pulse");
        return HapticOutcome::NoVibrator;
    }

    match haptics.vibrate(Duration::from_millis(u64::from(duration_ms))) {
        Ok(()) => HapticOutcome::Vibrated,
        Err(err) => {
            log_feedback_error(&err, "pulse");
            HapticOutcome::Failed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeVibrator {
        present: bool,
        pulses: Vec<Duration>,
    }

    impl Haptics for FakeVibrator {
        fn has_vibrator(&self) -> bool {
            self.present
        }

        fn vibrate(&mut self, duration: Duration) -> Result<(), FeedbackError> {
            self.pulses.push(duration);
            Ok(())
        }
    }

    #[test]
    fn pulses_for_requested_duration() {
        let mut vibrator = FakeVibrator {
            present: true,
            pulses: Vec::new(),
        };
        assert_eq!(pulse(&mut vibrator, 50), HapticOutcome::Vibrated);
        assert_eq!(vibrator.pulses, vec![Duration::from_millis(50)]);
    }

    #[test]
    fn missing_vibrator_is_checked_before_vibrating() {
        let mut vibrator = FakeVibrator {
            present: false,
            pulses: Vec::new(),
        };
        assert_eq!(pulse(&mut vibrator, 50), HapticOutcome::NoVibrator);
        assert!(vibrator.pulses.is_empty());
    }
}
