//! ClapDetector: session phases wrapped around the pure state machine.

use serde::{Deserialize, Serialize};

use crate::config::DetectorConfig;

use super::state::{
    DetectorState, DistanceSample, Effect, Outcome, Transition, INSTRUCTION_START,
    INSTRUCTION_UNSUPPORTED, TEXT_READY, TEXT_SENSOR_UNAVAILABLE,
};

/// Where the detector is in its session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DetectorPhase {
    /// Constructed, waiting for `start`
    Idle,
    /// Sensor present; samples are classified against `max_range`
    Active { max_range: f32 },
    /// No sensor; samples are never processed
    Disabled,
    /// Session finished
    Closed,
}

/// Owns the detector state and decides which inputs reach it.
#[derive(Debug, Clone)]
pub struct ClapDetector {
    config: DetectorConfig,
    phase: DetectorPhase,
    state: DetectorState,
}

impl ClapDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            phase: DetectorPhase::Idle,
            state: DetectorState::new(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn phase(&self) -> DetectorPhase {
        self.phase
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn clap_count(&self) -> u32 {
        self.state.clap_count
    }

    /// Begin the session.
    ///
    /// `None` means the device has no proximity sensor: the detector is
    /// disabled for good and only the fixed "not available" texts are shown.
    pub fn start(&mut self, max_range: Option<f32>) -> Vec<Effect> {
        if self.phase != DetectorPhase::Idle {
            log::warn!(
                "[ClapDetector] start ignored, detector already in {:?}",
                self.phase
            );
            return Vec::new();
        }

        match max_range {
            Some(max_range) => {
                log::info!("[ClapDetector] Started with max_range={}", max_range);
                self.phase = DetectorPhase::Active { max_range };
                vec![
                    Effect::display(TEXT_READY),
                    Effect::instruction(INSTRUCTION_START),
                ]
            }
            None => {
                log::warn!("[ClapDetector] No proximity sensor, detector disabled");
                self.phase = DetectorPhase::Disabled;
                vec![
                    Effect::display(TEXT_SENSOR_UNAVAILABLE),
                    Effect::instruction(INSTRUCTION_UNSUPPORTED),
                ]
            }
        }
    }

    pub fn on_distance_sample(&mut self, distance: f32) -> Transition {
        let max_range = match self.phase {
            DetectorPhase::Active { max_range } => max_range,
            phase => {
                log::debug!("[ClapDetector] Sample {} ignored in {:?}", distance, phase);
                return Transition::quiet(self.state, Outcome::Ignored);
            }
        };

        let transition = self
            .state
            .on_distance_sample(DistanceSample::new(distance, max_range), &self.config);
        self.state = transition.state;
        transition
    }

    /// Reopen the clap gate. Late or post-close deliveries are harmless.
    pub fn on_cooldown_elapsed(&mut self) -> Transition {
        if self.phase == DetectorPhase::Closed {
            return Transition::quiet(self.state, Outcome::Ignored);
        }

        let transition = self.state.on_cooldown_elapsed();
        self.state = transition.state;
        transition
    }

    /// End the session; the host should tear the screen down.
    pub fn close(&mut self) -> Vec<Effect> {
        if self.phase == DetectorPhase::Closed {
            return Vec::new();
        }
        log::info!(
            "[ClapDetector] Closing after {} clap(s)",
            self.state.clap_count
        );
        self.phase = DetectorPhase::Closed;
        vec![Effect::Finish]
    }
}

impl Default for ClapDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}
