//! Pure clap state machine.
//!
//! `DetectorState` is a small `Copy` value. Every operation consumes the
//! current state and returns a [`Transition`]: the next state plus the
//! ordered list of [`Effect`]s the host must apply. Nothing here touches a
//! platform API or a clock.

use serde::{Deserialize, Serialize};

use crate::config::DetectorConfig;

/// Main display text when the device reports no proximity sensor
pub const TEXT_SENSOR_UNAVAILABLE: &str = "Proximity sensor not available";
/// Main display text while waiting for a hand
pub const TEXT_READY: &str = "Ready to clap";
/// Main display text once a hand covers the sensor
pub const TEXT_HAND_NEAR: &str = "Hand Near";
/// Instruction text shown when the sensor is present
pub const INSTRUCTION_START: &str = "Move your hand near and away from the sensor to clap";
/// Instruction text shown when the sensor is missing
pub const INSTRUCTION_UNSUPPORTED: &str = "This device doesn't support the clap app";

/// Main display text after a clap
pub fn clap_text(count: u32) -> String {
    format!("CLAP! Count: {}", count)
}

/// Binary classification of a sample against the sensor range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proximity {
    Near,
    Far,
}

/// A single proximity sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceSample {
    /// Sensor reading in sensor-defined units
    pub distance: f32,
    /// Maximum range reported by the sensor
    pub max_range: f32,
}

impl DistanceSample {
    pub fn new(distance: f32, max_range: f32) -> Self {
        Self {
            distance,
            max_range,
        }
    }

    /// Classify against `max_range * ratio`.
    ///
    /// The comparison is strict: a reading exactly on the threshold is Far.
    /// A NaN reading never compares below the threshold and is Far as well.
    pub fn classify(&self, near_threshold_ratio: f32) -> Proximity {
        if self.distance < self.max_range * near_threshold_ratio {
            Proximity::Near
        } else {
            Proximity::Far
        }
    }
}

/// Command emitted by the detector for the host to carry out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Effect {
    /// Replace the main display text
    SetDisplayText(String),
    /// Replace the instruction text below the display
    SetInstructionText(String),
    /// Play the clap sound from its start
    TriggerSound,
    /// Vibrate for the given duration
    TriggerHaptic { duration_ms: u32 },
    /// Call back `on_cooldown_elapsed` after the given delay
    ScheduleCooldown { delay_ms: u32 },
    /// End the session
    Finish,
}

impl Effect {
    pub fn display(text: impl Into<String>) -> Self {
        Effect::SetDisplayText(text.into())
    }

    pub fn instruction(text: impl Into<String>) -> Self {
        Effect::SetInstructionText(text.into())
    }
}

/// What a single transition amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Far → Near
    BecameNear,
    /// Near → Far with cooldown inactive
    Clap { count: u32 },
    /// Far sample while already far
    Ready,
    /// Near → Far during cooldown; the hand stays "near"
    Suppressed,
    /// Cooldown window closed
    CooldownElapsed,
    /// Near sample while already near
    Unchanged,
    /// Input arrived while the detector was not active
    Ignored,
}

/// Result of feeding one input to the state machine
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: DetectorState,
    pub outcome: Outcome,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn new(state: DetectorState, outcome: Outcome, effects: Vec<Effect>) -> Self {
        Self {
            state,
            outcome,
            effects,
        }
    }

    pub(crate) fn quiet(state: DetectorState, outcome: Outcome) -> Self {
        Self::new(state, outcome, Vec::new())
    }
}

/// Live gesture state: near flag, cooldown gate and running count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorState {
    pub is_near: bool,
    pub can_clap: bool,
    pub clap_count: u32,
}

impl Default for DetectorState {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorState {
    /// Fresh session state: far, ready, zero claps
    pub fn new() -> Self {
        Self {
            is_near: false,
            can_clap: true,
            clap_count: 0,
        }
    }

    pub fn on_distance_sample(self, sample: DistanceSample, config: &DetectorConfig) -> Transition {
        let proximity = sample.classify(config.near_threshold_ratio);

        match (proximity, self.is_near, self.can_clap) {
            (Proximity::Near, false, _) => {
                let next = Self {
                    is_near: true,
                    ..self
                };
                Transition::new(
                    next,
                    Outcome::BecameNear,
                    vec![Effect::display(TEXT_HAND_NEAR)],
                )
            }
            (Proximity::Near, true, _) => Transition::quiet(self, Outcome::Unchanged),
            (Proximity::Far, true, true) => {
                let count = self.clap_count.saturating_add(1);
                let next = Self {
                    is_near: false,
                    can_clap: false,
                    clap_count: count,
                };
                Transition::new(
                    next,
                    Outcome::Clap { count },
                    vec![
                        Effect::TriggerSound,
                        Effect::TriggerHaptic {
                            duration_ms: config.haptic_duration_ms,
                        },
                        Effect::display(clap_text(count)),
                        Effect::ScheduleCooldown {
                            delay_ms: config.cooldown_ms,
                        },
                    ],
                )
            }
            (Proximity::Far, false, _) => {
                Transition::new(self, Outcome::Ready, vec![Effect::display(TEXT_READY)])
            }
            // Cooldown still running: no clap, and the near flag is kept.
            (Proximity::Far, true, false) => Transition::quiet(self, Outcome::Suppressed),
        }
    }

    pub fn on_cooldown_elapsed(self) -> Transition {
        Transition::quiet(
            Self {
                can_clap: true,
                ..self
            },
            Outcome::CooldownElapsed,
        )
    }
}
