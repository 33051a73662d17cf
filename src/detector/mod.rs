//! Clap detection: pure state machine plus session phases.

mod machine;
pub mod state;

pub use machine::{ClapDetector, DetectorPhase};
pub use state::{
    clap_text, DetectorState, DistanceSample, Effect, Outcome, Proximity, Transition,
};

#[cfg(test)]
mod tests;
