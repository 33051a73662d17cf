//! ClapSession: applies detector effects to host collaborators.
//!
//! The detector decides, the session carries out. Effects are applied in
//! the order the detector emitted them. Feedback failures are logged and
//! recorded in telemetry, never surfaced to the caller.

use std::sync::Arc;
use std::time::Duration;

use crate::config::DetectorConfig;
use crate::detector::{ClapDetector, DetectorPhase, Effect, Outcome, Transition};
use crate::feedback::{play_clap_sound, pulse, FeedbackDevices};
use crate::telemetry::{self, TelemetryHub};

use super::scheduler::{Scheduler, TimerEvent, VirtualScheduler};

pub struct ClapSession<S: Scheduler> {
    detector: ClapDetector,
    devices: FeedbackDevices,
    scheduler: S,
    telemetry: Arc<TelemetryHub>,
}

impl<S: Scheduler> ClapSession<S> {
    /// Create a session reporting to the global telemetry hub.
    pub fn new(config: DetectorConfig, devices: FeedbackDevices, scheduler: S) -> Self {
        Self {
            detector: ClapDetector::new(config),
            devices,
            scheduler,
            telemetry: telemetry::hub(),
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<TelemetryHub>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn detector(&self) -> &ClapDetector {
        &self.detector
    }

    pub fn clap_count(&self) -> u32 {
        self.detector.clap_count()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn telemetry(&self) -> &Arc<TelemetryHub> {
        &self.telemetry
    }

    pub fn start(&mut self, max_range: Option<f32>) {
        let effects = self.detector.start(max_range);
        if !effects.is_empty() {
            self.telemetry.record_start(max_range);
        }
        self.apply(effects);
    }

    pub fn on_distance_sample(&mut self, distance: f32) -> Outcome {
        let transition = self.detector.on_distance_sample(distance);
        self.finish_transition(transition)
    }

    pub fn on_cooldown_elapsed(&mut self) -> Outcome {
        let transition = self.detector.on_cooldown_elapsed();
        self.finish_transition(transition)
    }

    pub fn on_timer(&mut self, timer: TimerEvent) -> Outcome {
        match timer {
            TimerEvent::CooldownElapsed => self.on_cooldown_elapsed(),
        }
    }

    /// User asked to leave. Releases the sound player and finishes the screen.
    pub fn close(&mut self) {
        let effects = self.detector.close();
        self.apply(effects);
    }

    pub fn is_closed(&self) -> bool {
        self.detector.phase() == DetectorPhase::Closed
    }

    fn finish_transition(&mut self, transition: Transition) -> Outcome {
        self.telemetry
            .record_outcome(transition.outcome, transition.state.clap_count);
        self.apply(transition.effects);
        transition.outcome
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SetDisplayText(text) => self.devices.screen.set_display_text(&text),
                Effect::SetInstructionText(text) => {
                    self.devices.screen.set_instruction_text(&text)
                }
                Effect::TriggerSound => {
                    if let Some(sound) = self.devices.sound.as_deref_mut() {
                        let outcome = play_clap_sound(sound);
                        self.telemetry.record_sound(&outcome);
                    }
                }
                Effect::TriggerHaptic { duration_ms } => {
                    if let Some(haptics) = self.devices.haptics.as_deref_mut() {
                        let outcome = pulse(haptics, duration_ms);
                        self.telemetry.record_haptic(&outcome);
                    }
                }
                Effect::ScheduleCooldown { delay_ms } => self.scheduler.schedule_after(
                    Duration::from_millis(u64::from(delay_ms)),
                    TimerEvent::CooldownElapsed,
                ),
                Effect::Finish => {
                    if let Some(sound) = self.devices.sound.as_deref_mut() {
                        sound.release();
                    }
                    self.telemetry.record_close(self.detector.clap_count());
                    self.devices.screen.finish();
                }
            }
        }
    }
}

impl ClapSession<VirtualScheduler> {
    /// Move virtual time to `now`, running every cooldown that falls due on
    /// the way at its own deadline.
    pub fn advance_to(&mut self, now: Duration) {
        while let Some(deadline) = self.scheduler.next_deadline() {
            if deadline > now {
                break;
            }
            for timer in self.scheduler.advance_to(deadline) {
                self.on_timer(timer);
            }
        }
        self.scheduler.advance_to(now);
    }

    /// Feed a reading observed at virtual time `at`.
    ///
    /// Timers due at exactly `at` run before the reading is classified.
    pub fn sample_at(&mut self, at: Duration, distance: f32) -> Outcome {
        self.advance_to(at);
        self.on_distance_sample(distance)
    }
}
