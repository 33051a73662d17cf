//! In-memory host that records every call a session makes.
//!
//! Used by integration tests and by the `clap_cli replay` command, where the
//! recorded calls become the JSON report.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FeedbackError;
use crate::feedback::{FeedbackDevices, Haptics, Screen, SoundPlayer};

/// One observable call into the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    SetDisplayText { text: String },
    SetInstructionText { text: String },
    PlaySound,
    RecreateSound,
    ReleaseSound,
    Vibrate { duration_ms: u64 },
    Finish,
}

#[derive(Debug, Default)]
struct HostState {
    calls: Vec<HostCall>,
    play_failures: VecDeque<FeedbackError>,
    released: bool,
}

/// Shared recorder; clone freely, all clones see the same log.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    state: Arc<Mutex<HostState>>,
    has_vibrator: bool,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState::default())),
            has_vibrator: true,
        }
    }

    pub fn without_vibrator(mut self) -> Self {
        self.has_vibrator = false;
        self
    }

    /// Make the next play attempts fail with the given errors, in order.
    pub fn fail_next_plays(&self, errors: impl IntoIterator<Item = FeedbackError>) {
        self.lock().play_failures.extend(errors);
    }

    /// Screen, sound player and haptics all writing to this recorder.
    pub fn devices(&self) -> FeedbackDevices {
        FeedbackDevices::new(Box::new(RecordingScreen(self.clone())))
            .with_sound(Box::new(RecordingPlayer(self.clone())))
            .with_haptics(Box::new(RecordingHaptics(self.clone())))
    }

    /// Only the screen: no sound player, no vibrator service.
    pub fn screen_devices(&self) -> FeedbackDevices {
        FeedbackDevices::new(Box::new(RecordingScreen(self.clone())))
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<HostCall> {
        std::mem::take(&mut self.lock().calls)
    }

    pub fn display_texts(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                HostCall::SetDisplayText { text } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_display_text(&self) -> Option<String> {
        self.display_texts().pop()
    }

    pub fn count(&self, wanted: &HostCall) -> usize {
        self.lock().calls.iter().filter(|call| *call == wanted).count()
    }

    fn record(&self, call: HostCall) {
        self.lock().calls.push(call);
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        // Recording must survive a panicking test thread.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

struct RecordingScreen(RecordingHost);

impl Screen for RecordingScreen {
    fn set_display_text(&mut self, text: &str) {
        self.0.record(HostCall::SetDisplayText {
            text: text.to_string(),
        });
    }

    fn set_instruction_text(&mut self, text: &str) {
        self.0.record(HostCall::SetInstructionText {
            text: text.to_string(),
        });
    }

    fn finish(&mut self) {
        self.0.record(HostCall::Finish);
    }
}

struct RecordingPlayer(RecordingHost);

impl SoundPlayer for RecordingPlayer {
    fn play_from_start(&mut self) -> Result<(), FeedbackError> {
        let mut state = self.0.lock();
        if state.released {
            return Err(FeedbackError::ResourceReleased);
        }
        if let Some(err) = state.play_failures.pop_front() {
            return Err(err);
        }
        state.calls.push(HostCall::PlaySound);
        Ok(())
    }

    fn recreate(&mut self) -> Result<(), FeedbackError> {
        self.0.record(HostCall::RecreateSound);
        Ok(())
    }

    fn release(&mut self) {
        let mut state = self.0.lock();
        state.released = true;
        state.calls.push(HostCall::ReleaseSound);
    }
}

struct RecordingHaptics(RecordingHost);

impl Haptics for RecordingHaptics {
    fn has_vibrator(&self) -> bool {
        self.0.has_vibrator
    }

    fn vibrate(&mut self, duration: Duration) -> Result<(), FeedbackError> {
        self.0.record(HostCall::Vibrate {
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        });
        Ok(())
    }
}
