//! Host-side feedback collaborators.
//!
//! The detector only emits [`Effect`](crate::detector::Effect)s; these traits
//! are what a Rust-hosted session applies them to. Platform shells implement
//! them over their own UI, audio and vibration APIs.

mod haptics;
mod sound;

pub use haptics::{pulse, HapticOutcome, Haptics};
pub use sound::{play_clap_sound, SoundOutcome, SoundPlayer};

/// The two text labels plus the close action of the clap screen
pub trait Screen {
    fn set_display_text(&mut self, text: &str);
    fn set_instruction_text(&mut self, text: &str);
    /// Tear the screen down; the session is over.
    fn finish(&mut self);
}

/// Bundle of collaborators owned by a session.
///
/// Sound and haptics are optional: a host without a player or without a
/// vibrator service simply leaves them out.
pub struct FeedbackDevices {
    pub screen: Box<dyn Screen>,
    pub sound: Option<Box<dyn SoundPlayer>>,
    pub haptics: Option<Box<dyn Haptics>>,
}

impl FeedbackDevices {
    pub fn new(screen: Box<dyn Screen>) -> Self {
        Self {
            screen,
            sound: None,
            haptics: None,
        }
    }

    pub fn with_sound(mut self, sound: Box<dyn SoundPlayer>) -> Self {
        self.sound = Some(sound);
        self
    }

    pub fn with_haptics(mut self, haptics: Box<dyn Haptics>) -> Self {
        self.haptics = Some(haptics);
        self
    }
}
