//! Clap sound playback with a single recreate-and-retry.

use crate::error::{log_feedback_error, ErrorCode, FeedbackError};

/// Handle to the platform's clap sound
pub trait SoundPlayer {
    /// Rewind to the start and play.
    fn play_from_start(&mut self) -> Result<(), FeedbackError>;

    /// Throw away the underlying player and build a fresh one.
    fn recreate(&mut self) -> Result<(), FeedbackError>;

    /// Free the underlying player. Further plays fail with `ResourceReleased`.
    fn release(&mut self);
}

/// How a clap sound request ended
#[derive(Debug, Clone, PartialEq)]
pub enum SoundOutcome {
    Played,
    PlayedAfterRecreate,
    Failed(FeedbackError),
}

/// Play the clap sound, recreating the player once if it is in a bad state.
///
/// Failures are logged and returned for telemetry, never propagated:
/// the clap count and display do not depend on audio health.
pub fn play_clap_sound(player: &mut dyn SoundPlayer) -> SoundOutcome {
    let err = match player.play_from_start() {
        Ok(()) => return SoundOutcome::Played,
        Err(err) => err,
    };

    if !matches!(err, FeedbackError::ResourceInvalidState { .. }) {
        log_feedback_error(&err, "play_clap_sound");
        return SoundOutcome::Failed(err);
    }

    log::warn!("[Sound] Player unusable ({}), recreating", err.message());
    let retried = player.recreate().and_then(|()| player.play_from_start());
    match retried {
        Ok(()) => SoundOutcome::PlayedAfterRecreate,
        Err(retry_err) => {
            log_feedback_error(&retry_err, "play_clap_sound retry");
            SoundOutcome::Failed(retry_err)
        }
    }
}
