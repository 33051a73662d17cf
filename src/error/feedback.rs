// Feedback device error types and constants

use crate::error::ErrorCode;
use flutter_rust_bridge::frb;
use log::error;
use std::fmt;

/// Feedback error code constants exposed to Dart via FFI
///
/// Error code range: 1001-1002
#[frb(unignore)]
pub struct FeedbackErrorCodes {}

#[frb]
impl FeedbackErrorCodes {
    /// Sound player is in a state where it cannot play
    pub const RESOURCE_INVALID_STATE: i32 = 1001;

    /// Sound player was released when the session closed
    pub const RESOURCE_RELEASED: i32 = 1002;

    /// Get RESOURCE_INVALID_STATE error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn resource_invalid_state() -> i32 {
        Self::RESOURCE_INVALID_STATE
    }

    /// Get RESOURCE_RELEASED error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn resource_released() -> i32 {
        Self::RESOURCE_RELEASED
    }
}

/// Log a feedback error with structured context
///
/// Feedback errors never reach the host; this is the only trace they leave.
pub fn log_feedback_error(err: &FeedbackError, context: &str) {
    error!(
        "Feedback error in {}: code={}, component=Feedback, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised by host feedback devices (sound player, haptics)
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackError {
    /// The playback resource is unusable at trigger time
    ResourceInvalidState { details: String },

    /// The playback resource has been released
    ResourceReleased,
}

impl ErrorCode for FeedbackError {
    fn code(&self) -> i32 {
        match self {
            FeedbackError::ResourceInvalidState { .. } => {
                FeedbackErrorCodes::RESOURCE_INVALID_STATE
            }
            FeedbackError::ResourceReleased => FeedbackErrorCodes::RESOURCE_RELEASED,
        }
    }

    fn message(&self) -> String {
        match self {
            FeedbackError::ResourceInvalidState { details } => {
                format!("Sound player in invalid state: {}", details)
            }
            FeedbackError::ResourceReleased => "Sound player already released".to_string(),
        }
    }
}

impl fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FeedbackError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for FeedbackError {}
