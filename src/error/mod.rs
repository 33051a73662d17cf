// Error types for the proximity clap core
//
// This module defines custom error types for feedback devices and session
// plumbing, providing structured error handling with error codes suitable
// for FFI communication.

mod feedback;
mod session;

pub use feedback::{log_feedback_error, FeedbackError, FeedbackErrorCodes};
pub use session::{log_session_error, SessionError, SessionErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the FFI boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
