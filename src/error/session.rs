// Session error types and constants

use crate::error::ErrorCode;
use flutter_rust_bridge::frb;
use log::error;
use std::fmt;

/// Session error code constants exposed to Dart via FFI
///
/// Error code range: 2001-2002
#[frb(unignore)]
pub struct SessionErrorCodes {}

#[frb]
impl SessionErrorCodes {
    /// The session loop has already finished
    pub const SESSION_CLOSED: i32 = 2001;

    /// Mutex guarding the shared detector was poisoned
    pub const LOCK_POISONED: i32 = 2002;

    /// Get SESSION_CLOSED error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn session_closed() -> i32 {
        Self::SESSION_CLOSED
    }

    /// Get LOCK_POISONED error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn lock_poisoned() -> i32 {
        Self::LOCK_POISONED
    }
}

/// Log a session error with structured context
pub fn log_session_error(err: &SessionError, context: &str) {
    error!(
        "Session error in {}: code={}, component=ClapSession, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Session-level errors
///
/// These cover the plumbing around the detector, never the gesture logic.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Event sent after the session loop ended
    SessionClosed,

    /// Mutex was poisoned
    LockPoisoned { component: String },
}

impl ErrorCode for SessionError {
    fn code(&self) -> i32 {
        match self {
            SessionError::SessionClosed => SessionErrorCodes::SESSION_CLOSED,
            SessionError::LockPoisoned { .. } => SessionErrorCodes::LOCK_POISONED,
        }
    }

    fn message(&self) -> String {
        match self {
            SessionError::SessionClosed => {
                "Session already closed. Start a new session first.".to_string()
            }
            SessionError::LockPoisoned { component } => {
                format!("Lock poisoned on {}", component)
            }
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SessionError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SessionError {}
