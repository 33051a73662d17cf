//! Session layer: drives the detector and applies its effects.
//!
//! `ClapSession` is generic over the [`Scheduler`] so the same code runs under
//! a virtual clock (tests, trace replay) and under tokio (live host).

mod core;
mod realtime;
pub mod scheduler;

pub use self::core::ClapSession;
pub use realtime::{realtime, RealtimeSession, SessionEvent, SessionHandle};
pub use scheduler::{Scheduler, TimerEvent, TokioScheduler, VirtualScheduler};
