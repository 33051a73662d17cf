//! Delayed-callback abstraction for the cooldown timer.
//!
//! The session never sleeps itself. It asks a [`Scheduler`] to hand a
//! [`TimerEvent`] back after a delay: virtually in tests and replays,
//! through tokio timers in a live session.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Callbacks a session can schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimerEvent {
    CooldownElapsed,
}

/// Host-provided `scheduleAfter` capability.
///
/// Fire-and-forget: there is no cancellation.
pub trait Scheduler {
    fn schedule_after(&mut self, delay: Duration, timer: TimerEvent);
}

/// Deterministic virtual clock.
///
/// Timers fire in deadline order, ties in schedule order. Time only moves
/// when the owner calls [`advance_to`](Self::advance_to).
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<(Duration, u64), TimerEvent>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Move the clock to `now` and return every timer due at or before it.
    ///
    /// The clock never runs backwards; an earlier `now` only collects timers
    /// that are already due.
    pub fn advance_to(&mut self, now: Duration) -> Vec<TimerEvent> {
        if now > self.now {
            self.now = now;
        }
        let later = self.pending.split_off(&(self.now, u64::MAX));
        std::mem::replace(&mut self.pending, later)
            .into_values()
            .collect()
    }

    pub fn advance_by(&mut self, delta: Duration) -> Vec<TimerEvent> {
        self.advance_to(self.now + delta)
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule_after(&mut self, delay: Duration, timer: TimerEvent) {
        let key = (self.now + delay, self.next_seq);
        self.next_seq += 1;
        self.pending.insert(key, timer);
    }
}

/// Scheduler backed by `tokio::time::sleep`.
///
/// Each timer is a spawned task that sleeps and then posts the event back to
/// the session loop, so the callback runs on the loop's task like every
/// sensor sample. Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TokioScheduler {
    pub fn new(tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self { tx }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&mut self, delay: Duration, timer: TimerEvent) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Loop already gone: the session state is discarded anyway.
            let _ = tx.send(timer);
        });
    }
}
