//! Live session loop on tokio.
//!
//! Sensor samples and lifecycle calls arrive through a [`SessionHandle`];
//! cooldown timers come back from the [`TokioScheduler`]. Both are drained by
//! one task, so detector state is never touched concurrently.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::DetectorConfig;
use crate::error::{log_session_error, SessionError};
use crate::feedback::FeedbackDevices;
use crate::telemetry::TelemetryHub;

use super::core::ClapSession;
use super::scheduler::{TimerEvent, TokioScheduler};

/// Inbound calls from the host
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Start { max_range: Option<f32> },
    Sample { distance: f32 },
    Close,
}

/// Cloneable sender side of a live session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    pub fn start(&self, max_range: Option<f32>) -> Result<(), SessionError> {
        self.send(SessionEvent::Start { max_range })
    }

    pub fn sample(&self, distance: f32) -> Result<(), SessionError> {
        self.send(SessionEvent::Sample { distance })
    }

    pub fn close(&self) -> Result<(), SessionError> {
        self.send(SessionEvent::Close)
    }

    fn send(&self, event: SessionEvent) -> Result<(), SessionError> {
        self.tx.send(event).map_err(|_| {
            let err = SessionError::SessionClosed;
            log_session_error(&err, "SessionHandle::send");
            err
        })
    }
}

/// A session plus the two queues feeding it.
pub struct RealtimeSession {
    session: ClapSession<TokioScheduler>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    timers: mpsc::UnboundedReceiver<TimerEvent>,
}

/// Build a live session and the handle used to drive it.
pub fn realtime(config: DetectorConfig, devices: FeedbackDevices) -> (RealtimeSession, SessionHandle) {
    let (event_tx, events) = mpsc::unbounded_channel();
    let (timer_tx, timers) = mpsc::unbounded_channel();
    let session = ClapSession::new(config, devices, TokioScheduler::new(timer_tx));

    (
        RealtimeSession {
            session,
            events,
            timers,
        },
        SessionHandle { tx: event_tx },
    )
}

impl RealtimeSession {
    pub fn with_telemetry(mut self, telemetry: Arc<TelemetryHub>) -> Self {
        self.session = self.session.with_telemetry(telemetry);
        self
    }

    pub fn session(&self) -> &ClapSession<TokioScheduler> {
        &self.session
    }

    /// Process events until `Close` arrives or every handle is dropped.
    ///
    /// Returns the final clap count.
    pub async fn run(mut self) -> u32 {
        loop {
            // Timers first, so a cooldown due now lands before a sample
            // queued at the same instant.
            tokio::select! {
                biased;

                Some(timer) = self.timers.recv() => {
                    self.session.on_timer(timer);
                }
                event = self.events.recv() => match event {
                    Some(SessionEvent::Start { max_range }) => self.session.start(max_range),
                    Some(SessionEvent::Sample { distance }) => {
                        self.session.on_distance_sample(distance);
                    }
                    Some(SessionEvent::Close) | None => {
                        self.session.close();
                        break;
                    }
                },
            }
        }

        log::info!(
            "[RealtimeSession] Loop finished with {} clap(s)",
            self.session.clap_count()
        );
        self.session.clap_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingHost;

    #[tokio::test(start_paused = true)]
    async fn test_ready_timer_runs_before_queued_sample() {
        let host = RecordingHost::new();
        let (tx, events) = mpsc::unbounded_channel();
        let (timer_tx, timers) = mpsc::unbounded_channel();

        let mut session = ClapSession::new(
            DetectorConfig::default(),
            host.devices(),
            TokioScheduler::new(timer_tx.clone()),
        )
        .with_telemetry(Arc::new(TelemetryHub::default()));
        session.start(Some(10.0));
        session.on_distance_sample(1.0);
        session.on_distance_sample(9.0);
        session.on_distance_sample(1.0);

        // Cooldown and the next far reading are both waiting.
        timer_tx.send(TimerEvent::CooldownElapsed).unwrap();
        let handle = SessionHandle { tx };
        handle.sample(9.0).unwrap();
        handle.close().unwrap();

        let live = RealtimeSession {
            session,
            events,
            timers,
        };
        assert_eq!(live.run().await, 2);
    }
}
