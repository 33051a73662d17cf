//! Diagnostics telemetry collector and helpers.
//!
//! The collector keeps a bounded history of session events and fans them out
//! to live subscribers over a broadcast channel.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::config::{AppConfig, TelemetryConfig};
use crate::detector::Outcome;
use crate::error::ErrorCode;
use crate::feedback::{HapticOutcome, SoundOutcome};

pub mod events;

pub use events::MetricEvent;

/// Global telemetry hub shared across the crate, sized from the platform config.
static HUB: Lazy<Arc<TelemetryHub>> =
    Lazy::new(|| Arc::new(TelemetryHub::from_config(&AppConfig::load_platform())));

/// Access the global telemetry hub.
pub fn hub() -> Arc<TelemetryHub> {
    Arc::clone(&HUB)
}

/// Snapshot of collector state for CLI reporting.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TelemetrySnapshot {
    pub recent: Vec<MetricEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
}

/// Broadcast-based collector retaining a bounded history of events.
pub struct TelemetryCollector {
    tx: broadcast::Sender<MetricEvent>,
    history: Mutex<VecDeque<MetricEvent>>,
    history_capacity: usize,
    total_events: AtomicU64,
    dropped_history: AtomicU64,
}

impl TelemetryCollector {
    pub fn new(buffer: usize, history_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self {
            tx,
            history: Mutex::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
            total_events: AtomicU64::new(0),
            dropped_history: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, event: MetricEvent) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        // A poisoned history only loses diagnostics; keep publishing live.
        if self.history_capacity > 0 {
            if let Ok(mut history) = self.history.lock() {
                if history.len() >= self.history_capacity {
                    history.pop_front();
                    self.dropped_history.fetch_add(1, Ordering::Relaxed);
                }
                history.push_back(event.clone());
            }
        }

        let _ = self.tx.send(event);
    }

    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MetricEvent> {
        self.tx.subscribe()
    }

    /// Live events as a `Stream`; lagged receivers see `Err` items.
    pub fn subscribe_stream(&self) -> BroadcastStream<MetricEvent> {
        BroadcastStream::new(self.tx.subscribe())
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let recent = self
            .history
            .lock()
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default();
        TelemetrySnapshot {
            recent,
            total_events: self.total_events.load(Ordering::Relaxed),
            dropped_events: self.dropped_history.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        let config = TelemetryConfig::default();
        Self::new(config.channel_capacity, config.history_capacity)
    }
}

/// Top-level hub translating session outcomes into metric events.
pub struct TelemetryHub {
    collector: TelemetryCollector,
}

impl TelemetryHub {
    pub fn new(config: TelemetryConfig) -> Self {
        Self {
            collector: TelemetryCollector::new(config.channel_capacity, config.history_capacity),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.telemetry)
    }

    pub fn collector(&self) -> &TelemetryCollector {
        &self.collector
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.collector.snapshot()
    }

    pub fn record_start(&self, max_range: Option<f32>) {
        self.collector.publish(match max_range {
            Some(max_range) => MetricEvent::SessionStarted { max_range },
            None => MetricEvent::SensorUnavailable,
        });
    }

    pub fn record_outcome(&self, outcome: Outcome, clap_count: u32) {
        let event = match outcome {
            Outcome::BecameNear => MetricEvent::HandNear,
            Outcome::Clap { count } => MetricEvent::Clap { count },
            Outcome::Suppressed => MetricEvent::ClapSuppressed { count: clap_count },
            Outcome::CooldownElapsed => MetricEvent::CooldownElapsed,
            // Repeated ready/near readings arrive at sensor rate.
            Outcome::Ready | Outcome::Unchanged | Outcome::Ignored => return,
        };
        self.collector.publish(event);
    }

    pub fn record_sound(&self, outcome: &SoundOutcome) {
        match outcome {
            SoundOutcome::Played => {}
            SoundOutcome::PlayedAfterRecreate => self.collector.publish(MetricEvent::SoundRecovered),
            SoundOutcome::Failed(err) => self.collector.publish(MetricEvent::SoundFailed {
                code: err.code(),
                message: err.message(),
            }),
        }
    }

    pub fn record_haptic(&self, outcome: &HapticOutcome) {
        if !matches!(outcome, HapticOutcome::Vibrated) {
            self.collector.publish(MetricEvent::HapticSkipped);
        }
    }

    pub fn record_close(&self, clap_count: u32) {
        self.collector
            .publish(MetricEvent::SessionClosed { clap_count });
    }
}

impl Default for TelemetryHub {
    fn default() -> Self {
        Self::new(TelemetryConfig::default())
    }
}
