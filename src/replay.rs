//! Timed sample traces replayed under virtual time.
//!
//! A trace is a JSON document:
//!
//! ```json
//! { "name": "double_clap", "max_range": 10.0,
//!   "samples": [ { "at_ms": 0, "distance": 1.0 }, { "at_ms": 40, "distance": 9.0 } ] }
//! ```
//!
//! `max_range: null` replays a device without a proximity sensor.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::detector::DetectorState;
use crate::session::{ClapSession, VirtualScheduler};
use crate::telemetry::{MetricEvent, TelemetryHub};
use crate::testing::{HostCall, RecordingHost};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSample {
    /// Milliseconds since session start
    pub at_ms: u64,
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleTrace {
    #[serde(default)]
    pub name: Option<String>,
    pub max_range: Option<f32>,
    #[serde(default)]
    pub samples: Vec<TimedSample>,
}

impl SampleTrace {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let trace: SampleTrace = serde_json::from_str(&contents)
            .with_context(|| format!("parsing trace {}", path.display()))?;
        trace.validate()?;
        Ok(trace)
    }

    /// Sample timestamps must not go backwards.
    pub fn validate(&self) -> Result<()> {
        for pair in self.samples.windows(2) {
            if pair[1].at_ms < pair[0].at_ms {
                bail!(
                    "samples out of order: {} ms follows {} ms",
                    pair[1].at_ms,
                    pair[0].at_ms
                );
            }
        }
        Ok(())
    }
}

/// Everything a replay produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    pub trace: Option<String>,
    pub clap_count: u32,
    pub final_state: DetectorState,
    pub calls: Vec<HostCall>,
    pub telemetry: Vec<MetricEvent>,
}

/// Run `trace` through a fresh session on a virtual clock.
///
/// After the last sample the clock runs one more cooldown so no timer is
/// left pending, then the session is closed.
pub fn replay(trace: &SampleTrace, config: &AppConfig) -> Result<ReplayReport> {
    trace.validate()?;

    let host = RecordingHost::new();
    let telemetry = Arc::new(TelemetryHub::new(config.telemetry));
    let mut session = ClapSession::new(config.detector, host.devices(), VirtualScheduler::new())
        .with_telemetry(Arc::clone(&telemetry));

    session.start(trace.max_range);
    for sample in &trace.samples {
        session.sample_at(Duration::from_millis(sample.at_ms), sample.distance);
    }

    let settle = session.scheduler().now()
        + Duration::from_millis(u64::from(config.detector.cooldown_ms));
    session.advance_to(settle);
    let final_state = session.detector().state();
    session.close();

    log::info!(
        "[Replay] {} sample(s) -> {} clap(s)",
        trace.samples.len(),
        session.clap_count()
    );

    Ok(ReplayReport {
        trace: trace.name.clone(),
        clap_count: session.clap_count(),
        final_state,
        calls: host.calls(),
        telemetry: telemetry.snapshot().recent,
    })
}
