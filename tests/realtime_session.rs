//! Live session loop under tokio's paused clock.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::StreamExt;
use proximity_clap::config::DetectorConfig;
use proximity_clap::error::SessionError;
use proximity_clap::session::realtime;
use proximity_clap::telemetry::{MetricEvent, TelemetryHub};
use proximity_clap::testing::{HostCall, RecordingHost};
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn test_realtime_cooldown_gates_claps() {
    let host = RecordingHost::new();
    let telemetry = Arc::new(TelemetryHub::default());
    let mut events = telemetry.collector().subscribe_stream();

    let (session, handle) = realtime(DetectorConfig::default(), host.devices());
    let session = session.with_telemetry(Arc::clone(&telemetry));

    let driver = async move {
        handle.start(Some(10.0)).unwrap();
        handle.sample(1.0).unwrap();
        handle.sample(9.0).unwrap();

        sleep(Duration::from_millis(100)).await;
        handle.sample(1.0).unwrap();
        handle.sample(9.0).unwrap();

        sleep(Duration::from_millis(600)).await;
        handle.sample(9.0).unwrap();
        handle.close().unwrap();
    };

    let (count, ()) = tokio::join!(session.run(), driver);
    assert_eq!(count, 2);
    assert_eq!(host.count(&HostCall::PlaySound), 2);

    let mut seen = Vec::new();
    for _ in 0..8 {
        match events.next().await {
            Some(Ok(event)) => seen.push(event),
            other => panic!("Expected telemetry event, got {:?}", other),
        }
    }
    assert_eq!(
        seen,
        vec![
            MetricEvent::SessionStarted { max_range: 10.0 },
            MetricEvent::HandNear,
            MetricEvent::Clap { count: 1 },
            MetricEvent::HandNear,
            MetricEvent::ClapSuppressed { count: 1 },
            MetricEvent::CooldownElapsed,
            MetricEvent::Clap { count: 2 },
            MetricEvent::SessionClosed { clap_count: 2 },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_dropping_every_handle_closes_session() {
    let host = RecordingHost::new();
    let (session, handle) = realtime(DetectorConfig::default(), host.devices());
    let session = session.with_telemetry(Arc::new(TelemetryHub::default()));

    handle.start(Some(10.0)).unwrap();
    drop(handle);

    assert_eq!(session.run().await, 0);
    let calls = host.calls();
    assert_eq!(calls[calls.len() - 2..], [HostCall::ReleaseSound, HostCall::Finish]);
}

#[tokio::test(start_paused = true)]
async fn test_send_after_loop_ends_reports_closed() {
    let host = RecordingHost::new();
    let (session, handle) = realtime(DetectorConfig::default(), host.devices());
    let session = session.with_telemetry(Arc::new(TelemetryHub::default()));

    handle.start(None).unwrap();
    handle.sample(1.0).unwrap();
    handle.close().unwrap();
    session.run().await;

    assert_eq!(handle.sample(9.0), Err(SessionError::SessionClosed));
    assert_eq!(
        host.last_display_text().as_deref(),
        Some("Proximity sensor not available")
    );
}
