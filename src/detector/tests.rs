use super::*;
use crate::config::DetectorConfig;

fn started(max_range: f32) -> ClapDetector {
    let mut detector = ClapDetector::default();
    detector.start(Some(max_range));
    detector
}

#[test]
fn start_with_sensor_shows_ready_and_instructions() {
    let mut detector = ClapDetector::default();
    let effects = detector.start(Some(10.0));
    assert_eq!(
        effects,
        vec![
            Effect::display("Ready to clap"),
            Effect::instruction("Move your hand near and away from the sensor to clap"),
        ]
    );
    assert_eq!(detector.phase(), DetectorPhase::Active { max_range: 10.0 });
}

#[test]
fn missing_sensor_disables_detector_for_good() {
    let mut detector = ClapDetector::default();
    let effects = detector.start(None);
    assert_eq!(
        effects[0],
        Effect::display("Proximity sensor not available")
    );
    assert_eq!(
        effects[1],
        Effect::instruction("This device doesn't support the clap app")
    );

    for distance in [1.0, 9.0, 0.0, 9.0] {
        let t = detector.on_distance_sample(distance);
        assert_eq!(t.outcome, Outcome::Ignored);
        assert!(t.effects.is_empty());
    }
    assert_eq!(detector.clap_count(), 0);
    assert_eq!(detector.phase(), DetectorPhase::Disabled);
}

#[test]
fn samples_before_start_are_ignored() {
    let mut detector = ClapDetector::default();
    assert_eq!(detector.on_distance_sample(1.0).outcome, Outcome::Ignored);
    assert_eq!(detector.state(), DetectorState::new());
}

#[test]
fn second_start_is_ignored() {
    let mut detector = started(10.0);
    assert!(detector.start(None).is_empty());
    assert_eq!(detector.phase(), DetectorPhase::Active { max_range: 10.0 });
}

#[test]
fn near_then_far_is_one_clap() {
    let mut detector = started(10.0);
    let near = detector.on_distance_sample(1.0);
    let far = detector.on_distance_sample(9.0);

    assert_eq!(near.effects, vec![Effect::display("Hand Near")]);
    assert_eq!(
        far.effects,
        vec![
            Effect::TriggerSound,
            Effect::TriggerHaptic { duration_ms: 50 },
            Effect::display("CLAP! Count: 1"),
            Effect::ScheduleCooldown { delay_ms: 500 },
        ]
    );
    assert_eq!(detector.clap_count(), 1);
}

#[test]
fn cooldown_gates_second_cycle() {
    let mut detector = started(10.0);
    detector.on_distance_sample(1.0);
    detector.on_distance_sample(9.0);

    let near = detector.on_distance_sample(1.0);
    let far = detector.on_distance_sample(9.0);
    assert_eq!(near.outcome, Outcome::BecameNear);
    assert_eq!(far.outcome, Outcome::Suppressed);
    assert_eq!(detector.clap_count(), 1);
    assert!(detector.state().is_near);
}

#[test]
fn suppressed_cycle_claps_on_first_far_after_cooldown() {
    let mut detector = started(10.0);
    detector.on_distance_sample(1.0);
    detector.on_distance_sample(9.0);
    detector.on_distance_sample(1.0);
    detector.on_distance_sample(9.0);

    // Still flagged near, so another near reading changes nothing.
    assert_eq!(detector.on_distance_sample(1.0).outcome, Outcome::Unchanged);

    detector.on_cooldown_elapsed();
    let far = detector.on_distance_sample(9.0);
    assert_eq!(far.outcome, Outcome::Clap { count: 2 });
}

#[test]
fn count_tracks_gated_transitions() {
    let mut detector = started(10.0);
    let mut expected = 0;
    for round in 0..10 {
        detector.on_distance_sample(1.0);
        let far = detector.on_distance_sample(9.0);
        if matches!(far.outcome, Outcome::Clap { .. }) {
            expected += 1;
        }
        // Only every other round waits out the cooldown.
        if round % 2 == 1 {
            detector.on_cooldown_elapsed();
        }
    }
    assert_eq!(detector.clap_count(), expected);
    assert_eq!(expected, 5);
}

#[test]
fn threshold_follows_reported_range() {
    let mut detector = started(5.0);
    assert_eq!(detector.on_distance_sample(2.5).outcome, Outcome::Ready);
    assert_eq!(detector.on_distance_sample(2.49).outcome, Outcome::BecameNear);
}

#[test]
fn close_finishes_once_and_stops_processing() {
    let mut detector = started(10.0);
    detector.on_distance_sample(1.0);
    assert_eq!(detector.close(), vec![Effect::Finish]);
    assert!(detector.close().is_empty());
    assert_eq!(detector.on_distance_sample(9.0).outcome, Outcome::Ignored);
    assert_eq!(detector.on_cooldown_elapsed().outcome, Outcome::Ignored);
    assert_eq!(detector.clap_count(), 0);
}

#[test]
fn detector_uses_configured_cooldown() {
    let mut detector = ClapDetector::new(DetectorConfig {
        cooldown_ms: 900,
        ..DetectorConfig::default()
    });
    detector.start(Some(10.0));
    detector.on_distance_sample(1.0);
    let far = detector.on_distance_sample(9.0);
    assert!(far
        .effects
        .contains(&Effect::ScheduleCooldown { delay_ms: 900 }));
}
