//! The config and capture shipped under config/ stay loadable

use std::path::PathBuf;

use tracker_service::{TrackerConfig, TrackerContext};

fn workspace_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../config")
        .join(name)
}

#[test]
fn test_shipped_config_matches_defaults() {
    let config = TrackerConfig::load(workspace_file("trackerd.toml")).unwrap();
    let defaults = TrackerConfig::default();
    assert_eq!(config.logging.filter, defaults.logging.filter);
    assert_eq!(
        config.system_variables.periodic_event_tag,
        defaults.system_variables.periodic_event_tag
    );
    assert_eq!(config.notifications.capacity, defaults.notifications.capacity);
}

#[test]
fn test_shipped_capture_replays() {
    let capture = std::fs::read_to_string(workspace_file("pt30-session.jsonl")).unwrap();
    let context = TrackerContext::default();

    context.events().replay(&capture).unwrap();

    let snapshot = context.snapshot();
    assert_eq!(snapshot.vehicle_identifier, "1FUJGLDR12LM12345");
    assert_eq!(snapshot.special_event_count, 2);
    assert_eq!(snapshot.last_event.unwrap().seq, 104);
    assert_eq!(snapshot.last_spn_sequence, 1);
    assert!(snapshot.link_lost);
}
