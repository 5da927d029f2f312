use std::sync::Arc;

use aulos::{
    AbrSession, AulosConfig, AulosError,
    abr::{PlayerState, SegmentRecord, StrategyKind},
    bandwidth::{BandwidthOptions, TransferListener},
    media::{Blacklist, ManualClock},
};
use aulos_test_utils::{FixedPredictor, video_ladder};
use aulos_tests::TransferDriver;
use rstest::rstest;

const SECOND: i64 = 1_000_000;

#[test]
fn session_without_bus_has_no_subscription() {
    let session = AbrSession::new(AulosConfig::new()).unwrap();
    assert!(session.subscribe().is_none());
    assert_eq!(session.bitrate_estimate(), None);
}

#[test]
fn predictive_session_needs_predictor() {
    let config = AulosConfig::new().with_bandwidth(BandwidthOptions::default().predictive(4));
    assert!(matches!(
        AbrSession::new(config),
        Err(AulosError::Bandwidth(_))
    ));
}

#[test]
fn predictive_session_closes_to_percentile() {
    let clock = Arc::new(ManualClock::new(0));
    let config = AulosConfig::new().with_bandwidth(BandwidthOptions::default().predictive(1));
    let session =
        AbrSession::with_clock(config, Some(Box::new(FixedPredictor::new(0.1))), clock.clone())
            .unwrap();
    let driver = TransferDriver::new(session.transfer_listener(), clock);

    driver.download_at(2_000_000, 2_000).unwrap();
    let predicted = session.bitrate_estimate();
    assert!(predicted.is_some());
    assert_ne!(predicted, Some(2_000_000));

    session.close();
    driver.download_at(2_000_000, 2_000).unwrap();
    assert_eq!(session.bitrate_estimate(), Some(2_000_000));
}

#[test]
fn unbalanced_transfer_end_is_reported() {
    let session = AbrSession::new(AulosConfig::new()).unwrap();
    assert!(session.transfer_listener().on_transfer_end().is_err());
}

#[test]
fn json_config_drives_session() {
    let json = r#"{ "abr": { "strategy": "qoe", "bandwidth_fraction": 0.5 }, "events_capacity": 8 }"#;
    let config = AulosConfig::from_json(json).unwrap();
    let session = AbrSession::new(config.clone()).unwrap();
    assert_eq!(session.config(), &config);
    assert_eq!(session.config().abr.strategy, StrategyKind::Qoe);
    assert!(session.subscribe().is_some());
}

#[rstest]
#[case::fraction_zero(r#"{ "abr": { "bandwidth_fraction": 0.0 } }"#)]
#[case::percentile_out_of_range(r#"{ "bandwidth": { "percentile": 1.5 } }"#)]
#[case::not_json("strategy = qoe")]
#[case::oversized_window(
    r#"{ "bandwidth": { "estimation": { "mode": "predictive", "window": 1000000000000000000, "normalization": 1.0 } } }"#
)]
fn invalid_config_is_rejected(#[case] json: &str) {
    assert!(AulosConfig::from_json(json).is_err());
}

#[test]
fn blacklisted_selection_and_tracker_share_session_clock() {
    let clock = Arc::new(ManualClock::new(5_000));
    let session = AbrSession::with_clock(AulosConfig::new(), None, clock.clone()).unwrap();
    let blacklist = Arc::new(Blacklist::new(5));
    let mut selection = session
        .create_selection_with_blacklist(video_ladder(), blacklist.clone())
        .unwrap();
    let mut tracker = session.quality_tracker();
    let driver = TransferDriver::new(session.transfer_listener(), clock.clone());

    assert!(blacklist.blacklist(4, 10_000, 5_000));
    tracker.on_player_state_changed(PlayerState::Buffering);
    driver.download_at(8_000_000, 2_000).unwrap();
    tracker.on_player_state_changed(PlayerState::Ready);

    let index = selection.update_selected_track(0, 12 * SECOND, None);
    assert_eq!(index, 3);
    tracker.on_segment_loaded(
        SegmentRecord::new(selection.selected_representation(), 0, 2_000).with_load(2_000, 0),
    );

    // Blacklist expires at 15 s.
    clock.set(15_000);
    assert_eq!(selection.update_selected_track(0, 12 * SECOND, None), 4);

    let report = tracker.report();
    assert_eq!(report.total_stall_ms, 2_000);
    assert_eq!(report.segments.len(), 1);
}
