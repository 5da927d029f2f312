use std::{sync::Arc, time::Duration};

use aulos::{
    AbrSession, AulosConfig,
    events::{AbrEvent, BandwidthEvent, Event},
    media::{ManualClock, SelectionReason},
};
use aulos_test_utils::video_ladder;
use aulos_tests::TransferDriver;
use tokio::time::timeout;

const SECOND: i64 = 1_000_000;

#[tokio::test]
async fn transfers_and_switches_reach_subscribers() {
    let clock = Arc::new(ManualClock::new(0));
    let config = AulosConfig::new().with_events_capacity(32);
    let session = AbrSession::with_clock(config, None, clock.clone()).unwrap();
    let mut rx = session.subscribe().unwrap();

    let mut selection = session.create_selection(video_ladder()).unwrap();
    let driver = TransferDriver::new(session.transfer_listener(), clock);
    driver.download_at(8_000_000, 2_000).unwrap();
    selection.update_selected_track(0, 12 * SECOND, None);

    let first = timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        first,
        Event::Bandwidth(BandwidthEvent::Sample {
            elapsed_ms: 2_000,
            bytes: 2_000_000,
            estimate_bps: Some(8_000_000),
        })
    );

    let second = timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        second,
        Event::Abr(AbrEvent::SelectionChanged {
            from: 1,
            to: 4,
            reason: SelectionReason::Adaptive,
        })
    );
}

#[tokio::test]
async fn selections_share_one_meter() {
    let clock = Arc::new(ManualClock::new(0));
    let config = AulosConfig::new().with_events_capacity(32);
    let session = AbrSession::with_clock(config, None, clock.clone()).unwrap();
    let mut rx = session.subscribe().unwrap();

    let mut video = session.create_selection(video_ladder()).unwrap();
    let mut audio = session
        .create_selection(aulos_test_utils::ladder(&[64_000, 128_000, 256_000]))
        .unwrap();
    TransferDriver::new(session.transfer_listener(), clock)
        .download_at(4_000_000, 2_000)
        .unwrap();

    assert_eq!(video.update_selected_track(0, 12 * SECOND, None), 3);
    // Audio already starts at its top rung under the initial bitrate cap.
    assert_eq!(audio.update_selected_track(0, 12 * SECOND, None), 2);

    let mut switches = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, Event::Abr(AbrEvent::SelectionChanged { .. })) {
            switches += 1;
        }
    }
    assert_eq!(switches, 1);
}
