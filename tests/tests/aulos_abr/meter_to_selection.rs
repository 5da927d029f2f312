use std::sync::Arc;

use aulos::{
    abr::{AbrOptions, AdaptiveSelection, BufferedSegment},
    bandwidth::{BandwidthEstimator, BandwidthMeter, BandwidthOptions},
    media::{Blacklist, Clock, ManualClock, SelectionReason},
};
use aulos_test_utils::{segment_starts, video_ladder};
use aulos_tests::TransferDriver;
use rstest::{fixture, rstest};

const SECOND: i64 = 1_000_000;

struct Harness {
    driver: TransferDriver<Arc<BandwidthMeter>>,
    selection: AdaptiveSelection<Arc<BandwidthMeter>>,
}

#[fixture]
fn harness() -> Harness {
    let clock = Arc::new(ManualClock::new(1_000));
    let estimator = BandwidthEstimator::new(&BandwidthOptions::default(), None).unwrap();
    let meter = Arc::new(BandwidthMeter::new(estimator, clock.clone()));
    let selection = AdaptiveSelection::new(video_ladder(), Arc::clone(&meter), AbrOptions::default())
        .unwrap()
        .with_clock(clock.clone());
    Harness {
        driver: TransferDriver::new(meter, clock),
        selection,
    }
}

#[rstest]
fn initial_pick_uses_max_initial_bitrate(harness: Harness) {
    assert_eq!(harness.selection.selected_index(), 1);
    assert_eq!(harness.selection.selection_reason(), SelectionReason::Initial);
    assert_eq!(harness.selection.effective_bitrate(), 800_000);
}

#[rstest]
fn fast_link_upgrades_once_buffer_allows(mut harness: Harness) {
    harness.driver.download_at(8_000_000, 2_000).unwrap();
    assert_eq!(harness.selection.effective_bitrate(), 6_000_000);

    // Too little buffer for an upgrade.
    assert_eq!(harness.selection.update_selected_track(0, 4 * SECOND, None), 1);
    assert_eq!(harness.selection.update_selected_track(0, 12 * SECOND, None), 4);
    assert_eq!(harness.selection.selection_reason(), SelectionReason::Adaptive);
}

#[rstest]
fn collapse_downgrades_only_when_buffer_is_short(mut harness: Harness) {
    harness.driver.download_at(8_000_000, 2_000).unwrap();
    harness.selection.update_selected_track(0, 12 * SECOND, None);
    assert_eq!(harness.selection.selected_index(), 4);

    // Two 1 Mbps samples push the heavy 8 Mbps sample out of the median.
    harness.driver.download_at(1_000_000, 2_000).unwrap();
    harness.driver.download_at(1_000_000, 2_000).unwrap();
    assert_eq!(harness.driver.listener.bitrate_estimate(), Some(1_000_000));

    assert_eq!(harness.selection.update_selected_track(0, 30 * SECOND, None), 4);
    assert_eq!(harness.selection.update_selected_track(0, 10 * SECOND, None), 0);
}

#[rstest]
fn upgrade_evicts_low_quality_tail(mut harness: Harness) {
    let sd = video_ladder()[1].clone();
    let queue: Vec<BufferedSegment> = segment_starts(0, 10 * SECOND, 5)
        .into_iter()
        .map(|start| BufferedSegment::new(start, &sd))
        .collect();

    // Without an estimate the ideal is the queued quality itself.
    assert_eq!(harness.selection.evaluate_eviction_count(0, &queue), 5);

    // The 2 s transfer also moves the clock past the re-evaluation interval.
    harness.driver.download_at(8_000_000, 2_000).unwrap();
    assert_eq!(harness.selection.evaluate_eviction_count(0, &queue), 3);
    assert_eq!(harness.selection.evaluate_eviction_count(0, &queue), 5);
}

#[rstest]
fn blacklisted_top_rung_is_skipped(harness: Harness) {
    let Harness { driver, selection } = harness;
    let blacklist = Arc::new(Blacklist::new(5));
    let mut selection = selection.with_blacklist(blacklist.clone());
    driver.download_at(8_000_000, 2_000).unwrap();

    let now_ms = driver.clock.now_ms();
    assert!(blacklist.blacklist(4, 60_000, now_ms));
    assert_eq!(selection.update_selected_track(0, 12 * SECOND, None), 3);
}
