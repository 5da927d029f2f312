use aulos::abr::{AbrOptions, AdaptiveSelection, FixedBandwidth, StrategyKind};
use aulos_test_utils::{Xorshift64, video_ladder};
use rstest::rstest;

const SECOND: i64 = 1_000_000;

fn selection(estimate: Option<u64>, strategy: StrategyKind) -> AdaptiveSelection<FixedBandwidth> {
    let options = AbrOptions::default().with_strategy(strategy);
    AdaptiveSelection::new(video_ladder(), FixedBandwidth(estimate), options).unwrap()
}

#[rstest]
#[case(7)]
#[case(0x00c0_ffee)]
fn throughput_ideal_is_monotonic_in_estimate(#[case] seed: u64) {
    let mut rng = Xorshift64::new(seed);
    let catalog = video_ladder();
    for _ in 0..200 {
        let a = rng.range_u64(0, 10_000_000);
        let b = rng.range_u64(0, 10_000_000);
        let (low, high) = (a.min(b), a.max(b));
        let low_pick = selection(Some(low), StrategyKind::Throughput).select_ideal_index(None);
        let high_pick = selection(Some(high), StrategyKind::Throughput).select_ideal_index(None);
        assert!(
            catalog[low_pick].bitrate <= catalog[high_pick].bitrate,
            "estimate {low} picked {low_pick}, estimate {high} picked {high_pick}"
        );
    }
}

#[rstest]
#[case::throughput(StrategyKind::Throughput)]
#[case::qoe(StrategyKind::Qoe)]
fn repeated_updates_settle(#[case] strategy: StrategyKind) {
    let mut sel = selection(Some(3_000_000), strategy);
    let first = sel.update_selected_track(0, 15 * SECOND, None);
    for _ in 0..10 {
        assert_eq!(sel.update_selected_track(0, 15 * SECOND, None), first);
    }
}

#[rstest]
#[case::throughput(StrategyKind::Throughput)]
#[case::qoe(StrategyKind::Qoe)]
#[case::adaptive_penalty(StrategyKind::AdaptivePenalty)]
fn selection_stays_in_range(#[case] strategy: StrategyKind) {
    let mut rng = Xorshift64::new(42);
    for _ in 0..50 {
        let estimate = rng.chance(0.9).then(|| rng.range_u64(0, 20_000_000));
        let mut sel = selection(estimate, strategy);
        for _ in 0..20 {
            let buffered_us = i64::try_from(rng.range_u64(0, 60)).unwrap() * SECOND;
            let index = sel.update_selected_track(0, buffered_us, None);
            assert!(index < sel.catalog().len());
            assert_eq!(index, sel.selected_index());
        }
    }
}
