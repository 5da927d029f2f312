use std::sync::Arc;

use aulos::{
    bandwidth::{
        BandwidthError, BandwidthEstimator, BandwidthMeter, BandwidthOptions, SampleAccumulator,
        TransferListener,
    },
    media::ManualClock,
};
use aulos_test_utils::Xorshift64;
use rstest::rstest;

/// Random interleaving of starts, byte reports, clock steps and ends where
/// every start is eventually balanced.
#[rstest]
#[case(1)]
#[case(0xdead_beef)]
#[case(0x1234_5678_9abc)]
fn random_balanced_sequences_never_fail(#[case] seed: u64) {
    let mut rng = Xorshift64::new(seed);
    let mut acc = SampleAccumulator::new();
    let mut now_ms = 0_i64;
    let mut open = 0_u32;

    for _ in 0..2_000 {
        match rng.range_u64(0, 4) {
            0 => {
                acc.on_transfer_start(now_ms);
                open += 1;
            }
            1 => acc.on_bytes_transferred(rng.range_u64(0, 200_000)),
            2 => now_ms += i64::try_from(rng.range_u64(0, 300)).unwrap(),
            _ if open > 0 => {
                let end = acc.on_transfer_end(now_ms).unwrap();
                open -= 1;
                assert!(end.elapsed_ms >= 0);
                if let Some(sample) = end.sample {
                    assert!(sample.elapsed_ms > 0);
                    assert!(sample.bits_per_second.is_finite());
                }
            }
            _ => assert!(matches!(
                acc.on_transfer_end(now_ms),
                Err(BandwidthError::InvalidState(_))
            )),
        }
    }

    while open > 0 {
        assert!(acc.on_transfer_end(now_ms).unwrap().elapsed_ms >= 0);
        open -= 1;
    }
    assert_eq!(acc.open_transfers(), 0);
}

#[test]
fn overlapping_prefetches_share_one_epoch_through_meter() {
    let clock = Arc::new(ManualClock::new(0));
    let estimator = BandwidthEstimator::new(&BandwidthOptions::default(), None).unwrap();
    let meter = BandwidthMeter::new(estimator, clock.clone());

    meter.on_transfer_start();
    meter.on_transfer_start();
    meter.on_bytes_transferred(250_000);
    meter.on_bytes_transferred(250_000);
    clock.advance(1_000);
    meter.on_transfer_end().unwrap();

    // 500 kB in 1 s across both transfers: 4 Mbps, below the byte gate.
    assert_eq!(meter.bitrate_estimate(), None);
    assert_eq!(meter.observed_totals().bytes, 500_000);

    meter.on_bytes_transferred(100_000);
    clock.advance(1_000);
    meter.on_transfer_end().unwrap();

    // Totals reach 2 s; the weighted median lands on the heavier sample.
    assert_eq!(meter.bitrate_estimate(), Some(4_000_000));
    assert_eq!(meter.open_transfers(), 0);
}
