use std::sync::{Arc, atomic::Ordering};

use aulos::{
    bandwidth::{
        BandwidthEstimator, BandwidthMeter, BandwidthOptions, DEFAULT_NORMALIZATION,
        PredictionError, Predictor,
    },
    events::{BandwidthEvent, Event, EventBus},
    media::ManualClock,
};
use aulos_test_utils::{FailingPredictor, FixedPredictor, ScriptedPredictor};
use aulos_tests::TransferDriver;
use rstest::rstest;

fn meter(window: usize, predictor: impl Predictor + 'static) -> TransferDriver<BandwidthMeter> {
    let options = BandwidthOptions::default().predictive(window);
    let estimator = BandwidthEstimator::new(&options, Some(Box::new(predictor))).unwrap();
    let clock = Arc::new(ManualClock::new(0));
    TransferDriver::new(BandwidthMeter::new(estimator, clock.clone()), clock)
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "normalized outputs are small and positive"
)]
fn denormalized(value: f64) -> u64 {
    (value * DEFAULT_NORMALIZATION) as u64
}

#[test]
fn estimate_waits_for_window_then_follows_model() {
    let driver = meter(3, FixedPredictor::new(1.5).expecting(3));

    driver.download_at(4_000_000, 1_000).unwrap();
    driver.download_at(4_000_000, 1_000).unwrap();
    assert_eq!(driver.listener.bitrate_estimate(), None);

    driver.download_at(4_000_000, 1_000).unwrap();
    assert_eq!(driver.listener.bitrate_estimate(), Some(denormalized(1.5)));
}

#[test]
fn failed_prediction_keeps_last_estimate() {
    let driver = meter(
        1,
        ScriptedPredictor::new([
            Ok(0.5),
            Err(PredictionError::Model("timeout".into())),
            Ok(f64::NAN),
            Ok(0.25),
        ]),
    );

    driver.download_at(2_000_000, 2_000).unwrap();
    let first = driver.listener.bitrate_estimate();
    assert_eq!(first, Some(denormalized(0.5)));

    driver.download_at(2_000_000, 500).unwrap();
    assert_eq!(driver.listener.bitrate_estimate(), first);
    driver.download_at(2_000_000, 500).unwrap();
    assert_eq!(driver.listener.bitrate_estimate(), first);

    driver.download_at(2_000_000, 500).unwrap();
    assert_eq!(
        driver.listener.bitrate_estimate(),
        Some(denormalized(0.25))
    );
}

#[test]
fn failing_model_never_publishes() {
    let driver = meter(2, FailingPredictor);
    for _ in 0..8 {
        driver.download_at(3_000_000, 1_000).unwrap();
    }
    assert_eq!(driver.listener.bitrate_estimate(), None);
    assert_eq!(driver.listener.observed_totals().elapsed_ms, 8_000);
}

#[test]
fn close_releases_model_and_falls_back_to_percentile() {
    let predictor = ScriptedPredictor::new([]);
    let closed = predictor.close_flag();
    let driver = meter(2, predictor);
    driver.download_at(3_000_000, 1_000).unwrap();
    driver.download_at(3_000_000, 1_000).unwrap();
    assert_eq!(driver.listener.bitrate_estimate(), None);
    assert!(!closed.load(Ordering::Acquire));

    driver.listener.close();
    assert!(closed.load(Ordering::Acquire));
    driver.download_at(3_000_000, 1_000).unwrap();
    assert_eq!(driver.listener.bitrate_estimate(), Some(3_000_000));
}

#[rstest]
#[case::percentile(None, 1)]
#[case::predictive(Some(FailingPredictor), 2)]
fn meter_reports_every_transfer_end(
    #[case] predictor: Option<FailingPredictor>,
    #[case] events_per_transfer: usize,
) {
    let bus = EventBus::new(64);
    let mut rx = bus.subscribe();
    let clock = Arc::new(ManualClock::new(0));
    let options = match predictor {
        Some(_) => BandwidthOptions::default().predictive(1),
        None => BandwidthOptions::default(),
    };
    let predictor = predictor.map(|p| Box::new(p) as Box<dyn Predictor>);
    let estimator = BandwidthEstimator::new(&options, predictor).unwrap();
    let driver = TransferDriver::new(
        BandwidthMeter::new(estimator, clock.clone()).with_events(bus),
        clock,
    );

    driver.download(600 * 1024, 1_000).unwrap();

    let mut received = Vec::new();
    while let Ok(event) = rx.try_recv() {
        received.push(event);
    }
    assert_eq!(received.len(), events_per_transfer);
    assert!(matches!(
        received.last(),
        Some(Event::Bandwidth(BandwidthEvent::Sample {
            elapsed_ms: 1_000,
            bytes: 614_400,
            ..
        }))
    ));
}
