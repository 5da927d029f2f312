use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use aulos_core::{Clock, SystemClock};
use aulos_events::{BandwidthEvent, EventBus};
use parking_lot::Mutex;

use crate::{
    BandwidthEstimator, BandwidthOptions, BandwidthResult, Observation, PercentileTracker,
    Predictor, RunningTotals, SampleAccumulator, SlidingPercentile,
};

/// Value indicating no estimate has been published yet; the estimator never
/// publishes above [`MAX_ESTIMATE_BPS`](crate::MAX_ESTIMATE_BPS).
const NO_ESTIMATE: u64 = u64::MAX;

/// Callbacks from the network layer for every media transfer.
///
/// Calls may arrive from several threads; every start must be balanced by
/// exactly one end.
pub trait TransferListener: Send + Sync {
    fn on_transfer_start(&self);
    fn on_bytes_transferred(&self, bytes: u64);
    fn on_transfer_end(&self) -> BandwidthResult<()>;
}

struct MeterState<P: PercentileTracker> {
    accumulator: SampleAccumulator,
    estimator: BandwidthEstimator<P>,
}

/// Thread-safe bandwidth meter.
///
/// Transfer callbacks serialize on one lock; [`bitrate_estimate`] reads a
/// single atomic and never blocks.
///
/// [`bitrate_estimate`]: BandwidthMeter::bitrate_estimate
pub struct BandwidthMeter<P: PercentileTracker = SlidingPercentile> {
    state: Mutex<MeterState<P>>,
    published: AtomicU64,
    clock: Arc<dyn Clock>,
    events: Option<EventBus>,
}

impl BandwidthMeter<SlidingPercentile> {
    /// Build a meter with a [`SystemClock`].
    pub fn from_options(
        options: &BandwidthOptions,
        predictor: Option<Box<dyn Predictor>>,
    ) -> BandwidthResult<Self> {
        let estimator = BandwidthEstimator::new(options, predictor)?;
        Ok(Self::new(estimator, Arc::new(SystemClock::new())))
    }
}

impl<P: PercentileTracker> BandwidthMeter<P> {
    pub fn new(estimator: BandwidthEstimator<P>, clock: Arc<dyn Clock>) -> Self {
        let published = estimator.estimate().unwrap_or(NO_ESTIMATE);
        Self {
            state: Mutex::new(MeterState {
                accumulator: SampleAccumulator::new(),
                estimator,
            }),
            published: AtomicU64::new(published),
            clock,
            events: None,
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Latest published estimate in bits per second.
    pub fn bitrate_estimate(&self) -> Option<u64> {
        match self.published.load(Ordering::Acquire) {
            NO_ESTIMATE => None,
            bps => Some(bps),
        }
    }

    /// Cumulative totals used to gate the first estimate.
    pub fn observed_totals(&self) -> RunningTotals {
        self.state.lock().estimator.totals()
    }

    /// Transfers currently open.
    pub fn open_transfers(&self) -> u32 {
        self.state.lock().accumulator.open_transfers()
    }

    /// Release the predictor, if any. The meter keeps working in percentile
    /// mode.
    pub fn close(&self) {
        self.state.lock().estimator.close();
    }

    fn publish_event(&self, event: BandwidthEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }
}

impl<P: PercentileTracker> TransferListener for BandwidthMeter<P> {
    fn on_transfer_start(&self) {
        let now_ms = self.clock.now_ms();
        self.state.lock().accumulator.on_transfer_start(now_ms);
    }

    fn on_bytes_transferred(&self, bytes: u64) {
        self.state.lock().accumulator.on_bytes_transferred(bytes);
    }

    fn on_transfer_end(&self) -> BandwidthResult<()> {
        let now_ms = self.clock.now_ms();
        let (end, observation) = {
            let mut state = self.state.lock();
            let end = state.accumulator.on_transfer_end(now_ms)?;
            let observation = end.sample.map(|s| state.estimator.observe(&s));
            if let Some(Observation::Published(bps)) = observation {
                self.published.store(bps, Ordering::Release);
            }
            (end, observation)
        };

        if let Some(Observation::PredictionFailed(error)) = observation {
            self.publish_event(BandwidthEvent::PredictionFailed {
                error: error.to_string(),
            });
        }
        self.publish_event(BandwidthEvent::Sample {
            elapsed_ms: end.elapsed_ms,
            bytes: end.bytes,
            estimate_bps: self.bitrate_estimate(),
        });
        Ok(())
    }
}

impl<T: TransferListener + ?Sized> TransferListener for Arc<T> {
    fn on_transfer_start(&self) {
        (**self).on_transfer_start();
    }

    fn on_bytes_transferred(&self, bytes: u64) {
        (**self).on_bytes_transferred(bytes);
    }

    fn on_transfer_end(&self) -> BandwidthResult<()> {
        (**self).on_transfer_end()
    }
}

impl<P: PercentileTracker> std::fmt::Debug for BandwidthMeter<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BandwidthMeter")
            .field("estimate", &self.bitrate_estimate())
            .field("events", &self.events.is_some())
            .finish_non_exhaustive()
    }
}
