use aulos_core::time::duration_to_ms;

use crate::{
    BandwidthError, BandwidthOptions, BandwidthResult, BitrateSample, EstimationMode,
    PercentileTracker, PredictionError, PredictionWindow, Predictor, SlidingPercentile,
};

/// Largest publishable estimate; `u64::MAX` is reserved by the meter for
/// "no estimate".
pub const MAX_ESTIMATE_BPS: u64 = u64::MAX - 1;

/// Cumulative transfer time and bytes seen by the estimator.
///
/// Used only to gate the first publication; not reset afterwards unless
/// [`BandwidthOptions::regate_after_publish`] is set.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunningTotals {
    pub elapsed_ms: i64,
    pub bytes: u64,
}

/// What a call to [`BandwidthEstimator::observe`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum Observation {
    /// Totals are still below both thresholds.
    Gated,
    /// Predictive window not yet full.
    WindowFilling { len: usize, capacity: usize },
    /// New estimate published.
    Published(u64),
    /// The predictor failed; previous estimate kept.
    PredictionFailed(PredictionError),
}

enum Strategy {
    Percentile,
    Predictive {
        window: PredictionWindow,
        predictor: Box<dyn Predictor>,
    },
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Percentile => f.write_str("Percentile"),
            Self::Predictive { window, .. } => f
                .debug_struct("Predictive")
                .field("window", window)
                .finish_non_exhaustive(),
        }
    }
}

/// Turns bitrate samples into a published bandwidth estimate.
#[derive(Debug)]
pub struct BandwidthEstimator<P: PercentileTracker = SlidingPercentile> {
    tracker: P,
    totals: RunningTotals,
    strategy: Strategy,
    percentile: f64,
    elapsed_threshold_ms: i64,
    bytes_threshold: u64,
    regate_after_publish: bool,
    estimate: Option<u64>,
}

impl BandwidthEstimator<SlidingPercentile> {
    /// Build an estimator with the default sliding percentile.
    ///
    /// `predictor` is required in predictive mode and ignored otherwise.
    pub fn new(
        options: &BandwidthOptions,
        predictor: Option<Box<dyn Predictor>>,
    ) -> BandwidthResult<Self> {
        Self::with_tracker(
            options,
            SlidingPercentile::new(options.max_weight),
            predictor,
        )
    }
}

impl<P: PercentileTracker> BandwidthEstimator<P> {
    pub fn with_tracker(
        options: &BandwidthOptions,
        tracker: P,
        predictor: Option<Box<dyn Predictor>>,
    ) -> BandwidthResult<Self> {
        options.validate()?;

        let strategy = match (&options.estimation, predictor) {
            (EstimationMode::Percentile, predictor) => {
                if predictor.is_some() {
                    tracing::debug!("predictor supplied in percentile mode; ignoring");
                }
                Strategy::Percentile
            }
            (
                EstimationMode::Predictive {
                    window,
                    normalization,
                },
                Some(predictor),
            ) => Strategy::Predictive {
                window: PredictionWindow::new(*window, *normalization),
                predictor,
            },
            (EstimationMode::Predictive { .. }, None) => {
                return Err(BandwidthError::MissingPredictor);
            }
        };

        Ok(Self {
            tracker,
            totals: RunningTotals::default(),
            strategy,
            percentile: options.percentile,
            elapsed_threshold_ms: duration_to_ms(options.elapsed_threshold),
            bytes_threshold: options.bytes_threshold,
            regate_after_publish: options.regate_after_publish,
            estimate: None,
        })
    }

    /// Last published estimate in bits per second.
    pub fn estimate(&self) -> Option<u64> {
        self.estimate
    }

    pub fn totals(&self) -> RunningTotals {
        self.totals
    }

    pub fn is_predictive(&self) -> bool {
        matches!(self.strategy, Strategy::Predictive { .. })
    }

    pub fn observe(&mut self, sample: &BitrateSample) -> Observation {
        self.totals.elapsed_ms = self.totals.elapsed_ms.saturating_add(sample.elapsed_ms);
        self.totals.bytes = self.totals.bytes.saturating_add(sample.bytes_transferred);

        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_precision_loss,
            clippy::cast_sign_loss,
            reason = "sqrt of a byte count fits u32"
        )]
        let weight = (sample.bytes_transferred as f64).sqrt() as u32;
        self.tracker.add_sample(weight, sample.bits_per_second);

        if let Strategy::Predictive { window, .. } = &mut self.strategy {
            window.push(sample.bits_per_second);
        }

        if !self.gate_open() {
            tracing::trace!(
                elapsed_ms = self.totals.elapsed_ms,
                bytes = self.totals.bytes,
                "estimate gated"
            );
            return Observation::Gated;
        }

        let value = match &mut self.strategy {
            Strategy::Percentile => {
                let v = self.tracker.percentile(self.percentile);
                if v.is_nan() { 0.0 } else { v }
            }
            Strategy::Predictive { window, predictor } => {
                if !window.is_full() {
                    return Observation::WindowFilling {
                        len: window.len(),
                        capacity: window.capacity(),
                    };
                }
                match predict(window, predictor.as_mut()) {
                    Ok(v) => v,
                    Err(error) => {
                        tracing::warn!(%error, "bandwidth prediction failed; keeping previous estimate");
                        return Observation::PredictionFailed(error);
                    }
                }
            }
        };

        let estimate = to_bps(value);
        self.estimate = Some(estimate);
        if self.regate_after_publish {
            self.totals = RunningTotals::default();
        }

        tracing::debug!(
            estimate,
            sample_bps = sample.bits_per_second,
            "bandwidth estimate published"
        );
        Observation::Published(estimate)
    }

    /// Release the predictor, if any. Estimation falls back to percentile.
    pub fn close(&mut self) {
        if let Strategy::Predictive { predictor, .. } = &mut self.strategy {
            predictor.close();
            self.strategy = Strategy::Percentile;
        }
    }

    fn gate_open(&self) -> bool {
        self.totals.elapsed_ms >= self.elapsed_threshold_ms
            || self.totals.bytes >= self.bytes_threshold
    }
}

/// Saturating float-to-int: negatives clamp to 0 and the top of the range
/// stops at [`MAX_ESTIMATE_BPS`].
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_bps(value: f64) -> u64 {
    (value.max(0.0) as u64).min(MAX_ESTIMATE_BPS)
}

fn predict(
    window: &PredictionWindow,
    predictor: &mut dyn Predictor,
) -> Result<f64, PredictionError> {
    let input = window.to_vec();
    let output = predictor.predict(&input)?;
    if !output.is_finite() {
        return Err(PredictionError::NonFinite(output));
    }
    Ok(window.denormalize(output))
}
