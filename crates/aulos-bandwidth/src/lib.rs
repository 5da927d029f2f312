#![forbid(unsafe_code)]

//! Network transfer sampling and bandwidth estimation.
//!
//! The network layer reports transfers through [`TransferListener`]; the
//! [`BandwidthMeter`] folds overlapping transfers into [`BitrateSample`]s and
//! publishes a gated estimate, either a weighted percentile of recent samples
//! or the output of a sequence [`Predictor`].

mod accumulator;
mod error;
mod estimator;
mod meter;
mod options;
mod percentile;
mod predictor;

pub use accumulator::{BitrateSample, SampleAccumulator, TransferEnd};
pub use error::{BandwidthError, BandwidthResult, PredictionError};
pub use estimator::{BandwidthEstimator, MAX_ESTIMATE_BPS, Observation, RunningTotals};
pub use meter::{BandwidthMeter, TransferListener};
pub use options::{BandwidthOptions, DEFAULT_NORMALIZATION, EstimationMode, MAX_PREDICTION_WINDOW};
pub use percentile::{PercentileTracker, SlidingPercentile};
pub use predictor::{PredictionWindow, Predictor};
