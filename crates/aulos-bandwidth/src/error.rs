use thiserror::Error;

/// Errors surfaced to callers of the bandwidth meter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BandwidthError {
    /// Precondition violated by the caller (e.g. transfer end without start).
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("predictive estimation requires a predictor")]
    MissingPredictor,
}

pub type BandwidthResult<T> = Result<T, BandwidthError>;

/// Prediction model failures.
///
/// Never propagated out of the estimator: a failed prediction keeps the
/// previous estimate for the cycle.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictionError {
    #[error("predictor expects {expected} inputs, got {actual}")]
    InputLength { expected: usize, actual: usize },
    #[error("predictor produced a non-finite value: {0}")]
    NonFinite(f64),
    #[error("model error: {0}")]
    Model(String),
}
