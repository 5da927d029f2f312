use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use aulos_bandwidth::{PredictionError, Predictor};

/// Always predicts the same normalized value.
#[derive(Clone, Copy, Debug)]
pub struct FixedPredictor {
    pub value: f64,
    pub expected_len: Option<usize>,
}

impl FixedPredictor {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            expected_len: None,
        }
    }

    /// Reject windows whose length differs from `len`.
    #[must_use]
    pub fn expecting(mut self, len: usize) -> Self {
        self.expected_len = Some(len);
        self
    }
}

impl Predictor for FixedPredictor {
    fn predict(&mut self, window: &[f64]) -> Result<f64, PredictionError> {
        match self.expected_len {
            Some(expected) if expected != window.len() => Err(PredictionError::InputLength {
                expected,
                actual: window.len(),
            }),
            _ => Ok(self.value),
        }
    }
}

/// Replays scripted outputs, then fails; also records every input window.
///
/// The close flag is shared, so it stays observable after the predictor is
/// boxed into an estimator.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPredictor {
    outputs: VecDeque<Result<f64, PredictionError>>,
    pub inputs: Vec<Vec<f64>>,
    closed: Arc<AtomicBool>,
}

impl ScriptedPredictor {
    pub fn new(outputs: impl IntoIterator<Item = Result<f64, PredictionError>>) -> Self {
        Self {
            outputs: outputs.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Handle that reports whether [`Predictor::close`] was called.
    pub fn close_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }
}

impl Predictor for ScriptedPredictor {
    fn predict(&mut self, window: &[f64]) -> Result<f64, PredictionError> {
        self.inputs.push(window.to_vec());
        self.outputs
            .pop_front()
            .unwrap_or_else(|| Err(PredictionError::Model("script exhausted".into())))
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::Release);
    }
}

/// Fails every prediction.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingPredictor;

impl Predictor for FailingPredictor {
    fn predict(&mut self, _window: &[f64]) -> Result<f64, PredictionError> {
        Err(PredictionError::Model("model unavailable".into()))
    }
}
