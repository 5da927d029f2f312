use std::collections::VecDeque;

#[cfg(test)]
use unimock::unimock;

use crate::PredictionError;

/// Sequence model that predicts the next normalized bitrate from a window of
/// past normalized bitrates.
///
/// Any type offering `predict` and `close` can back predictive estimation;
/// implementations reject windows of the wrong length with
/// [`PredictionError::InputLength`].
#[cfg_attr(test, unimock(api = PredictorMock))]
pub trait Predictor: Send {
    fn predict(&mut self, window: &[f64]) -> Result<f64, PredictionError>;

    /// Release model resources. Further `predict` calls may fail.
    fn close(&mut self) {}
}

/// Fixed-capacity FIFO of normalized bitrate samples.
#[derive(Clone, Debug)]
pub struct PredictionWindow {
    samples: VecDeque<f64>,
    capacity: usize,
    normalization: f64,
}

impl PredictionWindow {
    #[must_use]
    pub fn new(capacity: usize, normalization: f64) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            normalization,
        }
    }

    /// Push a bitrate in bits per second, evicting the oldest when full.
    pub fn push(&mut self, bits_per_second: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(self.normalize(bits_per_second));
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest-first copy of the window contents.
    pub fn to_vec(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    pub fn normalize(&self, bits_per_second: f64) -> f64 {
        bits_per_second / self.normalization
    }

    pub fn denormalize(&self, value: f64) -> f64 {
        value * self.normalization
    }
}
