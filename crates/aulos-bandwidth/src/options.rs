use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{BandwidthError, BandwidthResult};

/// Bits per mebibyte; predictor inputs are expressed in MiB/s.
pub const DEFAULT_NORMALIZATION: f64 = 8.0 * 1024.0 * 1024.0;

/// Largest accepted predictive window.
pub const MAX_PREDICTION_WINDOW: usize = 4096;

/// Which algorithm turns gated samples into the published estimate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EstimationMode {
    /// Weighted median (or configured percentile) of recent samples.
    #[default]
    Percentile,
    /// Sequence model over the last `window` normalized samples.
    Predictive { window: usize, normalization: f64 },
}

/// Bandwidth estimation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandwidthOptions {
    /// Total weight retained by the sliding percentile.
    pub max_weight: u32,
    /// Cumulative transfer time required before the first estimate.
    pub elapsed_threshold: Duration,
    /// Cumulative bytes required before the first estimate.
    pub bytes_threshold: u64,
    pub estimation: EstimationMode,
    /// Percentile published in [`EstimationMode::Percentile`].
    pub percentile: f64,
    /// Reset the running totals after every publication, re-arming the gate.
    pub regate_after_publish: bool,
}

impl Default for BandwidthOptions {
    fn default() -> Self {
        Self {
            max_weight: 2000,
            elapsed_threshold: Duration::from_millis(2000),
            bytes_threshold: 512 * 1024,
            estimation: EstimationMode::default(),
            percentile: 0.5,
            regate_after_publish: false,
        }
    }
}

impl BandwidthOptions {
    /// Switch to predictive estimation with the default normalization.
    #[must_use]
    pub fn predictive(mut self, window: usize) -> Self {
        self.estimation = EstimationMode::Predictive {
            window,
            normalization: DEFAULT_NORMALIZATION,
        };
        self
    }

    pub fn validate(&self) -> BandwidthResult<()> {
        if self.max_weight == 0 {
            return Err(BandwidthError::InvalidOption("max_weight must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.percentile) {
            return Err(BandwidthError::InvalidOption(format!(
                "percentile must be within [0, 1], got {}",
                self.percentile
            )));
        }
        if let EstimationMode::Predictive {
            window,
            normalization,
        } = self.estimation
        {
            if window == 0 || window > MAX_PREDICTION_WINDOW {
                return Err(BandwidthError::InvalidOption(format!(
                    "predictive window must be within 1..={MAX_PREDICTION_WINDOW}, got {window}"
                )));
            }
            if !normalization.is_finite() || normalization <= 0.0 {
                return Err(BandwidthError::InvalidOption(format!(
                    "normalization must be finite and positive, got {normalization}"
                )));
            }
        }
        Ok(())
    }
}
