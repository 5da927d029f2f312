use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{AbrError, AbrResult};

/// Which heuristic picks the ideal representation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Highest bitrate that fits the effective bandwidth.
    #[default]
    Throughput,
    /// Feasible candidate with the best QoE score.
    Qoe,
    /// Feasible candidate with the best buffer-adaptive penalty score.
    AdaptivePenalty,
}

/// Penalty weights of the QoE score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QoeWeights {
    /// Weight of the bitrate switch magnitude (`M`).
    pub switch_penalty: f64,
    /// Weight of the expected rebuffering time in seconds (`T`).
    pub rebuffer_penalty: f64,
}

impl Default for QoeWeights {
    fn default() -> Self {
        Self {
            switch_penalty: 1.0,
            rebuffer_penalty: 3000.0,
        }
    }
}

/// Segments below both bounds are "bad enough" to be replaced.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvictionThreshold {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for EvictionThreshold {
    fn default() -> Self {
        Self {
            max_width: 1280,
            max_height: 720,
        }
    }
}

/// Quality decision configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbrOptions {
    /// Effective bitrate assumed before the first bandwidth estimate.
    pub max_initial_bitrate: u64,
    /// Buffer required before switching up.
    pub min_duration_for_quality_increase: Duration,
    /// Buffer above which switching down is deferred.
    pub max_duration_for_quality_decrease: Duration,
    /// Buffer that must stay in place when lower quality segments are discarded.
    pub min_duration_to_retain_after_discard: Duration,
    /// Share of the estimate considered usable.
    pub bandwidth_fraction: f64,
    /// Share of the available duration required to switch up near a live edge.
    pub buffered_fraction_to_live_edge_for_quality_increase: f64,
    /// Rate limit of buffer re-evaluation.
    pub min_time_between_buffer_reevaluation: Duration,
    pub strategy: StrategyKind,
    pub qoe: QoeWeights,
    /// Segment duration assumed by the scoring strategies.
    pub chunk_duration: Duration,
    pub eviction: EvictionThreshold,
}

impl Default for AbrOptions {
    fn default() -> Self {
        Self {
            max_initial_bitrate: 800_000,
            min_duration_for_quality_increase: Duration::from_secs(10),
            max_duration_for_quality_decrease: Duration::from_secs(25),
            min_duration_to_retain_after_discard: Duration::from_secs(25),
            bandwidth_fraction: 0.75,
            buffered_fraction_to_live_edge_for_quality_increase: 0.75,
            min_time_between_buffer_reevaluation: Duration::from_millis(2000),
            strategy: StrategyKind::default(),
            qoe: QoeWeights::default(),
            chunk_duration: Duration::from_secs(2),
            eviction: EvictionThreshold::default(),
        }
    }
}

impl AbrOptions {
    #[must_use]
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_bandwidth_fraction(mut self, fraction: f64) -> Self {
        self.bandwidth_fraction = fraction;
        self
    }

    #[must_use]
    pub fn with_max_initial_bitrate(mut self, bitrate: u64) -> Self {
        self.max_initial_bitrate = bitrate;
        self
    }

    pub fn validate(&self) -> AbrResult<()> {
        check_fraction("bandwidth_fraction", self.bandwidth_fraction)?;
        check_fraction(
            "buffered_fraction_to_live_edge_for_quality_increase",
            self.buffered_fraction_to_live_edge_for_quality_increase,
        )?;
        for (name, weight) in [
            ("qoe.switch_penalty", self.qoe.switch_penalty),
            ("qoe.rebuffer_penalty", self.qoe.rebuffer_penalty),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(AbrError::InvalidOption(format!(
                    "{name} must be finite and non-negative, got {weight}"
                )));
            }
        }
        if self.chunk_duration.is_zero() {
            return Err(AbrError::InvalidOption(
                "chunk_duration must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn check_fraction(name: &str, value: f64) -> AbrResult<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(AbrError::InvalidOption(format!(
            "{name} must be within (0, 1], got {value}"
        )))
    }
}
