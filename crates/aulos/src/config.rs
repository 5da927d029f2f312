//! Configuration for [`AbrSession`](crate::AbrSession).

use aulos_abr::{AbrOptions, StrategyKind};
use aulos_bandwidth::BandwidthOptions;
use serde::{Deserialize, Serialize};

use crate::AulosResult;

/// Unified configuration for one streaming session.
///
/// Every field has a default, so partial JSON documents are accepted.
///
/// # Example
///
/// ```
/// use aulos::{AulosConfig, abr::StrategyKind};
///
/// let config = AulosConfig::from_json(
///     r#"{ "abr": { "strategy": "qoe" }, "events_capacity": 64 }"#,
/// )?;
/// assert_eq!(config.abr.strategy, StrategyKind::Qoe);
/// assert_eq!(config.bandwidth.max_weight, 2000);
/// # Ok::<(), aulos::AulosError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AulosConfig {
    pub bandwidth: BandwidthOptions,
    pub abr: AbrOptions,
    /// Capacity of the diagnostic event bus; `None` disables events.
    pub events_capacity: Option<usize>,
}

impl AulosConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> AulosResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> AulosResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> AulosResult<()> {
        self.bandwidth.validate()?;
        self.abr.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn with_bandwidth(mut self, bandwidth: BandwidthOptions) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    #[must_use]
    pub fn with_abr(mut self, abr: AbrOptions) -> Self {
        self.abr = abr;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.abr.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_events_capacity(mut self, capacity: usize) -> Self {
        self.events_capacity = Some(capacity);
        self
    }
}
