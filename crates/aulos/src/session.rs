use std::sync::Arc;

use aulos_abr::{AdaptiveSelection, PlaybackQualityTracker};
use aulos_bandwidth::{BandwidthEstimator, BandwidthMeter, Predictor};
use aulos_core::{BlacklistQuery, Clock, RepresentationCatalog, SystemClock};
use aulos_events::{EventBus, EventReceiver};

use crate::{AulosConfig, AulosResult};

/// Selection bound to the session's shared meter.
pub type SessionSelection = AdaptiveSelection<Arc<BandwidthMeter>>;

/// One playback session: a shared bandwidth meter feeding any number of
/// per-track-group selections.
///
/// Hand [`transfer_listener`](Self::transfer_listener) to the network layer
/// and call [`create_selection`](Self::create_selection) once per track
/// group.
pub struct AbrSession {
    config: AulosConfig,
    meter: Arc<BandwidthMeter>,
    clock: Arc<dyn Clock>,
    events: Option<EventBus>,
}

impl AbrSession {
    /// Percentile-estimating session on the system clock.
    pub fn new(config: AulosConfig) -> AulosResult<Self> {
        Self::with_clock(config, None, Arc::new(SystemClock::new()))
    }

    /// Session with an explicit predictor and clock.
    pub fn with_clock(
        config: AulosConfig,
        predictor: Option<Box<dyn Predictor>>,
        clock: Arc<dyn Clock>,
    ) -> AulosResult<Self> {
        config.validate()?;

        let events = config.events_capacity.map(EventBus::new);
        let estimator = BandwidthEstimator::new(&config.bandwidth, predictor)?;
        let mut meter = BandwidthMeter::new(estimator, Arc::clone(&clock));
        if let Some(bus) = &events {
            meter = meter.with_events(bus.clone());
        }

        tracing::debug!(
            estimation = ?config.bandwidth.estimation,
            strategy = ?config.abr.strategy,
            events = events.is_some(),
            "abr session created"
        );

        Ok(Self {
            config,
            meter: Arc::new(meter),
            clock,
            events,
        })
    }

    pub fn config(&self) -> &AulosConfig {
        &self.config
    }

    /// Shared meter, to be driven by transfer callbacks.
    pub fn transfer_listener(&self) -> Arc<BandwidthMeter> {
        Arc::clone(&self.meter)
    }

    pub fn bitrate_estimate(&self) -> Option<u64> {
        self.meter.bitrate_estimate()
    }

    /// Subscribe to diagnostic events, if the bus is enabled.
    pub fn subscribe(&self) -> Option<EventReceiver> {
        self.events.as_ref().map(EventBus::subscribe)
    }

    /// Selection for one track group, without a blacklist.
    pub fn create_selection(&self, catalog: RepresentationCatalog) -> AulosResult<SessionSelection> {
        let mut selection =
            AdaptiveSelection::new(catalog, Arc::clone(&self.meter), self.config.abr.clone())?
                .with_clock(Arc::clone(&self.clock));
        if let Some(bus) = &self.events {
            selection = selection.with_events(bus.clone());
        }
        Ok(selection)
    }

    /// Selection for one track group honouring `blacklist`.
    pub fn create_selection_with_blacklist(
        &self,
        catalog: RepresentationCatalog,
        blacklist: Arc<dyn BlacklistQuery>,
    ) -> AulosResult<SessionSelection> {
        Ok(self.create_selection(catalog)?.with_blacklist(blacklist))
    }

    /// Quality tracker on the session clock.
    pub fn quality_tracker(&self) -> PlaybackQualityTracker {
        PlaybackQualityTracker::new(Arc::clone(&self.clock))
    }

    /// Release the predictor; estimation continues in percentile mode.
    pub fn close(&self) {
        self.meter.close();
    }
}

impl std::fmt::Debug for AbrSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbrSession")
            .field("config", &self.config)
            .field("meter", &self.meter)
            .field("events", &self.events.is_some())
            .finish_non_exhaustive()
    }
}
