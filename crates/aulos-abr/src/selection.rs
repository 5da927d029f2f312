use std::sync::Arc;

use aulos_core::{
    BlacklistQuery, Clock, NoBlacklist, Representation, RepresentationCatalog, SelectionReason,
    SystemClock,
    time::{duration_to_ms, duration_to_us},
};
use aulos_events::{AbrEvent, EventBus};

use crate::{
    AbrOptions, AbrResult, BandwidthSource, BufferEvictionPolicy, BufferedSegment,
    SelectionContext, SelectionStrategy, strategy_for,
};

/// Mutable decision state of one track group.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SelectionState {
    pub selected_index: usize,
    pub reason: SelectionReason,
    /// Time of the last buffer re-evaluation, `None` until the first one.
    pub last_buffer_evaluation_ms: Option<i64>,
}

/// Adaptive quality decision engine for one track group.
///
/// Picks the ideal representation from the bandwidth estimate, applies
/// buffer hysteresis before switching, and proposes how much of the buffered
/// queue to discard when better quality becomes affordable.
pub struct AdaptiveSelection<B: BandwidthSource> {
    catalog: RepresentationCatalog,
    bandwidth: B,
    options: AbrOptions,
    strategy: Box<dyn SelectionStrategy>,
    eviction: BufferEvictionPolicy,
    clock: Arc<dyn Clock>,
    blacklist: Arc<dyn BlacklistQuery>,
    events: Option<EventBus>,
    state: SelectionState,
    playback_speed: f32,
    last_buffered_us: i64,
}

impl<B: BandwidthSource> AdaptiveSelection<B> {
    /// Create a selection and pick its initial representation.
    ///
    /// The initial pick ignores the blacklist and uses
    /// [`AbrOptions::max_initial_bitrate`] until an estimate exists.
    pub fn new(catalog: RepresentationCatalog, bandwidth: B, options: AbrOptions) -> AbrResult<Self> {
        options.validate()?;

        let eviction = BufferEvictionPolicy::new(
            duration_to_us(options.min_duration_to_retain_after_discard),
            options.eviction,
        );
        let strategy = strategy_for(&options);
        let lowest = catalog.lowest_index();

        let mut selection = Self {
            catalog,
            bandwidth,
            options,
            strategy,
            eviction,
            clock: Arc::new(SystemClock::new()),
            blacklist: Arc::new(NoBlacklist),
            events: None,
            state: SelectionState {
                selected_index: lowest,
                reason: SelectionReason::Initial,
                last_buffer_evaluation_ms: None,
            },
            playback_speed: 1.0,
            last_buffered_us: 0,
        };
        selection.state.selected_index = selection.select_ideal_index(None);

        tracing::debug!(
            selected = selection.state.selected_index,
            representations = selection.catalog.len(),
            strategy = ?selection.options.strategy,
            "adaptive selection created"
        );
        Ok(selection)
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_blacklist(mut self, blacklist: Arc<dyn BlacklistQuery>) -> Self {
        self.blacklist = blacklist;
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Track (re-)enabled: the next buffer evaluation is not rate limited.
    pub fn enable(&mut self) {
        self.state.last_buffer_evaluation_ms = None;
    }

    /// Ignored unless `speed` is finite and positive.
    pub fn set_playback_speed(&mut self, speed: f32) {
        if !speed.is_finite() || speed <= 0.0 {
            tracing::warn!(speed, current = self.playback_speed, "ignoring invalid playback speed");
            return;
        }
        self.playback_speed = speed;
    }

    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    pub fn selected_index(&self) -> usize {
        self.state.selected_index
    }

    pub fn selection_reason(&self) -> SelectionReason {
        self.state.reason
    }

    pub fn selected_representation(&self) -> &Representation {
        &self.catalog[self.state.selected_index]
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn catalog(&self) -> &RepresentationCatalog {
        &self.catalog
    }

    pub fn options(&self) -> &AbrOptions {
        &self.options
    }

    /// Bandwidth budget for the next decision.
    ///
    /// `estimate * bandwidth_fraction`, or the initial bitrate before the
    /// first estimate.
    pub fn effective_bitrate(&self) -> u64 {
        effective_bitrate(self.bandwidth.bitrate_estimate(), &self.options)
    }

    /// Ideal index ignoring buffer health.
    ///
    /// `now_ms = None` ignores the blacklist. When every index is
    /// blacklisted at `now_ms` the blacklist is ignored as well.
    pub fn select_ideal_index(&self, now_ms: Option<i64>) -> usize {
        let estimate = self.bandwidth.bitrate_estimate();
        let candidates = self.candidates(now_ms);
        let ctx = SelectionContext {
            catalog: &self.catalog,
            candidates: &candidates,
            current: self.state.selected_index,
            estimate,
            effective_bitrate: effective_bitrate(estimate, &self.options),
            playback_speed: self.playback_speed,
            buffered_us: self.last_buffered_us,
        };
        let ideal = self.strategy.select(&ctx);
        tracing::trace!(
            ideal,
            estimate,
            effective_bitrate = ctx.effective_bitrate,
            candidates = candidates.len(),
            "ideal index computed"
        );
        ideal
    }

    /// Re-run selection for the next segment and return the selected index.
    pub fn update_selected_track(
        &mut self,
        playback_position_us: i64,
        buffered_us: i64,
        available_us: Option<i64>,
    ) -> usize {
        let now_ms = self.clock.now_ms();
        self.strategy.observe_buffer(buffered_us);
        self.last_buffered_us = buffered_us;

        let current = self.state.selected_index;
        let ideal = self.select_ideal_index(Some(now_ms));
        if ideal == current {
            return current;
        }

        let mut selected = ideal;
        if !self.blacklist.is_blacklisted(current, now_ms) {
            let current_bitrate = self.catalog[current].bitrate;
            let ideal_bitrate = self.catalog[ideal].bitrate;
            let min_increase_us = self.min_duration_for_quality_increase_us(available_us);

            if ideal_bitrate > current_bitrate && buffered_us < min_increase_us {
                tracing::debug!(
                    current,
                    ideal,
                    buffered_us,
                    min_increase_us,
                    "upgrade deferred: buffer too short"
                );
                selected = current;
            } else if ideal_bitrate < current_bitrate
                && buffered_us >= duration_to_us(self.options.max_duration_for_quality_decrease)
            {
                tracing::debug!(current, ideal, buffered_us, "downgrade deferred: buffer healthy");
                selected = current;
            }
        }

        if selected != current {
            self.state.selected_index = selected;
            self.state.reason = SelectionReason::Adaptive;
            tracing::info!(
                from = current,
                to = selected,
                playback_position_us,
                buffered_us,
                "selection changed"
            );
            self.publish(AbrEvent::SelectionChanged {
                from: current,
                to: selected,
                reason: SelectionReason::Adaptive,
            });
        }
        selected
    }

    /// Number of leading queued segments to keep.
    ///
    /// Rate limited by [`AbrOptions::min_time_between_buffer_reevaluation`]:
    /// inside the window the whole queue is kept.
    pub fn evaluate_eviction_count(
        &mut self,
        playback_position_us: i64,
        queue: &[BufferedSegment],
    ) -> usize {
        let now_ms = self.clock.now_ms();
        let min_interval_ms = duration_to_ms(self.options.min_time_between_buffer_reevaluation);
        if self
            .state
            .last_buffer_evaluation_ms
            .is_some_and(|last| now_ms - last < min_interval_ms)
        {
            return queue.len();
        }
        self.state.last_buffer_evaluation_ms = Some(now_ms);

        if queue.is_empty() {
            return 0;
        }

        let ideal = self.select_ideal_index(Some(now_ms));
        let retained = self.eviction.retained_len(
            playback_position_us,
            queue,
            &self.catalog[ideal],
            self.playback_speed,
        );
        tracing::debug!(
            queue_len = queue.len(),
            retained,
            ideal,
            playback_position_us,
            "buffer re-evaluated"
        );
        self.publish(AbrEvent::QueueEvaluated {
            queue_len: queue.len(),
            retained,
        });
        retained
    }

    fn candidates(&self, now_ms: Option<i64>) -> Vec<usize> {
        let order = self.catalog.scan_order();
        if let Some(now_ms) = now_ms {
            let eligible: Vec<usize> = order
                .iter()
                .copied()
                .filter(|&i| !self.blacklist.is_blacklisted(i, now_ms))
                .collect();
            if !eligible.is_empty() {
                return eligible;
            }
            tracing::warn!(now_ms, "every representation blacklisted; ignoring blacklist");
        }
        order.to_vec()
    }

    /// Near a live edge the upgrade threshold shrinks to a fraction of what
    /// is available.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        reason = "microsecond durations well below 2^53"
    )]
    fn min_duration_for_quality_increase_us(&self, available_us: Option<i64>) -> i64 {
        let min_us = duration_to_us(self.options.min_duration_for_quality_increase);
        match available_us {
            Some(available) if available <= min_us => {
                (available as f64 * self.options.buffered_fraction_to_live_edge_for_quality_increase)
                    as i64
            }
            _ => min_us,
        }
    }

    fn publish(&self, event: AbrEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }
}

impl<B: BandwidthSource> std::fmt::Debug for AdaptiveSelection<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptiveSelection")
            .field("state", &self.state)
            .field("representations", &self.catalog.len())
            .field("strategy", &self.strategy)
            .field("playback_speed", &self.playback_speed)
            .finish_non_exhaustive()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    reason = "fraction is in (0, 1]"
)]
fn effective_bitrate(estimate: Option<u64>, options: &AbrOptions) -> u64 {
    estimate.map_or(options.max_initial_bitrate, |estimate| {
        (estimate as f64 * options.bandwidth_fraction) as u64
    })
}
