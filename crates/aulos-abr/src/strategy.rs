use std::{fmt::Debug, time::Duration};

use aulos_core::{RepresentationCatalog, time::MICROS_PER_SEC};

use crate::{AbrOptions, QoeWeights, StrategyKind, qoe_score};

/// Inputs of one ideal-index computation.
#[derive(Clone, Copy, Debug)]
pub struct SelectionContext<'a> {
    pub catalog: &'a RepresentationCatalog,
    /// Eligible indices, highest bitrate first. Never empty.
    pub candidates: &'a [usize],
    /// Currently selected index.
    pub current: usize,
    /// Raw published estimate.
    pub estimate: Option<u64>,
    /// Bandwidth budget the selection must fit in.
    pub effective_bitrate: u64,
    pub playback_speed: f32,
    pub buffered_us: i64,
}

impl SelectionContext<'_> {
    /// Whether `index` fits the effective bitrate at the current speed.
    pub fn is_feasible(&self, index: usize) -> bool {
        let Some(repr) = self.catalog.get(index) else {
            return false;
        };
        let playout_bitrate = (f64::from(repr.bitrate) * f64::from(self.playback_speed)).round();
        #[expect(clippy::cast_precision_loss, reason = "bitrates well below 2^53")]
        let effective = self.effective_bitrate as f64;
        playout_bitrate <= effective
    }

    /// Feasible candidates, highest bitrate first.
    pub fn feasible(&self) -> impl Iterator<Item = usize> + '_ {
        self.candidates
            .iter()
            .copied()
            .filter(|&i| self.is_feasible(i))
    }

    /// Lowest-bitrate candidate, used when nothing is feasible.
    pub fn fallback(&self) -> usize {
        self.candidates
            .last()
            .copied()
            .unwrap_or_else(|| self.catalog.lowest_index())
    }

    fn bitrate(&self, index: usize) -> u32 {
        self.catalog.get(index).map_or(0, |r| r.bitrate)
    }

    #[expect(clippy::cast_precision_loss, reason = "buffer durations well below 2^53")]
    fn buffered_secs(&self) -> f64 {
        self.buffered_us as f64 / MICROS_PER_SEC as f64
    }
}

/// Picks the ideal representation index from eligible candidates.
///
/// Implementations must return one of `ctx.candidates` and be pure with
/// respect to `select`; history goes through [`observe_buffer`].
///
/// [`observe_buffer`]: SelectionStrategy::observe_buffer
pub trait SelectionStrategy: Send + Debug {
    fn select(&self, ctx: &SelectionContext<'_>) -> usize;

    /// Called once per track update, before `select`.
    fn observe_buffer(&mut self, _buffered_us: i64) {}
}

/// Build the strategy configured in `options`.
pub fn strategy_for(options: &AbrOptions) -> Box<dyn SelectionStrategy> {
    match options.strategy {
        StrategyKind::Throughput => Box::new(Throughput),
        StrategyKind::Qoe => Box::new(QoeStrategy::new(options.qoe, options.chunk_duration)),
        StrategyKind::AdaptivePenalty => Box::new(AdaptivePenalty::new(options.chunk_duration)),
    }
}

/// Highest feasible bitrate, or the lowest candidate.
#[derive(Clone, Copy, Debug, Default)]
pub struct Throughput;

impl SelectionStrategy for Throughput {
    fn select(&self, ctx: &SelectionContext<'_>) -> usize {
        ctx.feasible().next().unwrap_or_else(|| ctx.fallback())
    }
}

/// Feasible candidate maximising [`qoe_score`] against the current selection.
#[derive(Clone, Copy, Debug)]
pub struct QoeStrategy {
    weights: QoeWeights,
    chunk_duration: Duration,
}

impl QoeStrategy {
    pub fn new(weights: QoeWeights, chunk_duration: Duration) -> Self {
        Self {
            weights,
            chunk_duration,
        }
    }
}

impl SelectionStrategy for QoeStrategy {
    fn select(&self, ctx: &SelectionContext<'_>) -> usize {
        if ctx.estimate.is_none() {
            return Throughput.select(ctx);
        }
        let current = ctx.bitrate(ctx.current);
        best_by(ctx, |index| {
            qoe_score(
                current,
                ctx.bitrate(index),
                ctx.buffered_us,
                ctx.estimate,
                self.chunk_duration,
                &self.weights,
            )
        })
    }
}

/// Buffer-adaptive penalty score.
///
/// `score = new_kbps - m * t * 100 - |new_kbps - cur_kbps|` with
/// `t = new * chunk_secs / effective - buffered_secs`. The weight `m` halves
/// while the buffer drains and doubles while it grows.
#[derive(Clone, Debug)]
pub struct AdaptivePenalty {
    penalty: f64,
    last_buffered_us: Option<i64>,
    chunk_duration: Duration,
}

impl AdaptivePenalty {
    pub const INITIAL_PENALTY: f64 = 4.3;
    pub const MIN_PENALTY: f64 = 0.01;
    pub const MAX_PENALTY: f64 = 1000.0;

    pub fn new(chunk_duration: Duration) -> Self {
        Self {
            penalty: Self::INITIAL_PENALTY,
            last_buffered_us: None,
            chunk_duration,
        }
    }

    /// Current weight `m`.
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    fn score(&self, ctx: &SelectionContext<'_>, index: usize) -> f64 {
        let new = f64::from(ctx.bitrate(index));
        let current = f64::from(ctx.bitrate(ctx.current));
        #[expect(clippy::cast_precision_loss, reason = "bitrates well below 2^53")]
        let effective = ctx.effective_bitrate as f64;
        let fetch_secs = if effective > 0.0 {
            new * self.chunk_duration.as_secs_f64() / effective
        } else {
            0.0
        };
        let t = fetch_secs - ctx.buffered_secs();
        new / 1000.0 - self.penalty * t * 100.0 - (new / 1000.0 - current / 1000.0).abs()
    }
}

impl SelectionStrategy for AdaptivePenalty {
    fn select(&self, ctx: &SelectionContext<'_>) -> usize {
        best_by(ctx, |index| self.score(ctx, index))
    }

    fn observe_buffer(&mut self, buffered_us: i64) {
        if let Some(previous) = self.last_buffered_us {
            let factor = if buffered_us < previous { 0.5 } else { 2.0 };
            self.penalty = (self.penalty * factor).clamp(Self::MIN_PENALTY, Self::MAX_PENALTY);
            tracing::trace!(
                previous,
                buffered_us,
                penalty = self.penalty,
                "adaptive penalty updated"
            );
        }
        self.last_buffered_us = Some(buffered_us);
    }
}

/// Feasible candidate with the highest score; earlier candidates win ties.
fn best_by(ctx: &SelectionContext<'_>, score: impl Fn(usize) -> f64) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for index in ctx.feasible() {
        let s = score(index);
        if best.is_none_or(|(_, top)| s > top) {
            best = Some((index, s));
        }
    }
    best.map_or_else(|| ctx.fallback(), |(index, _)| index)
}
