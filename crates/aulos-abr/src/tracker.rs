use std::sync::Arc;

use aulos_core::{Clock, Representation};
use serde::{Deserialize, Serialize};

/// Player state transitions relevant to stall tracking.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    Idle,
    Buffering,
    Ready,
    Ended,
}

/// One completed rebuffering interval.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Stall {
    pub start_ms: i64,
    pub duration_ms: i64,
}

/// One loaded media segment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub bitrate: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub codecs: Option<String>,
    pub media_start_ms: i64,
    pub media_duration_ms: i64,
    pub load_duration_ms: i64,
    pub bytes_loaded: u64,
}

impl SegmentRecord {
    pub fn new(representation: &Representation, media_start_ms: i64, media_end_ms: i64) -> Self {
        Self {
            bitrate: representation.bitrate,
            width: representation.width,
            height: representation.height,
            codecs: representation.codecs.clone(),
            media_start_ms,
            media_duration_ms: media_end_ms.saturating_sub(media_start_ms),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_load(mut self, load_duration_ms: i64, bytes_loaded: u64) -> Self {
        self.load_duration_ms = load_duration_ms;
        self.bytes_loaded = bytes_loaded;
        self
    }
}

/// Serializable summary of a playback session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackReport {
    pub stalls: Vec<Stall>,
    pub total_stall_ms: i64,
    pub segments: Vec<SegmentRecord>,
    /// Bitrate changes between consecutive segments.
    pub switch_count: usize,
    pub qoe_sum: f64,
    pub qoe_mean: Option<f64>,
}

/// Collects stalls, loaded segments and QoE scores for one playback.
#[derive(Debug)]
pub struct PlaybackQualityTracker<C: Clock = Arc<dyn Clock>> {
    clock: C,
    stall_start_ms: Option<i64>,
    stalls: Vec<Stall>,
    segments: Vec<SegmentRecord>,
    qoe_sum: f64,
    qoe_count: u64,
}

impl<C: Clock> PlaybackQualityTracker<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            stall_start_ms: None,
            stalls: Vec::new(),
            segments: Vec::new(),
            qoe_sum: 0.0,
            qoe_count: 0,
        }
    }

    /// `Buffering` opens a stall; `Ready` closes the open one.
    pub fn on_player_state_changed(&mut self, state: PlayerState) {
        let now_ms = self.clock.now_ms();
        match state {
            PlayerState::Buffering => {
                self.stall_start_ms.get_or_insert(now_ms);
            }
            PlayerState::Ready => {
                if let Some(start_ms) = self.stall_start_ms.take() {
                    let stall = Stall {
                        start_ms,
                        duration_ms: now_ms - start_ms,
                    };
                    tracing::debug!(start_ms, duration_ms = stall.duration_ms, "stall recorded");
                    self.stalls.push(stall);
                }
            }
            PlayerState::Idle | PlayerState::Ended => {}
        }
    }

    /// A seek discards the open stall; rebuffering after a seek is expected.
    pub fn on_seek(&mut self) {
        if self.stall_start_ms.take().is_some() {
            tracing::debug!("seek discarded open stall");
        }
    }

    pub fn on_segment_loaded(&mut self, record: SegmentRecord) {
        self.segments.push(record);
    }

    pub fn record_qoe(&mut self, score: f64) {
        if score.is_finite() {
            self.qoe_sum += score;
            self.qoe_count += 1;
        }
    }

    pub fn is_stalled(&self) -> bool {
        self.stall_start_ms.is_some()
    }

    pub fn stalls(&self) -> &[Stall] {
        &self.stalls
    }

    pub fn total_stall_ms(&self) -> i64 {
        self.stalls.iter().map(|s| s.duration_ms).sum()
    }

    pub fn report(&self) -> PlaybackReport {
        let switch_count = self
            .segments
            .windows(2)
            .filter(|pair| pair[0].bitrate != pair[1].bitrate)
            .count();
        #[expect(clippy::cast_precision_loss, reason = "score counts well below 2^53")]
        let qoe_mean = (self.qoe_count > 0).then(|| self.qoe_sum / self.qoe_count as f64);
        PlaybackReport {
            stalls: self.stalls.clone(),
            total_stall_ms: self.total_stall_ms(),
            segments: self.segments.clone(),
            switch_count,
            qoe_sum: self.qoe_sum,
            qoe_mean,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.report())
    }
}
