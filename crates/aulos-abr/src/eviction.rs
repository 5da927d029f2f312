use aulos_core::{Representation, time::playout_duration_for_media_duration};

use crate::EvictionThreshold;

/// One queued media segment, as seen by eviction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BufferedSegment {
    /// Media start time in microseconds.
    pub start_us: i64,
    pub bitrate: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl BufferedSegment {
    pub fn new(start_us: i64, representation: &Representation) -> Self {
        Self {
            start_us,
            bitrate: representation.bitrate,
            width: representation.width,
            height: representation.height,
        }
    }
}

/// Decides how much of the buffered queue to keep when a better
/// representation becomes affordable.
#[derive(Clone, Copy, Debug)]
pub struct BufferEvictionPolicy {
    min_retain_us: i64,
    threshold: EvictionThreshold,
}

impl BufferEvictionPolicy {
    pub fn new(min_retain_us: i64, threshold: EvictionThreshold) -> Self {
        Self {
            min_retain_us,
            threshold,
        }
    }

    /// Number of leading segments to keep; segments from the returned index
    /// onward may be discarded and fetched again at `ideal` quality.
    ///
    /// Returns `queue.len()` when nothing qualifies.
    pub fn retained_len(
        &self,
        playback_position_us: i64,
        queue: &[BufferedSegment],
        ideal: &Representation,
        playback_speed: f32,
    ) -> usize {
        let Some(last) = queue.last() else {
            return 0;
        };

        let ahead_of_last = self.playout_offset(last, playback_position_us, playback_speed);
        if ahead_of_last < self.min_retain_us {
            return queue.len();
        }

        queue
            .iter()
            .position(|segment| {
                self.playout_offset(segment, playback_position_us, playback_speed)
                    >= self.min_retain_us
                    && self.is_replaceable(segment, ideal)
            })
            .unwrap_or(queue.len())
    }

    fn playout_offset(&self, segment: &BufferedSegment, position_us: i64, speed: f32) -> i64 {
        playout_duration_for_media_duration(segment.start_us.saturating_sub(position_us), speed)
    }

    /// Lower bitrate than `ideal`, below the SD threshold, and shorter than
    /// `ideal`. Unknown dimensions never qualify.
    fn is_replaceable(&self, segment: &BufferedSegment, ideal: &Representation) -> bool {
        let (Some(width), Some(height)) = (segment.width, segment.height) else {
            return false;
        };
        let Some(ideal_height) = ideal.height else {
            return false;
        };
        segment.bitrate < ideal.bitrate
            && height < self.threshold.max_height
            && width < self.threshold.max_width
            && height < ideal_height
    }
}
