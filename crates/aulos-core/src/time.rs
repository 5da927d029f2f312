//! Media/playout time conversions.
//!
//! Media times are signed microseconds: the offset between a buffered
//! segment and the playback position may be negative.

use std::time::Duration;

pub const MICROS_PER_MILLI: i64 = 1_000;
pub const MICROS_PER_SEC: i64 = 1_000_000;

/// Wall playout time needed to consume `media_us` of media at `speed`.
#[must_use]
#[expect(clippy::cast_possible_truncation, reason = "rounded playout micros fit i64")]
pub fn playout_duration_for_media_duration(media_us: i64, speed: f32) -> i64 {
    if (speed - 1.0).abs() < f32::EPSILON {
        return media_us;
    }
    #[expect(clippy::cast_precision_loss, reason = "sub-microsecond error is irrelevant")]
    let media = media_us as f64;
    (media / f64::from(speed)).round() as i64
}

/// Saturating conversion of a [`Duration`] into signed microseconds.
#[must_use]
pub fn duration_to_us(duration: Duration) -> i64 {
    i64::try_from(duration.as_micros()).unwrap_or(i64::MAX)
}

/// Saturating conversion of a [`Duration`] into signed milliseconds.
#[must_use]
pub fn duration_to_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
