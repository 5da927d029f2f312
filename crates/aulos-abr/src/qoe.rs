//! Quality-of-experience scoring.

use std::time::Duration;

use aulos_core::time::MICROS_PER_SEC;

use crate::QoeWeights;

/// Score a switch from `old_bitrate` to `new_bitrate`.
///
/// `score = old - M * |new - old| - T * rebuffer`, where `rebuffer` is the
/// time in seconds needed to fetch one chunk at the old bitrate beyond what
/// is already buffered, floored at zero. Without a usable estimate the
/// rebuffer term is zero.
pub fn qoe_score(
    old_bitrate: u32,
    new_bitrate: u32,
    buffered_us: i64,
    bitrate_estimate: Option<u64>,
    chunk_duration: Duration,
    weights: &QoeWeights,
) -> f64 {
    let old = f64::from(old_bitrate);
    let new = f64::from(new_bitrate);

    #[expect(clippy::cast_precision_loss, reason = "durations and rates well below 2^53")]
    let rebuffer_secs = match bitrate_estimate {
        Some(estimate) if estimate > 0 => {
            let buffered_secs = buffered_us as f64 / MICROS_PER_SEC as f64;
            (chunk_duration.as_secs_f64() * old / estimate as f64 - buffered_secs).max(0.0)
        }
        _ => 0.0,
    };

    old - weights.switch_penalty * (new - old).abs() - weights.rebuffer_penalty * rebuffer_secs
}
