#![forbid(unsafe_code)]
#![expect(
    clippy::unwrap_used,
    reason = "test utility crate: unwraps are acceptable"
)]
#![expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    reason = "test utility crate: numeric casts are acceptable for random fixtures"
)]

//! Fixtures shared by aulos unit and integration tests.

mod ladder;
mod predictor;
mod rng;

pub use ladder::{ladder, segment_starts, video_ladder};
pub use predictor::{FailingPredictor, FixedPredictor, ScriptedPredictor};
pub use rng::Xorshift64;
