//! Adaptive quality decisions for segmented streaming.
//!
//! [`AdaptiveSelection`] is the per-track-group decision engine. It reads the
//! published bandwidth estimate through [`BandwidthSource`], picks an ideal
//! representation with a configurable [`SelectionStrategy`], applies buffer
//! hysteresis before switching, and asks [`BufferEvictionPolicy`] how much
//! of the buffered queue is worth re-fetching at better quality.
//!
//! ## Example
//!
//! ```rust
//! use aulos_abr::{AbrOptions, AdaptiveSelection, FixedBandwidth};
//! use aulos_core::{Representation, RepresentationCatalog};
//!
//! let catalog = RepresentationCatalog::new(vec![
//!     Representation::new(500_000),
//!     Representation::new(1_500_000),
//!     Representation::new(4_000_000),
//! ])?;
//! let mut selection =
//!     AdaptiveSelection::new(catalog, FixedBandwidth(Some(3_000_000)), AbrOptions::default())?;
//!
//! // 2.25 Mbps usable after the 0.75 bandwidth fraction.
//! assert_eq!(selection.select_ideal_index(None), 1);
//! let index = selection.update_selected_track(0, 12_000_000, None);
//! assert_eq!(index, 1);
//! # Ok::<(), aulos_abr::AbrError>(())
//! ```

#![forbid(unsafe_code)]

mod error;
mod eviction;
mod options;
mod qoe;
mod selection;
mod source;
mod strategy;
mod tracker;

pub use error::{AbrError, AbrResult};
pub use eviction::{BufferEvictionPolicy, BufferedSegment};
pub use options::{AbrOptions, EvictionThreshold, QoeWeights, StrategyKind};
pub use qoe::qoe_score;
pub use selection::{AdaptiveSelection, SelectionState};
pub use source::{BandwidthSource, FixedBandwidth};
pub use strategy::{
    AdaptivePenalty, QoeStrategy, SelectionContext, SelectionStrategy, Throughput, strategy_for,
};
pub use tracker::{PlaybackQualityTracker, PlaybackReport, PlayerState, SegmentRecord, Stall};
