#![forbid(unsafe_code)]

//! # Aulos
//!
//! Facade crate for bandwidth estimation and adaptive quality selection.
//!
//! ## Quick start
//!
//! ```
//! use aulos::prelude::*;
//!
//! let session = AbrSession::new(AulosConfig::default())?;
//! let catalog = RepresentationCatalog::new(vec![
//!     Representation::new(400_000).with_resolution(640, 360),
//!     Representation::new(2_500_000).with_resolution(1280, 720),
//! ])?;
//! let mut selection = session.create_selection(catalog)?;
//!
//! // Network layer reports transfers through the shared meter.
//! let listener = session.transfer_listener();
//! listener.on_transfer_start();
//! listener.on_bytes_transferred(64 * 1024);
//! listener.on_transfer_end()?;
//!
//! // Playback loop asks for the next representation.
//! let index = selection.update_selected_track(0, 4_000_000, None);
//! assert!(index < 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// ── Re-export sub-crates ────────────────────────────────────────────────

pub mod media {
    pub use aulos_core::*;
}

pub mod events {
    pub use aulos_events::*;
}

pub mod bandwidth {
    pub use aulos_bandwidth::*;
}

pub mod abr {
    pub use aulos_abr::*;
}

// ── Session ─────────────────────────────────────────────────────────────

mod config;
mod error;
mod session;

pub use config::AulosConfig;
pub use error::{AulosError, AulosResult};
pub use session::{AbrSession, SessionSelection};

// ── Prelude ─────────────────────────────────────────────────────────────

pub mod prelude {
    pub use aulos_abr::{
        AbrOptions, AdaptiveSelection, BufferedSegment, PlaybackQualityTracker, PlayerState,
        SegmentRecord, StrategyKind,
    };
    pub use aulos_bandwidth::{BandwidthMeter, BandwidthOptions, Predictor, TransferListener};
    pub use aulos_core::{Blacklist, Clock, Representation, RepresentationCatalog, SelectionReason};
    pub use aulos_events::{AbrEvent, BandwidthEvent, Event, EventBus};

    pub use crate::{AbrSession, AulosConfig, AulosError, AulosResult};
}
