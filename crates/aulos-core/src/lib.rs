#![forbid(unsafe_code)]

//! Core types shared across the aulos adaptive streaming crates.
//!
//! This crate holds the data model the bandwidth meter and the quality
//! decision engine agree on, plus the collaborator contracts they consume:
//!
//! - [`Representation`] / [`RepresentationCatalog`]: encoded quality variants.
//! - [`Clock`]: monotonic millisecond time source.
//! - [`BlacklistQuery`]: temporary exclusion of representation indices.

mod blacklist;
mod clock;
mod errors;
mod representation;
pub mod time;

pub use blacklist::{Blacklist, BlacklistQuery, NoBlacklist};
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{CoreError, CoreResult};
pub use representation::{Representation, RepresentationCatalog};

/// Why the current representation was selected.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum SelectionReason {
    /// Chosen when the selection was created, before any adaptation.
    #[default]
    Initial,
    /// Chosen by bandwidth/buffer adaptation.
    Adaptive,
}
