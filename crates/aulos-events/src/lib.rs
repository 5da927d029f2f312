#![forbid(unsafe_code)]

//! Unified event bus for aulos diagnostics.
//!
//! Components receive a cloned [`EventBus`] at construction and publish
//! structured records instead of writing to process-wide log files.

mod abr;
mod bandwidth;
mod bus;
mod event;

pub use abr::AbrEvent;
pub use bandwidth::BandwidthEvent;
pub use bus::{EventBus, EventReceiver};
pub use event::Event;
