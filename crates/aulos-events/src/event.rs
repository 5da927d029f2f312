use crate::{AbrEvent, BandwidthEvent};

/// Unified event, one variant per subsystem.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Bandwidth(BandwidthEvent),
    Abr(AbrEvent),
}

impl From<BandwidthEvent> for Event {
    fn from(e: BandwidthEvent) -> Self {
        Self::Bandwidth(e)
    }
}

impl From<AbrEvent> for Event {
    fn from(e: AbrEvent) -> Self {
        Self::Abr(e)
    }
}
