use std::sync::Arc;

use aulos_bandwidth::{BandwidthMeter, PercentileTracker};
#[cfg(test)]
use unimock::unimock;

/// Read side of the bandwidth meter, as seen by selections.
#[cfg_attr(test, unimock(api = BandwidthSourceMock))]
pub trait BandwidthSource: Send + Sync {
    /// Latest published estimate in bits per second, `None` before the first.
    fn bitrate_estimate(&self) -> Option<u64>;
}

impl<P: PercentileTracker> BandwidthSource for BandwidthMeter<P> {
    fn bitrate_estimate(&self) -> Option<u64> {
        BandwidthMeter::bitrate_estimate(self)
    }
}

impl<T: BandwidthSource + ?Sized> BandwidthSource for Arc<T> {
    fn bitrate_estimate(&self) -> Option<u64> {
        (**self).bitrate_estimate()
    }
}

/// Fixed estimate, handy for simulations and offline decisions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FixedBandwidth(pub Option<u64>);

impl BandwidthSource for FixedBandwidth {
    fn bitrate_estimate(&self) -> Option<u64> {
        self.0
    }
}
