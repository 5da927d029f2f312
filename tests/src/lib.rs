#![forbid(unsafe_code)]

//! Helpers for the cross-crate integration tests in `tests/`.

use std::sync::Arc;

use aulos::{
    bandwidth::{BandwidthResult, TransferListener},
    media::ManualClock,
};

/// Drives a [`TransferListener`] against a [`ManualClock`].
#[derive(Clone, Debug)]
pub struct TransferDriver<L> {
    pub listener: L,
    pub clock: Arc<ManualClock>,
}

impl<L: TransferListener> TransferDriver<L> {
    pub fn new(listener: L, clock: Arc<ManualClock>) -> Self {
        Self { listener, clock }
    }

    /// One complete transfer of `bytes` taking `elapsed_ms`.
    pub fn download(&self, bytes: u64, elapsed_ms: i64) -> BandwidthResult<()> {
        self.listener.on_transfer_start();
        self.listener.on_bytes_transferred(bytes);
        self.clock.advance(elapsed_ms);
        self.listener.on_transfer_end()
    }

    /// Transfer sized to take `elapsed_ms` at `bits_per_second`.
    pub fn download_at(&self, bits_per_second: u64, elapsed_ms: i64) -> BandwidthResult<()> {
        let bytes = bits_per_second * elapsed_ms.unsigned_abs() / 8_000;
        self.download(bytes, elapsed_ms)
    }
}
