use crate::{BandwidthError, BandwidthResult};

/// One bitrate measurement, produced when a transfer epoch closes with
/// positive elapsed time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BitrateSample {
    pub bytes_transferred: u64,
    pub elapsed_ms: i64,
    pub bits_per_second: f64,
}

impl BitrateSample {
    /// Build a sample from raw counters. Returns `None` unless
    /// `elapsed_ms > 0`.
    #[must_use]
    pub fn from_transfer(bytes_transferred: u64, elapsed_ms: i64) -> Option<Self> {
        if elapsed_ms <= 0 {
            return None;
        }
        #[expect(clippy::cast_precision_loss, reason = "byte counts well below 2^53")]
        let bits_per_second = bytes_transferred as f64 * 8000.0 / elapsed_ms as f64;
        Some(Self {
            bytes_transferred,
            elapsed_ms,
            bits_per_second,
        })
    }
}

/// Result of closing a transfer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransferEnd {
    /// Time since the epoch start (may be zero).
    pub elapsed_ms: i64,
    /// Bytes attributed to the epoch.
    pub bytes: u64,
    /// Present when `elapsed_ms > 0`.
    pub sample: Option<BitrateSample>,
}

/// Folds byte/duration deltas from overlapping transfers into bitrate
/// samples.
///
/// Concurrent transfers share one epoch: the epoch starts when the first
/// transfer opens, bytes from every open transfer go to one counter, and each
/// transfer end closes the epoch and restarts it at `now` if other transfers
/// are still open.
#[derive(Clone, Debug, Default)]
pub struct SampleAccumulator {
    open_transfers: u32,
    epoch_start_ms: i64,
    epoch_bytes: u64,
}

impl SampleAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_transfer_start(&mut self, now_ms: i64) {
        if self.open_transfers == 0 {
            self.epoch_start_ms = now_ms;
        }
        self.open_transfers = self.open_transfers.saturating_add(1);
    }

    pub fn on_bytes_transferred(&mut self, bytes: u64) {
        self.epoch_bytes = self.epoch_bytes.saturating_add(bytes);
    }

    pub fn on_transfer_end(&mut self, now_ms: i64) -> BandwidthResult<TransferEnd> {
        if self.open_transfers == 0 {
            return Err(BandwidthError::InvalidState(
                "transfer end without a matching transfer start",
            ));
        }

        let elapsed_ms = now_ms.saturating_sub(self.epoch_start_ms);
        let bytes = self.epoch_bytes;
        let sample = BitrateSample::from_transfer(bytes, elapsed_ms);

        self.epoch_bytes = 0;
        self.open_transfers -= 1;
        if self.open_transfers > 0 {
            self.epoch_start_ms = now_ms;
        }

        tracing::trace!(
            elapsed_ms,
            bytes,
            open = self.open_transfers,
            "transfer epoch closed"
        );

        Ok(TransferEnd {
            elapsed_ms,
            bytes,
            sample,
        })
    }

    /// Number of transfers currently open.
    pub fn open_transfers(&self) -> u32 {
        self.open_transfers
    }

    /// Bytes accumulated in the current epoch.
    pub fn pending_bytes(&self) -> u64 {
        self.epoch_bytes
    }
}
