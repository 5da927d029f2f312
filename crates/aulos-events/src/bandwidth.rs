/// Events emitted by the bandwidth meter.
#[derive(Clone, Debug, PartialEq)]
pub enum BandwidthEvent {
    /// A transfer epoch closed.
    ///
    /// Emitted on every transfer end, including epochs with zero elapsed
    /// time that produced no bitrate sample.
    Sample {
        elapsed_ms: i64,
        bytes: u64,
        /// Published estimate after this sample, `None` if none yet.
        estimate_bps: Option<u64>,
    },
    /// The prediction model failed; the previous estimate was kept.
    PredictionFailed { error: String },
}
