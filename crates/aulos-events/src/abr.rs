use aulos_core::SelectionReason;

/// Events emitted by adaptive selections.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AbrEvent {
    /// Selected representation changed.
    SelectionChanged {
        from: usize,
        to: usize,
        reason: SelectionReason,
    },
    /// Buffered queue re-evaluated; segments from `retained` onward may be
    /// discarded and re-fetched.
    QueueEvaluated { queue_len: usize, retained: usize },
}
