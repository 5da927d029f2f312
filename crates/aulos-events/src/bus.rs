use tokio::sync::broadcast;

use crate::Event;

/// Receiving half of an [`EventBus`] subscription.
pub type EventReceiver = broadcast::Receiver<Event>;

/// Broadcast bus shared by all aulos components.
///
/// `publish()` is synchronous and never blocks, so it is safe to call from
/// network callbacks and the playback loop alike. Without subscribers events
/// are dropped.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish to all current subscribers.
    pub fn publish<E: Into<Event>>(&self, event: E) {
        let _ = self.tx.send(event.into());
    }

    /// Subscribe to all future events.
    ///
    /// Slow subscribers receive `RecvError::Lagged(n)` instead of blocking
    /// producers.
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        self.tx.subscribe()
    }
}
