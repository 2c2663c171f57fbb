//! # Event bus for broadcasting simulation events.
//!
//! [`Bus`] wraps a [`tokio::sync::broadcast`] channel. Publishers (actors,
//! the supervisor, the delivery worker's self-reports) never block and never
//! fail; the [`SubscriberSet`](crate::SubscriberSet) worker is the consumer.
//!
//! ## Rules
//! - The ring buffer is bounded; a receiver that falls behind observes
//!   `RecvError::Lagged(n)` and loses the `n` oldest events.
//! - Events published with no receiver attached are dropped.

use tokio::sync::broadcast;

use super::event::{Event, EventKind};

/// Broadcast channel for simulation events.
///
/// Cheap to clone (holds an `Arc`-backed sender); every actor gets one.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given ring capacity (clamped to ≥ 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event; returns immediately whether or not anyone listens.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Publishes a bare event of the given kind, stamped with the current
    /// time and sequence number. For metadata-free lifecycle events.
    pub fn publish_kind(&self, kind: EventKind) {
        self.publish(Event::now(kind));
    }

    /// Creates a new independent receiver observing subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        bus.publish_kind(EventKind::ShutdownRequested);
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ShutdownRequested);
    }

    #[tokio::test]
    async fn publish_without_receivers_is_dropped() {
        let bus = Bus::new(1);
        // No receiver subscribed; must not block or panic.
        bus.publish(Event::now(EventKind::AllStopped));
    }
}
