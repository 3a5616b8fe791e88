//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]. Publishers
//! (loops, handlers, extenders, the supervisor) publish without blocking;
//! the supervisor's listener forwards everything to the
//! [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Rules
//! - `publish()` never blocks and never fails; with no receivers the event
//!   is dropped.
//! - Capacity is a shared ring buffer; receivers that lag behind more than
//!   `capacity` events observe `RecvError::Lagged` and skip the oldest.
//! - No persistence, no delivery guarantee.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// Cheap to clone (the sender is `Arc`-backed); every clone publishes into
/// the same ring buffer.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus with the given capacity (clamped to a minimum of 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates an independent receiver observing subsequent events only.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_subscriber_sees_published_events() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(Event::new(EventKind::MessagePublished).with_message("m-1"));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::MessagePublished);
        assert_eq!(ev.message.as_deref(), Some("m-1"));
    }

    #[tokio::test]
    async fn test_publish_without_receivers_is_silent() {
        let bus = Bus::new(8);
        bus.publish(Event::new(EventKind::ShutdownComplete));
    }
}
