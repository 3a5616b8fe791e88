//! # Consumer: the supervised consume loop.
//!
//! Repeatedly performs one non-blocking pop through the [`BlockingBridge`].
//! The empty sentinel (`None`) loops again without spawning work; a real
//! message gets exactly one [`MessageHandler`] spawned on the shared task
//! tracker, fire-and-forget — the loop never waits for handlers.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::process::Processor;
use crate::queue::MessageQueue;

use super::bridge::BlockingBridge;
use super::handler::MessageHandler;

/// Supervised consume loop.
pub struct Consumer {
    queue: Arc<dyn MessageQueue>,
    bridge: BlockingBridge,
    bus: Bus,
    processor: Arc<dyn Processor>,
    tracker: TaskTracker,
    extend_interval: Duration,
    deadline: Duration,
}

impl Consumer {
    /// Creates a consumer popping from `queue` and handing messages to
    /// handlers built around `processor`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        bridge: BlockingBridge,
        bus: Bus,
        processor: Arc<dyn Processor>,
        tracker: TaskTracker,
        extend_interval: Duration,
        deadline: Duration,
    ) -> Self {
        Self {
            queue,
            bridge,
            bus,
            processor,
            tracker,
            extend_interval,
            deadline,
        }
    }

    /// Runs until cancelled or a bridge call fails.
    ///
    /// A pop abandoned at the cancellation point may drop one already-popped
    /// message; shutdown nacks outstanding work anyway, so redelivery is the
    /// broker's concern, not ours.
    pub async fn run(self, ctx: CancellationToken) -> Result<(), TaskError> {
        loop {
            let queue = Arc::clone(&self.queue);
            let pulled = tokio::select! {
                _ = ctx.cancelled() => return Err(TaskError::Canceled),
                res = self.bridge.run(move || queue.try_get()) => res?,
            };

            let Some(msg) = pulled else {
                continue;
            };

            self.bus
                .publish(Event::new(EventKind::MessagePulled).with_message(msg.id().to_string()));

            let handler = MessageHandler::new(
                msg,
                self.bus.clone(),
                Arc::clone(&self.processor),
                self.tracker.clone(),
                self.extend_interval,
                self.deadline,
            );
            self.tracker.spawn(handler.run(ctx.child_token()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::process::SimProcessor;
    use crate::queue::BridgeQueue;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_each_message_is_handled_exactly_once() {
        let queue = Arc::new(BridgeQueue::new());
        let mut expected = HashSet::new();
        for _ in 0..5 {
            let msg = Message::random();
            expected.insert(msg.id().to_string());
            queue.put(msg);
        }

        let bus = Bus::new(256);
        let mut rx = bus.subscribe();
        let tracker = TaskTracker::new();
        let token = CancellationToken::new();

        let consumer = Consumer::new(
            queue,
            BlockingBridge::new(2),
            bus.clone(),
            Arc::new(SimProcessor::new(Duration::from_millis(1))),
            tracker.clone(),
            Duration::from_secs(2),
            Duration::from_secs(3),
        );
        let handle = tokio::spawn(consumer.run(token.clone()));

        let mut acked = HashSet::new();
        let mut pulled = Vec::new();
        while acked.len() < 5 {
            let ev = rx.recv().await.unwrap();
            match ev.kind {
                EventKind::MessagePulled => pulled.push(ev.message.unwrap().to_string()),
                EventKind::MessageAcked => {
                    acked.insert(ev.message.unwrap().to_string());
                }
                _ => {}
            }
        }

        token.cancel();
        let res = handle.await.unwrap();
        assert!(matches!(res, Err(TaskError::Canceled)));
        tracker.close();
        tracker.wait().await;

        // No duplicates, no drops.
        let pulled_set: HashSet<_> = pulled.iter().cloned().collect();
        assert_eq!(pulled.len(), pulled_set.len(), "a message was pulled twice");
        assert_eq!(acked, expected);
    }

    #[tokio::test]
    async fn test_empty_queue_spawns_nothing() {
        let queue = Arc::new(BridgeQueue::new());
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let tracker = TaskTracker::new();
        let token = CancellationToken::new();

        let consumer = Consumer::new(
            queue,
            BlockingBridge::new(2),
            bus.clone(),
            Arc::new(SimProcessor::new(Duration::ZERO)),
            tracker.clone(),
            Duration::from_secs(2),
            Duration::from_secs(3),
        );
        let handle = tokio::spawn(consumer.run(token.clone()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
        let _ = handle.await.unwrap();

        assert!(rx.try_recv().is_err(), "no events expected for empty queue");
        assert_eq!(tracker.len(), 0);
    }
}
