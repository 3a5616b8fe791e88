//! # Blocking message queue: the non-cooperative side of the bridge.
//!
//! [`MessageQueue`] is the contract the pipeline needs from any blocking,
//! thread-safe FIFO: a non-suspending `put` and a non-blocking `try_get`
//! with `None` as the empty sentinel. The cooperative side never calls these
//! directly; both loops go through [`BlockingBridge`](crate::BlockingBridge).
//!
//! [`BridgeQueue`] is the in-process implementation used by the demo and the
//! tests. Replace it with an adapter over a real broker client to integrate
//! with an external system.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::message::Message;

/// Blocking, thread-safe FIFO holding cell for messages crossing between the
/// blocking domain and the cooperative scheduler.
///
/// Both operations run on bridge worker threads and must never suspend
/// cooperatively. `put` may block the calling thread (a bounded or remote
/// backing store is allowed to); `try_get` must return immediately.
pub trait MessageQueue: Send + Sync + 'static {
    /// Enqueues one message. May block the calling thread.
    fn put(&self, msg: Message);

    /// Dequeues one message without blocking; `None` means empty.
    fn try_get(&self) -> Option<Message>;
}

/// Unbounded in-memory FIFO.
///
/// `put` never blocks because the queue is unbounded; the blocking contract
/// of [`MessageQueue`] is still honored (callers run on worker threads).
#[derive(Default)]
pub struct BridgeQueue {
    items: Mutex<VecDeque<Message>>,
}

impl BridgeQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.items.lock().map(|q| q.len()).unwrap_or(0)
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageQueue for BridgeQueue {
    fn put(&self, msg: Message) {
        if let Ok(mut items) = self.items.lock() {
            items.push_back(msg);
        }
    }

    fn try_get(&self) -> Option<Message> {
        self.items.lock().ok().and_then(|mut items| items.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let queue = BridgeQueue::new();
        let first = Message::random();
        let second = Message::random();
        queue.put(first.clone());
        queue.put(second.clone());

        assert_eq!(queue.try_get(), Some(first));
        assert_eq!(queue.try_get(), Some(second));
    }

    #[test]
    fn test_empty_sentinel() {
        let queue = BridgeQueue::new();
        assert_eq!(queue.try_get(), None);

        queue.put(Message::random());
        assert!(queue.try_get().is_some());
        assert_eq!(queue.try_get(), None);
    }
}
