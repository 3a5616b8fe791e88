//! # Core subscriber trait.
//!
//! [`Subscribe`] is the extension point for plugging diagnostic sinks into
//! the runtime. Each subscriber is driven by a dedicated worker loop fed by a
//! bounded queue owned by the [`SubscriberSet`](super::SubscriberSet).
//!
//! Implementations may be slow (I/O, batching); they block neither the
//! publisher nor other subscribers. If a subscriber's queue overflows,
//! events for that subscriber are dropped with a warning.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// `on_event` runs on a subscriber-dedicated worker task; avoid blocking the
/// runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name for warnings about this subscriber.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
