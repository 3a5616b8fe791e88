//! # Producer: the supervised publish loop.
//!
//! Repeatedly performs one blocking publish through the
//! [`BlockingBridge`]. Each iteration awaits the bridge call in bounded slices
//! (`Config::publish_wait`) so the loop observes cancellation promptly even
//! while the blocking client call is in progress. This is the only place in
//! the runtime that uses a timeout outside of the shutdown grace window.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::message::Message;
use crate::queue::MessageQueue;

use super::bridge::BlockingBridge;

/// Supervised publish loop.
pub struct Producer {
    queue: Arc<dyn MessageQueue>,
    bridge: BlockingBridge,
    bus: Bus,
    wait: Duration,
}

impl Producer {
    /// Creates a producer publishing into `queue` through `bridge`.
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        bridge: BlockingBridge,
        bus: Bus,
        wait: Duration,
    ) -> Self {
        Self {
            queue,
            bridge,
            bus,
            wait,
        }
    }

    /// Runs until cancelled or a bridge call fails.
    pub async fn run(self, ctx: CancellationToken) -> Result<(), TaskError> {
        loop {
            if ctx.is_cancelled() {
                return Err(TaskError::Canceled);
            }

            let queue = Arc::clone(&self.queue);
            let call = self.bridge.run(move || {
                let msg = Message::random();
                queue.put(msg.clone());
                msg
            });
            tokio::pin!(call);

            // Bounded waits keep the loop cancellable while the blocking
            // publish runs; the in-flight call is never abandoned.
            let msg = loop {
                match time::timeout(self.wait, call.as_mut()).await {
                    Ok(res) => break res?,
                    Err(_elapsed) => {
                        if ctx.is_cancelled() {
                            return Err(TaskError::Canceled);
                        }
                    }
                }
            };

            self.bus.publish(
                Event::new(EventKind::MessagePublished).with_message(msg.id().to_string()),
            );
        }
    }
}
