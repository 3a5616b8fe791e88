//! # In-flight message tracker.
//!
//! [`InflightTracker`] maintains the set of message ids that were pulled from
//! the queue but have not yet been acked or cancelled. The supervisor reads a
//! snapshot when the shutdown grace window closes to name the work that never
//! unwound.
//!
//! State transitions:
//! - `MessagePulled` → insert
//! - `MessageAcked` → remove
//! - `HandlerCancelled` → remove (cancelled cleanly, not stuck)

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Tracks which messages are currently in flight.
///
/// Snapshot reads are synchronous; the critical sections are a single set
/// operation each.
#[derive(Default)]
pub struct InflightTracker {
    inflight: Mutex<HashSet<String>>,
}

impl InflightTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a sorted list of in-flight message ids.
    pub fn snapshot(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .inflight
            .lock()
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// Returns true if the message is currently in flight.
    pub fn contains(&self, id: &str) -> bool {
        self.inflight
            .lock()
            .map(|set| set.contains(id))
            .unwrap_or(false)
    }
}

#[async_trait]
impl Subscribe for InflightTracker {
    async fn on_event(&self, event: &Event) {
        let Some(id) = event.message.as_deref() else {
            return;
        };
        let Ok(mut set) = self.inflight.lock() else {
            return;
        };
        match event.kind {
            EventKind::MessagePulled => {
                set.insert(id.to_string());
            }
            EventKind::MessageAcked | EventKind::HandlerCancelled => {
                set.remove(id);
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "inflight_tracker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pulled_then_acked_leaves_nothing_in_flight() {
        let tracker = InflightTracker::new();

        tracker
            .on_event(&Event::new(EventKind::MessagePulled).with_message("m-1"))
            .await;
        assert!(tracker.contains("m-1"));

        tracker
            .on_event(&Event::new(EventKind::MessageAcked).with_message("m-1"))
            .await;
        assert!(!tracker.contains("m-1"));
    }

    #[tokio::test]
    async fn test_cancelled_handler_is_not_stuck() {
        let tracker = InflightTracker::new();

        tracker
            .on_event(&Event::new(EventKind::MessagePulled).with_message("m-2"))
            .await;
        tracker
            .on_event(&Event::new(EventKind::HandlerCancelled).with_message("m-2"))
            .await;

        assert!(tracker.snapshot().is_empty());
    }
}
