//! # Runtime events emitted by the pipeline.
//!
//! [`EventKind`] classifies everything the runtime reports: message
//! lifecycle, per-step outcomes, deadline heartbeats, supervised-loop
//! terminal states, and the shutdown sequence. [`Event`] carries the
//! metadata for one occurrence.
//!
//! ## Ordering
//! Each event gets a globally unique, monotonically increasing sequence
//! number (`seq`). Subscribers that need ordering across tasks (the shutdown
//! tests do) compare `seq` rather than wall-clock time.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::core::SignalKind;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Message lifecycle ===
    /// A message was published to the queue.
    ///
    /// Sets: `message`.
    MessagePublished,

    /// A message was pulled from the queue and handed to a handler.
    ///
    /// Sets: `message`.
    MessagePulled,

    /// One sub-operation of a message completed.
    ///
    /// Sets: `message`, `step`.
    StepCompleted,

    /// One sub-operation of a message failed. Non-fatal; the message is
    /// still completed and acked.
    ///
    /// Sets: `message`, `step`, `reason`.
    StepFailed,

    /// The processing deadline was renewed for an in-flight message.
    ///
    /// Sets: `message`, `deadline_ms`.
    DeadlineExtended,

    /// A message was acknowledged after all sub-operations resolved.
    ///
    /// Sets: `message`.
    MessageAcked,

    /// A handler was cancelled mid-flight; its message is implicitly nacked.
    ///
    /// Sets: `message`.
    HandlerCancelled,

    // === Supervised entry points ===
    /// A supervised loop returned normally. Unexpected for infinite loops;
    /// still tears the runtime down.
    ///
    /// Sets: `task`.
    TaskStopped,

    /// A supervised loop observed cancellation and unwound cleanly.
    ///
    /// Sets: `task`.
    TaskCancelled,

    /// A supervised loop failed; the whole runtime is being torn down.
    ///
    /// Sets: `task`, `reason`.
    TaskFailed,

    // === Shutdown sequence ===
    /// A termination signal was received.
    ///
    /// Sets: `signal`.
    SignalReceived,

    /// Every tracked task reached a terminal state; the process may exit.
    ShutdownComplete,

    /// The grace window closed with work still in flight.
    GraceExceeded,
}

/// One runtime event with optional metadata.
///
/// Fields other than `seq`, `at`, and `kind` are set depending on the
/// [`EventKind`]; see the variant docs.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Message id, if the event concerns one message.
    pub message: Option<Arc<str>>,
    /// Supervised task name (publish/consume loop).
    pub task: Option<Arc<str>>,
    /// Sub-operation name (`persist`, `remediate`, `ack`).
    pub step: Option<Arc<str>>,
    /// Human-readable failure reason.
    pub reason: Option<Arc<str>>,
    /// Renewed deadline in milliseconds (compact).
    pub deadline_ms: Option<u32>,
    /// Received termination signal.
    pub signal: Option<SignalKind>,
}

impl Event {
    /// Creates an event of the given kind with the current timestamp and the
    /// next global sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            message: None,
            task: None,
            step: None,
            reason: None,
            deadline_ms: None,
            signal: None,
        }
    }

    /// Attaches a message id.
    #[inline]
    pub fn with_message(mut self, id: impl Into<Arc<str>>) -> Self {
        self.message = Some(id.into());
        self
    }

    /// Attaches a supervised task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a sub-operation name.
    #[inline]
    pub fn with_step(mut self, step: impl Into<Arc<str>>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the renewed deadline (stored as milliseconds).
    #[inline]
    pub fn with_deadline(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.deadline_ms = Some(ms);
        self
    }

    /// Attaches the received signal kind.
    #[inline]
    pub fn with_signal(mut self, signal: SignalKind) -> Self {
        self.signal = Some(signal);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::MessagePublished);
        let b = Event::new(EventKind::MessagePulled);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::new(EventKind::StepFailed)
            .with_message("m-1")
            .with_step("remediate")
            .with_reason("boom");
        assert_eq!(ev.message.as_deref(), Some("m-1"));
        assert_eq!(ev.step.as_deref(), Some("remediate"));
        assert_eq!(ev.reason.as_deref(), Some("boom"));
    }
}
