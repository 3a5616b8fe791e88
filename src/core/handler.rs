//! # MessageHandler: fully processes one message.
//!
//! One handler owns one message for its whole lifetime. It fans out the two
//! independent sub-operations, collects both outcomes regardless of
//! individual failure, and only then sets the completion latch that releases
//! the deadline extender and the finalizer.
//!
//! ```text
//! handle(msg)
//!   ├─ spawn DeadlineExtender(latch)      renews until latch set
//!   ├─ spawn finalizer(latch)             waits, acks, logs completion
//!   ├─ join!(persist, remediate)          both outcomes always collected
//!   ├─ report each outcome                StepCompleted / StepFailed
//!   └─ latch.set()                        exactly once, after the join
//! ```
//!
//! A failed sub-operation is recorded and does not stop the message: the
//! latch is still set, the ack still happens. Cancellation at the join is a
//! clean unwind: the latch stays unset and the spawned subtasks exit through
//! their own child tokens.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::error::StepError;
use crate::events::{Bus, Event, EventKind};
use crate::message::Message;
use crate::process::Processor;

use super::extender::DeadlineExtender;
use super::latch::DoneLatch;

/// Orchestrates the sub-operations and lifecycle tasks for one message.
pub struct MessageHandler {
    msg: Message,
    bus: Bus,
    processor: Arc<dyn Processor>,
    tracker: TaskTracker,
    extend_interval: Duration,
    deadline: Duration,
}

impl MessageHandler {
    /// Creates a handler owning `msg`.
    ///
    /// `tracker` is the shared task registry; the extender and finalizer are
    /// spawned on it so shutdown can wait for them.
    pub fn new(
        msg: Message,
        bus: Bus,
        processor: Arc<dyn Processor>,
        tracker: TaskTracker,
        extend_interval: Duration,
        deadline: Duration,
    ) -> Self {
        Self {
            msg,
            bus,
            processor,
            tracker,
            extend_interval,
            deadline,
        }
    }

    /// Processes the message to completion or cancellation.
    pub async fn run(self, ctx: CancellationToken) {
        let done = DoneLatch::new();

        let extender = DeadlineExtender::new(
            self.msg.clone(),
            done.clone(),
            self.bus.clone(),
            self.extend_interval,
            self.deadline,
        );
        self.tracker.spawn(extender.run(ctx.child_token()));
        self.tracker.spawn(Self::finalize(
            self.msg.clone(),
            done.clone(),
            self.bus.clone(),
            Arc::clone(&self.processor),
            ctx.child_token(),
        ));

        let outcomes = tokio::select! {
            _ = ctx.cancelled() => {
                self.bus.publish(
                    Event::new(EventKind::HandlerCancelled)
                        .with_message(self.msg.id().to_string()),
                );
                return;
            }
            outcomes = async {
                tokio::join!(
                    self.processor.persist(&self.msg),
                    self.processor.remediate(&self.msg),
                )
            } => outcomes,
        };

        let (persisted, remediated) = outcomes;
        self.report_step("persist", persisted);
        self.report_step("remediate", remediated);

        // Strictly after both outcomes are in; releases extender + finalizer.
        done.set();
    }

    /// Records one sub-operation outcome. Failures are non-fatal.
    fn report_step(&self, step: &'static str, outcome: Result<(), StepError>) {
        let id = self.msg.id().to_string();
        match outcome {
            Ok(()) => self.bus.publish(
                Event::new(EventKind::StepCompleted)
                    .with_message(id)
                    .with_step(step),
            ),
            Err(err) => self.bus.publish(
                Event::new(EventKind::StepFailed)
                    .with_message(id)
                    .with_step(step)
                    .with_reason(err.reason),
            ),
        }
    }

    /// Waits for the latch, then acknowledges the message.
    ///
    /// An ack failure is recorded like any other step failure. Cancellation
    /// before the latch is set exits quietly; the handler already reported
    /// the message as cancelled.
    async fn finalize(
        msg: Message,
        done: DoneLatch,
        bus: Bus,
        processor: Arc<dyn Processor>,
        ctx: CancellationToken,
    ) {
        tokio::select! {
            _ = ctx.cancelled() => return,
            _ = done.wait() => {}
        }

        let id = msg.id().to_string();
        match processor.acknowledge(&msg).await {
            Ok(()) => bus.publish(Event::new(EventKind::MessageAcked).with_message(id)),
            Err(err) => bus.publish(
                Event::new(EventKind::StepFailed)
                    .with_message(id)
                    .with_step("ack")
                    .with_reason(err.reason),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{RemediationMode, SimProcessor};

    fn handler(processor: SimProcessor, bus: &Bus, tracker: &TaskTracker) -> (MessageHandler, Message) {
        let msg = Message::random();
        let h = MessageHandler::new(
            msg.clone(),
            bus.clone(),
            Arc::new(processor),
            tracker.clone(),
            Duration::from_secs(2),
            Duration::from_secs(3),
        );
        (h, msg)
    }

    async fn drain(tracker: &TaskTracker) {
        tracker.close();
        tracker.wait().await;
    }

    #[tokio::test]
    async fn test_happy_path_completes_and_acks() {
        let bus = Bus::new(128);
        let mut rx = bus.subscribe();
        let tracker = TaskTracker::new();

        let (h, msg) = handler(SimProcessor::new(Duration::ZERO), &bus, &tracker);
        h.run(CancellationToken::new()).await;
        drain(&tracker).await;

        let mut steps_ok = 0;
        let mut acked = false;
        while let Ok(ev) = rx.try_recv() {
            match ev.kind {
                EventKind::StepCompleted => steps_ok += 1,
                EventKind::MessageAcked => {
                    acked = true;
                    assert_eq!(ev.message.as_deref(), Some(msg.id().to_string().as_str()));
                }
                EventKind::StepFailed => panic!("unexpected step failure"),
                _ => {}
            }
        }
        assert_eq!(steps_ok, 2);
        assert!(acked);
    }

    #[tokio::test]
    async fn test_partial_failure_still_acks() {
        let bus = Bus::new(128);
        let mut rx = bus.subscribe();
        let tracker = TaskTracker::new();

        let (h, _msg) = handler(
            SimProcessor::new(Duration::ZERO).with_remediation(RemediationMode::AlwaysFail),
            &bus,
            &tracker,
        );
        h.run(CancellationToken::new()).await;
        drain(&tracker).await;

        let mut persist_ok = false;
        let mut remediate_failed = false;
        let mut ack_seq = None;
        let mut fail_seq = None;
        while let Ok(ev) = rx.try_recv() {
            match ev.kind {
                EventKind::StepCompleted if ev.step.as_deref() == Some("persist") => {
                    persist_ok = true;
                }
                EventKind::StepFailed if ev.step.as_deref() == Some("remediate") => {
                    remediate_failed = true;
                    fail_seq = Some(ev.seq);
                }
                EventKind::MessageAcked => ack_seq = Some(ev.seq),
                _ => {}
            }
        }
        assert!(persist_ok);
        assert!(remediate_failed, "remediation failure must be recorded");
        let (fail_seq, ack_seq) = (fail_seq.unwrap(), ack_seq.unwrap());
        assert!(
            ack_seq > fail_seq,
            "ack happens after the failure was recorded"
        );
    }

    #[tokio::test]
    async fn test_ack_comes_after_both_outcomes() {
        let bus = Bus::new(128);
        let mut rx = bus.subscribe();
        let tracker = TaskTracker::new();

        let (h, _msg) = handler(
            SimProcessor::new(Duration::from_millis(20)),
            &bus,
            &tracker,
        );
        h.run(CancellationToken::new()).await;
        drain(&tracker).await;

        let mut last_step_seq = 0;
        let mut ack_seq = None;
        while let Ok(ev) = rx.try_recv() {
            match ev.kind {
                EventKind::StepCompleted | EventKind::StepFailed => {
                    last_step_seq = last_step_seq.max(ev.seq);
                }
                EventKind::MessageAcked => ack_seq = Some(ev.seq),
                _ => {}
            }
        }
        assert!(ack_seq.unwrap() > last_step_seq);
    }

    /// Processor whose branches never resolve; only cancellation can win.
    struct StuckProcessor;

    #[async_trait::async_trait]
    impl crate::process::Processor for StuckProcessor {
        async fn persist(&self, _msg: &Message) -> Result<(), StepError> {
            futures::future::pending().await
        }

        async fn remediate(&self, _msg: &Message) -> Result<(), StepError> {
            futures::future::pending().await
        }

        async fn acknowledge(&self, _msg: &Message) -> Result<(), StepError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cancellation_skips_ack_and_reports() {
        let bus = Bus::new(128);
        let mut rx = bus.subscribe();
        let tracker = TaskTracker::new();
        let token = CancellationToken::new();

        let msg = Message::random();
        let h = MessageHandler::new(
            msg.clone(),
            bus.clone(),
            Arc::new(StuckProcessor),
            tracker.clone(),
            Duration::from_secs(2),
            Duration::from_secs(3),
        );
        let run = tokio::spawn(h.run(token.clone()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
        run.await.unwrap();
        drain(&tracker).await;

        let mut cancelled = false;
        while let Ok(ev) = rx.try_recv() {
            match ev.kind {
                EventKind::HandlerCancelled => {
                    cancelled = true;
                    assert_eq!(ev.message.as_deref(), Some(msg.id().to_string().as_str()));
                }
                EventKind::MessageAcked => panic!("cancelled message must not be acked"),
                _ => {}
            }
        }
        assert!(cancelled);
    }
}
