//! # Supervisor: wires the pipeline together and drains it on shutdown.
//!
//! The [`Supervisor`] owns the event bus, the subscriber fan-out, the shared
//! task tracker, and the runtime cancellation token. It spawns the two
//! supervised entry points (publish loop, consume loop), waits for a
//! termination signal, and drains every outstanding task before returning.
//!
//! ## High-level flow
//! ```text
//! run(queue, processor):
//!   - subscriber_listener(): Bus ─► SubscriberSet::emit   (fire-and-forget)
//!   - spawn_supervised("producer", Producer::run)
//!   - spawn_supervised("consumer", Consumer::run)
//!   - wait: OS signal ─► request_shutdown(kind)
//!           or runtime token cancelled (a loop failed and tore us down)
//!   - drain(): tracker.close() ─► wait all, bounded by Config::grace
//!        ├─ all unwound  ─► ShutdownComplete, Ok(())
//!        └─ grace closed ─► GraceExceeded + in-flight snapshot, Err
//! ```
//!
//! ## Supervision contract
//! Every entry point runs inside [`spawn_supervised`](Supervisor): normal
//! return and cancellation are logged as such, any other failure is logged
//! with its reason, and in all three outcomes the runtime token is cancelled
//! afterwards. One loop failing can therefore never leave its sibling
//! running headless.

use std::future::Future;
use std::sync::Arc;

use tokio::time;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::Config;
use crate::error::{RuntimeError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::process::Processor;
use crate::queue::MessageQueue;
use crate::subscribers::{InflightTracker, Subscribe, SubscriberSet};

use super::bridge::BlockingBridge;
use super::consumer::Consumer;
use super::producer::Producer;
use super::shutdown::{wait_for_shutdown_signal, SignalKind};

/// Coordinates the pipeline loops, event delivery, and graceful shutdown.
pub struct Supervisor {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    inflight: Arc<InflightTracker>,
    tracker: TaskTracker,
    token: CancellationToken,
}

impl Supervisor {
    /// Creates a supervisor with the given config and diagnostic subscribers.
    ///
    /// An [`InflightTracker`] is always installed alongside the provided
    /// subscribers; the shutdown path uses it to name stuck messages.
    /// Must be called within a tokio runtime (subscriber workers are spawned
    /// here).
    pub fn new(cfg: Config, mut subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let inflight = Arc::new(InflightTracker::new());
        subscribers.push(inflight.clone());

        Self {
            cfg,
            bus,
            subs: Arc::new(SubscriberSet::new(subscribers)),
            inflight,
            tracker: TaskTracker::new(),
            token: CancellationToken::new(),
        }
    }

    /// The event bus. Subscribe here for programmatic observation.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Runs the pipeline until a termination signal arrives or an entry
    /// point fails, then drains all outstanding work.
    pub async fn run(
        &self,
        queue: Arc<dyn MessageQueue>,
        processor: Arc<dyn Processor>,
    ) -> Result<(), RuntimeError> {
        self.subscriber_listener();

        let bridge = BlockingBridge::new(self.cfg.workers_clamped());

        let producer = Producer::new(
            Arc::clone(&queue),
            bridge.clone(),
            self.bus.clone(),
            self.cfg.publish_wait,
        );
        self.spawn_supervised("producer", producer.run(self.token.child_token()));

        let consumer = Consumer::new(
            queue,
            bridge,
            self.bus.clone(),
            processor,
            self.tracker.clone(),
            self.cfg.extend_interval,
            self.cfg.deadline,
        );
        self.spawn_supervised("consumer", consumer.run(self.token.child_token()));

        let signal = tokio::select! {
            res = wait_for_shutdown_signal() => Some(res),
            _ = self.token.cancelled() => None,
        };
        match signal {
            Some(Ok(kind)) => self.request_shutdown(kind),
            Some(Err(err)) => {
                self.token.cancel();
                let _ = self.drain().await;
                return Err(RuntimeError::Signal(err));
            }
            None => {}
        }

        self.drain().await
    }

    /// Records the received signal and cancels every outstanding task.
    ///
    /// Safe to call from outside `run` (tests, embedding hosts); `run` picks
    /// the cancellation up and drains.
    pub fn request_shutdown(&self, kind: SignalKind) {
        self.bus
            .publish(Event::new(EventKind::SignalReceived).with_signal(kind));
        self.token.cancel();
    }

    /// Forwards bus traffic to the subscriber set (fire-and-forget).
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let subs = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                subs.emit(&ev);
            }
        });
    }

    /// Spawns an entry point with uniform failure handling.
    fn spawn_supervised<F>(&self, name: &'static str, fut: F)
    where
        F: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let bus = self.bus.clone();
        let token = self.token.clone();
        self.tracker.spawn(async move {
            match fut.await {
                Ok(()) => {
                    bus.publish(Event::new(EventKind::TaskStopped).with_task(name));
                }
                Err(TaskError::Canceled) => {
                    bus.publish(Event::new(EventKind::TaskCancelled).with_task(name));
                }
                Err(err) => {
                    bus.publish(
                        Event::new(EventKind::TaskFailed)
                            .with_task(name)
                            .with_reason(err.to_string()),
                    );
                }
            }
            // An entry point leaving for any reason takes the runtime down.
            token.cancel();
        });
    }

    /// Waits for every tracked task to reach a terminal state.
    async fn drain(&self) -> Result<(), RuntimeError> {
        self.tracker.close();

        match time::timeout(self.cfg.grace, self.tracker.wait()).await {
            Ok(()) => {
                self.bus.publish(Event::new(EventKind::ShutdownComplete));
                Ok(())
            }
            Err(_elapsed) => {
                self.bus.publish(Event::new(EventKind::GraceExceeded));
                Err(RuntimeError::GraceExceeded {
                    grace: self.cfg.grace,
                    stuck: self.inflight.snapshot(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use std::time::Duration;

    #[tokio::test]
    async fn test_supervised_failure_cancels_the_runtime() {
        let sup = Supervisor::new(Config::default(), Vec::new());
        let mut rx = sup.bus().subscribe();

        sup.spawn_supervised("broken", async {
            Err(TaskError::Bridge(BridgeError::Panicked {
                detail: "boom".into(),
            }))
        });

        sup.token.cancelled().await;

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::TaskFailed);
        assert_eq!(ev.task.as_deref(), Some("broken"));
        assert!(ev.reason.as_deref().unwrap_or("").contains("boom"));
    }

    #[tokio::test]
    async fn test_supervised_cancellation_is_not_a_failure() {
        let sup = Supervisor::new(Config::default(), Vec::new());
        let mut rx = sup.bus().subscribe();

        sup.spawn_supervised("quitting", async { Err(TaskError::Canceled) });

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::TaskCancelled);
    }

    #[tokio::test]
    async fn test_drain_completes_when_nothing_is_running() {
        let sup = Supervisor::new(
            Config {
                grace: Duration::from_secs(1),
                ..Config::default()
            },
            Vec::new(),
        );
        let mut rx = sup.bus().subscribe();

        sup.drain().await.unwrap();

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ShutdownComplete);
    }

    #[tokio::test]
    async fn test_grace_exceeded_reports_stuck_work() {
        let sup = Supervisor::new(
            Config {
                grace: Duration::from_millis(50),
                ..Config::default()
            },
            Vec::new(),
        );

        sup.tracker.spawn(futures::future::pending::<()>());

        let err = sup.drain().await.unwrap_err();
        assert!(matches!(err, RuntimeError::GraceExceeded { .. }));
    }
}
