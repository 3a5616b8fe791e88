//! # conveyor
//!
//! **Conveyor** is a small concurrent message-processing runtime for Rust.
//!
//! It bridges a blocking, non-cooperative message queue into the tokio
//! scheduler, processes each message with partial-failure tolerance while a
//! heartbeat keeps its processing deadline alive, and shuts down gracefully:
//! on a termination signal every in-flight task is cancelled and awaited
//! before the process exits.
//!
//! ## Architecture
//! ```text
//!            ┌────────────────────────────────────────────────────────┐
//!            │  Supervisor                                            │
//!            │  - Bus (broadcast events) ─► SubscriberSet (fan-out)   │
//!            │  - TaskTracker (registry of every spawned task)        │
//!            │  - CancellationToken (runtime-wide, child per task)    │
//!            └──────┬──────────────────────────────┬──────────────────┘
//!                   ▼                              ▼
//!            ┌──────────────┐               ┌──────────────┐
//!            │   Producer   │               │   Consumer   │
//!            │ (publish     │               │ (consume     │
//!            │  loop)       │               │  loop)       │
//!            └──────┬───────┘               └──────┬───────┘
//!                   │ BlockingBridge (pool of 5)   │
//!                   ▼                              ▼
//!            put(msg) ───► BridgeQueue ───► try_get() ─► spawn per message:
//!                      (blocking FIFO)
//!                                          ┌─────────────────────────────┐
//!                                          │ MessageHandler              │
//!                                          │  ├─ join!(persist,remediate)│
//!                                          │  ├─ DeadlineExtender ◄─┐    │
//!                                          │  └─ finalizer (ack) ◄──┤    │
//!                                          │          DoneLatch ────┘    │
//!                                          └─────────────────────────────┘
//! ```
//!
//! ## Failure containment
//! | Failure                        | Contained at | Effect                                   |
//! |--------------------------------|--------------|------------------------------------------|
//! | sub-operation (`StepError`)    | handler      | recorded, message still completed/acked  |
//! | bridge call (`BridgeError`)    | loop         | loop fails, runtime tears down           |
//! | cancellation                   | everywhere   | clean unwind, never logged as an error   |
//! | entry point (`TaskError`)      | supervisor   | logged with context, full teardown       |
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use conveyor::{
//!     BridgeQueue, Config, LogWriter, SimProcessor, Subscribe, Supervisor,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default();
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let sup = Supervisor::new(cfg, subs);
//!
//!     let queue = Arc::new(BridgeQueue::new());
//!     let processor = Arc::new(SimProcessor::new(Duration::from_millis(500)));
//!
//!     // Runs until SIGHUP/SIGTERM/SIGINT, then drains in-flight work.
//!     sup.run(queue, processor).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod message;
mod process;
mod queue;

pub mod events;
pub mod subscribers;

pub use config::Config;
pub use core::{
    wait_for_shutdown_signal, BlockingBridge, Consumer, DeadlineExtender, DoneLatch,
    MessageHandler, Producer, SignalKind, Supervisor,
};
pub use error::{BridgeError, RuntimeError, StepError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use message::Message;
pub use process::{Processor, RemediationMode, SimProcessor};
pub use queue::{BridgeQueue, MessageQueue};
pub use subscribers::{InflightTracker, LogWriter, Subscribe, SubscriberSet};
