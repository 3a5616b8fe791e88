//! Runtime core: the pipeline orchestration layer.
//!
//! Internal modules:
//! - [`bridge`]: runs blocking calls on a bounded worker pool without
//!   stalling the cooperative scheduler;
//! - [`latch`]: one-way completion latch shared by a handler, its deadline
//!   extender, and its finalizer;
//! - [`extender`]: heartbeat task renewing a processing deadline;
//! - [`handler`]: fan-out/fan-in processing of one message with
//!   partial-failure tolerance;
//! - [`producer`] / [`consumer`]: the two supervised entry-point loops;
//! - [`shutdown`]: OS termination signal handling;
//! - [`supervisor`]: wires everything together and drains on shutdown.

mod bridge;
mod consumer;
mod extender;
mod handler;
mod latch;
mod producer;
mod shutdown;
mod supervisor;

pub use bridge::BlockingBridge;
pub use consumer::Consumer;
pub use extender::DeadlineExtender;
pub use handler::MessageHandler;
pub use latch::DoneLatch;
pub use producer::Producer;
pub use shutdown::{wait_for_shutdown_signal, SignalKind};
pub use supervisor::Supervisor;
