//! Error types used by the conveyor runtime.
//!
//! Four layers, matching the failure-containment design:
//!
//! - [`StepError`] — a sub-operation of one message failed; recoverable at
//!   the handler level, recorded and processing continues.
//! - [`BridgeError`] — a worker raised while performing a blocking call;
//!   fatal to the loop that issued the call.
//! - [`TaskError`] — the outcome of a supervised entry point; cancellation
//!   is a distinct, non-error unwind path.
//! - [`RuntimeError`] — failures of the orchestration layer itself.

use std::time::Duration;
use thiserror::Error;

/// Errors produced by the runtime orchestration layer.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some messages never unwound.
    #[error("shutdown grace {grace:?} exceeded; in flight: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Ids of messages still in flight when the grace window closed.
        stuck: Vec<String>,
    },

    /// OS signal handler registration failed.
    #[error("signal registration failed: {0}")]
    Signal(#[from] std::io::Error),
}

/// Errors surfacing from a blocking bridge call.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The blocking function panicked on its worker.
    #[error("blocking call panicked: {detail}")]
    Panicked {
        /// Panic payload, stringified.
        detail: String,
    },

    /// The worker pool was closed while waiting for a slot.
    #[error("worker pool closed")]
    Closed,
}

/// Terminal outcome of a supervised entry point (publish/consume loop).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// The loop observed cancellation and unwound cleanly. Not a failure.
    #[error("cancelled")]
    Canceled,

    /// A bridge call failed underneath the loop.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in log lines.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Canceled => "task_canceled",
            TaskError::Bridge(_) => "bridge_failed",
        }
    }
}

/// A single sub-operation of one message failed.
///
/// Non-fatal: the handler records it and completes the message anyway.
#[derive(Error, Debug)]
#[error("{reason}")]
pub struct StepError {
    /// Human-readable failure description.
    pub reason: String,
}

impl StepError {
    /// Creates a step error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
