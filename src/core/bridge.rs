//! # BlockingBridge: cooperative access to a blocking resource.
//!
//! A blocking client call must never run on the cooperative scheduler. The
//! bridge hands it to tokio's blocking pool while a [`Semaphore`] of
//! `Config::workers` permits caps how many blocking calls run at once.
//!
//! ```text
//! caller (async) ── acquire permit ──► spawn_blocking(f) ──► await join
//!       │                │                                       │
//!       suspends    queues when the                     suspends until the
//!                   pool is saturated                   worker finishes
//! ```
//!
//! Pool exhaustion is not an error: callers queue on the semaphore. A panic
//! inside the blocking function surfaces to the caller as
//! [`BridgeError::Panicked`].

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task;

use crate::error::BridgeError;

/// Fixed-capacity worker pool bridging blocking calls into the cooperative
/// domain.
///
/// Cheap to clone; all clones share the same permits.
#[derive(Clone)]
pub struct BlockingBridge {
    pool: Arc<Semaphore>,
}

impl BlockingBridge {
    /// Creates a bridge with the given worker capacity (clamped to 1).
    pub fn new(workers: usize) -> Self {
        Self {
            pool: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Runs `f` on a blocking worker and suspends the caller until it
    /// completes.
    ///
    /// Holds one worker slot for the duration of the call. The returned
    /// future is safe to race against a timer: if the caller stops polling,
    /// the blocking call still runs to completion on its worker and the slot
    /// is released when it does.
    pub async fn run<F, T>(&self, f: F) -> Result<T, BridgeError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .pool
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| BridgeError::Closed)?;

        let handle = task::spawn_blocking(move || {
            let out = f();
            drop(permit);
            out
        });

        handle.await.map_err(|join_err| {
            if join_err.is_panic() {
                BridgeError::Panicked {
                    detail: format!("{join_err}"),
                }
            } else {
                BridgeError::Closed
            }
        })
    }
}
