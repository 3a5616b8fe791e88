//! # Global runtime configuration.
//!
//! [`Config`] centralizes the knobs of the pipeline runtime. All fields are
//! public; helper accessors clamp sentinel values so the rest of the codebase
//! never has to.

use std::time::Duration;

/// Configuration for the conveyor runtime.
///
/// ## Field semantics
/// - `workers`: blocking worker-pool capacity (clamped to a minimum of 1)
/// - `publish_wait`: per-iteration bounded wait of the publish loop
/// - `extend_interval`: heartbeat period of the deadline extender; must stay
///   shorter than `deadline` or renewals arrive too late
/// - `deadline`: the externally imposed processing deadline being renewed
/// - `grace`: maximum wait for in-flight work to unwind at shutdown
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by the bus)
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the blocking worker pool shared by all bridge calls.
    pub workers: usize,

    /// How long each publish-loop iteration waits for its bridge call before
    /// re-checking cancellation.
    pub publish_wait: Duration,

    /// Sleep between deadline renewals while a message is being processed.
    pub extend_interval: Duration,

    /// Processing deadline renewed by each heartbeat.
    pub deadline: Duration,

    /// Maximum time to wait for all tasks to unwind after shutdown begins.
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,
}

impl Config {
    /// Worker pool capacity, clamped to a minimum of 1.
    #[inline]
    pub fn workers_clamped(&self) -> usize {
        self.workers.max(1)
    }

    /// Bus capacity, clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Defaults:
    ///
    /// - `workers = 5`
    /// - `publish_wait = 100ms`
    /// - `extend_interval = 2s` against a `deadline = 3s`
    /// - `grace = 30s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            workers: 5,
            publish_wait: Duration::from_millis(100),
            extend_interval: Duration::from_secs(2),
            deadline: Duration::from_secs(3),
            grace: Duration::from_secs(30),
            bus_capacity: 1024,
        }
    }
}
