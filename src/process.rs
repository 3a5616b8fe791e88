//! # Processor: the sub-operations run for each message.
//!
//! [`Processor`] is the seam between the orchestration layer and whatever a
//! message actually means. The handler fans out [`persist`](Processor::persist)
//! and [`remediate`](Processor::remediate) concurrently, collects both
//! outcomes, and the finalizer calls
//! [`acknowledge`](Processor::acknowledge) once the completion latch is set.
//!
//! [`SimProcessor`] is the built-in implementation used by the demo and the
//! tests: simulated latency plus failure toggles for exercising the
//! partial-failure path.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time;

use crate::error::StepError;
use crate::message::Message;

/// Sub-operations required to fully process one message.
///
/// Each operation may fail independently; failures are recorded by the
/// handler and never abort the message.
#[async_trait]
pub trait Processor: Send + Sync + 'static {
    /// Persists the message (the "save to database" branch).
    async fn persist(&self, msg: &Message) -> Result<(), StepError>;

    /// Remediates the message's target (the "restart host" branch).
    async fn remediate(&self, msg: &Message) -> Result<(), StepError>;

    /// Acknowledges the message after all branches have resolved.
    async fn acknowledge(&self, msg: &Message) -> Result<(), StepError>;
}

/// How [`SimProcessor`] treats the remediation branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemediationMode {
    /// Remediation always succeeds.
    #[default]
    Reliable,
    /// Remediation always fails. Deterministic partial-failure testing.
    AlwaysFail,
    /// Remediation fails roughly half the time.
    Flaky,
}

/// Simulated processor with configurable latency and failure behavior.
pub struct SimProcessor {
    latency: Duration,
    remediation: RemediationMode,
}

impl SimProcessor {
    /// Creates a processor whose operations each take up to `latency`.
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            remediation: RemediationMode::default(),
        }
    }

    /// Sets the remediation failure mode.
    pub fn with_remediation(mut self, mode: RemediationMode) -> Self {
        self.remediation = mode;
        self
    }

    async fn simulate_io(&self) {
        let delay = {
            let mut rng = rand::thread_rng();
            self.latency.mul_f64(rng.gen_range(0.0..=1.0))
        };
        time::sleep(delay).await;
    }
}

#[async_trait]
impl Processor for SimProcessor {
    async fn persist(&self, _msg: &Message) -> Result<(), StepError> {
        self.simulate_io().await;
        Ok(())
    }

    async fn remediate(&self, msg: &Message) -> Result<(), StepError> {
        let fail = match self.remediation {
            RemediationMode::Reliable => false,
            RemediationMode::AlwaysFail => true,
            RemediationMode::Flaky => rand::thread_rng().gen_bool(0.5),
        };
        if fail {
            return Err(StepError::new(format!(
                "could not restart {}",
                msg.hostname()
            )));
        }
        self.simulate_io().await;
        Ok(())
    }

    async fn acknowledge(&self, _msg: &Message) -> Result<(), StepError> {
        self.simulate_io().await;
        Ok(())
    }
}
