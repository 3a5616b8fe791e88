//! # Logging subscriber.
//!
//! [`LogWriter`] emits one line per runtime event through the `log` facade.
//!
//! ## Output format
//! ```text
//! [published] msg=4f1c…
//! [pulled] msg=4f1c…
//! [step-ok] msg=4f1c… step=persist
//! [step-failed] msg=4f1c… step=remediate err="could not restart host-ab12.example.net"
//! [extended] msg=4f1c… deadline=3000ms
//! [acked] msg=4f1c…
//! [signal] kind=SIGINT
//! [cancelled] task=consumer
//! [shutdown-complete]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Subscriber that writes every event as a structured `log` line.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Creates a new log writer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let msg = e.message.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::MessagePublished => log::debug!("[published] msg={msg}"),
            EventKind::MessagePulled => log::info!("[pulled] msg={msg}"),
            EventKind::StepCompleted => {
                log::info!("[step-ok] msg={msg} step={}", e.step.as_deref().unwrap_or("-"));
            }
            EventKind::StepFailed => {
                log::error!(
                    "[step-failed] msg={msg} step={} err={:?}",
                    e.step.as_deref().unwrap_or("-"),
                    e.reason.as_deref().unwrap_or("-"),
                );
            }
            EventKind::DeadlineExtended => {
                log::info!(
                    "[extended] msg={msg} deadline={}ms",
                    e.deadline_ms.unwrap_or(0),
                );
            }
            EventKind::MessageAcked => log::info!("[acked] msg={msg}"),
            EventKind::HandlerCancelled => log::info!("[handler-cancelled] msg={msg}"),
            EventKind::TaskStopped => {
                log::warn!("[stopped] task={}", e.task.as_deref().unwrap_or("-"));
            }
            EventKind::TaskCancelled => {
                log::info!("[cancelled] task={}", e.task.as_deref().unwrap_or("-"));
            }
            EventKind::TaskFailed => {
                log::error!(
                    "[failed] task={} err={:?}",
                    e.task.as_deref().unwrap_or("-"),
                    e.reason.as_deref().unwrap_or("-"),
                );
            }
            EventKind::SignalReceived => {
                if let Some(signal) = e.signal {
                    log::info!("[signal] kind={signal}");
                }
            }
            EventKind::ShutdownComplete => log::info!("[shutdown-complete]"),
            EventKind::GraceExceeded => log::error!("[grace-exceeded]"),
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
