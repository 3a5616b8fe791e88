//! # DeadlineExtender: heartbeat keeping a processing deadline alive.
//!
//! While a message is being processed, an external deadline (an ack deadline
//! on a real broker) must be renewed periodically or the message gets
//! redelivered. The extender publishes one renewal per interval until the
//! message's [`DoneLatch`] is set, then exits without further action.
//!
//! The latch is checked before each renewal, so one renewal may race with the
//! latch being set. Renewing past the final moment is idempotent and
//! harmless; failing to renew before it is not.

use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};
use crate::message::Message;

use super::latch::DoneLatch;

/// Heartbeat task bound to one in-flight message.
pub struct DeadlineExtender {
    msg: Message,
    done: DoneLatch,
    bus: Bus,
    interval: Duration,
    deadline: Duration,
}

impl DeadlineExtender {
    /// Creates an extender renewing `deadline` every `interval`.
    ///
    /// `interval` must be shorter than `deadline` for the renewal to land in
    /// time; [`Config`](crate::Config) defaults satisfy this.
    pub fn new(
        msg: Message,
        done: DoneLatch,
        bus: Bus,
        interval: Duration,
        deadline: Duration,
    ) -> Self {
        Self {
            msg,
            done,
            bus,
            interval,
            deadline,
        }
    }

    /// Renews the deadline until the latch is set or the task is cancelled.
    ///
    /// Never fails; both exits are clean.
    pub async fn run(self, ctx: CancellationToken) {
        while !self.done.is_set() {
            self.bus.publish(
                Event::new(EventKind::DeadlineExtended)
                    .with_message(self.msg.id().to_string())
                    .with_deadline(self.deadline),
            );

            tokio::select! {
                _ = ctx.cancelled() => return,
                _ = self.done.wait() => return,
                _ = time::sleep(self.interval) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extender(done: &DoneLatch, bus: &Bus) -> DeadlineExtender {
        DeadlineExtender::new(
            Message::random(),
            done.clone(),
            bus.clone(),
            Duration::from_secs(2),
            Duration::from_secs(3),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_renews_once_per_interval_while_unset() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let done = DoneLatch::new();

        let handle = tokio::spawn(extender(&done, &bus).run(CancellationToken::new()));

        // Three interval boundaries pass: renewal at t=0, t=2s, t=4s.
        tokio::time::sleep(Duration::from_millis(4100)).await;
        done.set();
        handle.await.unwrap();

        let mut renewals = 0;
        while let Ok(ev) = rx.try_recv() {
            assert_eq!(ev.kind, EventKind::DeadlineExtended);
            renewals += 1;
        }
        assert_eq!(renewals, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_renewal_after_latch_set() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let done = DoneLatch::new();

        let handle = tokio::spawn(extender(&done, &bus).run(CancellationToken::new()));
        tokio::time::sleep(Duration::from_millis(100)).await;

        done.set();
        handle.await.unwrap();

        let before_set = 1; // the initial renewal at t=0
        let mut renewals = 0;
        while rx.try_recv().is_ok() {
            renewals += 1;
        }
        assert_eq!(renewals, before_set);

        // Long after the latch was set nothing further shows up.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_the_heartbeat() {
        let bus = Bus::new(64);
        let done = DoneLatch::new();
        let token = CancellationToken::new();

        let handle = tokio::spawn(extender(&done, &bus).run(token.clone()));
        tokio::time::sleep(Duration::from_millis(100)).await;

        token.cancel();
        handle.await.unwrap();
        assert!(!done.is_set());
    }
}
