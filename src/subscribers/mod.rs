//! # Event subscribers: the diagnostic sinks of the runtime.
//!
//! ```text
//! loops / handlers ── publish(Event) ──► Bus ──► supervisor listener
//!                                                      │
//!                                              SubscriberSet::emit(&Event)
//!                                         ┌──────────┬──────────┐
//!                                         ▼          ▼          ▼
//!                                    [queue S1] [queue S2] [queue SN]
//!                                         │          │          │
//!                                    worker S1  worker S2  worker SN
//!                                         ▼          ▼          ▼
//!                                     on_event    on_event   on_event
//! ```
//!
//! Built-ins:
//! - [`LogWriter`] — one `log` line per event.
//! - [`InflightTracker`] — tracks messages pulled but not yet acked, used by
//!   the supervisor to name stuck work when the grace window closes.

mod inflight;
mod log;
mod set;
mod subscribe;

pub use inflight::InflightTracker;
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
