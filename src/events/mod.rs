//! Runtime events: data model and broadcast bus.
//!
//! Every observable fact of the pipeline (message produced, pulled, step
//! completed or failed, deadline renewed, message acked, signal received,
//! task cancelled, shutdown complete) is published as an [`Event`] on the
//! [`Bus`]. The supervisor forwards bus traffic to the
//! [`SubscriberSet`](crate::subscribers::SubscriberSet), which fans it out to
//! diagnostic sinks.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
