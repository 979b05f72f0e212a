//! Runtime events and the broadcast bus they travel on.
//!
//! Workers and the supervisor publish [`Event`]s to the [`Bus`]; the
//! supervisor forwards them to the subscriber set for observability
//! (liveness tracking, logging).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
