//! # Event subscribers for the arbor runtime.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling runtime events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   worker task ── publish(Event) ──► Bus ──► Supervisor listener ──► SubscriberSet
//!                                                                        │
//!                                                                 ┌──────┴──────┐
//!                                                                 ▼             ▼
//!                                                           AliveTracker   TraceWriter
//!                                                           (liveness)     (tracing)
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** observe and react to events (logging, metrics).
//! - **Stateful subscribers** maintain internal state based on events
//!   ([`AliveTracker`]).
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use arbor::{Subscribe, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct Metrics;
//!
//! #[async_trait]
//! impl Subscribe for Metrics {
//!     async fn on_event(&self, event: &Event) {
//!         if matches!(event.kind, EventKind::WorkerFailed) {
//!             // increment failure counter
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "metrics" }
//! }
//! ```

mod alive;
mod set;
mod subscriber;
mod trace;

pub use alive::AliveTracker;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
pub use trace::TraceWriter;
