//! # Runtime events emitted by the supervisor and worker tasks.
//!
//! [`EventKind`] classifies events across three categories:
//! - **Worker lifecycle**: a connection worker starting, stopping, or failing.
//! - **Shutdown**: signal observed, all workers stopped, grace exceeded.
//! - **Subscriber faults**: a subscriber panicked or dropped an event.
//!
//! The [`Event`] struct carries metadata such as the timestamp, worker name
//! and failure reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Worker lifecycle events ===
    /// A worker's execution task is starting.
    ///
    /// Sets: `worker`, `at`, `seq`.
    WorkerStarting,

    /// A worker exited normally (connection closed or cancelled gracefully).
    ///
    /// Sets: `worker`, `at`, `seq`.
    WorkerStopped,

    /// A worker's execution task failed.
    ///
    /// Sets: `worker`, `reason`, `at`, `seq`.
    WorkerFailed,

    // === Shutdown events ===
    /// Shutdown requested (OS signal observed).
    ShutdownRequested,

    /// All workers stopped within the configured grace period.
    AllStoppedWithin,

    /// Grace period exceeded; some workers did not stop in time.
    GraceExceeded,

    // === Subscriber events ===
    /// A subscriber panicked during event processing.
    ///
    /// Sets: `worker` (the subscriber name), `reason`.
    SubscriberPanicked,

    /// A subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `worker` (the subscriber name), `reason`.
    SubscriberOverflow,
}

/// A single runtime event.
///
/// Created via [`Event::new`] and enriched with the builder-style `with_*`
/// methods.
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp at creation.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the worker (or subscriber) the event concerns, if any.
    pub worker: Option<Arc<str>>,
    /// Human-readable failure reason, if any.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            reason: None,
        }
    }

    /// Attaches a worker (or subscriber) name.
    #[inline]
    pub fn with_worker(mut self, worker: impl Into<Arc<str>>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_worker(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_worker(subscriber)
            .with_reason(info)
    }
}
