//! # Tracing subscriber for runtime events.
//!
//! [`TraceWriter`] forwards runtime events to the `tracing` facade at
//! severity levels matching the event kind. Attach it when the embedding
//! application wants worker lifecycle visible in its logs.
//!
//! ## Output
//! ```text
//! INFO worker=freenode event=starting
//! INFO worker=freenode event=stopped
//! WARN worker=efnet event=failed reason="connection reset"
//! ```

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Forwards runtime events to `tracing`.
#[derive(Default)]
pub struct TraceWriter;

impl TraceWriter {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for TraceWriter {
    async fn on_event(&self, e: &Event) {
        let worker = e.worker.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::WorkerStarting => {
                info!(worker, event = "starting");
            }
            EventKind::WorkerStopped => {
                info!(worker, event = "stopped");
            }
            EventKind::WorkerFailed => {
                warn!(worker, event = "failed", reason = e.reason.as_deref());
            }
            EventKind::ShutdownRequested => {
                info!(event = "shutdown-requested");
            }
            EventKind::AllStoppedWithin => {
                info!(event = "all-stopped-within-grace");
            }
            EventKind::GraceExceeded => {
                error!(event = "grace-exceeded");
            }
            EventKind::SubscriberPanicked => {
                warn!(
                    subscriber = worker,
                    event = "subscriber-panicked",
                    reason = e.reason.as_deref()
                );
            }
            EventKind::SubscriberOverflow => {
                warn!(
                    subscriber = worker,
                    event = "subscriber-overflow",
                    reason = e.reason.as_deref()
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "trace"
    }
}
