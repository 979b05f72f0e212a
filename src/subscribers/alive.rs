//! # Worker liveness tracker with sequence-based ordering.
//!
//! Maintains authoritative state of which workers are currently alive, using
//! event sequence numbers to handle out-of-order delivery.
//!
//! ## Architecture
//! ```text
//! Supervisor ──► Bus ──► subscriber listener ──► AliveTracker::on_event()
//!                                                        │
//!                                                        ▼
//!                                             HashMap<String, WorkerState>
//!                                                 (name → {seq, alive})
//! ```
//!
//! ## Rules
//! - Only `WorkerStarting` / `WorkerStopped` / `WorkerFailed` change alive state.
//! - Read operations (`snapshot`, `is_alive`, `alive_count`) are eventually consistent.
//! - Events with `seq <= last_seq` for a worker are rejected (stale).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Per-worker state for ordering validation.
#[derive(Debug, Clone)]
struct WorkerState {
    /// Last seen sequence number for this worker.
    last_seq: u64,
    /// Current status (true = alive, false = stopped or failed).
    alive: bool,
}

/// Thread-safe tracker of alive workers.
///
/// ### Responsibilities
/// - Maintains authoritative state of which workers are alive.
/// - Provides snapshots for stuck-worker reporting during shutdown.
/// - Rejects stale events using sequence numbers.
pub struct AliveTracker {
    state: RwLock<HashMap<String, WorkerState>>,
}

impl AliveTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(HashMap::new()),
        }
    }

    /// Applies an event if it is newer than the last seen one for its worker.
    ///
    /// ### State transitions
    /// - `WorkerStarting` → alive = true
    /// - `WorkerStopped` / `WorkerFailed` → alive = false
    /// - Other events → no change
    ///
    /// Returns whether the alive state changed.
    fn update(&self, ev: &Event) -> bool {
        let name = match ev.worker.as_deref() {
            Some(n) => n,
            None => return false,
        };

        let mut state = match self.state.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let entry = state.entry(name.to_string()).or_insert(WorkerState {
            last_seq: 0,
            alive: false,
        });

        if ev.seq <= entry.last_seq {
            return false;
        }
        match ev.kind {
            EventKind::WorkerStarting => {
                entry.last_seq = ev.seq;
                entry.alive = true;
                true
            }
            EventKind::WorkerStopped | EventKind::WorkerFailed => {
                entry.last_seq = ev.seq;
                entry.alive = false;
                true
            }
            _ => {
                entry.last_seq = ev.seq;
                false
            }
        }
    }

    /// Returns a sorted list of currently alive worker names.
    ///
    /// Used by the supervisor to report stuck workers when the shutdown
    /// grace period is exceeded.
    pub fn snapshot(&self) -> Vec<String> {
        let state = match self.state.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut alive: Vec<String> = state
            .iter()
            .filter(|(_, ws)| ws.alive)
            .map(|(name, _)| name.clone())
            .collect();
        alive.sort_unstable();
        alive
    }

    /// Returns the number of currently alive workers.
    pub fn alive_count(&self) -> usize {
        let state = match self.state.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.values().filter(|ws| ws.alive).count()
    }

    /// Returns true if the named worker is currently alive.
    pub fn is_alive(&self, name: &str) -> bool {
        let state = match self.state.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.get(name).map(|ws| ws.alive).unwrap_or(false)
    }
}

impl Default for AliveTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Subscribe for AliveTracker {
    async fn on_event(&self, event: &Event) {
        self.update(event);
    }

    fn name(&self) -> &'static str {
        "alive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_then_stop() {
        let tracker = AliveTracker::new();
        tracker.update(&Event::new(EventKind::WorkerStarting).with_worker("w1"));
        assert!(tracker.is_alive("w1"));
        assert_eq!(tracker.alive_count(), 1);

        tracker.update(&Event::new(EventKind::WorkerStopped).with_worker("w1"));
        assert!(!tracker.is_alive("w1"));
        assert_eq!(tracker.alive_count(), 0);
    }

    #[test]
    fn test_stale_event_is_rejected() {
        let tracker = AliveTracker::new();
        let start = Event::new(EventKind::WorkerStarting).with_worker("w1");
        let stop = Event::new(EventKind::WorkerStopped).with_worker("w1");

        // Deliver out of order: the older start must not resurrect the worker.
        tracker.update(&stop);
        assert!(!tracker.update(&start));
        assert!(!tracker.is_alive("w1"));
    }

    #[test]
    fn test_failed_clears_alive() {
        let tracker = AliveTracker::new();
        tracker.update(&Event::new(EventKind::WorkerStarting).with_worker("w1"));
        tracker.update(
            &Event::new(EventKind::WorkerFailed)
                .with_worker("w1")
                .with_reason("boom"),
        );
        assert!(!tracker.is_alive("w1"));
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let tracker = AliveTracker::new();
        tracker.update(&Event::new(EventKind::WorkerStarting).with_worker("zulu"));
        tracker.update(&Event::new(EventKind::WorkerStarting).with_worker("alpha"));
        assert_eq!(tracker.snapshot(), vec!["alpha", "zulu"]);
    }
}
