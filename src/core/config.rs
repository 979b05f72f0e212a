//! # Supervisor runtime configuration.
//!
//! [`SupervisorConfig`] centralizes the few knobs the supervision core has:
//! the shutdown grace period and the event bus capacity. The worker set
//! itself comes from configuration documents, not from this struct.

use std::time::Duration;

/// Settings for the supervision runtime.
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Maximum time to wait for workers to exit after a shutdown signal.
    ///
    /// When a termination signal is received:
    /// - every worker's token is cancelled,
    /// - the supervisor waits up to `grace` for the tasks to exit,
    /// - exceeding it returns `RuntimeError::GraceExceeded`.
    pub grace: Duration,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events
    /// observe `Lagged` and skip older items. Minimum 1 (clamped by the bus).
    pub bus_capacity: usize,
}

impl Default for SupervisorConfig {
    /// Default configuration:
    /// - `grace = 30s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(30),
            bus_capacity: 1024,
        }
    }
}
