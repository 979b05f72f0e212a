//! Supervision core.
//!
//! Internal modules:
//! - [`supervisor`]: joins launched worker tasks, fans out events, handles
//!   graceful shutdown;
//! - [`shutdown`]: cross-platform termination-signal handling;
//! - [`config`]: supervisor runtime settings.

mod config;
mod shutdown;
mod supervisor;

pub use config::SupervisorConfig;
pub use supervisor::Supervisor;
