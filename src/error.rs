//! Error types used by the arbor bootstrap core and workers.
//!
//! This module defines three error enums:
//!
//! - [`BootError`] — errors raised while bootstrapping (documents, phases, graph).
//! - [`RuntimeError`] — errors raised by the supervision runtime itself.
//! - [`WorkerError`] — errors raised by individual worker executions.
//!
//! All types provide `as_label` helpers for logging, and [`BootError`]
//! additionally reports whether it belongs to graph construction via
//! [`BootError::is_graph_failure`].

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// # Errors produced during bootstrap.
///
/// Every variant is bootstrap-fatal: it aborts the phase it occurred in and
/// every phase after it. Variants reported by graph construction are caught
/// once at the top-level boot boundary instead of propagating to the host
/// process; see [`BootError::is_graph_failure`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BootError {
    /// A required configuration document is absent.
    #[error("missing {what} document at {path}")]
    MissingDocument {
        /// Short description of the document (e.g. "global settings").
        what: &'static str,
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A required configuration key is absent in every scope of the fallback chain.
    #[error("missing required config key {key:?} (scope {scope})")]
    MissingKey {
        /// Scope the lookup started from.
        scope: String,
        /// The key that was required.
        key: String,
    },

    /// The worker-descriptor document is absent; there is nothing to run.
    #[error("missing worker config at {path}")]
    MissingWorkerConfig {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The active season has no directory under `config/seasons`.
    #[error("season {season:?} has no directory at {path}")]
    SeasonDirMissing {
        /// The season that was selected.
        season: String,
        /// The directory that was expected.
        path: PathBuf,
    },

    /// A phase ran before one of its declared dependencies completed.
    #[error("phase {phase:?} requires {missing:?}, which has not completed")]
    PhaseOrder {
        /// The phase that was about to run.
        phase: &'static str,
        /// The dependency that has not completed successfully.
        missing: &'static str,
    },

    /// A named subsystem could not be resolved or activated.
    #[error("subsystem {name:?} failed to activate: {reason}")]
    SubsystemActivation {
        /// The subsystem name.
        name: String,
        /// What went wrong.
        reason: String,
    },

    /// A module descriptor references an implementation with no registered factory.
    #[error("module {module:?} references unknown implementation {implementation:?}")]
    UnknownModule {
        /// Logical module name from the descriptor.
        module: String,
        /// Implementation name that was looked up in the registry.
        implementation: String,
    },

    /// Worker or module descriptors are malformed.
    #[error("graph construction failed: {reason}")]
    Graph {
        /// What went wrong.
        reason: String,
    },

    /// A document exists but could not be parsed.
    #[error("malformed document {path}: {source}")]
    Document {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_yaml::Error,
    },

    /// Filesystem access failed for a reason other than absence.
    #[error("io error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

impl BootError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            BootError::MissingDocument { .. } => "boot_missing_document",
            BootError::MissingKey { .. } => "boot_missing_key",
            BootError::MissingWorkerConfig { .. } => "boot_missing_worker_config",
            BootError::SeasonDirMissing { .. } => "boot_season_dir_missing",
            BootError::PhaseOrder { .. } => "boot_phase_order",
            BootError::SubsystemActivation { .. } => "boot_subsystem_activation",
            BootError::UnknownModule { .. } => "boot_unknown_module",
            BootError::Graph { .. } => "boot_graph",
            BootError::Document { .. } => "boot_malformed_document",
            BootError::Io { .. } => "boot_io",
        }
    }

    /// Returns true for errors raised by graph construction or launch.
    ///
    /// These are caught once at the outer boot boundary and logged instead of
    /// propagating out of [`Bootstrap::boot`](crate::Bootstrap::boot).
    pub fn is_graph_failure(&self) -> bool {
        matches!(
            self,
            BootError::MissingWorkerConfig { .. }
                | BootError::UnknownModule { .. }
                | BootError::Graph { .. }
        )
    }
}

/// # Errors produced by the supervision runtime.
///
/// These represent failures in the supervision machinery itself, not in the
/// workers it supervises.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some workers remained stuck.
    #[error("shutdown grace {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of workers that did not exit in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}

/// # Errors produced by worker execution.
///
/// The core observes these only for liveness accounting and logging; it does
/// not inspect or react to the cause. A failed worker is not relaunched.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkerError {
    /// The connection failed or the worker's protocol loop errored out.
    #[error("worker failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Non-recoverable worker error.
    #[error("fatal worker error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// The worker observed cancellation and exited cooperatively.
    #[error("context cancelled")]
    Canceled,
}

impl WorkerError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::Fail { .. } => "worker_failed",
            WorkerError::Fatal { .. } => "worker_fatal",
            WorkerError::Canceled => "worker_canceled",
        }
    }
}
