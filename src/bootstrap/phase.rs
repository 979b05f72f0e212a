//! # Bootstrap phases and their sequencer.
//!
//! Each phase declares its prerequisites as data, so the whole sequence is
//! auditable in one place ([`PHASES`]) instead of being hidden in call order.
//! The [`PhaseSequencer`] refuses to run a phase whose dependencies have not
//! completed and records completion order for inspection.
//!
//! ## Rules
//! - Phases run strictly sequentially; phase *i* completes before *i+1* starts.
//! - A phase error aborts the sequence; there is no partial-success continuation.
//! - The phase table is fixed at compile time, not user-configurable.

use crate::error::BootError;

/// One bootstrap step: a unique name plus the phases it depends on.
#[derive(Debug, Clone, Copy)]
pub struct PhaseDescriptor {
    /// Unique phase name.
    pub name: &'static str,
    /// Names of phases that must have completed before this one runs.
    pub deps: &'static [&'static str],
}

/// Loads the global settings document.
pub const LOAD_GLOBAL: PhaseDescriptor = PhaseDescriptor {
    name: "load_global",
    deps: &[],
};

/// Loads the active season's settings document.
pub const LOAD_SEASON: PhaseDescriptor = PhaseDescriptor {
    name: "load_season",
    deps: &["load_global"],
};

/// Activates named subsystems in their declared order.
pub const ACTIVATE_SUBSYSTEMS: PhaseDescriptor = PhaseDescriptor {
    name: "activate_subsystems",
    deps: &["load_global"],
};

/// Initializes structured logging.
pub const INIT_LOGGING: PhaseDescriptor = PhaseDescriptor {
    name: "init_logging",
    deps: &["activate_subsystems"],
};

/// Discovers daemon descriptors.
pub const DISCOVER_DAEMONS: PhaseDescriptor = PhaseDescriptor {
    name: "discover_daemons",
    deps: &["activate_subsystems"],
};

/// Runs registered extension hooks.
pub const LOAD_EXTENSIONS: PhaseDescriptor = PhaseDescriptor {
    name: "load_extensions",
    deps: &["load_global"],
};

/// Establishes persistence connections.
pub const CONNECT_PERSISTENCE: PhaseDescriptor = PhaseDescriptor {
    name: "connect_persistence",
    deps: &["load_season"],
};

/// Constructs and launches the worker graph.
pub const LOAD_GRAPH: PhaseDescriptor = PhaseDescriptor {
    name: "load_graph",
    deps: &[
        "connect_persistence",
        "load_season",
        "activate_subsystems",
        "init_logging",
    ],
};

/// The full bootstrap sequence, in execution order.
pub const PHASES: &[PhaseDescriptor] = &[
    LOAD_GLOBAL,
    LOAD_SEASON,
    ACTIVATE_SUBSYSTEMS,
    INIT_LOGGING,
    DISCOVER_DAEMONS,
    LOAD_EXTENSIONS,
    CONNECT_PERSISTENCE,
    LOAD_GRAPH,
];

/// Runs phases in order, enforcing declared dependencies.
#[derive(Debug, Default)]
pub struct PhaseSequencer {
    completed: Vec<&'static str>,
}

impl PhaseSequencer {
    /// Creates a sequencer with no completed phases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that every dependency of `phase` has completed.
    pub fn ready(&self, phase: &PhaseDescriptor) -> Result<(), BootError> {
        for dep in phase.deps {
            if !self.completed.contains(dep) {
                return Err(BootError::PhaseOrder {
                    phase: phase.name,
                    missing: dep,
                });
            }
        }
        Ok(())
    }

    /// Marks a phase as successfully completed.
    pub fn mark_complete(&mut self, phase: &PhaseDescriptor) {
        if !self.completed.contains(&phase.name) {
            self.completed.push(phase.name);
        }
    }

    /// Runs a phase thunk after checking its dependencies.
    ///
    /// The phase is recorded as completed only if the thunk returns `Ok`.
    pub fn run<F>(&mut self, phase: &PhaseDescriptor, thunk: F) -> Result<(), BootError>
    where
        F: FnOnce() -> Result<(), BootError>,
    {
        self.ready(phase)?;
        thunk()?;
        self.mark_complete(phase);
        Ok(())
    }

    /// Returns completed phase names in completion order.
    pub fn completed(&self) -> &[&'static str] {
        &self.completed
    }
}
