//! Bootstrap: phases, subsystem resolution, and the top-level entry point.
//!
//! [`Bootstrap`] drives a fixed, dependency-ordered sequence of phases that
//! turns on-disk configuration into a running worker graph, then hands off
//! to the supervisor.

mod genesis;
mod phase;
mod resolver;

pub use genesis::{Bootstrap, ExtensionHook, PersistenceConnector};
pub use phase::{PhaseDescriptor, PhaseSequencer, PHASES};
pub use resolver::SubsystemResolver;
