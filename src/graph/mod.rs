//! Worker→module graph: descriptors, traits at the collaborator boundary,
//! discovery, and the loader that turns configuration into running workers.
//!
//! The graph is a forest: each module instance is built for exactly one
//! worker, and no module instance is shared across workers.

mod discovery;
mod loader;
mod module;
mod registry;
mod worker;

pub use discovery::discover_modules;
pub use loader::{GraphLoader, LoadedGraph, WorkerHandle};
pub use module::{Module, ModuleDescriptor, ModuleFactory, ModuleHandle, ModuleRef};
pub use registry::ModuleRegistry;
pub use worker::{Worker, WorkerDescriptor, WorkerFactory, WorkerFn, WorkerRef};
