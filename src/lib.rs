//! # arbor
//!
//! **Arbor** is the bootstrap-and-supervision core of a pluggable network-bot
//! framework.
//!
//! It turns an on-disk configuration tree into a running graph of connection
//! workers with behavior modules attached, then supervises those workers until
//! they exit or the process is asked to shut down. The wire protocol and the
//! module behaviors themselves are supplied by the embedding application; the
//! core only knows how to configure, construct, launch, and observe them.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                 config/global.yml    config/seasons/<season>/
//!                        │              (season.yml, database.yml,
//!                        │               workers.yml, modules.yml)
//!                        ▼                       │
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Bootstrap (phase-sequenced)                                  │
//! │  load_global ─► load_season ─► activate_subsystems            │
//! │      ─► init_logging ─► discover_daemons ─► load_extensions   │
//! │      ─► connect_persistence ─► load_graph                     │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                │ ConfigStore::freeze()
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  GraphLoader                                                  │
//! │  WorkerDescriptor ──► WorkerFactory ──► WorkerHandle          │
//! │  ModuleDescriptor ──► ModuleRegistry ──► ModuleHandle (per    │
//! │                                          worker, never shared)│
//! └──────────────────────────────┬────────────────────────────────┘
//!                                │ one tokio task per worker
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                   │
//! │  - joins worker tasks (no relaunch on failure)                │
//! │  - OS signal ─► cancel ─► grace window                        │
//! │  - Bus events ─► SubscriberSet ─► AliveTracker / TraceWriter  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Collaborator boundary
//! The embedding application implements two traits and registers factories:
//! - [`Worker`] / [`WorkerFactory`] — one network connection per worker;
//! - [`Module`] / [`ModuleFactory`] — pluggable behavior bound to one worker.
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                          |
//! |-------------------|------------------------------------------------------------------|---------------------------------------------|
//! | **Bootstrap**     | Dependency-ordered phases from documents to a running graph.    | [`Bootstrap`], [`PhaseSequencer`]           |
//! | **Configuration** | Scoped store with component → season → global fallback.         | [`ConfigStore`], [`ConfigSnapshot`]         |
//! | **Graph**         | Descriptors, factories, discovery, and the loader.              | [`GraphLoader`], [`WorkerDescriptor`]       |
//! | **Supervision**   | Join-based supervision with graceful signal shutdown.           | [`Supervisor`], [`SupervisorConfig`]        |
//! | **Subscriber API**| Hook into lifecycle events (liveness, logging, custom).         | [`Subscribe`], [`AliveTracker`]             |
//! | **Errors**        | Typed errors for bootstrap, runtime, and worker execution.      | [`BootError`], [`RuntimeError`]             |
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use arbor::{
//!     Bootstrap, BootError, ConfigSnapshot, ModuleHandle, SupervisorConfig,
//!     WorkerDescriptor, WorkerFactory, WorkerFn, WorkerRef,
//! };
//!
//! struct IrcFactory;
//!
//! impl WorkerFactory for IrcFactory {
//!     fn build(
//!         &self,
//!         descriptor: &WorkerDescriptor,
//!         _modules: Vec<ModuleHandle>,
//!         _config: Arc<ConfigSnapshot>,
//!     ) -> Result<WorkerRef, BootError> {
//!         let name = descriptor.name.clone();
//!         Ok(WorkerFn::arc(name, |_ctx| async {
//!             // connect and run the protocol loop...
//!             Ok(())
//!         }))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BootError> {
//!     let mut bootstrap = Bootstrap::new(".", Arc::new(IrcFactory))
//!         .with_config(SupervisorConfig::default());
//!     if !bootstrap.boot(true).await? {
//!         std::process::exit(1);
//!     }
//!     Ok(())
//! }
//! ```

mod bootstrap;
mod config;
mod core;
mod daemons;
mod error;
mod events;
mod graph;
pub mod ident;
mod subscribers;

// ---- Public re-exports ----

pub use bootstrap::{
    Bootstrap, ExtensionHook, PersistenceConnector, PhaseDescriptor, PhaseSequencer,
    SubsystemResolver, PHASES,
};
pub use config::{ConfigSnapshot, ConfigStore, Scope};
pub use core::{Supervisor, SupervisorConfig};
pub use daemons::{DaemonDescriptor, DaemonRegistry};
pub use error::{BootError, RuntimeError, WorkerError};
pub use events::{Bus, Event, EventKind};
pub use graph::{
    discover_modules, GraphLoader, LoadedGraph, Module, ModuleDescriptor, ModuleFactory,
    ModuleHandle, ModuleRef, ModuleRegistry, Worker, WorkerDescriptor, WorkerFactory, WorkerFn,
    WorkerHandle, WorkerRef,
};
pub use subscribers::{AliveTracker, Subscribe, SubscriberSet, TraceWriter};
