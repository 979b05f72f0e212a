//! # Graph loader: turns descriptors into a launched worker graph.
//!
//! The loader is the central orchestrator of bootstrap's final phase. It
//! validates the worker-descriptor document, synthesizes module descriptors
//! by directory discovery when the module document is absent, builds one
//! [`WorkerHandle`] per worker descriptor with its bound modules, and — when
//! asked to start — launches exactly one tokio task per worker.
//!
//! ## Architecture
//! ```text
//! WorkerDescriptor[0..N]   ModuleDescriptor[0..M]
//!        │                        │
//!        │      ModuleRegistry (name → factory)
//!        │                        │
//!        └──► build: WorkerHandle ◄─ ModuleHandle per applicable module
//!                    │
//!          should_start == true?
//!                    │
//!                    └──► JoinSet::spawn(worker.run(child_token))
//!                              │ publishes WorkerStarting / Stopped / Failed
//!                              ▼
//!                             Bus
//! ```
//!
//! ## Rules
//! - Absent worker document → [`BootError::MissingWorkerConfig`]; nothing is built.
//! - Absent module document → directory discovery (deterministic, sorted).
//! - The graph is a forest: modules are instantiated per worker, never shared.
//! - `should_start == false` builds everything and starts nothing (dry run).
//! - `load` returns immediately after launch; joining is the supervisor's job.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::ConfigSnapshot;
use crate::error::{BootError, WorkerError};
use crate::events::{Bus, Event, EventKind};

use super::discovery::discover_modules;
use super::module::{ModuleDescriptor, ModuleHandle};
use super::registry::ModuleRegistry;
use super::worker::{WorkerDescriptor, WorkerFactory, WorkerRef};

/// One constructed worker with its bound modules.
pub struct WorkerHandle {
    /// The descriptor the worker was built from.
    pub descriptor: WorkerDescriptor,
    /// The worker instance.
    pub worker: WorkerRef,
    /// Modules bound to this worker, in descriptor order.
    pub modules: Vec<ModuleHandle>,
}

impl WorkerHandle {
    /// Returns the logical worker name.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

/// The constructed (and possibly launched) worker→module graph.
///
/// Returned by [`GraphLoader::load`]; ownership is handed to the supervisor
/// for joining when workers were started.
pub struct LoadedGraph {
    pub(crate) handles: Vec<WorkerHandle>,
    pub(crate) set: JoinSet<()>,
    pub(crate) token: CancellationToken,
    started: bool,
}

impl LoadedGraph {
    /// Returns the constructed worker handles.
    pub fn handles(&self) -> &[WorkerHandle] {
        &self.handles
    }

    /// Returns the number of constructed workers.
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Returns the number of worker tasks still running.
    pub fn live_count(&self) -> usize {
        self.set.len()
    }

    /// Returns true when worker tasks were launched.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Cancels every worker's token. Workers exit cooperatively.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// Builds and launches the worker→module graph.
pub struct GraphLoader {
    factory: Arc<dyn WorkerFactory>,
    registry: ModuleRegistry,
    modules_root: PathBuf,
}

impl GraphLoader {
    /// Creates a loader from a worker factory, a module registry, and the
    /// directory used for module discovery fallback.
    pub fn new(
        factory: Arc<dyn WorkerFactory>,
        registry: ModuleRegistry,
        modules_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            factory,
            registry,
            modules_root: modules_root.into(),
        }
    }

    /// Constructs the graph and, when `should_start` is true, launches one
    /// task per worker.
    ///
    /// `workers` and `modules` are `None` when their documents are absent;
    /// `workers_path` is only used for error reporting. Returns immediately
    /// after launch.
    pub fn load(
        &self,
        workers: Option<Vec<WorkerDescriptor>>,
        workers_path: &Path,
        modules: Option<Vec<ModuleDescriptor>>,
        config: Arc<ConfigSnapshot>,
        bus: &Bus,
        should_start: bool,
    ) -> Result<LoadedGraph, BootError> {
        let workers = workers.ok_or_else(|| BootError::MissingWorkerConfig {
            path: workers_path.to_path_buf(),
        })?;

        let modules = match modules {
            Some(m) => m,
            None => discover_modules(&self.modules_root)?,
        };

        let mut handles = Vec::with_capacity(workers.len());
        for descriptor in workers {
            handles.push(self.build_worker(descriptor, &modules, &config)?);
        }

        let mut graph = LoadedGraph {
            handles,
            set: JoinSet::new(),
            token: CancellationToken::new(),
            started: should_start,
        };
        if should_start {
            self.launch(&mut graph, bus);
        }
        Ok(graph)
    }

    /// Builds one worker handle with a fresh module instance per applicable
    /// module descriptor.
    fn build_worker(
        &self,
        descriptor: WorkerDescriptor,
        modules: &[ModuleDescriptor],
        config: &Arc<ConfigSnapshot>,
    ) -> Result<WorkerHandle, BootError> {
        let mut bound = Vec::new();
        for module in modules.iter().filter(|m| applicable(&descriptor, m)) {
            let factory = self.registry.resolve(module)?;
            let instance = factory.build(module, Arc::clone(config))?;
            bound.push(ModuleHandle {
                descriptor: module.clone(),
                module: instance,
            });
        }

        let worker = self
            .factory
            .build(&descriptor, bound.clone(), Arc::clone(config))?;
        Ok(WorkerHandle {
            descriptor,
            worker,
            modules: bound,
        })
    }

    /// Spawns one task per worker, publishing lifecycle events to the bus.
    fn launch(&self, graph: &mut LoadedGraph, bus: &Bus) {
        for handle in &graph.handles {
            let worker = Arc::clone(&handle.worker);
            let bus = bus.clone();
            let child = graph.token.child_token();

            graph.set.spawn(async move {
                let name = worker.name().to_string();
                bus.publish(Event::new(EventKind::WorkerStarting).with_worker(name.clone()));

                match worker.run(child).await {
                    Ok(()) | Err(WorkerError::Canceled) => {
                        bus.publish(Event::new(EventKind::WorkerStopped).with_worker(name));
                    }
                    Err(err) => {
                        bus.publish(
                            Event::new(EventKind::WorkerFailed)
                                .with_worker(name)
                                .with_reason(err.to_string()),
                        );
                    }
                }
            });
        }
    }
}

/// A module applies to a worker when the worker names it, or names nothing.
fn applicable(worker: &WorkerDescriptor, module: &ModuleDescriptor) -> bool {
    match &worker.modules {
        Some(names) => names.iter().any(|n| n == &module.name),
        None => true,
    }
}
