//! # Supervisor: joins worker tasks, fans out events, handles shutdown.
//!
//! The [`Supervisor`] owns the event bus, a [`SubscriberSet`], and the
//! runtime configuration. After the graph loader has launched the workers,
//! [`Supervisor::run`] suspends the calling context until every worker task
//! has exited.
//!
//! ## Key responsibilities
//! - subscribe to the [`Bus`] and **fan out** events via [`SubscriberSet`]
//! - join all launched worker tasks (native blocking join, no poll loop)
//! - handle OS termination signals (SIGINT/SIGTERM/Ctrl-C)
//! - enforce the configured grace period after a signal
//!
//! ## High-level architecture
//! ```text
//! GraphLoader ──► LoadedGraph { JoinSet, CancellationToken }
//!                         │
//!                 Supervisor::run(graph)
//!                         │
//!   ┌─────────────────────┴────────────────────┐
//!   │ select:                                  │
//!   │   all tasks joined ──────► return Ok(()) │
//!   │   signal observed  ──► publish ShutdownRequested
//!   │                        cancel graph token
//!   │                        wait_all_with_grace:
//!   │                          ├─ Ok       → AllStoppedWithin
//!   │                          └─ Timeout  → GraceExceeded (stuck list
//!   │                                        from AliveTracker)
//!   └──────────────────────────────────────────┘
//!
//! Event flow:
//!   worker task ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//! ```
//!
//! There is no restart policy: a terminated worker is not relaunched, and
//! the run returns exactly when the live worker count reaches zero.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::core::shutdown;
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::graph::LoadedGraph;
use crate::subscribers::{AliveTracker, Subscribe, SubscriberSet};

use super::config::SupervisorConfig;

/// Joins launched workers and coordinates event delivery and shutdown.
pub struct Supervisor {
    /// Runtime configuration.
    pub cfg: SupervisorConfig,
    /// Event bus shared with all worker tasks.
    pub bus: Bus,
    /// Fan-out set for subscribers.
    pub subs: Arc<SubscriberSet>,
    /// Liveness tracker used for the stuck-worker snapshot (same instance
    /// is in `subs`).
    pub alive: Arc<AliveTracker>,
}

impl Supervisor {
    /// Creates a supervisor over an existing bus with the given subscribers.
    ///
    /// `alive` must be the same instance as the one in `subscribers`; it is
    /// added if absent.
    pub fn new(
        cfg: SupervisorConfig,
        bus: Bus,
        mut subscribers: Vec<Arc<dyn Subscribe>>,
        alive: Arc<AliveTracker>,
    ) -> Self {
        let has_alive = subscribers
            .iter()
            .any(|s| std::ptr::eq::<dyn Subscribe>(&**s as _, &*alive as &dyn Subscribe));
        if !has_alive {
            subscribers.push(alive.clone());
        }

        let subs = Arc::new(SubscriberSet::new(subscribers, bus.clone()));
        Self {
            cfg,
            bus,
            subs,
            alive,
        }
    }

    /// Runs the launched graph until either:
    /// - all worker tasks exit on their own, or
    /// - a termination signal arrives → cooperative shutdown (may end with
    ///   [`RuntimeError::GraceExceeded`]).
    ///
    /// A graph that was never started joins immediately.
    pub async fn run(&self, graph: LoadedGraph) -> Result<(), RuntimeError> {
        self.subscriber_listener();

        let LoadedGraph {
            mut set, token, ..
        } = graph;

        tokio::select! {
            _ = shutdown::termination_signal() => {
                self.bus.publish(Event::new(EventKind::ShutdownRequested));
                token.cancel();
                self.wait_all_with_grace(&mut set).await
            }
            _ = async { while set.join_next().await.is_some() {} } => {
                Ok(())
            }
        }
    }

    /// Subscribes to the bus and forwards events to the subscriber set
    /// (fire-and-forget).
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev);
            }
        });
    }

    /// Waits for all worker tasks to finish within the configured grace period.
    ///
    /// Publishes [`EventKind::AllStoppedWithin`] on success, or
    /// [`EventKind::GraceExceeded`] on timeout and returns
    /// [`RuntimeError::GraceExceeded`] with the list of stuck workers.
    async fn wait_all_with_grace(&self, set: &mut JoinSet<()>) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let done = async { while set.join_next().await.is_some() {} };
        let timed = tokio::time::timeout(grace, done).await;

        match timed {
            Ok(_) => {
                self.bus.publish(Event::new(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_) => {
                self.bus.publish(Event::new(EventKind::GraceExceeded));
                let stuck = self.alive.snapshot();
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSnapshot, ConfigStore};
    use crate::error::BootError;
    use crate::graph::{
        GraphLoader, ModuleHandle, ModuleRegistry, WorkerDescriptor, WorkerFactory, WorkerFn,
        WorkerRef,
    };
    use std::collections::HashMap;
    use std::time::Duration;
    use tempfile::TempDir;

    struct QuickExitFactory;

    impl WorkerFactory for QuickExitFactory {
        fn build(
            &self,
            descriptor: &WorkerDescriptor,
            _modules: Vec<ModuleHandle>,
            _config: Arc<ConfigSnapshot>,
        ) -> Result<WorkerRef, BootError> {
            let name = descriptor.name.clone();
            Ok(WorkerFn::arc(name, |_ctx| async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(())
            }))
        }
    }

    fn supervisor(bus: Bus) -> Supervisor {
        let alive = Arc::new(AliveTracker::new());
        Supervisor::new(SupervisorConfig::default(), bus, vec![], alive)
    }

    fn launch_graph(bus: &Bus, names: &[&str]) -> LoadedGraph {
        let tmp = TempDir::new().unwrap();
        let loader = GraphLoader::new(
            Arc::new(QuickExitFactory),
            ModuleRegistry::new(),
            tmp.path(),
        );
        let workers = names
            .iter()
            .map(|n| WorkerDescriptor {
                name: n.to_string(),
                host: "irc.example.net".into(),
                port: 6667,
                modules: None,
                options: HashMap::new(),
            })
            .collect();
        loader
            .load(
                Some(workers),
                &tmp.path().join("workers.yml"),
                Some(vec![]),
                Arc::new(ConfigStore::new().freeze()),
                bus,
                true,
            )
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_returns_when_all_workers_exit() {
        let bus = Bus::new(64);
        let sup = supervisor(bus.clone());
        let graph = launch_graph(&bus, &["a", "b", "c"]);

        let joined = tokio::time::timeout(Duration::from_secs(2), sup.run(graph)).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn test_run_with_empty_graph_returns_immediately() {
        let bus = Bus::new(64);
        let sup = supervisor(bus.clone());
        let graph = launch_graph(&bus, &[]);

        let joined = tokio::time::timeout(Duration::from_millis(500), sup.run(graph)).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn test_alive_tracker_observes_lifecycle() {
        let bus = Bus::new(64);
        let sup = supervisor(bus.clone());
        let graph = launch_graph(&bus, &["observed"]);

        sup.run(graph).await.unwrap();
        // Events are delivered asynchronously through the subscriber queues.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(sup.alive.alive_count(), 0);
        assert!(!sup.alive.is_alive("observed"));
    }
}
