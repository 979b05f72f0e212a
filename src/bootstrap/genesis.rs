//! # Top-level bootstrap entry point.
//!
//! [`Bootstrap`] oversees initializing the whole environment: it drives the
//! phase sequence that loads configuration documents, activates subsystems,
//! initializes logging, discovers daemons, establishes persistence, and
//! finally invokes the graph loader and hands the launched workers to the
//! supervisor.
//!
//! ## Control flow
//! ```text
//! Bootstrap::boot(invoke)
//!   load_global ─► load_season ─► activate_subsystems ─► init_logging
//!        ─► discover_daemons ─► load_extensions ─► connect_persistence
//!        ─► load_graph:
//!              read workers.yml / modules.yml
//!              freeze ConfigStore ─► GraphLoader::load(..., invoke)
//!              invoke? ─► Supervisor::run(graph)  (blocks until all exit)
//! ```
//!
//! ## Error boundary
//! Failures in any phase before `load_graph` propagate to the caller as
//! `Err` and abort every later phase. Failures strictly within `load_graph`
//! (construction, launch, supervision) are caught exactly once, logged at
//! error severity (or through a bare stderr fallback if logging never came
//! up), and surface as `Ok(false)`; the host process is not crashed.
//!
//! A `Bootstrap` value drives one boot; construct a fresh one per attempt.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::{error, warn};

use crate::config::{ConfigSnapshot, ConfigStore, Scope, NO_DATABASE_KEY};
use crate::core::{Supervisor, SupervisorConfig};
use crate::daemons::DaemonRegistry;
use crate::error::BootError;
use crate::events::Bus;
use crate::graph::{
    GraphLoader, ModuleDescriptor, ModuleFactory, ModuleRegistry, WorkerDescriptor, WorkerFactory,
};
use crate::subscribers::{AliveTracker, Subscribe, TraceWriter};

use super::phase::{self, PhaseSequencer};
use super::resolver::SubsystemResolver;

/// Hook run once during the `load_extensions` phase.
pub type ExtensionHook = Box<dyn FnMut(&mut ConfigStore) -> Result<(), BootError> + Send>;

/// Hook invoked per entry of the persistence-connection document.
pub type PersistenceConnector = Box<dyn FnMut(&str, &Value) -> Result<(), BootError> + Send>;

/// Environment variable overriding which season is loaded.
pub(crate) const SEASON_ENV: &str = "ARBOR_SEASON";

/// Season used when neither the environment nor the global document selects one.
const DEFAULT_SEASON: &str = "production";

/// Bootstraps the environment and supervises the launched workers.
///
/// ## Example
/// ```no_run
/// use std::sync::Arc;
/// use arbor::{Bootstrap, BootError, ConfigSnapshot, ModuleHandle};
/// use arbor::{WorkerDescriptor, WorkerFactory, WorkerFn, WorkerRef};
///
/// struct IrcFactory;
///
/// impl WorkerFactory for IrcFactory {
///     fn build(
///         &self,
///         descriptor: &WorkerDescriptor,
///         _modules: Vec<ModuleHandle>,
///         _config: Arc<ConfigSnapshot>,
///     ) -> Result<WorkerRef, BootError> {
///         let name = descriptor.name.clone();
///         Ok(WorkerFn::arc(name, |_ctx| async {
///             // connect and speak the protocol...
///             Ok(())
///         }))
///     }
/// }
///
/// # async fn demo() -> Result<(), BootError> {
/// let mut bootstrap = Bootstrap::new("/srv/mybot", Arc::new(IrcFactory));
/// let booted = bootstrap.boot(true).await?;
/// # let _ = booted;
/// # Ok(())
/// # }
/// ```
pub struct Bootstrap {
    root: PathBuf,
    cfg: SupervisorConfig,
    store: ConfigStore,
    sequencer: PhaseSequencer,
    resolver: SubsystemResolver,
    daemons: DaemonRegistry,
    registry: ModuleRegistry,
    worker_factory: Arc<dyn WorkerFactory>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    extensions: Vec<ExtensionHook>,
    persistence: Option<PersistenceConnector>,
    season_override: Option<String>,
    snapshot: Option<Arc<ConfigSnapshot>>,
    log_ready: bool,
}

impl Bootstrap {
    /// Creates a bootstrap rooted at the given directory.
    ///
    /// The worker factory supplies the connection implementation; everything
    /// else has a default and can be adjusted with the `with_*`/`register_*`
    /// methods before calling [`boot`](Self::boot). The season override is
    /// captured from the environment here.
    pub fn new(root: impl Into<PathBuf>, worker_factory: Arc<dyn WorkerFactory>) -> Self {
        Self {
            root: root.into(),
            cfg: SupervisorConfig::default(),
            store: ConfigStore::new(),
            sequencer: PhaseSequencer::new(),
            resolver: SubsystemResolver::new(),
            daemons: DaemonRegistry::new(),
            registry: ModuleRegistry::new(),
            worker_factory,
            subscribers: vec![Arc::new(TraceWriter::new())],
            extensions: Vec::new(),
            persistence: None,
            season_override: std::env::var(SEASON_ENV).ok(),
            snapshot: None,
            log_ready: false,
        }
    }

    /// Replaces the supervisor configuration.
    pub fn with_config(mut self, cfg: SupervisorConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Overrides the season explicitly, taking precedence over both the
    /// environment and the global document.
    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season_override = Some(season.into());
        self
    }

    /// Adds an event subscriber alongside the built-in trace writer.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Sets the hook that establishes persistence connections.
    pub fn with_persistence_connector(mut self, connector: PersistenceConnector) -> Self {
        self.persistence = Some(connector);
        self
    }

    /// Registers a module factory under an implementation name.
    pub fn register_module(&mut self, name: impl Into<String>, factory: Arc<dyn ModuleFactory>) {
        self.registry.register(name, factory);
    }

    /// Registers a named subsystem at the end of the activation order.
    pub fn register_subsystem<F>(&mut self, name: impl Into<String>, activate: F)
    where
        F: FnMut() -> Result<(), BootError> + Send + 'static,
    {
        self.resolver.register(name, activate);
    }

    /// Registers an extension hook run during the `load_extensions` phase.
    pub fn register_extension(&mut self, hook: ExtensionHook) {
        self.extensions.push(hook);
    }

    /// Returns the subsystem resolver (activation state is visible here).
    pub fn subsystems(&self) -> &SubsystemResolver {
        &self.resolver
    }

    /// Returns the daemon registry populated by `discover_daemons`.
    pub fn daemons(&self) -> &DaemonRegistry {
        &self.daemons
    }

    /// Returns completed phase names in completion order.
    pub fn completed_phases(&self) -> &[&'static str] {
        self.sequencer.completed()
    }

    /// Returns the frozen configuration once `load_graph` has run.
    pub fn snapshot(&self) -> Option<&Arc<ConfigSnapshot>> {
        self.snapshot.as_ref()
    }

    /// Bootstraps the environment and starts the workers' execution tasks if
    /// `invoke` is true.
    ///
    /// - `invoke == false`: performs all construction but starts no network
    ///   activity (dry-run validation), then returns `Ok(true)`.
    /// - `invoke == true`: blocks the calling context until every worker has
    ///   exited, then returns `Ok(true)`.
    /// - A failure before the final phase returns `Err`.
    /// - A failure within the final phase is logged once at error severity
    ///   and returns `Ok(false)`.
    pub async fn boot(&mut self, invoke: bool) -> Result<bool, BootError> {
        self.run_phase(&phase::LOAD_GLOBAL, Self::load_global_settings)?;
        self.run_phase(&phase::LOAD_SEASON, Self::load_season_settings)?;
        self.run_phase(&phase::ACTIVATE_SUBSYSTEMS, Self::activate_subsystems)?;
        self.run_phase(&phase::INIT_LOGGING, Self::init_logging)?;
        self.run_phase(&phase::DISCOVER_DAEMONS, Self::discover_daemons)?;
        self.run_phase(&phase::LOAD_EXTENSIONS, Self::load_extensions)?;
        self.run_phase(&phase::CONNECT_PERSISTENCE, Self::connect_persistence)?;

        match self.invoke_loader(invoke).await {
            Ok(()) => {
                self.sequencer.mark_complete(&phase::LOAD_GRAPH);
                Ok(true)
            }
            Err(err) => {
                self.log_fatal(&err);
                Ok(false)
            }
        }
    }

    /// Checks a phase's dependencies, runs it, and records completion.
    fn run_phase(
        &mut self,
        descriptor: &phase::PhaseDescriptor,
        thunk: fn(&mut Self) -> Result<(), BootError>,
    ) -> Result<(), BootError> {
        self.sequencer.ready(descriptor)?;
        thunk(self)?;
        self.sequencer.mark_complete(descriptor);
        Ok(())
    }

    /// Loads `config/global.yml` (required) and records root and season.
    fn load_global_settings(&mut self) -> Result<(), BootError> {
        let path = self.root.join("config").join("global.yml");
        let mapping = read_required_mapping(&path, "global settings")?;
        self.store.set_global(mapping);
        self.store
            .set_global_key("root", Value::String(self.root.display().to_string()));

        let document_season = self
            .store
            .get(&Scope::Global, "season")
            .and_then(Value::as_str)
            .map(str::to_string);
        let season = select_season(self.season_override.as_deref(), document_season.as_deref());
        self.store.set_global_key("season", Value::String(season));
        Ok(())
    }

    /// Resolves the season directory (required) and loads its optional
    /// `season.yml`.
    fn load_season_settings(&mut self) -> Result<(), BootError> {
        let dir = self.season_dir()?;
        if let Some(mapping) = read_optional_mapping(&dir.join("season.yml"))? {
            self.store.set_season(mapping);
        }
        Ok(())
    }

    /// Activates every registered subsystem in declared order.
    fn activate_subsystems(&mut self) -> Result<(), BootError> {
        self.resolver.activate_all()
    }

    /// Initializes the `tracing` subscriber from the configured level.
    ///
    /// An unrecognized level falls back to `info` with one warning. An
    /// already-installed subscriber (tests, embedding applications) is
    /// tolerated.
    fn init_logging(&mut self) -> Result<(), BootError> {
        let configured = self
            .store
            .get(&Scope::Season, "logging")
            .and_then(Value::as_str)
            .unwrap_or("info")
            .to_ascii_lowercase();

        let (level, recognized) = match configured.parse::<tracing::Level>() {
            Ok(level) => (level, true),
            Err(_) => (tracing::Level::INFO, false),
        };

        let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
        self.log_ready = true;

        if !recognized {
            warn!(
                configured = configured.as_str(),
                "log level not understood; raised to info"
            );
        }
        Ok(())
    }

    /// Discovers daemon descriptors under `resources/daemons`.
    fn discover_daemons(&mut self) -> Result<(), BootError> {
        let dir = self.root.join("resources").join("daemons");
        self.daemons = DaemonRegistry::discover(&dir)?;
        Ok(())
    }

    /// Runs registered extension hooks once each, in registration order.
    fn load_extensions(&mut self) -> Result<(), BootError> {
        let mut hooks = std::mem::take(&mut self.extensions);
        let result = hooks.iter_mut().try_for_each(|hook| hook(&mut self.store));
        self.extensions = hooks;
        result
    }

    /// Establishes persistence connections from the optional `database.yml`.
    ///
    /// Absence is not an error: the persistence-unavailable flag is set and
    /// persistence-dependent modules are expected to disable themselves.
    fn connect_persistence(&mut self) -> Result<(), BootError> {
        let path = self.season_dir()?.join("database.yml");
        let Some(mapping) = read_optional_mapping(&path)? else {
            self.store.set_global_key(NO_DATABASE_KEY, Value::Bool(true));
            return Ok(());
        };

        if let Some(connector) = &mut self.persistence {
            for (key, value) in &mapping {
                if let Some(name) = key.as_str() {
                    connector(name, value)?;
                }
            }
        }
        Ok(())
    }

    /// The final phase: reads the worker and module documents, freezes the
    /// configuration, constructs the graph, and supervises it when `invoke`.
    async fn invoke_loader(&mut self, invoke: bool) -> Result<(), BootError> {
        self.sequencer.ready(&phase::LOAD_GRAPH)?;

        let season_dir = self.season_dir()?;
        let workers_path = season_dir.join("workers.yml");
        let workers = read_descriptors(&workers_path, |w: &mut WorkerDescriptor, name| {
            w.name = name;
        })?;
        let modules = read_descriptors(&season_dir.join("modules.yml"), |m: &mut ModuleDescriptor, name| {
            m.name = name;
        })?;

        // Per-component scopes come from the descriptor options.
        if let Some(workers) = &workers {
            for worker in workers {
                let options = options_mapping(&worker.options);
                self.store.set_component(worker.name.clone(), options);
            }
        }
        if let Some(modules) = &modules {
            for module in modules {
                let options = options_mapping(&module.options);
                self.store.set_component(module.name.clone(), options);
            }
        }

        let snapshot = Arc::new(std::mem::take(&mut self.store).freeze());
        self.snapshot = Some(Arc::clone(&snapshot));

        let bus = Bus::new(self.cfg.bus_capacity);
        let loader = GraphLoader::new(
            Arc::clone(&self.worker_factory),
            std::mem::take(&mut self.registry),
            self.root.join("modules"),
        );
        let graph = loader.load(workers, &workers_path, modules, snapshot, &bus, invoke)?;

        if invoke {
            let alive = Arc::new(AliveTracker::new());
            let supervisor = Supervisor::new(
                self.cfg.clone(),
                bus,
                std::mem::take(&mut self.subscribers),
                alive,
            );
            // Suspends until every worker task has exited.
            if let Err(err) = supervisor.run(graph).await {
                error!(label = err.as_label(), error = %err, "shutdown incomplete");
            }
        }
        Ok(())
    }

    /// Returns the active season's directory, failing if it does not exist.
    fn season_dir(&self) -> Result<PathBuf, BootError> {
        let season = self
            .store
            .require(&Scope::Global, "season")?
            .as_str()
            .unwrap_or(DEFAULT_SEASON)
            .to_string();
        let dir = self.root.join("config").join("seasons").join(&season);
        if !dir.is_dir() {
            return Err(BootError::SeasonDirMissing { season, path: dir });
        }
        Ok(dir)
    }

    /// Emits the single fatal record for an aborted bootstrap.
    fn log_fatal(&self, err: &BootError) {
        if self.log_ready {
            error!(label = err.as_label(), error = %err, "bootstrap aborted");
        } else {
            eprintln!("arbor: bootstrap aborted: {err}");
        }
    }
}

/// Season precedence: explicit/environment override, then the global
/// document, then the default.
fn select_season(override_season: Option<&str>, document_season: Option<&str>) -> String {
    override_season
        .or(document_season)
        .unwrap_or(DEFAULT_SEASON)
        .to_string()
}

/// Reads a file, mapping absence to `None`.
fn read_optional_text(path: &Path) -> Result<Option<String>, BootError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(BootError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Reads a required YAML mapping document.
fn read_required_mapping(path: &Path, what: &'static str) -> Result<Mapping, BootError> {
    let text = read_optional_text(path)?.ok_or_else(|| BootError::MissingDocument {
        what,
        path: path.to_path_buf(),
    })?;
    serde_yaml::from_str(&text).map_err(|source| BootError::Document {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads an optional YAML mapping document.
fn read_optional_mapping(path: &Path) -> Result<Option<Mapping>, BootError> {
    let Some(text) = read_optional_text(path)? else {
        return Ok(None);
    };
    let mapping = serde_yaml::from_str(&text).map_err(|source| BootError::Document {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(mapping))
}

/// Reads an optional name→descriptor document into a name-sorted vector.
fn read_descriptors<T, F>(path: &Path, mut assign_name: F) -> Result<Option<Vec<T>>, BootError>
where
    T: DeserializeOwned,
    F: FnMut(&mut T, String),
{
    let Some(text) = read_optional_text(path)? else {
        return Ok(None);
    };
    let map: BTreeMap<String, T> =
        serde_yaml::from_str(&text).map_err(|source| BootError::Document {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(
        map.into_iter()
            .map(|(name, mut descriptor)| {
                assign_name(&mut descriptor, name);
                descriptor
            })
            .collect(),
    ))
}

/// Converts descriptor options into a YAML mapping for the component scope.
fn options_mapping(options: &HashMap<String, Value>) -> Mapping {
    options
        .iter()
        .map(|(k, v)| (Value::String(k.clone()), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkerError;
    use crate::graph::{ModuleHandle, ModuleRef, WorkerFn, WorkerRef};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct IdleWorkerFactory;

    impl WorkerFactory for IdleWorkerFactory {
        fn build(
            &self,
            descriptor: &WorkerDescriptor,
            _modules: Vec<ModuleHandle>,
            _config: Arc<ConfigSnapshot>,
        ) -> Result<WorkerRef, BootError> {
            let name = descriptor.name.clone();
            Ok(WorkerFn::arc(name, |_ctx| async {
                Ok::<_, WorkerError>(())
            }))
        }
    }

    struct NullModule(String);

    impl crate::graph::Module for NullModule {
        fn name(&self) -> &str {
            &self.0
        }
    }

    struct NullModuleFactory;

    impl ModuleFactory for NullModuleFactory {
        fn build(
            &self,
            descriptor: &ModuleDescriptor,
            _config: Arc<ConfigSnapshot>,
        ) -> Result<ModuleRef, BootError> {
            Ok(Arc::new(NullModule(descriptor.name.clone())))
        }
    }

    /// Collects formatted log output for record-counting assertions.
    #[derive(Clone, Default)]
    struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CaptureWriter {
        type Writer = CaptureWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Builds a minimal on-disk configuration tree for the "testing" season.
    fn config_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("config/seasons/testing")).unwrap();
        std::fs::write(
            root.join("config/global.yml"),
            "season: testing\nnick: arbor\n",
        )
        .unwrap();
        std::fs::write(
            root.join("config/seasons/testing/workers.yml"),
            "freenode:\n  host: irc.example.net\n  port: 6667\n",
        )
        .unwrap();
        tmp
    }

    fn bootstrap_for(tmp: &TempDir) -> Bootstrap {
        Bootstrap::new(tmp.path(), Arc::new(IdleWorkerFactory)).with_season("testing")
    }

    #[tokio::test]
    async fn test_dry_run_completes_all_phases_in_order() {
        let tmp = config_tree();
        let mut bootstrap = bootstrap_for(&tmp);

        assert_eq!(bootstrap.boot(false).await.unwrap(), true);

        let expected: Vec<&str> = phase::PHASES.iter().map(|p| p.name).collect();
        assert_eq!(bootstrap.completed_phases(), expected.as_slice());
    }

    #[tokio::test]
    async fn test_invoke_blocks_until_workers_exit() {
        let tmp = config_tree();
        let mut bootstrap = bootstrap_for(&tmp);

        let booted = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            bootstrap.boot(true),
        )
        .await
        .expect("boot should return once workers exit");
        assert_eq!(booted.unwrap(), true);
    }

    #[tokio::test]
    async fn test_missing_global_document_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut bootstrap = bootstrap_for(&tmp);

        let err = bootstrap.boot(false).await.unwrap_err();
        assert_eq!(err.as_label(), "boot_missing_document");
        assert!(bootstrap.completed_phases().is_empty());
    }

    #[tokio::test]
    async fn test_missing_season_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("config")).unwrap();
        std::fs::write(tmp.path().join("config/global.yml"), "season: testing\n").unwrap();
        let mut bootstrap = bootstrap_for(&tmp);

        let err = bootstrap.boot(false).await.unwrap_err();
        assert_eq!(err.as_label(), "boot_season_dir_missing");
    }

    #[tokio::test]
    async fn test_missing_season_document_is_tolerated() {
        // config_tree() writes no season.yml at all.
        let tmp = config_tree();
        let mut bootstrap = bootstrap_for(&tmp);
        assert_eq!(bootstrap.boot(false).await.unwrap(), true);
    }

    #[tokio::test]
    async fn test_missing_database_document_sets_flag() {
        let tmp = config_tree();
        let mut bootstrap = bootstrap_for(&tmp);

        bootstrap.boot(false).await.unwrap();
        let snapshot = bootstrap.snapshot().unwrap();
        assert!(snapshot.persistence_disabled());
    }

    #[tokio::test]
    async fn test_persistence_connector_sees_each_entry() {
        let tmp = config_tree();
        std::fs::write(
            tmp.path().join("config/seasons/testing/database.yml"),
            "default: sqlite://db/prod.db\nreporting: sqlite://db/reports.db\n",
        )
        .unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_hook = Arc::clone(&seen);
        let mut bootstrap =
            bootstrap_for(&tmp).with_persistence_connector(Box::new(move |name, _cfg| {
                seen_in_hook.lock().unwrap().push(name.to_string());
                Ok(())
            }));

        bootstrap.boot(false).await.unwrap();
        let snapshot = bootstrap.snapshot().unwrap();
        assert!(!snapshot.persistence_disabled());

        let mut names = seen.lock().unwrap().clone();
        names.sort();
        assert_eq!(names, vec!["default", "reporting"]);
    }

    #[tokio::test]
    async fn test_missing_worker_document_is_caught_not_raised() {
        let tmp = config_tree();
        std::fs::remove_file(tmp.path().join("config/seasons/testing/workers.yml")).unwrap();
        let mut bootstrap = bootstrap_for(&tmp);

        // Caught at the boundary: no Err, one fatal record, boot returns.
        assert_eq!(bootstrap.boot(true).await.unwrap(), false);
    }

    #[tokio::test]
    async fn test_caught_failure_emits_exactly_one_error_record() {
        use tracing::instrument::WithSubscriber;

        let tmp = config_tree();
        std::fs::remove_file(tmp.path().join("config/seasons/testing/workers.yml")).unwrap();
        let mut bootstrap = bootstrap_for(&tmp);

        let writer = CaptureWriter::default();
        let capture = tracing_subscriber::fmt()
            .with_writer(writer.clone())
            .with_ansi(false)
            .finish();

        let booted = bootstrap.boot(true).with_subscriber(capture).await.unwrap();
        assert!(!booted);

        let output = String::from_utf8(writer.0.lock().unwrap().clone()).unwrap();
        let records = output
            .lines()
            .filter(|line| line.contains("bootstrap aborted"))
            .count();
        assert_eq!(records, 1);
    }

    #[tokio::test]
    async fn test_unknown_module_is_caught_not_raised() {
        let tmp = config_tree();
        std::fs::write(
            tmp.path().join("config/seasons/testing/modules.yml"),
            "Ghost:\n  class: Ghost\n",
        )
        .unwrap();
        let mut bootstrap = bootstrap_for(&tmp);

        assert_eq!(bootstrap.boot(false).await.unwrap(), false);
    }

    #[tokio::test]
    async fn test_registered_module_attaches_to_worker() {
        let tmp = config_tree();
        std::fs::write(
            tmp.path().join("config/seasons/testing/modules.yml"),
            "Greeter:\n  class: Greeter\n  greeting: hello\n",
        )
        .unwrap();
        let mut bootstrap = bootstrap_for(&tmp);
        bootstrap.register_module("Greeter", Arc::new(NullModuleFactory));

        assert_eq!(bootstrap.boot(false).await.unwrap(), true);

        // Module options land in the component scope of the frozen config.
        let snapshot = bootstrap.snapshot().unwrap();
        let scope = Scope::Component("Greeter".into());
        assert_eq!(
            snapshot.get(&scope, "greeting"),
            Some(&Value::String("hello".into()))
        );
    }

    #[tokio::test]
    async fn test_subsystems_activate_once() {
        let tmp = config_tree();
        let count = Arc::new(AtomicUsize::new(0));
        let mut bootstrap = bootstrap_for(&tmp);
        {
            let count = Arc::clone(&count);
            bootstrap.register_subsystem("protocol", move || {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        bootstrap.boot(false).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(bootstrap.subsystems().is_active("protocol"));
    }

    #[tokio::test]
    async fn test_failed_subsystem_aborts_before_final_phase() {
        let tmp = config_tree();
        let mut bootstrap = bootstrap_for(&tmp);
        bootstrap.register_subsystem("flaky", || {
            Err(BootError::SubsystemActivation {
                name: "flaky".into(),
                reason: "no backend".into(),
            })
        });

        let err = bootstrap.boot(false).await.unwrap_err();
        assert_eq!(err.as_label(), "boot_subsystem_activation");
        // Phases after the failure never ran.
        assert_eq!(bootstrap.completed_phases(), ["load_global", "load_season"]);
    }

    #[tokio::test]
    async fn test_extension_hooks_run_once_in_order() {
        let tmp = config_tree();
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut bootstrap = bootstrap_for(&tmp);
        for tag in ["first", "second"] {
            let order = Arc::clone(&order);
            bootstrap.register_extension(Box::new(move |_store| {
                order.lock().unwrap().push(tag);
                Ok(())
            }));
        }

        bootstrap.boot(false).await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_daemons_are_discovered() {
        let tmp = config_tree();
        std::fs::create_dir_all(tmp.path().join("resources/daemons")).unwrap();
        std::fs::write(
            tmp.path().join("resources/daemons/score_server.yml"),
            "port: 9000\n",
        )
        .unwrap();
        let mut bootstrap = bootstrap_for(&tmp);

        bootstrap.boot(false).await.unwrap();
        assert!(bootstrap.daemons().get("ScoreServer").is_some());
    }

    #[test]
    fn test_season_precedence() {
        assert_eq!(select_season(Some("staging"), Some("production")), "staging");
        assert_eq!(select_season(None, Some("summer")), "summer");
        assert_eq!(select_season(None, None), "production");
    }
}
