//! # Worker abstraction and descriptors.
//!
//! This module defines the [`Worker`] trait (async, cancelable — the
//! connection side of the framework, implemented by an external collaborator)
//! and a function-backed implementation [`WorkerFn`] convenient for tests and
//! embedders. The common handle type is [`WorkerRef`], an `Arc<dyn Worker>`.
//!
//! A worker receives a [`CancellationToken`] and should periodically check it
//! to stop cooperatively during shutdown.

use std::borrow::Cow;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_yaml::Value;
use tokio_util::sync::CancellationToken;

use crate::config::ConfigSnapshot;
use crate::error::{BootError, WorkerError};

use super::module::ModuleHandle;

/// # Asynchronous, cancelable connection worker.
///
/// A `Worker` has a stable [`name`](Worker::name) and an async
/// [`run`](Worker::run) method covering the whole lifetime of one network
/// connection. Implementors should regularly check cancellation and exit
/// promptly during shutdown.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use arbor::{Worker, WorkerError};
///
/// struct Demo;
///
/// #[async_trait]
/// impl Worker for Demo {
///     fn name(&self) -> &str { "demo" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), WorkerError> {
///         if ctx.is_cancelled() {
///             return Ok(());
///         }
///         // connect, speak the protocol, dispatch to modules...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// Returns a stable, human-readable worker name.
    fn name(&self) -> &str;

    /// Runs the connection until it terminates or is cancelled.
    async fn run(&self, ctx: CancellationToken) -> Result<(), WorkerError>;
}

/// Shared handle to a worker.
pub type WorkerRef = Arc<dyn Worker>;

/// One outbound network endpoint plus its connection parameters.
///
/// Parsed from an entry of the worker-descriptor document. The core does not
/// interpret `options`; they are passed through to the worker factory.
#[derive(Clone, Debug, Deserialize)]
pub struct WorkerDescriptor {
    /// Logical worker name (the document key; filled in by the loader).
    #[serde(default)]
    pub name: String,
    /// Endpoint host.
    pub host: String,
    /// Endpoint port.
    pub port: u16,
    /// Module names attached to this worker; `None` attaches every module.
    #[serde(default)]
    pub modules: Option<Vec<String>>,
    /// Remaining connection parameters, passed through opaquely.
    #[serde(flatten, default)]
    pub options: HashMap<String, Value>,
}

/// Builds the concrete worker for a descriptor.
///
/// The wire-protocol implementation lives behind this trait; the core only
/// supplies the descriptor, the modules bound to the worker, and the frozen
/// configuration.
pub trait WorkerFactory: Send + Sync {
    /// Constructs a worker from its descriptor and attached modules.
    fn build(
        &self,
        descriptor: &WorkerDescriptor,
        modules: Vec<ModuleHandle>,
        config: Arc<ConfigSnapshot>,
    ) -> Result<WorkerRef, BootError>;
}

type BoxWorkerFuture = Pin<Box<dyn Future<Output = Result<(), WorkerError>> + Send>>;

/// Function-backed worker implementation.
///
/// Wraps a closure that creates a new future per run; there is no hidden
/// shared state between runs. Useful in tests and for embedders that do not
/// need a full protocol implementation.
///
/// ## Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use arbor::{WorkerFn, WorkerRef, WorkerError};
///
/// let w: WorkerRef = WorkerFn::arc("echo", |ctx: CancellationToken| async move {
///     if ctx.is_cancelled() {
///         return Ok(());
///     }
///     Ok::<_, WorkerError>(())
/// });
///
/// assert_eq!(w.name(), "echo");
/// ```
pub struct WorkerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> WorkerFn<F> {
    /// Creates a new function-backed worker.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the worker and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Worker for WorkerFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), WorkerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), WorkerError> {
        let fut: BoxWorkerFuture = Box::pin((self.f)(ctx));
        fut.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_parses_with_passthrough_options() {
        let yaml = r#"
host: irc.example.net
port: 6667
nick: arbor
ssl: true
"#;
        let desc: WorkerDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(desc.host, "irc.example.net");
        assert_eq!(desc.port, 6667);
        assert!(desc.modules.is_none());
        assert_eq!(desc.options.get("nick"), Some(&Value::String("arbor".into())));
        assert_eq!(desc.options.get("ssl"), Some(&Value::Bool(true)));
    }

    #[tokio::test]
    async fn test_worker_fn_runs() {
        let w: WorkerRef = WorkerFn::arc("one-shot", |_ctx| async { Ok(()) });
        assert_eq!(w.name(), "one-shot");
        assert!(w.run(CancellationToken::new()).await.is_ok());
    }
}
