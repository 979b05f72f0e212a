//! # Behavior module abstraction and descriptors.
//!
//! A module (the pluggable behavior side of the framework) is instantiated
//! from a [`ModuleDescriptor`] through a registered [`ModuleFactory`] and
//! bound to exactly one worker via a [`ModuleHandle`]. The core loads and
//! supervises modules; it never interprets their domain logic.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_yaml::Value;

use crate::config::ConfigSnapshot;
use crate::error::BootError;

/// # A pluggable behavior module instance.
///
/// Module-private state (authorization, persistence bindings) lives inside
/// the implementor; no mutable state is shared with other module instances
/// except through the external persistence layer.
pub trait Module: Send + Sync + 'static {
    /// Returns the module's logical name.
    fn name(&self) -> &str;
}

/// Shared handle to a module instance.
pub type ModuleRef = Arc<dyn Module>;

/// Identifies one behavior module by logical name and implementation name.
///
/// Parsed from an entry of the module-descriptor document, or synthesized by
/// directory discovery when that document is absent.
#[derive(Clone, Debug, Deserialize)]
pub struct ModuleDescriptor {
    /// Logical module name (the document key; filled in by the loader).
    #[serde(default)]
    pub name: String,
    /// Implementation name looked up in the module registry.
    ///
    /// Defaults to the logical name when the document omits it.
    #[serde(default, alias = "class")]
    pub implementation: Option<String>,
    /// Module-specific options, passed through opaquely.
    #[serde(flatten, default)]
    pub options: HashMap<String, Value>,
}

impl ModuleDescriptor {
    /// Creates a descriptor whose implementation equals its logical name.
    pub fn same_named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            implementation: Some(name.clone()),
            name,
            options: HashMap::new(),
        }
    }

    /// Returns the implementation name, defaulting to the logical name.
    pub fn implementation_name(&self) -> &str {
        self.implementation.as_deref().unwrap_or(&self.name)
    }
}

/// Builds a module instance from its descriptor.
///
/// Factories are registered explicitly in a
/// [`ModuleRegistry`](super::ModuleRegistry); there is no runtime lookup of
/// implementation types by string beyond that registry.
pub trait ModuleFactory: Send + Sync {
    /// Constructs one module instance for one worker.
    fn build(
        &self,
        descriptor: &ModuleDescriptor,
        config: Arc<ConfigSnapshot>,
    ) -> Result<ModuleRef, BootError>;
}

/// A module instance bound to exactly one worker.
#[derive(Clone)]
pub struct ModuleHandle {
    /// The descriptor the instance was built from.
    pub descriptor: ModuleDescriptor,
    /// The instance itself.
    pub module: ModuleRef,
}

impl ModuleHandle {
    /// Returns the logical module name.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}
