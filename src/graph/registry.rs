//! # Module factory registry.
//!
//! Maps implementation names to [`ModuleFactory`] instances. The registry is
//! populated by explicit registration before boot; a descriptor referencing
//! an unregistered name fails graph construction with
//! [`BootError::UnknownModule`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::BootError;

use super::module::{ModuleDescriptor, ModuleFactory};

/// Name-keyed registry of module factories.
#[derive(Default)]
pub struct ModuleRegistry {
    factories: HashMap<String, Arc<dyn ModuleFactory>>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under an implementation name.
    ///
    /// Registering the same name twice replaces the earlier factory.
    pub fn register(&mut self, name: impl Into<String>, factory: Arc<dyn ModuleFactory>) {
        self.factories.insert(name.into(), factory);
    }

    /// Returns the factory for a descriptor's implementation name.
    pub fn resolve(&self, descriptor: &ModuleDescriptor) -> Result<&Arc<dyn ModuleFactory>, BootError> {
        let implementation = descriptor.implementation_name();
        self.factories
            .get(implementation)
            .ok_or_else(|| BootError::UnknownModule {
                module: descriptor.name.clone(),
                implementation: implementation.to_string(),
            })
    }

    /// Returns true if the implementation name has a registered factory.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}
