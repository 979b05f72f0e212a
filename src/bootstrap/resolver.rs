//! # Named subsystem resolver.
//!
//! Subsystems (a logging facade, a protocol implementation, persistence
//! adapters) are registered with an activation hook and resolved in their
//! declared linear order, so later subsystems may assume earlier ones are
//! active.
//!
//! ## Rules
//! - Activation follows registration order.
//! - Re-activating an already-active subsystem is idempotent (the hook does
//!   not run again).
//! - An unknown name or a failing hook is fatal to the phase that asked.

use std::collections::HashSet;

use crate::error::BootError;

type ActivationHook = Box<dyn FnMut() -> Result<(), BootError> + Send>;

struct Subsystem {
    name: String,
    activate: ActivationHook,
}

/// Resolves and activates named subsystems in declared order.
#[derive(Default)]
pub struct SubsystemResolver {
    subsystems: Vec<Subsystem>,
    active: HashSet<String>,
}

impl SubsystemResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subsystem at the end of the activation order.
    pub fn register<F>(&mut self, name: impl Into<String>, activate: F)
    where
        F: FnMut() -> Result<(), BootError> + Send + 'static,
    {
        self.subsystems.push(Subsystem {
            name: name.into(),
            activate: Box::new(activate),
        });
    }

    /// Activates one subsystem by name; a no-op if it is already active.
    pub fn activate(&mut self, name: &str) -> Result<(), BootError> {
        if self.active.contains(name) {
            return Ok(());
        }
        let subsystem = self
            .subsystems
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| BootError::SubsystemActivation {
                name: name.to_string(),
                reason: "not registered".into(),
            })?;
        (subsystem.activate)()?;
        self.active.insert(name.to_string());
        Ok(())
    }

    /// Activates every registered subsystem in registration order.
    pub fn activate_all(&mut self) -> Result<(), BootError> {
        let names: Vec<String> = self.subsystems.iter().map(|s| s.name.clone()).collect();
        for name in names {
            self.activate(&name)?;
        }
        Ok(())
    }

    /// Returns true if the named subsystem has been activated.
    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }
}
