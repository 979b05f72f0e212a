//! # Immutable configuration snapshot.
//!
//! Produced by [`ConfigStore::freeze`](super::ConfigStore::freeze) once the
//! bootstrap phases stop writing. Workers and modules hold this behind an
//! `Arc` and read it concurrently without locking.

use std::collections::HashMap;

use serde_yaml::Value;

use super::store::{Scope, NO_DATABASE_KEY};

/// Read-only view of the fully populated configuration.
#[derive(Debug)]
pub struct ConfigSnapshot {
    global: HashMap<String, Value>,
    season: HashMap<String, Value>,
    components: HashMap<String, HashMap<String, Value>>,
}

impl ConfigSnapshot {
    pub(crate) fn new(
        global: HashMap<String, Value>,
        season: HashMap<String, Value>,
        components: HashMap<String, HashMap<String, Value>>,
    ) -> Self {
        Self {
            global,
            season,
            components,
        }
    }

    /// Looks a key up with the same fallback chain as the mutable store.
    pub fn get(&self, scope: &Scope, key: &str) -> Option<&Value> {
        match scope {
            Scope::Global => self.global.get(key),
            Scope::Season => self.season.get(key).or_else(|| self.global.get(key)),
            Scope::Component(name) => self
                .components
                .get(name)
                .and_then(|m| m.get(key))
                .or_else(|| self.season.get(key))
                .or_else(|| self.global.get(key)),
        }
    }

    /// Looks a key up, returning a caller-supplied default on a miss.
    pub fn get_or(&self, scope: &Scope, key: &str, default: Value) -> Value {
        self.get(scope, key).cloned().unwrap_or(default)
    }

    /// Returns the active season name.
    pub fn season_name(&self) -> Option<&str> {
        self.get(&Scope::Global, "season").and_then(Value::as_str)
    }

    /// Returns true when no persistence-connection document was found.
    ///
    /// Persistence-dependent modules should check this flag and disable
    /// themselves instead of failing.
    pub fn persistence_disabled(&self) -> bool {
        self.get(&Scope::Global, NO_DATABASE_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use serde_yaml::Mapping;

    #[test]
    fn test_snapshot_preserves_fallback_chain() {
        let mut store = ConfigStore::new();
        let mut m = Mapping::new();
        m.insert(
            Value::String("season".into()),
            Value::String("testing".into()),
        );
        store.set_global(m);

        let snap = store.freeze();
        assert_eq!(snap.season_name(), Some("testing"));
        assert_eq!(
            snap.get(&Scope::Component("any".into()), "season"),
            Some(&Value::String("testing".into()))
        );
    }

    #[test]
    fn test_persistence_flag_defaults_to_false() {
        let snap = ConfigStore::new().freeze();
        assert!(!snap.persistence_disabled());
    }

    #[test]
    fn test_persistence_flag_reads_global_key() {
        let mut store = ConfigStore::new();
        store.set_global_key(NO_DATABASE_KEY, Value::Bool(true));
        assert!(store.freeze().persistence_disabled());
    }
}
