//! # Scoped key/value configuration store.
//!
//! [`ConfigStore`] holds three scopes of settings:
//! - **global** — from the global settings document,
//! - **season** — from the active season's document,
//! - **component** — per worker or module name.
//!
//! ## Fallback chain
//! ```text
//! get(Component("scorekeeper"), "db")
//!     │ component map miss
//!     ▼
//! season scope ── miss ──► global scope ── miss ──► caller default / error
//! ```
//!
//! ## Lifecycle
//! Created once at process start, mutated only by the bootstrap phases
//! (single writer), then frozen into a [`ConfigSnapshot`](super::ConfigSnapshot)
//! for lock-free concurrent reads.

use std::collections::HashMap;

use serde_yaml::{Mapping, Value};

use crate::error::BootError;

/// Well-known global key recording the persistence-unavailable flag.
pub(crate) const NO_DATABASE_KEY: &str = "no_database";

/// Scope a lookup starts from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Global settings document.
    Global,
    /// Active season's settings document.
    Season,
    /// Per-component settings for the named worker or module.
    ///
    /// Lookups fall back season → global when the component map misses.
    Component(String),
}

impl Scope {
    fn describe(&self) -> String {
        match self {
            Scope::Global => "global".to_string(),
            Scope::Season => "season".to_string(),
            Scope::Component(name) => format!("component:{name}"),
        }
    }
}

/// Mutable configuration register used during bootstrap.
#[derive(Debug, Default)]
pub struct ConfigStore {
    global: HashMap<String, Value>,
    season: HashMap<String, Value>,
    components: HashMap<String, HashMap<String, Value>>,
}

/// Converts a YAML mapping into a string-keyed map, skipping non-string keys.
fn string_keyed(mapping: Mapping) -> HashMap<String, Value> {
    mapping
        .into_iter()
        .filter_map(|(k, v)| match k {
            Value::String(s) => Some((s, v)),
            _ => None,
        })
        .collect()
}

impl ConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a mapping into the global scope.
    pub fn set_global(&mut self, mapping: Mapping) {
        self.global.extend(string_keyed(mapping));
    }

    /// Sets a single global key.
    pub fn set_global_key(&mut self, key: impl Into<String>, value: Value) {
        self.global.insert(key.into(), value);
    }

    /// Merges a mapping into the season scope.
    pub fn set_season(&mut self, mapping: Mapping) {
        self.season.extend(string_keyed(mapping));
    }

    /// Merges a mapping into the named component's scope.
    pub fn set_component(&mut self, component: impl Into<String>, mapping: Mapping) {
        self.components
            .entry(component.into())
            .or_default()
            .extend(string_keyed(mapping));
    }

    /// Looks a key up, walking the fallback chain for component scopes.
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

    /// Looks a required key up; a miss across the whole chain is an error.
    pub fn require(&self, scope: &Scope, key: &str) -> Result<&Value, BootError> {
        self.get(scope, key).ok_or_else(|| BootError::MissingKey {
            scope: scope.describe(),
            key: key.to_string(),
        })
    }

    /// Freezes the store into an immutable snapshot.
    ///
    /// Bootstrap calls this once writes cease; the snapshot is then shared
    /// with every worker and module.
    pub fn freeze(self) -> super::ConfigSnapshot {
        super::ConfigSnapshot::new(self.global, self.season, self.components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> Mapping {
        pairs
            .iter()
            .map(|(k, v)| (Value::String(k.to_string()), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn test_component_falls_back_to_season_then_global() {
        let mut store = ConfigStore::new();
        store.set_global(mapping(&[("nick", "arbor"), ("realname", "Arbor Bot")]));
        store.set_season(mapping(&[("nick", "arbor-dev")]));
        store.set_component("scorekeeper", mapping(&[("channel", "#scores")]));

        let scope = Scope::Component("scorekeeper".into());
        assert_eq!(
            store.get(&scope, "channel"),
            Some(&Value::String("#scores".into()))
        );
        // Season shadows global.
        assert_eq!(
            store.get(&scope, "nick"),
            Some(&Value::String("arbor-dev".into()))
        );
        // Global is the last resort.
        assert_eq!(
            store.get(&scope, "realname"),
            Some(&Value::String("Arbor Bot".into()))
        );
    }

    #[test]
    fn test_get_or_returns_default_on_miss() {
        let store = ConfigStore::new();
        let v = store.get_or(&Scope::Global, "port", Value::Number(6667.into()));
        assert_eq!(v, Value::Number(6667.into()));
    }

    #[test]
    fn test_require_errors_on_unset_key() {
        let store = ConfigStore::new();
        let err = store.require(&Scope::Season, "server").unwrap_err();
        assert_eq!(err.as_label(), "boot_missing_key");
    }

    #[test]
    fn test_non_string_keys_are_skipped() {
        let mut store = ConfigStore::new();
        let mut m = Mapping::new();
        m.insert(Value::Number(1.into()), Value::String("x".into()));
        m.insert(Value::String("ok".into()), Value::String("y".into()));
        store.set_global(m);
        assert_eq!(store.get(&Scope::Global, "ok"), Some(&Value::String("y".into())));
    }
}
