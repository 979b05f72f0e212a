//! # Daemon descriptor discovery.
//!
//! Long-lived helper processes are described declaratively, one YAML file
//! per daemon under `resources/daemons`. The registry parses each file into
//! a [`DaemonDescriptor`] named after the file's base name in canonical
//! CamelCase form (`my_thing.yml` → `MyThing`).
//!
//! The registry only holds descriptors; running and supervising the daemons
//! themselves is an external collaborator's job.

use std::path::Path;

use serde_yaml::Value;

use crate::error::BootError;
use crate::ident;

/// One discovered daemon: a canonical name plus its opaque configuration.
///
/// Created during bootstrap, owned by the registry for the process lifetime,
/// never mutated after creation.
#[derive(Clone, Debug)]
pub struct DaemonDescriptor {
    /// Canonical daemon name derived from the file name.
    pub name: String,
    /// The parsed configuration payload, uninterpreted by the core.
    pub config: Value,
}

/// Registry of discovered daemon descriptors, sorted by name.
#[derive(Debug, Default)]
pub struct DaemonRegistry {
    daemons: Vec<DaemonDescriptor>,
}

impl DaemonRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans a directory for `*.yml` descriptor files.
    ///
    /// A missing directory or zero files yields a valid empty registry.
    /// A present but unparsable file is an error.
    pub fn discover(dir: &Path) -> Result<Self, BootError> {
        let mut daemons = Vec::new();
        if !dir.is_dir() {
            return Ok(Self { daemons });
        }

        let entries = std::fs::read_dir(dir).map_err(|source| BootError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| BootError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yml") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let text = std::fs::read_to_string(&path).map_err(|source| BootError::Io {
                path: path.clone(),
                source,
            })?;
            let config: Value =
                serde_yaml::from_str(&text).map_err(|source| BootError::Document {
                    path: path.clone(),
                    source,
                })?;

            daemons.push(DaemonDescriptor {
                name: ident::canonical(stem),
                config,
            });
        }

        daemons.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { daemons })
    }

    /// Returns the descriptor with the given canonical name.
    pub fn get(&self, name: &str) -> Option<&DaemonDescriptor> {
        self.daemons.iter().find(|d| d.name == name)
    }

    /// Iterates descriptors in name order.
    pub fn iter(&self) -> impl Iterator<Item = &DaemonDescriptor> {
        self.daemons.iter()
    }

    /// Returns the number of discovered daemons.
    pub fn len(&self) -> usize {
        self.daemons.len()
    }

    /// Returns true when no descriptors were discovered.
    pub fn is_empty(&self) -> bool {
        self.daemons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discovers_and_canonicalizes_names() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("my_thing.yml"), "port: 9000\n").unwrap();
        std::fs::write(tmp.path().join("watcher.yml"), "interval: 5\n").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let registry = DaemonRegistry::discover(tmp.path()).unwrap();
        assert_eq!(registry.len(), 2);

        let names: Vec<&str> = registry.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["MyThing", "Watcher"]);

        let daemon = registry.get("MyThing").unwrap();
        assert_eq!(daemon.config["port"], Value::Number(9000.into()));
    }

    #[test]
    fn test_missing_directory_is_empty_registry() {
        let tmp = TempDir::new().unwrap();
        let registry = DaemonRegistry::discover(&tmp.path().join("daemons")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unparsable_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("bad.yml"), ": [ not yaml").unwrap();
        let err = DaemonRegistry::discover(tmp.path()).unwrap_err();
        assert_eq!(err.as_label(), "boot_malformed_document");
    }
}
