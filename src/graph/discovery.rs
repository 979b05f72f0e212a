//! # Module discovery fallback.
//!
//! When the module-descriptor document is absent, the loader synthesizes a
//! default set by enumerating subdirectories of the modules root: every
//! non-hidden directory becomes one module whose logical name is the
//! canonical CamelCase form of the directory name and whose implementation
//! equals that name.
//!
//! The result is sorted by logical name so discovery is deterministic across
//! platforms with different directory-iteration order.

use std::path::Path;

use crate::error::BootError;
use crate::ident;

use super::module::ModuleDescriptor;

/// Enumerates the modules root and synthesizes one descriptor per directory.
///
/// A missing root yields an empty set; discovery is a convenience fallback,
/// not an error path. Hidden directories (leading `.`) are skipped.
pub fn discover_modules(root: &Path) -> Result<Vec<ModuleDescriptor>, BootError> {
    let mut found = Vec::new();
    if !root.is_dir() {
        return Ok(found);
    }

    let entries = std::fs::read_dir(root).map_err(|source| BootError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| BootError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(dir_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if dir_name.starts_with('.') {
            continue;
        }
        found.push(ModuleDescriptor::same_named(ident::canonical(dir_name)));
    }

    found.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discovers_sorted_canonical_names() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("foo")).unwrap();
        std::fs::create_dir(tmp.path().join("bar_baz")).unwrap();

        let found = discover_modules(tmp.path()).unwrap();
        let names: Vec<&str> = found.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["BarBaz", "Foo"]);
        for desc in &found {
            assert_eq!(desc.implementation_name(), desc.name);
        }
    }

    #[test]
    fn test_skips_hidden_dirs_and_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join(".git")).unwrap();
        std::fs::create_dir(tmp.path().join("greeter")).unwrap();
        std::fs::write(tmp.path().join("README"), "not a module").unwrap();

        let found = discover_modules(tmp.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Greeter");
    }

    #[test]
    fn test_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let found = discover_modules(&tmp.path().join("nope")).unwrap();
        assert!(found.is_empty());
    }
}
