//! Filesystem scanning: module and build-file discovery.
//!
//! Stage 1 of the run. Walks the modules directory exactly one level deep:
//! every immediate subdirectory is a module, and build files are only looked
//! for directly inside it. Subdirectories of modules are never visited.
//!
//! ## Directory Structure
//!
//! ```text
//! modules/                         # Modules root (--modules-path)
//! ├── app/
//! │   ├── Dockerfile               # matched
//! │   ├── Dockerfile.test          # matched
//! │   └── src/                     # never descended into
//! ├── worker/
//! │   └── prod.Dockerfile          # matched (prefix convention)
//! ├── docs/                        # no build files → omitted from the map
//! └── README.md                    # plain file at the root → ignored
//! ```
//!
//! ## Determinism
//!
//! Directory iteration order is filesystem-dependent, so modules and the
//! build files within each module are sorted lexicographically before being
//! returned. Two runs over an unchanged tree produce identical maps, which
//! keeps the emitted manifest byte-identical across runs.
//!
//! ## Error Handling
//!
//! An unreadable root is fatal — there is nothing useful to emit without it.
//! A single unreadable module directory is logged and skipped; the rest of
//! the scan continues.

use crate::naming;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to read modules directory {path}: {source}")]
    RootUnreadable { path: PathBuf, source: io::Error },
}

/// A module directory and the build files discovered directly inside it.
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    /// Directory basename, used as the build namespace.
    pub name: String,
    /// Path to the module directory as given (joined onto the modules root).
    pub path: PathBuf,
    /// Matching build-file names, sorted. Never empty: modules without
    /// build files are omitted from the map entirely.
    pub build_files: Vec<String>,
}

/// Discovery output: modules sorted by name.
#[derive(Debug, Default, Serialize)]
pub struct ModuleMap {
    pub modules: Vec<Module>,
}

impl ModuleMap {
    /// Total build files across all modules.
    pub fn build_file_count(&self) -> usize {
        self.modules.iter().map(|m| m.build_files.len()).sum()
    }
}

/// Scan the modules root one level deep.
///
/// Returns one [`Module`] per immediate subdirectory that contains at least
/// one file matching the naming convention in [`naming::classify`].
pub fn scan(root: &Path) -> Result<ModuleMap, ScanError> {
    info!(path = %root.display(), "scanning modules directory");

    let entries = fs::read_dir(root).map_err(|source| ScanError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    let mut modules = Vec::new();
    for dir in dirs {
        let Some(name) = dir.file_name() else {
            continue;
        };
        let name = name.to_string_lossy().to_string();
        debug!(module = %name, "exploring module directory");

        let build_files = match list_build_files(&dir) {
            Ok(files) => files,
            Err(err) => {
                warn!(module = %name, error = %err, "failed to list module directory, skipping");
                continue;
            }
        };

        if build_files.is_empty() {
            debug!(module = %name, "no build files found, omitting module");
            continue;
        }

        modules.push(Module {
            name,
            path: dir,
            build_files,
        });
    }

    let map = ModuleMap { modules };
    info!(
        modules = map.modules.len(),
        build_files = map.build_file_count(),
        "scan complete"
    );
    Ok(map)
}

/// List build-file names directly inside a module directory, sorted.
fn list_build_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        // Cheap pre-filter before the strict classification
        if !name.contains("Dockerfile") {
            continue;
        }
        if naming::classify(&name).is_some() {
            debug!(file = %name, "found build file");
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn module_with_files(root: &Path, module: &str, files: &[&str]) {
        let dir = root.join(module);
        fs::create_dir_all(&dir).unwrap();
        for f in files {
            fs::write(dir.join(f), "FROM scratch\n").unwrap();
        }
    }

    #[test]
    fn finds_all_modules_and_build_files() {
        let tmp = TempDir::new().unwrap();
        module_with_files(tmp.path(), "app", &["Dockerfile", "Dockerfile.test"]);
        module_with_files(tmp.path(), "worker", &["prod.Dockerfile"]);

        let map = scan(tmp.path()).unwrap();

        assert_eq!(map.modules.len(), 2);
        assert_eq!(map.build_file_count(), 3);
    }

    #[test]
    fn modules_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        module_with_files(tmp.path(), "zeta", &["Dockerfile"]);
        module_with_files(tmp.path(), "alpha", &["Dockerfile"]);
        module_with_files(tmp.path(), "mid", &["Dockerfile"]);

        let map = scan(tmp.path()).unwrap();

        let names: Vec<&str> = map.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn build_files_sorted_within_module() {
        let tmp = TempDir::new().unwrap();
        module_with_files(
            tmp.path(),
            "app",
            &["Dockerfile.test", "Dockerfile", "ci.Dockerfile"],
        );

        let map = scan(tmp.path()).unwrap();

        assert_eq!(
            map.modules[0].build_files,
            vec!["Dockerfile", "Dockerfile.test", "ci.Dockerfile"]
        );
    }

    #[test]
    fn module_without_build_files_omitted() {
        let tmp = TempDir::new().unwrap();
        module_with_files(tmp.path(), "app", &["Dockerfile"]);
        module_with_files(tmp.path(), "docs", &["README.md"]);

        let map = scan(tmp.path()).unwrap();

        assert_eq!(map.modules.len(), 1);
        assert_eq!(map.modules[0].name, "app");
    }

    #[test]
    fn plain_files_at_root_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Dockerfile"), "FROM scratch\n").unwrap();
        module_with_files(tmp.path(), "app", &["Dockerfile"]);

        let map = scan(tmp.path()).unwrap();

        assert_eq!(map.modules.len(), 1);
        assert_eq!(map.build_file_count(), 1);
    }

    #[test]
    fn nested_directories_not_visited() {
        let tmp = TempDir::new().unwrap();
        module_with_files(tmp.path(), "app", &["Dockerfile"]);
        module_with_files(&tmp.path().join("app"), "nested", &["Dockerfile.deep"]);

        let map = scan(tmp.path()).unwrap();

        assert_eq!(map.modules.len(), 1);
        assert_eq!(map.modules[0].build_files, vec!["Dockerfile"]);
    }

    #[test]
    fn directory_named_dockerfile_not_matched() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("app");
        fs::create_dir_all(dir.join("Dockerfile.d")).unwrap();
        fs::write(dir.join("Dockerfile"), "FROM scratch\n").unwrap();

        let map = scan(tmp.path()).unwrap();

        assert_eq!(map.modules[0].build_files, vec!["Dockerfile"]);
    }

    #[test]
    fn names_failing_strict_pattern_excluded() {
        let tmp = TempDir::new().unwrap();
        module_with_files(
            tmp.path(),
            "app",
            &["Dockerfile", "old-Dockerfile.txt", "Dockerfile.bad!"],
        );

        let map = scan(tmp.path()).unwrap();

        assert_eq!(map.modules[0].build_files, vec!["Dockerfile"]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_module_logged_and_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        module_with_files(tmp.path(), "app", &["Dockerfile"]);
        module_with_files(tmp.path(), "locked", &["Dockerfile"]);

        let locked = tmp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores directory permissions, so the skip path can't trigger
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let map = scan(tmp.path()).unwrap();

        // restore so TempDir cleanup can remove the directory
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let names: Vec<&str> = map.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["app"]);
    }

    #[test]
    fn unreadable_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("does-not-exist");

        let result = scan(&missing);

        assert!(matches!(result, Err(ScanError::RootUnreadable { .. })));
    }

    #[test]
    fn empty_root_yields_empty_map() {
        let tmp = TempDir::new().unwrap();

        let map = scan(tmp.path()).unwrap();

        assert!(map.modules.is_empty());
        assert_eq!(map.build_file_count(), 0);
    }

    #[test]
    fn module_path_joins_root() {
        let tmp = TempDir::new().unwrap();
        module_with_files(tmp.path(), "app", &["Dockerfile"]);

        let map = scan(tmp.path()).unwrap();

        assert_eq!(map.modules[0].path, tmp.path().join("app"));
    }
}
