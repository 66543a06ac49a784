//! Target derivation: build files → bake target descriptors.
//!
//! Stage 2 of the run. Consumes the scanner's [`ModuleMap`] and produces one
//! [`Target`] per (module, build file) pair. Derivation is a pure function of
//! the module name and the build-file name; no filesystem access happens here.
//!
//! ## Naming
//!
//! The target name is the module name, extended with the build file's purpose
//! when it has one:
//!
//! | Module | Build file        | Target name | Purpose |
//! |--------|-------------------|-------------|---------|
//! | `app`  | `Dockerfile`      | `app`       | *(empty)* |
//! | `app`  | `Dockerfile.test` | `app-test`  | `test`  |
//! | `app`  | `prod.Dockerfile` | `app-prod`  | `prod`  |
//! | `app`  | `Dockerfile.a.b`  | `app-a-b`   | `a-b`   |
//!
//! Target names must be unique across the whole run. The symmetric naming
//! convention makes collisions possible (`Dockerfile.foo` next to
//! `foo.Dockerfile`, or module `a` with purpose `b-c` next to module `a-b`
//! with purpose `c`), so derivation fails with a descriptive error instead of
//! emitting a manifest with duplicate target blocks.

use crate::naming;
use crate::scan::{Module, ModuleMap};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DeriveError {
    #[error("duplicate target name {name:?}: {first} and {second} both derive it")]
    DuplicateTarget {
        name: String,
        first: String,
        second: String,
    },
    #[error("build file {file:?} in module {module:?} does not follow the naming convention")]
    UnrecognizedBuildFile { module: String, file: String },
}

/// One bake target: a (module, build file) pair with its derived identity.
#[derive(Debug, Clone, Serialize)]
pub struct Target {
    /// Derived target name, unique within a run.
    pub name: String,
    /// Owning module name.
    pub module: String,
    /// Build context: the module directory path, never a subpath.
    pub context: String,
    /// Build-file name relative to the context.
    pub dockerfile: String,
    /// Purpose extracted from the filename; empty for a bare `Dockerfile`.
    pub purpose: String,
}

impl Target {
    /// Image reference template consumed by `docker buildx bake`.
    ///
    /// The username, registry prefix, and tag stay as `${VAR}` references so
    /// the bake consumer substitutes them at build time:
    ///
    /// ```text
    /// ${DOCKER_USERNAME}/${DOCKER_REGISTRY_PREFIX}-app:${TAG}
    /// ${DOCKER_USERNAME}/${DOCKER_REGISTRY_PREFIX}-app:${TAG}-test
    /// ```
    pub fn image_tag(&self) -> String {
        let mut tag = format!(
            "${{DOCKER_USERNAME}}/${{DOCKER_REGISTRY_PREFIX}}-{}:${{TAG}}",
            self.module
        );
        if !self.purpose.is_empty() {
            tag.push('-');
            tag.push_str(&self.purpose);
        }
        tag
    }
}

/// Derive a single target from a module and one of its build-file names.
pub fn derive_target(module: &Module, build_file: &str) -> Result<Target, DeriveError> {
    let kind = naming::classify(build_file).ok_or_else(|| DeriveError::UnrecognizedBuildFile {
        module: module.name.clone(),
        file: build_file.to_string(),
    })?;

    let purpose = kind.purpose().to_string();
    let name = if purpose.is_empty() {
        module.name.clone()
    } else {
        format!("{}-{}", module.name, purpose)
    };

    Ok(Target {
        name,
        module: module.name.clone(),
        context: module.path.to_string_lossy().to_string(),
        dockerfile: build_file.to_string(),
        purpose,
    })
}

/// Derive one target per (module, build file) pair, in map order.
///
/// Fails on the first target-name collision, naming both contributing build
/// files in the error.
pub fn derive_targets(map: &ModuleMap) -> Result<Vec<Target>, DeriveError> {
    let mut targets = Vec::new();
    // target name → "module/build-file" that first produced it
    let mut seen: BTreeMap<String, String> = BTreeMap::new();

    for module in &map.modules {
        for build_file in &module.build_files {
            let target = derive_target(module, build_file)?;
            let origin = format!("{}/{}", module.name, build_file);

            if let Some(first) = seen.get(&target.name) {
                return Err(DeriveError::DuplicateTarget {
                    name: target.name,
                    first: first.clone(),
                    second: origin,
                });
            }

            debug!(target = %target.name, dockerfile = %build_file, "derived target");
            seen.insert(target.name.clone(), origin);
            targets.push(target);
        }
    }

    Ok(targets)
}
