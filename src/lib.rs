//! # Autobake
//!
//! Generates a `docker-bake.hcl` multi-target build manifest from a directory
//! of modules. Your filesystem is the data source: each subdirectory of the
//! modules path is a module, and every Dockerfile inside it becomes a bake
//! target with a derived name and image tag.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan     modules/  →  ModuleMap      (filesystem → structured data)
//! 2. Derive   ModuleMap →  Vec<Target>    (naming convention → identities)
//! 3. Emit     targets   →  docker-bake.hcl
//! ```
//!
//! The stages are independent and the first two are pure given their inputs,
//! so unit tests can exercise derivation and emission without touching the
//! filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — walks the modules directory one level deep, produces the module map |
//! | [`targets`] | Stage 2 — derives target names, purposes, and image tags; detects name collisions |
//! | [`bake`] | Stage 3 — renders and atomically writes the HCL manifest via the [`bake::ManifestWriter`] trait |
//! | [`naming`] | Dockerfile naming-convention parser shared by scan and derive |
//! | [`logging`] | `tracing` subscriber setup from the `--log` flag |
//! | [`output`] | CLI output formatting — module/target display and run summaries |
//!
//! # Design Decisions
//!
//! ## Deterministic Output
//!
//! Modules and build files are sorted lexicographically during the scan, so
//! two runs over an unchanged tree emit byte-identical manifests. Diff-able
//! output matters for a generated file that usually lives in version control.
//!
//! ## Collisions Are Errors
//!
//! The symmetric naming convention means `Dockerfile.foo` and `foo.Dockerfile`
//! derive the same target name. Rather than letting the second silently
//! shadow the first, derivation fails with both offending files named.
//!
//! ## One Level Deep
//!
//! Only immediate subdirectories of the modules path are modules, and only
//! files directly inside a module are considered. Recursive discovery would
//! make the context/name mapping ambiguous and is deliberately not supported.

pub mod bake;
pub mod logging;
pub mod naming;
pub mod output;
pub mod scan;
pub mod targets;
