//! Bake manifest emission.
//!
//! Stage 3 of the run. Renders the derived targets into a `docker-bake.hcl`
//! document and writes it out atomically.
//!
//! ## Document Layout
//!
//! ```hcl
//! variable "DOCKER_USERNAME" {
//!   default = "alice"
//! }
//!
//! variable "DOCKER_REGISTRY_PREFIX" {
//!   default = "acme"
//! }
//!
//! variable "TAG" {
//!   default = "latest"
//! }
//!
//! group "acme-modules" {
//!   targets = ["app", "app-test"]
//! }
//!
//! target "app" {
//!   dockerfile = "Dockerfile"
//!   context = "modules/app"
//!   platforms = ["linux/amd64", "linux/arm64/v8"]
//!   tags = "${DOCKER_USERNAME}/${DOCKER_REGISTRY_PREFIX}-app:${TAG}"
//! }
//! ```
//!
//! ## Architecture
//!
//! Rendering targets the [`ManifestWriter`] trait rather than a concrete
//! syntax, keeping the block/attribute emission a swappable collaborator.
//! [`HclWriter`] is the bundled implementation. Plain string attributes
//! escape `${` so filesystem names can never inject template expressions;
//! the tag string goes through [`ManifestWriter::attr_template`] because its
//! variable references must survive verbatim for the bake consumer.
//!
//! ## Atomic Write
//!
//! The document is staged in a temp file next to the destination and renamed
//! into place, so a failed run never leaves a truncated manifest behind.

use crate::targets::Target;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Manifest filename written into the invocation directory by default.
pub const DEFAULT_OUTPUT: &str = "docker-bake.hcl";

/// Platforms declared on every target.
pub const PLATFORMS: &[&str] = &["linux/amd64", "linux/arm64/v8"];

#[derive(Error, Debug)]
pub enum BakeError {
    #[error("failed to write manifest {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Block/attribute sink the renderer emits into.
///
/// `begin_block`/`end_block` bracket a labeled block; attribute calls are
/// only valid between them.
pub trait ManifestWriter {
    fn begin_block(&mut self, kind: &str, label: &str);
    fn end_block(&mut self);
    /// Quoted string attribute; the value is escaped as needed.
    fn attr_str(&mut self, key: &str, value: &str);
    /// Quoted string attribute whose `${VAR}` references must survive verbatim.
    fn attr_template(&mut self, key: &str, value: &str);
    /// List-of-strings attribute.
    fn attr_str_list(&mut self, key: &str, values: &[&str]);
}

/// [`ManifestWriter`] that accumulates HCL text.
#[derive(Debug, Default)]
pub struct HclWriter {
    buf: String,
}

impl HclWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    /// Quote a string value. `escape_templates` turns `${` into `$${` and
    /// `%{` into `%%{` so the value reads back as literal text.
    fn quote(value: &str, escape_templates: bool) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '"' => escaped.push_str("\\\""),
                '\\' => escaped.push_str("\\\\"),
                '\n' => escaped.push_str("\\n"),
                _ => escaped.push(c),
            }
        }
        if escape_templates {
            escaped = escaped.replace("${", "$${").replace("%{", "%%{");
        }
        format!("\"{escaped}\"")
    }
}

impl ManifestWriter for HclWriter {
    fn begin_block(&mut self, kind: &str, label: &str) {
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
        self.buf.push_str(kind);
        self.buf.push(' ');
        self.buf.push_str(&Self::quote(label, true));
        self.buf.push_str(" {\n");
    }

    fn end_block(&mut self) {
        self.buf.push_str("}\n");
    }

    fn attr_str(&mut self, key: &str, value: &str) {
        let quoted = Self::quote(value, true);
        self.buf.push_str(&format!("  {key} = {quoted}\n"));
    }

    fn attr_template(&mut self, key: &str, value: &str) {
        let quoted = Self::quote(value, false);
        self.buf.push_str(&format!("  {key} = {quoted}\n"));
    }

    fn attr_str_list(&mut self, key: &str, values: &[&str]) {
        let items: Vec<String> = values.iter().map(|v| Self::quote(v, true)).collect();
        self.buf
            .push_str(&format!("  {key} = [{}]\n", items.join(", ")));
    }
}

/// Emit the full bake document: variable declarations, the group listing
/// every target name, and one target block per derived target.
pub fn render(
    writer: &mut dyn ManifestWriter,
    username: &str,
    registry_prefix: &str,
    targets: &[Target],
) {
    writer.begin_block("variable", "DOCKER_USERNAME");
    writer.attr_str("default", username);
    writer.end_block();

    writer.begin_block("variable", "DOCKER_REGISTRY_PREFIX");
    writer.attr_str("default", registry_prefix);
    writer.end_block();

    writer.begin_block("variable", "TAG");
    writer.attr_str("default", "latest");
    writer.end_block();

    let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
    writer.begin_block("group", &format!("{registry_prefix}-modules"));
    writer.attr_str_list("targets", &names);
    writer.end_block();

    for target in targets {
        writer.begin_block("target", &target.name);
        writer.attr_str("dockerfile", &target.dockerfile);
        writer.attr_str("context", &target.context);
        writer.attr_str_list("platforms", PLATFORMS);
        writer.attr_template("tags", &target.image_tag());
        writer.end_block();
    }
}

/// Render the manifest and write it to `path`, replacing any existing file.
pub fn write_manifest(
    path: &Path,
    username: &str,
    registry_prefix: &str,
    targets: &[Target],
) -> Result<(), BakeError> {
    let mut writer = HclWriter::new();
    render(&mut writer, username, registry_prefix, targets);
    let rendered = writer.into_string();

    let tmp = staging_path(path);
    let result = fs::write(&tmp, rendered.as_bytes()).and_then(|()| fs::rename(&tmp, path));
    if let Err(source) = result {
        let _ = fs::remove_file(&tmp);
        return Err(BakeError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    info!(path = %path.display(), targets = targets.len(), "wrote bake manifest");
    Ok(())
}

/// Staging file beside the destination, so the rename stays on one filesystem.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_OUTPUT.into());
    name.push(".tmp");
    path.with_file_name(name)
}
