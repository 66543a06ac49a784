//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ## Check
//!
//! ```text
//! Modules
//! app (2 build files)
//!     Dockerfile → app
//!     Dockerfile.test → app-test
//! worker (1 build file)
//!     prod.Dockerfile → worker-prod
//!
//! Found 3 targets across 2 modules
//! ```
//!
//! ## Generate
//!
//! Check output plus the destination line:
//!
//! ```text
//! Wrote docker-bake.hcl
//! ```

use crate::scan::ModuleMap;
use crate::targets::Target;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 build file`, `2 build files`.
fn build_file_count(n: usize) -> String {
    if n == 1 {
        "1 build file".to_string()
    } else {
        format!("{n} build files")
    }
}

/// One line per module, one indented line per build file with its target name.
pub fn format_check_output(map: &ModuleMap, targets: &[Target]) -> Vec<String> {
    let mut lines = Vec::new();

    if map.modules.is_empty() {
        lines.push("No modules with build files found".to_string());
    } else {
        lines.push("Modules".to_string());
        for module in &map.modules {
            lines.push(format!(
                "{} ({})",
                module.name,
                build_file_count(module.build_files.len())
            ));
            for build_file in &module.build_files {
                let name = targets
                    .iter()
                    .find(|t| t.module == module.name && &t.dockerfile == build_file)
                    .map(|t| t.name.as_str())
                    .unwrap_or("?");
                lines.push(format!("{}{build_file} → {name}", indent(1)));
            }
        }
    }

    lines.push(String::new());
    lines.push(format_summary(map, targets));
    lines
}

/// The closing summary line.
pub fn format_summary(map: &ModuleMap, targets: &[Target]) -> String {
    format!(
        "Found {} targets across {} modules",
        targets.len(),
        map.modules.len()
    )
}

pub fn print_check_output(map: &ModuleMap, targets: &[Target]) {
    for line in format_check_output(map, targets) {
        println!("{line}");
    }
}

pub fn print_generate_output(map: &ModuleMap, targets: &[Target], output: &Path) {
    print_check_output(map, targets);
    println!("Wrote {}", output.display());
}
