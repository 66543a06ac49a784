//! Leveled logging setup.
//!
//! Installs a `tracing` subscriber once at startup, with the level taken from
//! the `--log` flag. Diagnostics go to stderr so stdout stays clean for the
//! `scan` subcommand's JSON. A `RUST_LOG` directive, when set, overrides the
//! flag entirely.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Parse a `--log` level name.
///
/// Accepts trace, debug, info, warn, error, fatal, and panic; the last two
/// clamp to `error` since `tracing` has no severities above it. Unknown names
/// fall back to `info` with a note on stderr.
pub fn parse_level(name: &str) -> Level {
    match name.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" | "fatal" | "panic" => Level::ERROR,
        other => {
            eprintln!("unknown log level '{other}', defaulting to info");
            Level::INFO
        }
    }
}

/// Install the global subscriber. Call once from `main`, before any stage runs.
pub fn init(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("autobake={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
