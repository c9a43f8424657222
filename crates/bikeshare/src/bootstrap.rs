use std::path::Path;

use anyhow::{bail, Context};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a logging-style level name (`WARNING`, `CRITICAL`, ...) to a tracing
/// filter directive.
///
/// Unrecognised names are passed through so `EnvFilter` syntax such as
/// `"bikeshare_data=debug"` still works.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" | "CRITICAL" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber, writing to stderr.
///
/// Falls back to `"warn"` if the level string is not a valid filter.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .context("tracing subscriber already initialised")?;

    Ok(())
}

// ── Data directory check ───────────────────────────────────────────────────────

/// Fail early with a readable message when `--data-dir` is not a directory.
pub fn check_data_dir(data_dir: &Path) -> anyhow::Result<()> {
    if !data_dir.is_dir() {
        bail!("data directory {} does not exist", data_dir.display());
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
