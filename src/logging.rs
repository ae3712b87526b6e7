//! File logging
//!
//! The terminal belongs to the UI, so log lines go to
//! `<config dir>/node-console.log`.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NODE_CONSOLE_LOG";
pub const LOG_FILE: &str = "node-console.log";

/// `--log-level` wins, then `NODE_CONSOLE_LOG`, then `info`
pub fn env_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("invalid log filter `{level}`")),
        None => Ok(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))),
    }
}

/// Install the global subscriber; keep the guard alive until exit so
/// buffered lines are flushed
pub fn init(dir: &Path, level: Option<&str>) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level)?)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install logger: {err}"))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level() {
        let filter = env_filter(Some("node_console=debug")).unwrap();
        assert_eq!(filter.to_string(), "node_console=debug");
    }

    #[test]
    fn test_invalid_level_is_an_error() {
        assert!(env_filter(Some("node_console=loud")).is_err());
    }
}
