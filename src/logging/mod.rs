//! Diagnostic logging to disk.
//!
//! The terminal UI owns stdout, so `tracing` output is written to the file
//! named in `[logging]` (default: `~/.local/share/linq-console/console.log`).
//! `RUST_LOG` takes precedence over the configured level.

use crate::config::{expand_home, LoggingConfig};
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. No-op when logging is disabled.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let path = expand_home(&config.file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();

    tracing::info!(file = %path.display(), "logging started");
    Ok(())
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_logging_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sub").join("console.log");
        let config = LoggingConfig {
            enabled: false,
            file: file.display().to_string(),
            level: "debug".into(),
        };
        init(&config).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_level_filter_uses_configured_level() {
        assert_eq!(level_filter("debug").to_string(), "debug");
    }
}
