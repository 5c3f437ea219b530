//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the console works against a local
//! linq API out of the box.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Where the linq API lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Screen behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Route shown when the location fragment is empty.
    #[serde(default = "default_route")]
    pub default_route: String,
    #[serde(default = "default_page_length")]
    pub page_length: usize,
    /// How many ticks (50ms each) a notification stays on screen.
    #[serde(default = "default_toast_ticks")]
    pub toast_ticks: u32,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// Optional TOML table overriding the built-in English strings.
    #[serde(default)]
    pub language_file: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_route: default_route(),
            page_length: default_page_length(),
            toast_ticks: default_toast_ticks(),
            timestamp_format: default_timestamp_format(),
            language_file: None,
        }
    }
}

/// Diagnostic log settings. The terminal owns stdout, so logs go to a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_log_file")]
    pub file: String,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}
fn default_timeout_secs() -> u64 {
    20
}
fn default_route() -> String {
    "#/home".to_string()
}
fn default_page_length() -> usize {
    25
}
fn default_toast_ticks() -> u32 {
    80 // 4 seconds at 20 FPS
}
fn default_timestamp_format() -> String {
    "%H:%M:%S".to_string()
}
fn default_log_file() -> String {
    "~/.local/share/linq-console/console.log".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
