//! Viewer configuration loaded from `conf/config.toml`.
//!
//! Every field has a default so a missing or partial file still yields a
//! working setup. Out-of-range values are clamped rather than rejected.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Host tick cadence in milliseconds; drives flip animation and the
    /// timeline polls.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Maximum drift in seconds tolerated between a lead clip and its
    /// dependant before the dependant is re-seeked.
    #[serde(default = "default_sync_tolerance_secs")]
    pub sync_tolerance_secs: f64,
    /// How often the lead/dependant pair is compared, in milliseconds.
    #[serde(default = "default_sync_interval_ms")]
    pub sync_interval_ms: u64,
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_window_width() -> f32 {
    1180.0
}

fn default_window_height() -> f32 {
    740.0
}

fn default_tick_interval_ms() -> u64 {
    16
}

fn default_sync_tolerance_secs() -> f64 {
    0.05
}

fn default_sync_interval_ms() -> u64 {
    500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            tick_interval_ms: default_tick_interval_ms(),
            sync_tolerance_secs: default_sync_tolerance_secs(),
            sync_interval_ms: default_sync_interval_ms(),
            log_level: LogLevel::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Loads configuration, falling back to defaults when the file is missing
/// or malformed.
pub fn load_config(path: &Path) -> AppConfig {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            info!(path = %path.display(), "No config file ({err}); using defaults");
            return AppConfig::default();
        }
    };
    let config = match toml::from_str::<AppConfig>(&raw) {
        Ok(config) => config,
        Err(err) => {
            warn!(path = %path.display(), "Failed to parse config ({err}); using defaults");
            return AppConfig::default();
        }
    };
    debug!(?config, "Loaded configuration");
    clamp_config(config)
}

fn clamp_config(mut config: AppConfig) -> AppConfig {
    config.window_width = config.window_width.clamp(320.0, 7680.0);
    config.window_height = config.window_height.clamp(240.0, 4320.0);
    config.tick_interval_ms = config.tick_interval_ms.clamp(8, 100);
    config.sync_tolerance_secs = config.sync_tolerance_secs.clamp(0.01, 1.0);
    config.sync_interval_ms = config.sync_interval_ms.clamp(100, 5000);
    config
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, LogLevel, clamp_config};

    #[test]
    fn defaults_parse_from_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.tick_interval_ms, 16);
        assert_eq!(config.sync_interval_ms, 500);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config: AppConfig = toml::from_str(
            "tick_interval_ms = 1\nsync_tolerance_secs = 9.0\nwindow_width = 10.0",
        )
        .unwrap();
        let config = clamp_config(config);
        assert_eq!(config.tick_interval_ms, 8);
        assert_eq!(config.sync_tolerance_secs, 1.0);
        assert_eq!(config.window_width, 320.0);
    }
}
