//! Process environment for the bridge binary.

use std::path::PathBuf;
use std::time::Duration;

use super::store::DEFAULT_SETTINGS_PATH;

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `timestamp level target message`
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parse `BRIDGE_LOG_FORMAT`. Anything but `json` means text.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    /// Read `BRIDGE_LOG_FORMAT`.
    pub fn from_env() -> Self {
        Self::parse(std::env::var("BRIDGE_LOG_FORMAT").ok().as_deref())
    }
}

/// Runtime options that are not part of the persisted settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Settings file (`BRIDGE_SETTINGS`).
    pub settings_path: PathBuf,
    /// Ticks per second (`BRIDGE_TICK_HZ`).
    pub tick_hz: u32,
    /// Log line format (`BRIDGE_LOG_FORMAT`).
    pub log_format: LogFormat,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            tick_hz: 60,
            log_format: LogFormat::Text,
        }
    }
}

impl RuntimeConfig {
    /// Read the environment. Unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let settings_path = lookup("BRIDGE_SETTINGS")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.settings_path);
        let tick_hz = lookup("BRIDGE_TICK_HZ")
            .and_then(|v| v.trim().parse().ok())
            .filter(|hz| *hz > 0)
            .unwrap_or(defaults.tick_hz);
        let log_format = LogFormat::parse(lookup("BRIDGE_LOG_FORMAT").as_deref());

        Self {
            settings_path,
            tick_hz,
            log_format,
        }
    }

    /// Time between ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_hz.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = RuntimeConfig::from_lookup(lookup(&[]));
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.settings_path, PathBuf::from("./Settings.json"));
        assert_eq!(config.tick_interval(), Duration::from_secs(1) / 60);
    }

    #[test]
    fn test_overrides() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("BRIDGE_SETTINGS", "/tmp/bridge.json"),
            ("BRIDGE_TICK_HZ", "120"),
            ("BRIDGE_LOG_FORMAT", "JSON"),
        ]));
        assert_eq!(config.settings_path, PathBuf::from("/tmp/bridge.json"));
        assert_eq!(config.tick_hz, 120);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_bad_tick_rate_falls_back() {
        for value in ["0", "fast", "-5"] {
            let config = RuntimeConfig::from_lookup(lookup(&[("BRIDGE_TICK_HZ", value)]));
            assert_eq!(config.tick_hz, 60);
        }
    }
}
