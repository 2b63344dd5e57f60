//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Tracker settings
    #[serde(default)]
    pub tracker: RawTrackerConfig,

    /// Reminder worker settings
    #[serde(default)]
    pub reminders: RawReminderConfig,
}

/// Tracker-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTrackerConfig {
    /// Data directory holding the habit database
    pub data_dir: Option<PathBuf>,

    /// First day of the week: "monday" or "sunday"
    pub week_start: Option<String>,

    /// Color given to new habits when none is specified
    pub default_color: Option<String>,
}

/// Reminder worker settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawReminderConfig {
    /// Whether the reminder worker fires notifications at all
    pub enabled: Option<bool>,

    /// How often habits are scanned, in seconds
    pub poll_interval_seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
            config_version = 1

            [tracker]
            data_dir = "/var/lib/habitual"
            week_start = "sunday"
            default_color = "green"

            [reminders]
            enabled = false
            poll_interval_seconds = 30
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.tracker.week_start.as_deref(), Some("sunday"));
        assert_eq!(config.reminders.poll_interval_seconds, Some(30));
        assert_eq!(config.reminders.enabled, Some(false));
    }

    #[test]
    fn sections_are_optional() {
        let config: RawConfig = toml::from_str("config_version = 1").unwrap();
        assert!(config.tracker.data_dir.is_none());
        assert!(config.reminders.enabled.is_none());
    }
}
