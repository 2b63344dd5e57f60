//! Validated settings structures

use crate::schema::{RawConfig, RawReminderConfig, RawTrackerConfig};
use habitual_util::{DATABASE_FILENAME, EXPORT_FILENAME, WeekStart, default_data_dir};
use std::path::PathBuf;
use std::time::Duration;

/// Color given to new habits when none is configured
pub const DEFAULT_HABIT_COLOR: &str = "blue";

/// Default reminder poll interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Validated settings ready for use by the tracker and reminder worker
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub tracker: TrackerSettings,
    pub reminders: ReminderSettings,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            tracker: TrackerSettings::from_raw(raw.tracker),
            reminders: ReminderSettings::from_raw(raw.reminders),
        }
    }
}

/// Tracker settings
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub data_dir: PathBuf,
    pub week_start: WeekStart,
    pub default_color: String,
}

impl TrackerSettings {
    fn from_raw(raw: RawTrackerConfig) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(default_data_dir),
            week_start: raw
                .week_start
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            default_color: raw
                .default_color
                .map(|c| c.trim().to_string())
                .unwrap_or_else(|| DEFAULT_HABIT_COLOR.to_string()),
        }
    }

    /// SQLite database inside the data directory
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILENAME)
    }

    /// Default export file inside the data directory
    pub fn export_path(&self) -> PathBuf {
        self.data_dir.join(EXPORT_FILENAME)
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self::from_raw(RawTrackerConfig::default())
    }
}

/// Reminder worker settings
#[derive(Debug, Clone)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub poll_interval: Duration,
}

impl ReminderSettings {
    fn from_raw(raw: RawReminderConfig) -> Self {
        Self {
            enabled: raw.enabled.unwrap_or(true),
            poll_interval: raw
                .poll_interval_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_POLL_INTERVAL),
        }
    }
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
