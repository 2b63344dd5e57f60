//! Persisted data shape used for export and import

use chrono::{DateTime, Local, NaiveDate};
use habitual_util::{EntryId, HabitId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::{
    Entry, EntryStatus, Habit, HabitStatus, HabitValidationError, NotificationInterval,
    ValidityWindow, EXPORT_VERSION,
};

/// Complete snapshot of a habit database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataExport {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub exported_at: Option<DateTime<Local>>,

    #[serde(default)]
    pub habits: Vec<HabitRecord>,

    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

fn default_version() -> u32 {
    EXPORT_VERSION
}

/// Exported habit definition (reminder bookkeeping is not exported)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub id: HabitId,
    pub name: String,
    pub color: String,
    #[serde(default, with = "crate::serde_date::option")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "crate::serde_date::option")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: HabitStatus,
    #[serde(default)]
    pub notification_interval: NotificationInterval,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Exported completion entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: EntryId,
    pub habit_id: HabitId,
    #[serde(with = "crate::serde_date")]
    pub date: NaiveDate,
    pub status: EntryStatus,
}

impl From<&Habit> for HabitRecord {
    fn from(habit: &Habit) -> Self {
        Self {
            id: habit.id.clone(),
            name: habit.name.clone(),
            color: habit.color.clone(),
            start_date: habit.window.start,
            end_date: habit.window.end,
            status: habit.status,
            notification_interval: habit.notification_interval,
            description: habit.description.clone(),
        }
    }
}

impl HabitRecord {
    pub fn window(&self) -> ValidityWindow {
        ValidityWindow::new(self.start_date, self.end_date)
    }

    pub fn into_habit(self) -> Habit {
        let window = self.window();
        Habit {
            id: self.id,
            name: self.name,
            color: self.color,
            description: self.description,
            window,
            status: self.status,
            notification_interval: self.notification_interval,
            last_notified: None,
        }
    }
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            habit_id: entry.habit_id.clone(),
            date: entry.date,
            status: entry.status,
        }
    }
}

impl From<EntryRecord> for Entry {
    fn from(record: EntryRecord) -> Self {
        Self {
            id: record.id,
            habit_id: record.habit_id,
            date: record.date,
            status: record.status,
        }
    }
}

/// Problems that make an export document unsafe to import
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportIssue {
    #[error("Unsupported export version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Habit '{habit_id}': {error}")]
    InvalidHabit {
        habit_id: HabitId,
        error: HabitValidationError,
    },

    #[error("Duplicate habit id: {0}")]
    DuplicateHabitId(HabitId),

    #[error("Duplicate entry id: {0}")]
    DuplicateEntryId(EntryId),

    #[error("Entry {entry_id} references unknown habit {habit_id}")]
    UnknownHabit { entry_id: EntryId, habit_id: HabitId },

    #[error("More than one entry for habit {habit_id} on {date}")]
    DuplicateEntry { habit_id: HabitId, date: NaiveDate },
}

impl DataExport {
    pub fn new(habits: &[Habit], entries: &[Entry], exported_at: DateTime<Local>) -> Self {
        Self {
            version: EXPORT_VERSION,
            exported_at: Some(exported_at),
            habits: habits.iter().map(HabitRecord::from).collect(),
            entries: entries.iter().map(EntryRecord::from).collect(),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Check every record before anything is written.
    ///
    /// Returns all issues found, not just the first.
    pub fn validate(&self) -> Vec<ImportIssue> {
        let mut issues = Vec::new();

        if self.version != EXPORT_VERSION {
            issues.push(ImportIssue::UnsupportedVersion {
                found: self.version,
                expected: EXPORT_VERSION,
            });
        }

        let mut habit_ids = HashSet::new();
        for habit in &self.habits {
            if !habit_ids.insert(&habit.id) {
                issues.push(ImportIssue::DuplicateHabitId(habit.id.clone()));
            }
            if let Err(error) =
                crate::validate_habit_fields(&habit.name, &habit.color, &habit.window())
            {
                issues.push(ImportIssue::InvalidHabit {
                    habit_id: habit.id.clone(),
                    error,
                });
            }
        }

        let mut entry_ids = HashSet::new();
        let mut days = HashSet::new();
        for entry in &self.entries {
            if !entry_ids.insert(entry.id) {
                issues.push(ImportIssue::DuplicateEntryId(entry.id));
            }
            if !habit_ids.contains(&entry.habit_id) {
                issues.push(ImportIssue::UnknownHabit {
                    entry_id: entry.id,
                    habit_id: entry.habit_id.clone(),
                });
            }
            if !days.insert((&entry.habit_id, entry.date)) {
                issues.push(ImportIssue::DuplicateEntry {
                    habit_id: entry.habit_id.clone(),
                    date: entry.date,
                });
            }
        }

        issues
    }
}
