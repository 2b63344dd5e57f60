//! Habit and entry types

use chrono::{DateTime, Local, NaiveDate};
use habitual_util::{DateRange, EntryId, HabitId, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Manually-set lifecycle flag of a habit, independent of daily completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitStatus {
    #[default]
    InProgress,
    Done,
    Abandoned,
}

impl HabitStatus {
    pub const ALL: [HabitStatus; 3] = [
        HabitStatus::InProgress,
        HabitStatus::Done,
        HabitStatus::Abandoned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HabitStatus::InProgress => "in_progress",
            HabitStatus::Done => "done",
            HabitStatus::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for HabitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(HabitStatus::InProgress),
            "done" => Ok(HabitStatus::Done),
            "abandoned" => Ok(HabitStatus::Abandoned),
            other => Err(ParseError::unknown("habit status", other)),
        }
    }
}

/// Completion state recorded for one habit on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Done,
    Skipped,
}

impl EntryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryStatus::Done => "done",
            EntryStatus::Skipped => "skipped",
        }
    }

    pub fn is_done(self) -> bool {
        self == EntryStatus::Done
    }

    /// The status a checkbox toggle moves to
    pub fn toggled(self) -> Self {
        match self {
            EntryStatus::Done => EntryStatus::Skipped,
            EntryStatus::Skipped => EntryStatus::Done,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "done" => Ok(EntryStatus::Done),
            "skipped" => Ok(EntryStatus::Skipped),
            other => Err(ParseError::unknown("entry status", other)),
        }
    }
}

/// Reminder cadence, consumed only by the reminder worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NotificationInterval {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "every_10s")]
    Every10s,
    #[serde(rename = "hourly")]
    Hourly,
    #[serde(rename = "every_2h")]
    Every2h,
    #[serde(rename = "every_4h")]
    Every4h,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
}

impl NotificationInterval {
    pub const ALL: [NotificationInterval; 7] = [
        NotificationInterval::None,
        NotificationInterval::Every10s,
        NotificationInterval::Hourly,
        NotificationInterval::Every2h,
        NotificationInterval::Every4h,
        NotificationInterval::Daily,
        NotificationInterval::Weekly,
    ];

    /// Minimum time between two reminders; `None` disables reminders
    pub fn period(self) -> Option<chrono::Duration> {
        match self {
            NotificationInterval::None => None,
            NotificationInterval::Every10s => Some(chrono::Duration::seconds(10)),
            NotificationInterval::Hourly => Some(chrono::Duration::hours(1)),
            NotificationInterval::Every2h => Some(chrono::Duration::hours(2)),
            NotificationInterval::Every4h => Some(chrono::Duration::hours(4)),
            NotificationInterval::Daily => Some(chrono::Duration::days(1)),
            NotificationInterval::Weekly => Some(chrono::Duration::weeks(1)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NotificationInterval::None => "none",
            NotificationInterval::Every10s => "every_10s",
            NotificationInterval::Hourly => "hourly",
            NotificationInterval::Every2h => "every_2h",
            NotificationInterval::Every4h => "every_4h",
            NotificationInterval::Daily => "daily",
            NotificationInterval::Weekly => "weekly",
        }
    }
}

impl fmt::Display for NotificationInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationInterval {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationInterval::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| ParseError::unknown("notification interval", s))
    }
}

/// Inclusive date range during which a habit is active.
///
/// A missing start means the habit has always been active; a missing end
/// means it never stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidityWindow {
    #[serde(default, with = "crate::serde_date::option")]
    pub start: Option<NaiveDate>,
    #[serde(default, with = "crate::serde_date::option")]
    pub end: Option<NaiveDate>,
}

impl ValidityWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// A window with no bounds: active every day
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// `start <= end` whenever both bounds are present
    pub fn is_ordered(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date <= end)
    }

    /// Part of `range` covered by this window
    pub fn clip(&self, range: &DateRange) -> Option<DateRange> {
        let start = self.start.map_or(range.start(), |s| s.max(range.start()));
        let end = self.end.map_or(range.end(), |e| e.min(range.end()));
        DateRange::new(start, end)
    }
}

/// Reasons a habit definition is rejected on write
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HabitValidationError {
    #[error("habit name cannot be empty")]
    EmptyName,

    #[error("habit color cannot be empty")]
    EmptyColor,

    #[error("validity window starts on {start} after it ends on {end}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },
}

/// Check the fields every stored habit must satisfy
pub fn validate_habit_fields(
    name: &str,
    color: &str,
    window: &ValidityWindow,
) -> Result<(), HabitValidationError> {
    if name.trim().is_empty() {
        return Err(HabitValidationError::EmptyName);
    }
    if color.trim().is_empty() {
        return Err(HabitValidationError::EmptyColor);
    }
    if let (Some(start), Some(end)) = (window.start, window.end)
        && start > end
    {
        return Err(HabitValidationError::InvertedWindow { start, end });
    }
    Ok(())
}

/// A named recurring intention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
    pub window: ValidityWindow,
    pub status: HabitStatus,
    pub notification_interval: NotificationInterval,
    pub last_notified: Option<DateTime<Local>>,
}

impl Habit {
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        validate_habit_fields(&self.name, &self.color, &self.window)
    }
}

/// Input for creating a habit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub window: ValidityWindow,
    #[serde(default)]
    pub status: HabitStatus,
    #[serde(default)]
    pub notification_interval: NotificationInterval,
}

impl NewHabit {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            ..Default::default()
        }
    }

    pub fn with_window(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.window = ValidityWindow::new(start, end);
        self
    }

    pub fn with_status(mut self, status: HabitStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_notification_interval(mut self, interval: NotificationInterval) -> Self {
        self.notification_interval = interval;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), HabitValidationError> {
        validate_habit_fields(&self.name, &self.color, &self.window)
    }

    /// Materialize the habit under a freshly assigned id
    pub fn into_habit(self, id: HabitId) -> Habit {
        Habit {
            id,
            name: self.name.trim().to_string(),
            color: self.color.trim().to_string(),
            description: self.description,
            window: self.window,
            status: self.status,
            notification_interval: self.notification_interval,
            last_notified: None,
        }
    }
}

/// Sparse update of a habit. `None` leaves a field unchanged; for clearable
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub description: Option<Option<String>>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub status: Option<HabitStatus>,
    pub notification_interval: Option<NotificationInterval>,
}

impl HabitPatch {
    pub fn is_empty(&self) -> bool {
        *self == HabitPatch::default()
    }

    /// Apply the patch to a copy of `habit`
    pub fn apply(&self, habit: &Habit) -> Habit {
        let mut updated = habit.clone();
        if let Some(name) = &self.name {
            updated.name = name.trim().to_string();
        }
        if let Some(color) = &self.color {
            updated.color = color.trim().to_string();
        }
        if let Some(description) = &self.description {
            updated.description = description.clone();
        }
        if let Some(start) = self.start_date {
            updated.window.start = start;
        }
        if let Some(end) = self.end_date {
            updated.window.end = end;
        }
        if let Some(status) = self.status {
            updated.status = status;
        }
        if let Some(interval) = self.notification_interval {
            updated.notification_interval = interval;
        }
        updated
    }
}

/// A single day's completion record for one habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub habit_id: HabitId,
    #[serde(with = "crate::serde_date")]
    pub date: NaiveDate,
    pub status: EntryStatus,
}

impl Entry {
    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }
}
