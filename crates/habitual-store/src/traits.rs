//! Store trait definitions

use chrono::{DateTime, Local, NaiveDate};
use habitual_api::{DataExport, Entry, EntryStatus, Habit, HabitPatch, NewHabit};
use habitual_util::{DateRange, HabitId};

use crate::StoreResult;

/// Main store trait.
///
/// Every mutation is durable once it returns and is applied atomically.
pub trait Store: Send + Sync {
    // Habits

    /// Create a habit and return its newly assigned id
    fn create_habit(&self, habit: NewHabit) -> StoreResult<HabitId>;

    /// Apply a sparse update; fails with `NotFound` for an unknown id
    fn update_habit(&self, id: &HabitId, patch: &HabitPatch) -> StoreResult<Habit>;

    /// Delete a habit and all of its entries. Unknown ids are a no-op.
    fn delete_habit(&self, id: &HabitId) -> StoreResult<()>;

    /// All habits, in creation order
    fn list_habits(&self) -> StoreResult<Vec<Habit>>;

    fn get_habit(&self, id: &HabitId) -> StoreResult<Option<Habit>>;

    // Entries

    /// Record a habit's status for a day, overwriting any existing entry
    fn set_entry(&self, habit_id: &HabitId, date: NaiveDate, status: EntryStatus)
    -> StoreResult<Entry>;

    fn get_entry(&self, habit_id: &HabitId, date: NaiveDate) -> StoreResult<Option<Entry>>;

    /// Entries dated within the range (inclusive on both ends)
    fn entries_in_range(&self, range: &DateRange) -> StoreResult<Vec<Entry>>;

    /// Entries dated within a calendar month
    fn entries_for_month(&self, year: i32, month: u32) -> StoreResult<Vec<Entry>>;

    // Reminders

    /// Best-effort reminder bookkeeping; unknown ids are a no-op
    fn update_last_notified(&self, id: &HabitId, at: DateTime<Local>) -> StoreResult<()>;

    // Export / import

    /// Snapshot every habit and entry
    fn export_data(&self, exported_at: DateTime<Local>) -> StoreResult<DataExport>;

    /// Replace all data with the contents of `data`.
    ///
    /// The document is validated first; on any failure the existing data is
    /// left untouched.
    fn import_data(&self, data: &DataExport) -> StoreResult<ImportSummary>;

    // Health

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}

/// Counts of records written by an import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub habits: usize,
    pub entries: usize,
}
