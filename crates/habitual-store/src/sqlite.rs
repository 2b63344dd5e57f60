//! SQLite-based store implementation

use chrono::{DateTime, Local, NaiveDate};
use habitual_api::{
    DataExport, Entry, EntryStatus, Habit, HabitPatch, HabitStatus, NewHabit,
    NotificationInterval, ValidityWindow,
};
use habitual_util::{format_date, parse_date, DateRange, EntryId, HabitId, ParseError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::{ImportSummary, Store, StoreError, StoreResult};

const HABIT_COLUMNS: &str = "id, name, color, description, start_date, end_date, status, \
                             notification_interval, last_notified";

const ENTRY_COLUMNS: &str = "id, habit_id, date, status";

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("store lock poisoned".into()))
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- Habit definitions
            CREATE TABLE IF NOT EXISTS habits (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                color TEXT NOT NULL,
                description TEXT,
                start_date TEXT,
                end_date TEXT,
                status TEXT NOT NULL DEFAULT 'in_progress',
                notification_interval TEXT NOT NULL DEFAULT 'none',
                last_notified TEXT
            );

            -- Daily completion entries, one per habit and day
            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                habit_id TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                status TEXT NOT NULL,
                UNIQUE (habit_id, date)
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }
}

/// Habit row as stored, before field parsing
struct HabitRow {
    id: String,
    name: String,
    color: String,
    description: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    status: String,
    notification_interval: String,
    last_notified: Option<String>,
}

impl HabitRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            color: row.get(2)?,
            description: row.get(3)?,
            start_date: row.get(4)?,
            end_date: row.get(5)?,
            status: row.get(6)?,
            notification_interval: row.get(7)?,
            last_notified: row.get(8)?,
        })
    }

    fn into_habit(self) -> StoreResult<Habit> {
        let last_notified = self
            .last_notified
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Local))
                    .map_err(|e| ParseError::date(s, e.to_string()))
            })
            .transpose()?;

        Ok(Habit {
            id: self.id.parse()?,
            name: self.name,
            color: self.color,
            description: self.description,
            window: ValidityWindow::new(
                self.start_date.as_deref().map(parse_date).transpose()?,
                self.end_date.as_deref().map(parse_date).transpose()?,
            ),
            status: self.status.parse::<HabitStatus>()?,
            notification_interval: self.notification_interval.parse::<NotificationInterval>()?,
            last_notified,
        })
    }
}

/// Entry row as stored, before field parsing
struct EntryRow {
    id: i64,
    habit_id: String,
    date: String,
    status: String,
}

impl EntryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            habit_id: row.get(1)?,
            date: row.get(2)?,
            status: row.get(3)?,
        })
    }

    fn into_entry(self) -> StoreResult<Entry> {
        Ok(Entry {
            id: EntryId::new(self.id),
            habit_id: self.habit_id.parse()?,
            date: parse_date(&self.date)?,
            status: self.status.parse::<EntryStatus>()?,
        })
    }
}

fn query_habit(conn: &Connection, id: &HabitId) -> StoreResult<Option<Habit>> {
    let row = conn
        .query_row(
            &format!("SELECT {} FROM habits WHERE id = ?", HABIT_COLUMNS),
            [id.to_string()],
            HabitRow::from_row,
        )
        .optional()?;

    row.map(HabitRow::into_habit).transpose()
}

fn query_entry(conn: &Connection, habit_id: &HabitId, date: NaiveDate) -> StoreResult<Option<Entry>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {} FROM entries WHERE habit_id = ? AND date = ?",
                ENTRY_COLUMNS
            ),
            params![habit_id.to_string(), format_date(date)],
            EntryRow::from_row,
        )
        .optional()?;

    row.map(EntryRow::into_entry).transpose()
}

fn query_habits(conn: &Connection) -> StoreResult<Vec<Habit>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM habits ORDER BY rowid",
        HABIT_COLUMNS
    ))?;
    let rows = stmt.query_map([], HabitRow::from_row)?;

    let mut habits = Vec::new();
    for row in rows {
        habits.push(row?.into_habit()?);
    }
    Ok(habits)
}

fn query_entries(conn: &Connection, sql: &str, args: impl rusqlite::Params) -> StoreResult<Vec<Entry>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, EntryRow::from_row)?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?.into_entry()?);
    }
    Ok(entries)
}

fn insert_habit(conn: &Connection, habit: &Habit) -> StoreResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO habits ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            HABIT_COLUMNS
        ),
        params![
            habit.id.to_string(),
            habit.name,
            habit.color,
            habit.description,
            habit.window.start.map(format_date),
            habit.window.end.map(format_date),
            habit.status.as_str(),
            habit.notification_interval.as_str(),
            habit.last_notified.map(|dt| dt.to_rfc3339()),
        ],
    )?;
    Ok(())
}

impl Store for SqliteStore {
    fn create_habit(&self, habit: NewHabit) -> StoreResult<HabitId> {
        habit.validate()?;
        let habit = habit.into_habit(HabitId::new());

        let conn = self.conn()?;
        insert_habit(&conn, &habit)?;

        debug!(habit_id = %habit.id, name = %habit.name, "Habit created");
        Ok(habit.id)
    }

    fn update_habit(&self, id: &HabitId, patch: &HabitPatch) -> StoreResult<Habit> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let current = query_habit(&tx, id)?.ok_or_else(|| StoreError::habit_not_found(id))?;
        let updated = patch.apply(&current);
        updated.validate()?;

        tx.execute(
            r#"
            UPDATE habits
            SET name = ?, color = ?, description = ?, start_date = ?, end_date = ?,
                status = ?, notification_interval = ?
            WHERE id = ?
            "#,
            params![
                updated.name,
                updated.color,
                updated.description,
                updated.window.start.map(format_date),
                updated.window.end.map(format_date),
                updated.status.as_str(),
                updated.notification_interval.as_str(),
                id.to_string(),
            ],
        )?;
        tx.commit()?;

        debug!(habit_id = %id, "Habit updated");
        Ok(updated)
    }

    fn delete_habit(&self, id: &HabitId) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let entries_removed = tx.execute("DELETE FROM entries WHERE habit_id = ?", [id.to_string()])?;
        let habits_removed = tx.execute("DELETE FROM habits WHERE id = ?", [id.to_string()])?;
        tx.commit()?;

        if habits_removed == 0 {
            debug!(habit_id = %id, "Delete of unknown habit ignored");
        } else {
            debug!(habit_id = %id, entries_removed, "Habit deleted");
        }
        Ok(())
    }

    fn list_habits(&self) -> StoreResult<Vec<Habit>> {
        let conn = self.conn()?;
        query_habits(&conn)
    }

    fn get_habit(&self, id: &HabitId) -> StoreResult<Option<Habit>> {
        let conn = self.conn()?;
        query_habit(&conn, id)
    }

    fn set_entry(
        &self,
        habit_id: &HabitId,
        date: NaiveDate,
        status: EntryStatus,
    ) -> StoreResult<Entry> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM habits WHERE id = ?",
                [habit_id.to_string()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists {
            return Err(StoreError::habit_not_found(habit_id));
        }

        tx.execute(
            r#"
            INSERT INTO entries (habit_id, date, status)
            VALUES (?, ?, ?)
            ON CONFLICT(habit_id, date)
            DO UPDATE SET status = excluded.status
            "#,
            params![habit_id.to_string(), format_date(date), status.as_str()],
        )?;

        let entry = query_entry(&tx, habit_id, date)?.ok_or_else(|| {
            StoreError::Database(format!("entry for habit {} vanished after upsert", habit_id))
        })?;
        tx.commit()?;

        debug!(habit_id = %habit_id, date = %date, status = %status, "Entry set");
        Ok(entry)
    }

    fn get_entry(&self, habit_id: &HabitId, date: NaiveDate) -> StoreResult<Option<Entry>> {
        let conn = self.conn()?;
        query_entry(&conn, habit_id, date)
    }

    fn entries_in_range(&self, range: &DateRange) -> StoreResult<Vec<Entry>> {
        let conn = self.conn()?;
        query_entries(
            &conn,
            &format!(
                "SELECT {} FROM entries WHERE date BETWEEN ? AND ? ORDER BY date, id",
                ENTRY_COLUMNS
            ),
            params![format_date(range.start()), format_date(range.end())],
        )
    }

    fn entries_for_month(&self, year: i32, month: u32) -> StoreResult<Vec<Entry>> {
        let range = DateRange::month(year, month)
            .ok_or_else(|| StoreError::validation(format!("invalid month {}-{}", year, month)))?;
        self.entries_in_range(&range)
    }

    fn update_last_notified(&self, id: &HabitId, at: DateTime<Local>) -> StoreResult<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE habits SET last_notified = ? WHERE id = ?",
            params![at.to_rfc3339(), id.to_string()],
        )?;

        if updated == 0 {
            debug!(habit_id = %id, "Habit gone before reminder bookkeeping");
        }
        Ok(())
    }

    fn export_data(&self, exported_at: DateTime<Local>) -> StoreResult<DataExport> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let habits = query_habits(&tx)?;
        let entries = query_entries(
            &tx,
            &format!("SELECT {} FROM entries ORDER BY id", ENTRY_COLUMNS),
            [],
        )?;
        tx.commit()?;

        info!(
            habits = habits.len(),
            entries = entries.len(),
            "Data exported"
        );
        Ok(DataExport::new(&habits, &entries, exported_at))
    }

    fn import_data(&self, data: &DataExport) -> StoreResult<ImportSummary> {
        let issues = data.validate();
        if !issues.is_empty() {
            warn!(issue_count = issues.len(), "Import rejected");
            return Err(issues.into());
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM entries", [])?;
        tx.execute("DELETE FROM habits", [])?;

        for record in &data.habits {
            insert_habit(&tx, &record.clone().into_habit())?;
        }

        for record in &data.entries {
            tx.execute(
                &format!("INSERT INTO entries ({}) VALUES (?, ?, ?, ?)", ENTRY_COLUMNS),
                params![
                    record.id.get(),
                    record.habit_id.to_string(),
                    format_date(record.date),
                    record.status.as_str(),
                ],
            )?;
        }

        tx.commit()?;

        let summary = ImportSummary {
            habits: data.habits.len(),
            entries: data.entries.len(),
        };
        info!(
            habits = summary.habits,
            entries = summary.entries,
            "Data imported"
        );
        Ok(summary)
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}
