//! Tracker facade: views, statistics and reminders over a store

use chrono::{DateTime, Days, Local, NaiveDate};
use habitual_api::{Entry, EntryStatus};
use habitual_store::Store;
use habitual_util::{week_start_of, DateRange, HabitId, WeekStart};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    month_grid, week_grid, CoreError, CoreEvent, CoreResult, MonthCursor, MonthGrid,
    ReminderScheduler, WeekCursor, WeekRow, YearStats,
};

/// Week view contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekView {
    pub dates: [NaiveDate; 7],
    pub rows: Vec<WeekRow>,
}

/// The habit tracker
pub struct Tracker {
    store: Arc<dyn Store>,
    week_start: WeekStart,
}

impl Tracker {
    pub fn new(store: Arc<dyn Store>, week_start: WeekStart) -> Self {
        info!(week_start = %week_start, "Tracker initialized");
        Self { store, week_start }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn current_week(&self) -> CoreResult<WeekCursor> {
        self.week_containing(habitual_util::today())
    }

    pub fn week_containing(&self, date: NaiveDate) -> CoreResult<WeekCursor> {
        WeekCursor::containing(date, self.week_start).ok_or(CoreError::WeekOutOfRange(date))
    }

    pub fn week_view(&self, cursor: WeekCursor) -> CoreResult<WeekView> {
        let habits = self.store.list_habits()?;
        let entries = self.store.entries_in_range(&cursor.range())?;

        Ok(WeekView {
            dates: cursor.dates(),
            rows: week_grid(&habits, &entries, cursor.start())?,
        })
    }

    pub fn month_view(&self, cursor: MonthCursor) -> CoreResult<MonthGrid> {
        let (year, month) = (cursor.year(), cursor.month());
        let shown = self.month_shown_range(cursor).ok_or(CoreError::InvalidMonth { year, month })?;

        let habits = self.store.list_habits()?;
        let entries = self.store.entries_in_range(&shown)?;
        month_grid(&habits, &entries, year, month, self.week_start)
    }

    /// Dates shown in the month grid, including leading and trailing days
    fn month_shown_range(&self, cursor: MonthCursor) -> Option<DateRange> {
        let month = cursor.range()?;
        let first = week_start_of(month.start(), self.week_start)?;
        let last = week_start_of(month.end(), self.week_start)?.checked_add_days(Days::new(6))?;
        DateRange::new(first, last)
    }

    pub fn year_stats(&self, year: i32) -> CoreResult<YearStats> {
        let range = DateRange::year(year).ok_or(CoreError::InvalidYear(year))?;
        let habits = self.store.list_habits()?;
        let entries = self.store.entries_in_range(&range)?;
        YearStats::compute(&habits, &entries, year)
    }

    /// Record a status for a day, overwriting any existing entry
    pub fn mark(&self, habit_id: &HabitId, date: NaiveDate, status: EntryStatus) -> CoreResult<Entry> {
        Ok(self.store.set_entry(habit_id, date, status)?)
    }

    /// Flip a day between done and skipped. A day with no entry becomes done.
    pub fn toggle_entry(&self, habit_id: &HabitId, date: NaiveDate) -> CoreResult<Entry> {
        let status = match self.store.get_entry(habit_id, date)? {
            Some(entry) => entry.status.toggled(),
            None => EntryStatus::Done,
        };

        let entry = self.store.set_entry(habit_id, date, status)?;
        debug!(habit_id = %habit_id, date = %date, status = %status, "Entry toggled");
        Ok(entry)
    }

    /// Decide which reminders fire at `now` and record them.
    ///
    /// Works from a fresh snapshot of habits and today's entries. Failing to
    /// record `last_notified` for one habit does not stop the others.
    pub fn tick_reminders(&self, now: DateTime<Local>) -> CoreResult<Vec<CoreEvent>> {
        let habits = self.store.list_habits()?;
        let today_entries = self.store.entries_in_range(&DateRange::day(now.date_naive()))?;

        let due = ReminderScheduler::due(&habits, &today_entries, now);
        let mut events = Vec::with_capacity(due.len());

        for reminder in due {
            if let Err(e) = self.store.update_last_notified(&reminder.habit_id, now) {
                warn!(habit_id = %reminder.habit_id, error = %e, "Failed to record reminder");
            }

            info!(habit_id = %reminder.habit_id, name = %reminder.name, "Reminder due");
            events.push(CoreEvent::ReminderDue {
                habit_id: reminder.habit_id,
                name: reminder.name,
                interval: reminder.interval,
                message: reminder.message,
                at: now,
            });
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Weekday};
    use habitual_api::{HabitPatch, NewHabit, NotificationInterval};
    use habitual_store::{SqliteStore, StoreError};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tracker() -> Tracker {
        Tracker::new(Arc::new(SqliteStore::in_memory().unwrap()), WeekStart::Monday)
    }

    #[test]
    fn test_toggle_entry_cycles() {
        let tracker = tracker();
        let id = tracker.store().create_habit(NewHabit::new("Read", "blue")).unwrap();
        let day = date(2024, 3, 12);

        assert_eq!(tracker.toggle_entry(&id, day).unwrap().status, EntryStatus::Done);
        assert_eq!(tracker.toggle_entry(&id, day).unwrap().status, EntryStatus::Skipped);
        assert_eq!(tracker.toggle_entry(&id, day).unwrap().status, EntryStatus::Done);

        let entries = tracker.store().entries_in_range(&DateRange::day(day)).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_toggle_unknown_habit() {
        let tracker = tracker();
        let result = tracker.toggle_entry(&HabitId::new(), date(2024, 3, 12));
        assert!(matches!(result, Err(CoreError::Store(StoreError::NotFound(_)))));
    }

    #[test]
    fn test_week_view() {
        let tracker = tracker();
        let id = tracker.store().create_habit(NewHabit::new("Read", "blue")).unwrap();
        tracker.mark(&id, date(2024, 3, 6), EntryStatus::Done).unwrap();
        tracker.mark(&id, date(2024, 3, 11), EntryStatus::Done).unwrap();

        let view = tracker.week_view(tracker.week_containing(date(2024, 3, 7)).unwrap()).unwrap();
        assert_eq!(view.dates[0], date(2024, 3, 4));
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].done, [false, false, true, false, false, false, false]);
    }

    #[test]
    fn test_week_past_calendar_end_is_an_error() {
        let tracker = tracker();
        assert!(matches!(
            tracker.week_containing(NaiveDate::MAX),
            Err(CoreError::WeekOutOfRange(d)) if d == NaiveDate::MAX
        ));
    }

    #[test]
    fn test_month_view_at_calendar_end() {
        // The grid fits only if the last representable day closes a week
        let tracker = tracker();
        let result = tracker.month_view(MonthCursor::containing(NaiveDate::MAX));
        if NaiveDate::MAX.weekday() == Weekday::Sun {
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(CoreError::InvalidMonth { .. })));
        }
    }

    #[test]
    fn test_month_view_includes_trailing_days() {
        let tracker = tracker();
        let id = tracker.store().create_habit(NewHabit::new("Read", "blue")).unwrap();
        tracker.mark(&id, date(2024, 2, 27), EntryStatus::Done).unwrap();

        let grid = tracker.month_view(MonthCursor::new(2024, 3).unwrap()).unwrap();
        let cell = grid.cell(date(2024, 2, 27)).unwrap();
        assert!(!cell.in_month);
        assert_eq!(cell.completed.len(), 1);
    }

    #[test]
    fn test_year_stats() {
        let tracker = tracker();
        let id = tracker
            .store()
            .create_habit(
                NewHabit::new("Read", "blue")
                    .with_window(Some(date(2024, 3, 10)), Some(date(2024, 3, 20))),
            )
            .unwrap();
        for day in 10..15 {
            tracker.mark(&id, date(2024, 3, day), EntryStatus::Done).unwrap();
        }

        let stats = tracker.year_stats(2024).unwrap();
        assert!((stats.monthly_completion[2] - 5.0 / 11.0 * 100.0).abs() < 1e-9);
        assert_eq!(stats.per_habit[0].done, 5);
        assert_eq!(stats.status.in_progress, 1);
    }

    #[test]
    fn test_tick_reminders_records_last_notified() {
        let tracker = tracker();
        let id = tracker
            .store()
            .create_habit(
                NewHabit::new("Water", "blue").with_notification_interval(NotificationInterval::Hourly),
            )
            .unwrap();
        let now = Local.with_ymd_and_hms(2024, 3, 12, 9, 0, 0).unwrap();

        let events = tracker.tick_reminders(now).unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], CoreEvent::ReminderDue { habit_id, .. } if *habit_id == id));

        // Within the period: nothing fires
        let events = tracker.tick_reminders(now + chrono::Duration::minutes(30)).unwrap();
        assert!(events.is_empty());

        // Done today: nothing fires even after the period
        tracker.mark(&id, now.date_naive(), EntryStatus::Done).unwrap();
        let events = tracker.tick_reminders(now + chrono::Duration::hours(2)).unwrap();
        assert!(events.is_empty());

        let habit = tracker.store().get_habit(&id).unwrap().unwrap();
        assert_eq!(habit.last_notified, Some(now));
    }

    #[test]
    fn test_tick_reminders_skips_disabled() {
        let tracker = tracker();
        let id = tracker
            .store()
            .create_habit(
                NewHabit::new("Water", "blue").with_notification_interval(NotificationInterval::Hourly),
            )
            .unwrap();
        tracker
            .store()
            .update_habit(
                &id,
                &HabitPatch {
                    notification_interval: Some(NotificationInterval::None),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(tracker.tick_reminders(Local::now()).unwrap().is_empty());
    }
}
