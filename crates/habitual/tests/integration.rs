//! Integration tests for habitual
//!
//! These tests exercise configuration, the SQLite store and the tracker
//! together, the way the command-line front end wires them.

use chrono::{Local, NaiveDate, TimeZone};
use habitual_api::{EntryStatus, HabitPatch, HabitStatus, NewHabit, NotificationInterval};
use habitual_config::parse_config;
use habitual_core::{CoreEvent, MonthCursor, Tracker};
use habitual_store::{import_file, read_export, write_export, SqliteStore, Store, StoreError};
use habitual_util::{DateRange, WeekStart};
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn memory_tracker(week_start: WeekStart) -> Tracker {
    Tracker::new(Arc::new(SqliteStore::in_memory().unwrap()), week_start)
}

#[test]
fn test_config_drives_tracker() {
    let dir = tempfile::tempdir().unwrap();
    let config = format!(
        r#"
        config_version = 1

        [tracker]
        data_dir = "{}"
        week_start = "sunday"
        default_color = "teal"

        [reminders]
        enabled = true
        poll_interval_seconds = 30
        "#,
        dir.path().display()
    );

    let settings = parse_config(&config).unwrap();
    assert_eq!(settings.tracker.week_start, WeekStart::Sunday);

    let store: Arc<dyn Store> = Arc::new(SqliteStore::open(settings.tracker.database_path()).unwrap());
    let tracker = Tracker::new(store, settings.tracker.week_start);
    tracker
        .store()
        .create_habit(NewHabit::new("Read", settings.tracker.default_color.clone()))
        .unwrap();

    // Thursday 2024-03-07 falls in the week starting Sunday 2024-03-03
    let view = tracker.week_view(tracker.week_containing(date(2024, 3, 7)).unwrap()).unwrap();
    assert_eq!(view.dates[0], date(2024, 3, 3));
    assert_eq!(view.rows[0].color, "teal");
    assert!(settings.tracker.database_path().exists());
}

#[test]
fn test_daily_toggle_flow() {
    let tracker = memory_tracker(WeekStart::Monday);
    let id = tracker.store().create_habit(NewHabit::new("Stretch", "green")).unwrap();
    let day = date(2024, 3, 12);

    tracker.mark(&id, day, EntryStatus::Done).unwrap();
    tracker.mark(&id, day, EntryStatus::Skipped).unwrap();

    let entries = tracker.store().entries_in_range(&DateRange::day(day)).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, EntryStatus::Skipped);

    let view = tracker.week_view(tracker.week_containing(day).unwrap()).unwrap();
    assert_eq!(view.rows[0].done, [false; 7]);

    tracker.toggle_entry(&id, day).unwrap();
    let view = tracker.week_view(tracker.week_containing(day).unwrap()).unwrap();
    assert!(view.rows[0].done[1]);
}

#[test]
fn test_delete_removes_habit_everywhere() {
    let tracker = memory_tracker(WeekStart::Monday);
    let id = tracker.store().create_habit(NewHabit::new("Run", "red")).unwrap();
    for day in 1..=10 {
        tracker.mark(&id, date(2024, 3, day), EntryStatus::Done).unwrap();
    }

    tracker.store().delete_habit(&id).unwrap();

    assert!(tracker.store().entries_for_month(2024, 3).unwrap().is_empty());
    let grid = tracker.month_view(MonthCursor::new(2024, 3).unwrap()).unwrap();
    assert!(grid.days().all(|cell| cell.completed.is_empty()));
    assert!(tracker.year_stats(2024).unwrap().per_habit.is_empty());
}

#[test]
fn test_partial_window_statistics() {
    let tracker = memory_tracker(WeekStart::Monday);
    let id = tracker
        .store()
        .create_habit(
            NewHabit::new("Read", "blue").with_window(Some(date(2024, 3, 10)), Some(date(2024, 3, 20))),
        )
        .unwrap();
    for day in [10, 12, 14, 16, 18] {
        tracker.mark(&id, date(2024, 3, day), EntryStatus::Done).unwrap();
    }

    let stats = tracker.year_stats(2024).unwrap();
    assert!((stats.monthly_completion[2] - 5.0 / 11.0 * 100.0).abs() < 1e-9);
    assert_eq!(stats.monthly_completion[1], 0.0);
    assert_eq!(stats.weekday_histogram.iter().sum::<u32>(), 5);
}

#[test]
fn test_full_month_statistics() {
    let tracker = memory_tracker(WeekStart::Monday);
    let id = tracker.store().create_habit(NewHabit::new("Walk", "green")).unwrap();
    for day in DateRange::month(2023, 2).unwrap().iter() {
        tracker.mark(&id, day, EntryStatus::Done).unwrap();
    }

    let stats = tracker.year_stats(2023).unwrap();
    assert_eq!(stats.monthly_completion[1], 100.0);
    assert_eq!(stats.per_habit[0].done, 28);
}

#[test]
fn test_export_import_round_trip_via_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.json");

    let source = SqliteStore::open(dir.path().join("source.db")).unwrap();
    let id = source
        .create_habit(
            NewHabit::new("Journal", "purple")
                .with_window(Some(date(2024, 1, 1)), None)
                .with_status(HabitStatus::InProgress)
                .with_notification_interval(NotificationInterval::Weekly)
                .with_description("Evening pages"),
        )
        .unwrap();
    source.set_entry(&id, date(2024, 2, 1), EntryStatus::Done).unwrap();
    source.set_entry(&id, date(2024, 2, 2), EntryStatus::Skipped).unwrap();

    let exported = write_export(&source, &path, Local::now()).unwrap();

    let target = SqliteStore::open(dir.path().join("target.db")).unwrap();
    target.create_habit(NewHabit::new("Overwritten", "grey")).unwrap();
    import_file(&target, &path).unwrap();

    let habits = target.list_habits().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].id, id);
    assert_eq!(habits[0].description.as_deref(), Some("Evening pages"));
    assert_eq!(habits[0].notification_interval, NotificationInterval::Weekly);

    let reexported = target.export_data(Local::now()).unwrap();
    assert_eq!(reexported.habits, exported.habits);
    assert_eq!(reexported.entries, exported.entries);
}

#[test]
fn test_import_rejects_dangling_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.json");

    let store = SqliteStore::in_memory().unwrap();
    let id = store.create_habit(NewHabit::new("Read", "blue")).unwrap();
    store.set_entry(&id, date(2024, 2, 1), EntryStatus::Done).unwrap();
    write_export(&store, &path, Local::now()).unwrap();

    // Drop the habit from the document but keep its entry
    let mut doc = read_export(&path).unwrap();
    doc.habits.clear();
    std::fs::write(&path, doc.to_json_pretty().unwrap()).unwrap();

    let result = import_file(&store, &path);
    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert_eq!(store.list_habits().unwrap().len(), 1);
}

#[test]
fn test_invalid_update_is_rejected() {
    let tracker = memory_tracker(WeekStart::Monday);
    let id = tracker
        .store()
        .create_habit(NewHabit::new("Read", "blue").with_window(Some(date(2024, 3, 10)), None))
        .unwrap();

    let result = tracker.store().update_habit(
        &id,
        &HabitPatch {
            end_date: Some(Some(date(2024, 3, 1))),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(StoreError::Validation(_))));
}

#[test]
fn test_reminder_cycle() {
    let tracker = memory_tracker(WeekStart::Monday);
    let id = tracker
        .store()
        .create_habit(
            NewHabit::new("Water", "blue").with_notification_interval(NotificationInterval::Every2h),
        )
        .unwrap();
    let morning = Local.with_ymd_and_hms(2024, 3, 12, 8, 0, 0).unwrap();

    let events = tracker.tick_reminders(morning).unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        CoreEvent::ReminderDue { habit_id, message, .. } => {
            assert_eq!(*habit_id, id);
            assert!(message.contains("Water"));
        }
    }

    assert!(tracker.tick_reminders(morning + chrono::Duration::hours(1)).unwrap().is_empty());
    assert_eq!(tracker.tick_reminders(morning + chrono::Duration::hours(2)).unwrap().len(), 1);

    tracker
        .store()
        .update_habit(
            &id,
            &HabitPatch {
                status: Some(HabitStatus::Done),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(tracker.tick_reminders(morning + chrono::Duration::hours(6)).unwrap().is_empty());
}
