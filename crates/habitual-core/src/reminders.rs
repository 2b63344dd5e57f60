//! Reminder scheduling
//!
//! Pure decision logic: given a snapshot of habits and today's entries, work
//! out which habits should be nudged now. Recording that a reminder fired is
//! left to the caller.

use chrono::{DateTime, Local};
use habitual_api::{Entry, Habit, HabitStatus, NotificationInterval};
use habitual_util::HabitId;
use std::collections::HashSet;

use crate::is_active;

/// A reminder that should fire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub habit_id: HabitId,
    pub name: String,
    pub interval: NotificationInterval,
    pub message: String,
}

impl Reminder {
    fn for_habit(habit: &Habit) -> Self {
        Self {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            interval: habit.notification_interval,
            message: format!("Don't forget: {}", habit.name),
        }
    }
}

pub struct ReminderScheduler;

impl ReminderScheduler {
    /// Habits due for a reminder at `now`, in habit order.
    ///
    /// `today_entries` should hold the entries dated `now`'s local day;
    /// entries for other days are ignored.
    pub fn due(habits: &[Habit], today_entries: &[Entry], now: DateTime<Local>) -> Vec<Reminder> {
        let today = now.date_naive();
        let done_today: HashSet<&HabitId> = today_entries
            .iter()
            .filter(|e| e.date == today && e.is_done())
            .map(|e| &e.habit_id)
            .collect();

        habits
            .iter()
            .filter(|habit| Self::is_due(habit, done_today.contains(&habit.id), now))
            .map(Reminder::for_habit)
            .collect()
    }

    /// Whether a single habit is due at `now`
    pub fn is_due(habit: &Habit, done_today: bool, now: DateTime<Local>) -> bool {
        let Some(period) = habit.notification_interval.period() else {
            return false;
        };

        if habit.status != HabitStatus::InProgress
            || !is_active(habit, now.date_naive())
            || done_today
        {
            return false;
        }

        habit
            .last_notified
            .is_none_or(|last| now.signed_duration_since(last) >= period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};
    use habitual_api::{EntryStatus, NewHabit};
    use habitual_util::EntryId;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 12, 12, 0, 0).unwrap()
    }

    fn hourly(name: &str) -> Habit {
        NewHabit::new(name, "blue")
            .with_notification_interval(NotificationInterval::Hourly)
            .into_habit(HabitId::new())
    }

    fn entry(habit: &Habit, date: NaiveDate, status: EntryStatus) -> Entry {
        Entry {
            id: EntryId::new(1),
            habit_id: habit.id.clone(),
            date,
            status,
        }
    }

    #[test]
    fn test_never_notified_is_due() {
        let habit = hourly("Water");
        let due = ReminderScheduler::due(std::slice::from_ref(&habit), &[], noon());
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].habit_id, habit.id);
        assert!(due[0].message.contains("Water"));
    }

    #[test]
    fn test_interval_none_is_never_due() {
        let habit = NewHabit::new("Read", "blue").into_habit(HabitId::new());
        assert!(!ReminderScheduler::is_due(&habit, false, noon()));
    }

    #[test]
    fn test_respects_period() {
        let mut habit = hourly("Water");

        habit.last_notified = Some(noon() - Duration::minutes(59));
        assert!(!ReminderScheduler::is_due(&habit, false, noon()));

        habit.last_notified = Some(noon() - Duration::hours(1));
        assert!(ReminderScheduler::is_due(&habit, false, noon()));
    }

    #[test]
    fn test_done_today_suppresses() {
        let habit = hourly("Water");
        let today = noon().date_naive();

        let done = [entry(&habit, today, EntryStatus::Done)];
        assert!(ReminderScheduler::due(std::slice::from_ref(&habit), &done, noon()).is_empty());

        let skipped = [entry(&habit, today, EntryStatus::Skipped)];
        assert_eq!(
            ReminderScheduler::due(std::slice::from_ref(&habit), &skipped, noon()).len(),
            1
        );

        let yesterday = [entry(&habit, today.pred_opt().unwrap(), EntryStatus::Done)];
        assert_eq!(
            ReminderScheduler::due(std::slice::from_ref(&habit), &yesterday, noon()).len(),
            1
        );
    }

    #[test]
    fn test_inactive_or_finished_habits_are_skipped() {
        let today = noon().date_naive();

        let mut ended = hourly("Ended");
        ended.window.end = today.pred_opt();
        assert!(!ReminderScheduler::is_due(&ended, false, noon()));

        let mut future = hourly("Future");
        future.window.start = today.succ_opt();
        assert!(!ReminderScheduler::is_due(&future, false, noon()));

        let mut abandoned = hourly("Abandoned");
        abandoned.status = HabitStatus::Abandoned;
        assert!(!ReminderScheduler::is_due(&abandoned, false, noon()));

        let mut finished = hourly("Finished");
        finished.status = HabitStatus::Done;
        assert!(!ReminderScheduler::is_due(&finished, false, noon()));
    }
}
