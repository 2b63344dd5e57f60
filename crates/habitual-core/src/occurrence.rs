//! Occurrence evaluation: which habits apply on which days, and what was done

use chrono::{Datelike, NaiveDate};
use habitual_api::{Entry, Habit};
use habitual_util::{month_weeks, week_dates, HabitId, WeekStart};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::{CoreError, CoreResult};

/// Whether `habit` is active on `date`. Window bounds are inclusive and a
/// missing bound is open.
pub fn is_active(habit: &Habit, date: NaiveDate) -> bool {
    habit.window.contains(date)
}

/// Set of `(habit, date)` pairs that have a `done` entry
pub(crate) fn done_days(entries: &[Entry]) -> HashSet<(&HabitId, NaiveDate)> {
    entries
        .iter()
        .filter(|e| e.is_done())
        .map(|e| (&e.habit_id, e.date))
        .collect()
}

/// One habit's row in the week view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekRow {
    pub habit_id: HabitId,
    pub name: String,
    pub color: String,
    /// Completed on each day of the week. Never true on an inactive day.
    pub done: [bool; 7],
    /// Habit active on each day of the week
    pub active: [bool; 7],
}

impl WeekRow {
    pub fn completed_days(&self) -> usize {
        self.done.iter().filter(|d| **d).count()
    }

    pub fn active_days(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }
}

/// Completion grid for the 7 days starting at `week_start`.
///
/// Only habits active on at least one of the 7 days get a row. Rows keep
/// the order of `habits`.
pub fn week_grid(habits: &[Habit], entries: &[Entry], week_start: NaiveDate) -> CoreResult<Vec<WeekRow>> {
    let dates = week_dates(week_start).ok_or(CoreError::WeekOutOfRange(week_start))?;
    let done = done_days(entries);

    let rows = habits
        .iter()
        .filter_map(|habit| {
            let active = dates.map(|date| is_active(habit, date));
            active.contains(&true).then(|| WeekRow {
                habit_id: habit.id.clone(),
                name: habit.name.clone(),
                color: habit.color.clone(),
                done: std::array::from_fn(|i| active[i] && done.contains(&(&habit.id, dates[i]))),
                active,
            })
        })
        .collect();
    Ok(rows)
}

/// A habit completed on a given day, as shown in the month view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedHabit {
    pub habit_id: HabitId,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    /// False for the leading and trailing days borrowed from adjacent months
    pub in_month: bool,
    pub completed: Vec<CompletedHabit>,
}

/// 7-column month calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub week_start: WeekStart,
    pub weeks: Vec<[DayCell; 7]>,
}

impl MonthGrid {
    /// Look up the cell for a date shown in the grid
    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.days().find(|cell| cell.date == date)
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flat_map(|week| week.iter())
    }
}

/// Month calendar listing, for every shown day, each habit with a `done`
/// entry on that day in the order of `habits`.
pub fn month_grid(
    habits: &[Habit],
    entries: &[Entry],
    year: i32,
    month: u32,
    week_start: WeekStart,
) -> CoreResult<MonthGrid> {
    let weeks = month_weeks(year, month, week_start).ok_or(CoreError::InvalidMonth { year, month })?;
    let done = done_days(entries);

    let completed_on = |date: NaiveDate| -> Vec<CompletedHabit> {
        habits
            .iter()
            .filter(|habit| done.contains(&(&habit.id, date)))
            .map(|habit| CompletedHabit {
                habit_id: habit.id.clone(),
                name: habit.name.clone(),
                color: habit.color.clone(),
            })
            .collect()
    };

    let weeks = weeks
        .into_iter()
        .map(|dates| {
            dates.map(|date| DayCell {
                date,
                in_month: date.year() == year && date.month() == month,
                completed: completed_on(date),
            })
        })
        .collect();

    Ok(MonthGrid {
        year,
        month,
        week_start,
        weeks,
    })
}

/// Index habits by id
pub(crate) fn habits_by_id(habits: &[Habit]) -> HashMap<&HabitId, &Habit> {
    habits.iter().map(|h| (&h.id, h)).collect()
}
