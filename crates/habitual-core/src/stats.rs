//! Aggregate statistics derived from the completion log

use chrono::{Datelike, NaiveDate};
use habitual_api::{Entry, Habit, HabitStatus};
use habitual_util::{DateRange, HabitId};
use serde::Serialize;
use std::collections::HashSet;

use crate::occurrence::habits_by_id;
use crate::{is_active, CoreError, CoreResult};

/// Number of days in `year-month` during which `habit` is active.
///
/// This is the length of the intersection of the habit's validity window
/// with the month, or 0 if they do not overlap (or the month is invalid).
pub fn days_in_window_for_month(habit: &Habit, year: i32, month: u32) -> u32 {
    DateRange::month(year, month)
        .and_then(|range| habit.window.clip(&range))
        .map_or(0, |overlap| overlap.num_days())
}

/// Completion percentage for each month of `year` (index 0 is January).
///
/// For each month the denominator is the number of possible habit-days:
/// the sum over all habits of [`days_in_window_for_month`]. The numerator
/// counts distinct `done` entries of those habits on days they are active.
/// A month with no possible days yields 0.
pub fn monthly_completion_percentage(habits: &[Habit], entries: &[Entry], year: i32) -> [f64; 12] {
    let by_id = habits_by_id(habits);

    let mut possible = [0u32; 12];
    for (index, month) in (1..=12).enumerate() {
        possible[index] = habits
            .iter()
            .map(|habit| days_in_window_for_month(habit, year, month))
            .sum();
    }

    let mut seen: HashSet<(&HabitId, NaiveDate)> = HashSet::new();
    let mut done = [0u32; 12];
    for entry in entries.iter().filter(|e| e.is_done() && e.date.year() == year) {
        let Some(habit) = by_id.get(&entry.habit_id) else {
            continue;
        };
        if is_active(habit, entry.date) && seen.insert((&entry.habit_id, entry.date)) {
            done[entry.date.month0() as usize] += 1;
        }
    }

    std::array::from_fn(|i| {
        if possible[i] == 0 {
            0.0
        } else {
            f64::from(done[i]) / f64::from(possible[i]) * 100.0
        }
    })
}

/// `done` entries in `range` counted by weekday, Monday first
pub fn weekday_histogram(entries: &[Entry], range: DateRange) -> [u32; 7] {
    let mut counts = [0u32; 7];
    for entry in entries
        .iter()
        .filter(|e| e.is_done() && range.contains(e.date))
    {
        counts[entry.date.weekday().num_days_from_monday() as usize] += 1;
    }
    counts
}

/// Completion count for one habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitTotal {
    pub habit_id: HabitId,
    pub name: String,
    pub color: String,
    pub done: u32,
}

/// `done` entries in `range` per habit, in habit order. Habits without
/// completions are listed with 0.
pub fn per_habit_totals(habits: &[Habit], entries: &[Entry], range: DateRange) -> Vec<HabitTotal> {
    habits
        .iter()
        .map(|habit| HabitTotal {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            color: habit.color.clone(),
            done: entries
                .iter()
                .filter(|e| e.habit_id == habit.id && e.is_done() && range.contains(e.date))
                .count() as u32,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusDistribution {
    pub in_progress: u32,
    pub done: u32,
    pub abandoned: u32,
}

impl StatusDistribution {
    pub fn get(&self, status: HabitStatus) -> u32 {
        match status {
            HabitStatus::InProgress => self.in_progress,
            HabitStatus::Done => self.done,
            HabitStatus::Abandoned => self.abandoned,
        }
    }

    /// Every status with its count, zero counts included
    pub fn iter(&self) -> impl Iterator<Item = (HabitStatus, u32)> + '_ {
        HabitStatus::ALL.into_iter().map(|status| (status, self.get(status)))
    }

    pub fn total(&self) -> u32 {
        self.in_progress + self.done + self.abandoned
    }
}

/// Number of habits in each lifecycle status
pub fn status_distribution(habits: &[Habit]) -> StatusDistribution {
    let mut dist = StatusDistribution::default();
    for habit in habits {
        match habit.status {
            HabitStatus::InProgress => dist.in_progress += 1,
            HabitStatus::Done => dist.done += 1,
            HabitStatus::Abandoned => dist.abandoned += 1,
        }
    }
    dist
}

/// All aggregates for one calendar year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearStats {
    pub year: i32,
    pub monthly_completion: [f64; 12],
    pub weekday_histogram: [u32; 7],
    pub per_habit: Vec<HabitTotal>,
    pub status: StatusDistribution,
}

impl YearStats {
    pub fn compute(habits: &[Habit], entries: &[Entry], year: i32) -> CoreResult<Self> {
        let range = DateRange::year(year).ok_or(CoreError::InvalidYear(year))?;

        Ok(Self {
            year,
            monthly_completion: monthly_completion_percentage(habits, entries, year),
            weekday_histogram: weekday_histogram(entries, range),
            per_habit: per_habit_totals(habits, entries, range),
            status: status_distribution(habits),
        })
    }
}
