//! Plain-text rendering of habits, calendars and statistics

use chrono::Datelike;
use habitual_api::{Habit, ValidityWindow};
use habitual_core::{MonthGrid, WeekView, YearStats};
use habitual_util::{format_date, format_datetime_full};

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const WEEKDAY_ABBR: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const DONE_MARK: &str = "x";
const OPEN_MARK: &str = ".";
const INACTIVE_MARK: &str = "-";

pub fn window_label(window: &ValidityWindow) -> String {
    let start = window.start.map_or_else(|| "open".to_string(), format_date);
    let end = window.end.map_or_else(|| "open".to_string(), format_date);
    format!("{} .. {}", start, end)
}

/// One line per habit
pub fn habit_table(habits: &[Habit]) -> String {
    if habits.is_empty() {
        return "No habits yet. Create one with `habitual add <name>`.".to_string();
    }

    let width = name_width(habits.iter().map(|h| h.name.as_str()));
    habits
        .iter()
        .map(|h| {
            format!(
                "{}  {:<width$}  {:<8}  {:<11}  {:<9}  {}",
                h.id,
                h.name,
                h.color,
                h.status.as_str(),
                h.notification_interval.as_str(),
                window_label(&h.window),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn habit_details(habit: &Habit, done_this_year: u32) -> String {
    let last_reminded = habit
        .last_notified
        .as_ref()
        .map_or_else(|| "never".to_string(), format_datetime_full);

    let mut lines = vec![
        format!("{} ({})", habit.name, habit.id),
        format!("  Color:          {}", habit.color),
        format!("  Active:         {}", window_label(&habit.window)),
        format!("  Status:         {}", habit.status),
        format!("  Reminders:      {}", habit.notification_interval),
        format!("  Last reminded:  {}", last_reminded),
        format!("  Done this year: {}", done_this_year),
    ];
    if let Some(description) = &habit.description {
        lines.push(format!("  Description:    {}", description));
    }
    lines.join("\n")
}

pub fn week_table(view: &WeekView) -> String {
    let mut lines = vec![format!(
        "Week of {} .. {}",
        format_date(view.dates[0]),
        format_date(view.dates[6])
    )];

    if view.rows.is_empty() {
        lines.push("No habits active this week".to_string());
        return lines.join("\n");
    }

    let width = name_width(view.rows.iter().map(|r| r.name.as_str()));
    let mut header = format!("{:<width$}", "Habit");
    for date in view.dates {
        header.push_str(&format!(" {:>3}", WEEKDAY_ABBR[date.weekday().num_days_from_monday() as usize]));
    }
    lines.push(header);

    for row in &view.rows {
        let mut line = format!("{:<width$}", row.name);
        for (done, active) in row.done.into_iter().zip(row.active) {
            let mark = match (done, active) {
                (true, _) => DONE_MARK,
                (false, true) => OPEN_MARK,
                (false, false) => INACTIVE_MARK,
            };
            line.push_str(&format!(" {:>3}", mark));
        }
        lines.push(line);
    }

    lines.join("\n")
}

pub fn month_calendar(grid: &MonthGrid) -> String {
    let mut lines = vec![format!("{} {}", MONTH_ABBR[grid.month as usize - 1], grid.year)];

    let mut header = String::new();
    if let Some(first_week) = grid.weeks.first() {
        for cell in first_week {
            header.push_str(&format!(
                " {:<5}",
                WEEKDAY_ABBR[cell.date.weekday().num_days_from_monday() as usize]
            ));
        }
    }
    lines.push(header.trim_end().to_string());

    for week in &grid.weeks {
        let mut line = String::new();
        for cell in week {
            if cell.in_month {
                let count = match cell.completed.len() {
                    0 => String::new(),
                    n => format!("+{}", n),
                };
                line.push_str(&format!(" {:>2}{:<3}", cell.date.day(), count));
            } else {
                line.push_str(&format!(" ({:>2}) ", cell.date.day()));
            }
        }
        lines.push(line.trim_end().to_string());
    }

    let completed: Vec<String> = grid
        .days()
        .filter(|cell| !cell.completed.is_empty())
        .map(|cell| {
            let names: Vec<&str> = cell.completed.iter().map(|c| c.name.as_str()).collect();
            format!("  {}  {}", format_date(cell.date), names.join(", "))
        })
        .collect();

    if !completed.is_empty() {
        lines.push(String::new());
        lines.push("Completed:".to_string());
        lines.extend(completed);
    }

    lines.join("\n")
}

pub fn year_report(stats: &YearStats) -> String {
    let mut lines = vec![format!("Completion by month ({})", stats.year)];
    for (name, pct) in MONTH_ABBR.iter().zip(stats.monthly_completion) {
        let bar = "#".repeat((pct / 5.0).round() as usize);
        lines.push(format!("  {}  {:>5.1}%  {}", name, pct, bar).trim_end().to_string());
    }

    lines.push(String::new());
    lines.push("Completions by weekday".to_string());
    for (name, count) in WEEKDAY_ABBR.iter().zip(stats.weekday_histogram) {
        lines.push(format!("  {}  {}", name, count));
    }

    lines.push(String::new());
    lines.push("Completions by habit".to_string());
    if stats.per_habit.is_empty() {
        lines.push("  (no habits)".to_string());
    } else {
        let width = name_width(stats.per_habit.iter().map(|t| t.name.as_str()));
        for total in &stats.per_habit {
            lines.push(format!("  {:<width$}  {}", total.name, total.done));
        }
    }

    lines.push(String::new());
    lines.push("Habits by status".to_string());
    for (status, count) in stats.status.iter() {
        lines.push(format!("  {:<11}  {}", status.as_str(), count));
    }

    lines.join("\n")
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0).max(5)
}
