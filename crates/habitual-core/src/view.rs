//! Calendar navigation state
//!
//! The displayed week and month are plain values owned by the caller;
//! moving between them returns a new cursor, or `None` once the move would
//! leave the representable calendar.

use chrono::{Datelike, Days, NaiveDate};
use habitual_util::{shift_month, week_dates, week_start_of, DateRange, WeekStart};

/// The displayed week. Every day of it is a representable date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekCursor {
    dates: [NaiveDate; 7],
    range: DateRange,
    week_start: WeekStart,
}

impl WeekCursor {
    fn starting_at(start: NaiveDate, week_start: WeekStart) -> Option<Self> {
        Some(Self {
            dates: week_dates(start)?,
            range: DateRange::week(start)?,
            week_start,
        })
    }

    /// The week containing `date`
    pub fn containing(date: NaiveDate, week_start: WeekStart) -> Option<Self> {
        Self::starting_at(week_start_of(date, week_start)?, week_start)
    }

    /// The week containing the current day
    pub fn today(week_start: WeekStart) -> Option<Self> {
        Self::containing(habitual_util::today(), week_start)
    }

    pub fn prev(self) -> Option<Self> {
        self.shift(-1)
    }

    pub fn next(self) -> Option<Self> {
        self.shift(1)
    }

    /// Move by a number of weeks (negative moves back)
    pub fn shift(self, weeks: i32) -> Option<Self> {
        let days = Days::new(u64::from(weeks.unsigned_abs()) * 7);
        let start = if weeks >= 0 {
            self.start().checked_add_days(days)?
        } else {
            self.start().checked_sub_days(days)?
        };
        Self::starting_at(start, self.week_start)
    }

    /// First day of the week
    pub fn start(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn dates(&self) -> [NaiveDate; 7] {
        self.dates
    }

    pub fn range(&self) -> DateRange {
        self.range
    }
}

/// The displayed calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    /// `None` unless `month` is 1 through 12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        DateRange::month(year, month).map(|_| Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn today() -> Self {
        Self::containing(habitual_util::today())
    }

    pub fn prev(self) -> Option<Self> {
        self.shift(-1)
    }

    pub fn next(self) -> Option<Self> {
        self.shift(1)
    }

    /// Move by a number of months, wrapping across years
    pub fn shift(self, months: i32) -> Option<Self> {
        let (year, month) = shift_month(self.year, self.month, months)?;
        Self::new(year, month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First through last day of the month
    pub fn range(&self) -> Option<DateRange> {
        DateRange::month(self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_cursor_alignment() {
        // 2024-03-07 is a Thursday
        let monday = WeekCursor::containing(date(2024, 3, 7), WeekStart::Monday).unwrap();
        assert_eq!(monday.start(), date(2024, 3, 4));

        let sunday = WeekCursor::containing(date(2024, 3, 7), WeekStart::Sunday).unwrap();
        assert_eq!(sunday.start(), date(2024, 3, 3));

        assert_eq!(monday.dates()[6], date(2024, 3, 10));
        assert_eq!(monday.range().end(), date(2024, 3, 10));
    }

    #[test]
    fn test_week_cursor_navigation() {
        let cursor = WeekCursor::containing(date(2024, 1, 3), WeekStart::Monday).unwrap();
        assert_eq!(cursor.prev().unwrap().start(), date(2023, 12, 25));
        assert_eq!(cursor.next().unwrap().start(), date(2024, 1, 8));
        assert_eq!(cursor.prev().and_then(WeekCursor::next), Some(cursor));
        assert_eq!(cursor.shift(-52).unwrap().start(), date(2023, 1, 2));
        assert_eq!(cursor.shift(0), Some(cursor));
    }

    #[test]
    fn test_week_cursor_stops_at_calendar_limits() {
        let cursor = WeekCursor::containing(date(2024, 3, 4), WeekStart::Monday).unwrap();
        assert!(cursor.shift(100_000_000).is_none());
        assert!(cursor.shift(-100_000_000).is_none());
        assert!(cursor.shift(i32::MAX).is_none());
        assert!(cursor.shift(i32::MIN).is_none());

        assert!(WeekCursor::containing(NaiveDate::MAX, WeekStart::Monday).is_none());

        let last = WeekCursor::containing(NaiveDate::MAX - Days::new(7), WeekStart::Monday).unwrap();
        assert!(last.range().end() <= NaiveDate::MAX);
    }

    #[test]
    fn test_month_cursor_navigation() {
        let jan = MonthCursor::new(2024, 1).unwrap();
        let dec = jan.prev().unwrap();
        assert_eq!((dec.year(), dec.month()), (2023, 12));
        assert_eq!(dec.next(), Some(jan));

        let later = jan.shift(14).unwrap();
        assert_eq!((later.year(), later.month()), (2025, 3));

        assert_eq!(
            MonthCursor::containing(date(2024, 2, 29)).range().unwrap().end(),
            date(2024, 2, 29)
        );
    }

    #[test]
    fn test_month_cursor_stops_at_calendar_limits() {
        let cursor = MonthCursor::new(2026, 10).unwrap();
        assert!(cursor.shift(i32::MAX).is_none());
        assert!(cursor.shift(i32::MIN).is_none());
        assert!(cursor.shift(12 * 1_000_000).is_none());

        let last = MonthCursor::containing(NaiveDate::MAX);
        assert!(last.next().is_none());
        assert!(last.range().is_some());
    }

    #[test]
    fn test_month_cursor_rejects_invalid_month() {
        assert!(MonthCursor::new(2024, 0).is_none());
        assert!(MonthCursor::new(2024, 13).is_none());
    }
}
