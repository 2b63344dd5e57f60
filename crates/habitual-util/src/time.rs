//! Calendar and clock utilities for habitual
//!
//! All habit data is day-granular: dates are `NaiveDate` values with no time
//! zone, serialized as `YYYY-MM-DD`. The wall clock is only consulted to find
//! "today" and to timestamp reminders.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `HABITUAL_MOCK_TIME` environment variable overrides
//! the system time for every caller of [`now`] and [`today`].
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2024-03-15 08:00:00`)

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::{ParseError, ParseResult};

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "HABITUAL_MOCK_TIME";

/// Storage and interchange format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Offset between mock time and real time at process start, so mock time
/// advances naturally.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // This is the internal implementation that wraps Local::now()
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                match NaiveDateTime::parse_from_str(&mock_time_str, "%Y-%m-%d %H:%M:%S") {
                    Ok(naive_dt) => {
                        if let Some(mock_dt) = Local.from_local_datetime(&naive_dt).single() {
                            let offset = mock_dt.signed_duration_since(chrono::Local::now());
                            tracing::info!(
                                mock_time = %mock_time_str,
                                offset_secs = offset.num_seconds(),
                                "Mock time enabled"
                            );
                            return Some(offset);
                        }
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            "Failed to convert mock time to local timezone"
                        );
                    }
                    Err(_) => {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            expected_format = "%Y-%m-%d %H:%M:%S",
                            "Invalid mock time format"
                        );
                    }
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Get the current local time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)] // This is the wrapper that provides mock time support
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    if let Some(offset) = get_mock_time_offset() {
        real_now + offset
    } else {
        real_now
    }
}

/// Today's local calendar date
pub fn today() -> NaiveDate {
    now().date_naive()
}

/// Format a DateTime for display with full date and time.
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> ParseResult<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(ParseError::date(s, "expected YYYY-MM-DD"));
    }

    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| ParseError::date(s, e.to_string()))
}

/// Parse an optional date where an empty string means "no date"
pub fn parse_optional_date(s: Option<&str>) -> ParseResult<Option<NaiveDate>> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some),
    }
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// First day of the displayed week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }

    /// Column (0..7) of a weekday in a week starting on `self`
    pub fn column_of(self, weekday: Weekday) -> usize {
        match self {
            WeekStart::Monday => weekday.num_days_from_monday() as usize,
            WeekStart::Sunday => weekday.num_days_from_sunday() as usize,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeekStart::Monday => "monday",
            WeekStart::Sunday => "sunday",
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeekStart {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mon" | "monday" => Ok(WeekStart::Monday),
            "sun" | "sunday" => Ok(WeekStart::Sunday),
            other => Err(ParseError::unknown("week start", other)),
        }
    }
}

/// First date of the week containing `date`. `None` when that week begins
/// before the earliest representable date.
pub fn week_start_of(date: NaiveDate, week_start: WeekStart) -> Option<NaiveDate> {
    let offset = week_start.column_of(date.weekday()) as u64;
    date.checked_sub_days(Days::new(offset))
}

/// The 7 consecutive dates starting at `start`, or `None` if they run past
/// the last representable date
pub fn week_dates(start: NaiveDate) -> Option<[NaiveDate; 7]> {
    start.checked_add_days(Days::new(6))?;
    Some(std::array::from_fn(|i| start + Days::new(i as u64)))
}

/// Number of days in a calendar month, or `None` for an invalid month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1)?;
    (28..=31)
        .rev()
        .find(|day| NaiveDate::from_ymd_opt(year, month, *day).is_some())
}

/// Move `delta` months from `(year, month)`, wrapping across years.
///
/// `None` if the resulting year does not fit in an `i32`.
pub fn shift_month(year: i32, month: u32, delta: i32) -> Option<(i32, u32)> {
    let index = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(delta);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    Some((year, index.rem_euclid(12) as u32 + 1))
}

/// Rows of a 7-column month calendar, including the leading and trailing
/// days from adjacent months needed to fill the first and last week.
pub fn month_weeks(year: i32, month: u32, week_start: WeekStart) -> Option<Vec<[NaiveDate; 7]>> {
    let range = DateRange::month(year, month)?;
    let mut cursor = week_start_of(range.start(), week_start)?;
    let mut weeks = Vec::with_capacity(6);

    while cursor <= range.end() {
        weeks.push(week_dates(cursor)?);
        match cursor.checked_add_days(Days::new(7)) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    Some(weeks)
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range; `None` if `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// A single-day range
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The full calendar month, using true month boundaries
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)?;
        Some(Self { start, end })
    }

    /// The full calendar year
    pub fn year(year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(Self { start, end })
    }

    /// The 7-day week starting at `start`
    pub fn week(start: NaiveDate) -> Option<Self> {
        let end = start.checked_add_days(Days::new(6))?;
        Some(Self { start, end })
    }

    /// Parse a range from two `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> ParseResult<Self> {
        let start_date = parse_date(start)?;
        let end_date = parse_date(end)?;
        Self::new(start_date, end_date).ok_or_else(|| {
            ParseError::date(end, format!("range end is before its start {}", start))
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the range (always at least 1)
    pub fn num_days(&self) -> u32 {
        self.end.signed_duration_since(self.start).num_days() as u32 + 1
    }

    /// Overlap of two ranges, `None` when they are disjoint
    pub fn intersect(&self, other: &DateRange) -> Option<DateRange> {
        DateRange::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Iterate every date in the range, in order
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", format_date(self.start), format_date(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-03-10").unwrap(), date(2024, 3, 10));
        assert_eq!(parse_date("2024-02-29").unwrap(), date(2024, 2, 29));

        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("2024-3-10").is_err());
        assert!(parse_date("2024/03/10").is_err());
        assert!(parse_date("").is_err());
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(parse_optional_date(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_optional_date(Some("2024-01-05")).unwrap(),
            Some(date(2024, 1, 5))
        );
        assert!(matches!(
            parse_optional_date(Some("05.01.2024")),
            Err(ParseError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_week_start_of() {
        // 2024-03-14 is a Thursday
        let thursday = date(2024, 3, 14);
        assert_eq!(week_start_of(thursday, WeekStart::Monday), Some(date(2024, 3, 11)));
        assert_eq!(week_start_of(thursday, WeekStart::Sunday), Some(date(2024, 3, 10)));

        let monday = date(2024, 3, 11);
        assert_eq!(week_start_of(monday, WeekStart::Monday), Some(monday));
    }

    #[test]
    fn test_week_arithmetic_at_calendar_limits() {
        let min = NaiveDate::MIN;
        assert_eq!(
            week_start_of(min, WeekStart::Monday).is_some(),
            min.weekday() == Weekday::Mon
        );

        let max = NaiveDate::MAX;
        assert!(week_dates(max).is_none());
        assert!(DateRange::week(max).is_none());

        let last_full_week = max - Days::new(6);
        let dates = week_dates(last_full_week).unwrap();
        assert_eq!(dates[6], max);
        assert_eq!(DateRange::week(last_full_week).unwrap().end(), max);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 13), None);
        assert_eq!(days_in_month(2024, 0), None);
    }

    #[test]
    fn test_shift_month() {
        assert_eq!(shift_month(2024, 1, -1), Some((2023, 12)));
        assert_eq!(shift_month(2024, 12, 1), Some((2025, 1)));
        assert_eq!(shift_month(2024, 5, 0), Some((2024, 5)));
        assert_eq!(shift_month(2024, 3, -15), Some((2022, 12)));
    }

    #[test]
    fn test_shift_month_extreme_offsets() {
        assert_eq!(shift_month(2026, 10, i32::MAX), Some((178_958_997, 5)));
        assert_eq!(shift_month(2026, 10, i32::MIN), Some((-178_954_944, 2)));
        assert_eq!(shift_month(i32::MAX, 12, 1), None);
        assert_eq!(shift_month(i32::MIN, 1, -1), None);
    }

    #[test]
    fn test_month_range_uses_true_boundaries() {
        let range = DateRange::month(2024, 9).unwrap();
        assert_eq!(range.start(), date(2024, 9, 1));
        assert_eq!(range.end(), date(2024, 9, 30));
        assert_eq!(range.num_days(), 30);
        assert!(DateRange::month(2024, 13).is_none());
    }

    #[test]
    fn test_month_weeks_fill_grid() {
        // March 2024 starts on a Friday and ends on a Sunday
        let weeks = month_weeks(2024, 3, WeekStart::Monday).unwrap();
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0][0], date(2024, 2, 26));
        assert_eq!(weeks[4][6], date(2024, 3, 31));

        let weeks = month_weeks(2024, 3, WeekStart::Sunday).unwrap();
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0][0], date(2024, 2, 25));
        assert_eq!(weeks[5][6], date(2024, 4, 6));
    }

    #[test]
    fn test_range_intersection() {
        let march = DateRange::month(2024, 3).unwrap();
        let window = DateRange::new(date(2024, 3, 10), date(2024, 4, 2)).unwrap();
        let overlap = march.intersect(&window).unwrap();
        assert_eq!(overlap.start(), date(2024, 3, 10));
        assert_eq!(overlap.end(), date(2024, 3, 31));
        assert_eq!(overlap.num_days(), 22);

        let april = DateRange::month(2024, 4).unwrap();
        assert!(march.intersect(&april).is_none());
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(DateRange::new(date(2024, 3, 2), date(2024, 3, 1)).is_none());
        assert!(DateRange::parse("2024-03-02", "2024-03-01").is_err());
        assert!(DateRange::parse("2024-03-01", "bad").is_err());
    }

    #[test]
    fn test_range_iter() {
        let range = DateRange::week(date(2024, 2, 26)).unwrap();
        let days: Vec<_> = range.iter().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[3], date(2024, 2, 29));
        assert_eq!(days[6], date(2024, 3, 3));
    }

    #[test]
    fn test_week_start_parsing() {
        assert_eq!("Monday".parse::<WeekStart>().unwrap(), WeekStart::Monday);
        assert_eq!("sun".parse::<WeekStart>().unwrap(), WeekStart::Sunday);
        assert!("friday".parse::<WeekStart>().is_err());
    }

    #[test]
    fn test_now_returns_time() {
        let t = now();
        assert!(t.year() >= 2020);
        assert!(t.year() <= 2100);
    }

    #[test]
    fn test_format_datetime_full() {
        let dt = Local.with_ymd_and_hms(2025, 12, 25, 14, 30, 45).unwrap();
        assert_eq!(format_datetime_full(&dt), "2025-12-25 14:30:45");
    }
}
