//! Configuration validation

use crate::schema::RawConfig;
use habitual_util::WeekStart;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Invalid week_start '{0}': expected \"monday\" or \"sunday\"")]
    InvalidWeekStart(String),

    #[error("default_color cannot be empty")]
    EmptyDefaultColor,

    #[error("poll_interval_seconds must be at least {min}, got {value}")]
    PollIntervalTooShort { value: u64, min: u64 },
}

/// Shortest allowed reminder poll interval, in seconds
pub const MIN_POLL_INTERVAL_SECS: u64 = 1;

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(week_start) = &config.tracker.week_start
        && week_start.parse::<WeekStart>().is_err()
    {
        errors.push(ValidationError::InvalidWeekStart(week_start.clone()));
    }

    if let Some(color) = &config.tracker.default_color
        && color.trim().is_empty()
    {
        errors.push(ValidationError::EmptyDefaultColor);
    }

    if let Some(secs) = config.reminders.poll_interval_seconds
        && secs < MIN_POLL_INTERVAL_SECS
    {
        errors.push(ValidationError::PollIntervalTooShort {
            value: secs,
            min: MIN_POLL_INTERVAL_SECS,
        });
    }

    errors
}
