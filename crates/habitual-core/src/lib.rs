//! Core habit-occurrence and completion model for habitual
//!
//! This crate contains:
//! - Occurrence evaluation (is a habit active on a date, week and month grids)
//! - Aggregate statistics derived from the completion log
//! - Week and month cursors for calendar navigation
//! - Reminder scheduling
//! - The `Tracker` facade tying the above to a store

mod events;
mod occurrence;
mod reminders;
mod stats;
mod tracker;
mod view;

pub use events::*;
pub use occurrence::*;
pub use reminders::*;
pub use stats::*;
pub use tracker::*;
pub use view::*;

use chrono::NaiveDate;
use habitual_store::StoreError;
use thiserror::Error;

/// Core errors
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Year {0} is out of range")]
    InvalidYear(i32),

    #[error("The week of {0} is outside the supported calendar")]
    WeekOutOfRange(NaiveDate),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type CoreResult<T> = Result<T, CoreError>;
