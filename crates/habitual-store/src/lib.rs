//! Persistence layer for habitual
//!
//! Provides:
//! - Habit definitions (create, sparse update, cascading delete)
//! - Daily completion entries with upsert semantics
//! - Date-range and calendar-month entry queries
//! - Whole-database export and replace-on-import

mod sqlite;
mod traits;
mod transfer;

pub use sqlite::*;
pub use traits::*;
pub use transfer::*;

use habitual_api::{HabitValidationError, ImportIssue};
use habitual_util::{HabitId, ParseError};
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn habit_not_found(id: &HabitId) -> Self {
        StoreError::NotFound(format!("habit {}", id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<HabitValidationError> for StoreError {
    fn from(e: HabitValidationError) -> Self {
        StoreError::Validation(e.to_string())
    }
}

impl From<Vec<ImportIssue>> for StoreError {
    fn from(issues: Vec<ImportIssue>) -> Self {
        let messages: Vec<String> = issues.iter().map(ToString::to_string).collect();
        StoreError::Validation(messages.join("; "))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
