//! Shared utilities for habitual
//!
//! This crate provides:
//! - ID types (HabitId, EntryId)
//! - Calendar utilities (date parsing, week/month arithmetic, inclusive date ranges)
//! - A clock with mock time support for development
//! - The shared parse error type
//! - Default paths for config and data directories

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
