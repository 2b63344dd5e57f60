//! Data model for habitual
//!
//! This crate defines the types shared by the store, the core evaluator and
//! front ends:
//! - Habits, their validity windows and lifecycle status
//! - Daily completion entries
//! - Creation and sparse update inputs
//! - The persisted export document

mod export;
pub mod serde_date;
mod types;

pub use export::*;
pub use types::*;

/// Current version of the export document
pub const EXPORT_VERSION: u32 = 1;
