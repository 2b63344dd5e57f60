//! Strongly-typed identifiers for habitual

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::ParseError;

/// Unique identifier for a habit, assigned on creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HabitId(Uuid);

impl HabitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HabitId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| ParseError::InvalidId {
                value: s.to_string(),
                message: e.to_string(),
            })
    }
}

/// Identifier of a single completion entry (database row id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(i64);

impl EntryId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn habit_id_uniqueness() {
        let h1 = HabitId::new();
        let h2 = HabitId::new();
        assert_ne!(h1, h2);
    }

    #[test]
    fn habit_id_parses_its_display_form() {
        let id = HabitId::new();
        let parsed: HabitId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn habit_id_rejects_garbage() {
        let err = "not-a-uuid".parse::<HabitId>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidId { .. }));
    }

    #[test]
    fn ids_serialize_transparently() {
        let entry_id = EntryId::new(42);
        assert_eq!(serde_json::to_string(&entry_id).unwrap(), "42");

        let habit_id = HabitId::new();
        let json = serde_json::to_string(&habit_id).unwrap();
        assert_eq!(json, format!("\"{}\"", habit_id));
        let parsed: HabitId = serde_json::from_str(&json).unwrap();
        assert_eq!(habit_id, parsed);
    }
}
