//! Parse errors shared by every habitual crate

use thiserror::Error;

/// Raised when textual input (dates, ids, enumerated values) cannot be parsed.
///
/// Malformed values are always surfaced through this type; nothing in
/// habitual skips a record because one of its fields failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid date '{value}': {message}")]
    InvalidDate { value: String, message: String },

    #[error("Invalid habit id '{value}': {message}")]
    InvalidId { value: String, message: String },

    #[error("Unknown {field} '{value}'")]
    UnknownValue { field: &'static str, value: String },
}

impl ParseError {
    pub fn date(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
            message: message.into(),
        }
    }

    pub fn unknown(field: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            field,
            value: value.into(),
        }
    }
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
