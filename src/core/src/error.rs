//! Error records and engine faults.
//!
//! Two very different things live here:
//!
//! - [`ErrorRecord`] / [`Violation`]: validation *findings*. These are plain
//!   values, produced in field order and handed to the display layer. A run
//!   with findings is still a successful run.
//! - [`EngineError`]: faults in the validation setup itself (an
//!   uncompilable regex literal under the strict policy). These are the only
//!   thing a run can return as `Err`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// Violations
// ═══════════════════════════════════════════════════════════════════════════════

/// Why a field failed a constraint.
///
/// The `Display` impl yields the built-in message text; the evaluator
/// prefixes it with the field's description or name unless a custom message
/// overrides it entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    /// Required content is missing or whitespace-only.
    Blank,
    /// Content exceeds the maximum length.
    TooLong { max: u64 },
    /// Content is under the minimum length.
    TooShort { min: u64 },
    /// A date-bounded value is not a well-formed calendar date.
    NotADate,
    /// The date is after the declared maximum. `bound` is the raw bound
    /// text as declared, reproduced verbatim in the message.
    TooLate { bound: String },
    /// The date is before the declared minimum.
    TooEarly { bound: String },
    /// The value does not satisfy the declared pattern (or matches a
    /// forbidden inverse pattern). `pattern` is the raw specifier.
    PatternMismatch { pattern: String },
    /// The numeric value is under the declared minimum.
    BelowMinimum { min: String },
    /// The numeric value is over the declared maximum.
    AboveMaximum { max: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => write!(f, "cannot be blank"),
            Self::TooLong { max } => {
                write!(f, "cannot be longer than {} characters", max)
            }
            Self::TooShort { min } => {
                write!(f, "cannot be shorter than {} characters", min)
            }
            Self::NotADate => write!(f, "must be a valid date"),
            Self::TooLate { bound } => write!(f, "cannot be later than {}", bound),
            Self::TooEarly { bound } => write!(f, "cannot be earlier than {}", bound),
            Self::PatternMismatch { pattern } => {
                write!(f, "must be a valid {}", pattern)
            }
            Self::BelowMinimum { min } => write!(f, "cannot be less than {}", min),
            Self::AboveMaximum { max } => write!(f, "cannot be greater than {}", max),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Records
// ═══════════════════════════════════════════════════════════════════════════════

/// A single entry in the ordered error list handed to the display layer.
///
/// Ordering is significant: records appear in field traversal order, with a
/// group's single required error at the position of its first
/// required-but-unchecked member.
///
/// # Display contract
///
/// The display collaborator locates a per-field container by the convention
/// `{field_id}_error` and an overall form container by `{form_id}_error`,
/// toggles a presentational error state on the offending field,
/// deduplicates identical message text when rendering a combined list, and
/// falls back to a blocking alert when no container exists for a record.
/// A record with `field_id: None` always takes the fallback path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// Id of the offending field, when it has one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field_id: Option<String>,

    /// Human-readable message, already prefixed or overridden.
    pub message: String,
}

impl ErrorRecord {
    pub fn new(field_id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            field_id,
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field_id {
            Some(id) => write!(f, "{}: {}", id, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Engine Faults
// ═══════════════════════════════════════════════════════════════════════════════

/// A fault in the validation setup, as opposed to a finding about input.
///
/// Only produced under the opt-in strict policies in
/// [`crate::config::RunOptions`]; with the defaults every run returns `Ok`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// A `/body/flags` regex literal could not be compiled.
    #[error("field `{field}`: cannot compile pattern literal `{pattern}`: {message}")]
    BadPatternLiteral {
        /// Id or name of the field declaring the literal, or `?`.
        field: String,
        /// The raw specifier as declared.
        pattern: String,
        /// Human-readable compile failure.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_messages() {
        assert_eq!(Violation::Blank.to_string(), "cannot be blank");
        assert_eq!(
            Violation::TooLong { max: 10 }.to_string(),
            "cannot be longer than 10 characters"
        );
        assert_eq!(
            Violation::TooShort { min: 2 }.to_string(),
            "cannot be shorter than 2 characters"
        );
        assert_eq!(Violation::NotADate.to_string(), "must be a valid date");
        assert_eq!(
            Violation::TooLate {
                bound: "12/31/2020".into()
            }
            .to_string(),
            "cannot be later than 12/31/2020"
        );
        assert_eq!(
            Violation::TooEarly {
                bound: "1/1/2020".into()
            }
            .to_string(),
            "cannot be earlier than 1/1/2020"
        );
        assert_eq!(
            Violation::PatternMismatch {
                pattern: "zipcode".into()
            }
            .to_string(),
            "must be a valid zipcode"
        );
        assert_eq!(
            Violation::BelowMinimum { min: "5".into() }.to_string(),
            "cannot be less than 5"
        );
        assert_eq!(
            Violation::AboveMaximum { max: "500".into() }.to_string(),
            "cannot be greater than 500"
        );
    }

    #[test]
    fn test_error_record_serialization() {
        let record = ErrorRecord::new(Some("email".into()), "Email cannot be blank");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"fieldId":"email","message":"Email cannot be blank"}"#
        );

        let record = ErrorRecord::new(None, "cannot be blank");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"message":"cannot be blank"}"#);
    }

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::BadPatternLiteral {
            field: "code".into(),
            pattern: "/[unclosed/i".into(),
            message: "unclosed character class".into(),
        };
        let text = err.to_string();
        assert!(text.contains("code"));
        assert!(text.contains("/[unclosed/i"));
    }
}
