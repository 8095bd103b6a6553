//! Constraint extraction: from raw key/value metadata to a typed
//! [`ConstraintRecord`].
//!
//! The metadata vocabulary mirrors the declarative attributes the engine
//! was designed against:
//!
//! | key | meaning |
//! |-----|---------|
//! | `required` | any value except a case-insensitive `"no"` means required; presence alone suffices |
//! | `maxlength`, `minlength` | character-count bounds |
//! | `mindate`, `maxdate` | inclusive calendar-date bounds |
//! | `pattern` | named keyword or `/body/flags` literal the value must satisfy |
//! | `patternInverse` | `/body/flags` literal the value must NOT match |
//! | `disallowEmptyValue` | reject empty-valued select options |
//! | `minval`, `maxval` | numeric bounds, checked independently of the main chain |
//! | `prefix`, `suffix` | ids of sibling fields holding phone-number parts |
//! | `requiredError`, `maxlengthError`, ... | per-constraint message overrides |
//!
//! Extraction never fails: an unparseable numeric bound is simply absent,
//! and an unparseable date bound stays present (it still activates the
//! date-format check) without ever triggering a comparison. For every key
//! except `required`, an empty value counts as absent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::RunOptions;
use crate::field::FieldDeclaration;
use crate::predicates::{parse_date_loose, trim_ws};

// ═══════════════════════════════════════════════════════════════════════════════
// Typed Bounds
// ═══════════════════════════════════════════════════════════════════════════════

/// A numeric bound, keeping the declared text for message construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberBound {
    /// The bound as declared, reproduced verbatim in error messages.
    pub raw: String,
    /// The parsed value used for comparison.
    pub value: f64,
}

impl NumberBound {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let value = raw.trim().parse().ok()?;
        Some(Self { raw, value })
    }
}

/// A calendar-date bound.
///
/// `date` is `None` when no supported format parses the declared text; the
/// bound then still activates the date-format check on the field value but
/// never produces an earlier/later error itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateBound {
    /// The bound as declared, reproduced verbatim in error messages.
    pub raw: String,
    /// The parsed date used for comparison, when the text parses.
    pub date: Option<NaiveDate>,
}

impl DateBound {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let date = parse_date_loose(&raw);
        Self { raw, date }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constraint Record
// ═══════════════════════════════════════════════════════════════════════════════

/// The normalized constraints of one field.
///
/// All fields are optional; the default record enforces nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintRecord {
    pub required: bool,
    pub required_error: Option<String>,

    pub max_length: Option<u64>,
    pub max_length_error: Option<String>,
    pub min_length: Option<u64>,
    pub min_length_error: Option<String>,

    pub min_date: Option<DateBound>,
    pub min_date_error: Option<String>,
    pub max_date: Option<DateBound>,
    pub max_date_error: Option<String>,

    pub pattern: Option<String>,
    pub pattern_error: Option<String>,
    pub pattern_inverse: Option<String>,
    pub pattern_inverse_error: Option<String>,

    pub disallow_empty_value: bool,
    pub disallow_empty_value_error: Option<String>,

    pub min_value: Option<NumberBound>,
    pub max_value: Option<NumberBound>,

    /// Id (or name) of the sibling field holding the phone prefix part.
    pub phone_prefix_field: Option<String>,
    /// Id (or name) of the sibling field holding the phone suffix part.
    pub phone_suffix_field: Option<String>,
}

impl ConstraintRecord {
    /// Extract a record from raw metadata pairs. Unknown keys are ignored.
    pub fn from_metadata<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut record = Self::default();
        for (key, value) in pairs {
            match key {
                // presence alone means required; only "no" opts out
                "required" => record.required = !value.eq_ignore_ascii_case("no"),
                "requiredError" => record.required_error = non_empty(value),
                "maxlength" => record.max_length = parse_length(value),
                "maxlengthError" => record.max_length_error = non_empty(value),
                "minlength" => record.min_length = parse_length(value),
                "minlengthError" => record.min_length_error = non_empty(value),
                "mindate" => record.min_date = non_empty(value).map(DateBound::new),
                "mindateError" => record.min_date_error = non_empty(value),
                "maxdate" => record.max_date = non_empty(value).map(DateBound::new),
                "maxdateError" => record.max_date_error = non_empty(value),
                "pattern" => record.pattern = non_empty(value),
                "patternError" => record.pattern_error = non_empty(value),
                "patternInverse" => record.pattern_inverse = non_empty(value),
                "patternInverseError" => record.pattern_inverse_error = non_empty(value),
                "disallowEmptyValue" => record.disallow_empty_value = !value.is_empty(),
                "disallowEmptyValueError" => {
                    record.disallow_empty_value_error = non_empty(value)
                }
                "minval" => record.min_value = non_empty(value).and_then(NumberBound::new),
                "maxval" => record.max_value = non_empty(value).and_then(NumberBound::new),
                "prefix" => record.phone_prefix_field = non_empty(value),
                "suffix" => record.phone_suffix_field = non_empty(value),
                _ => {}
            }
        }
        record
    }

    // Builder methods for constructing records in code.

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn required_with_message(mut self, message: impl Into<String>) -> Self {
        self.required = true;
        self.required_error = Some(message.into());
        self
    }

    pub fn with_max_length(mut self, max: u64) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn with_min_length(mut self, min: u64) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn with_min_date(mut self, raw: impl Into<String>) -> Self {
        self.min_date = Some(DateBound::new(raw));
        self
    }

    pub fn with_max_date(mut self, raw: impl Into<String>) -> Self {
        self.max_date = Some(DateBound::new(raw));
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_pattern_inverse(mut self, pattern: impl Into<String>) -> Self {
        self.pattern_inverse = Some(pattern.into());
        self
    }

    pub fn with_min_value(mut self, raw: impl Into<String>) -> Self {
        self.min_value = NumberBound::new(raw);
        self
    }

    pub fn with_max_value(mut self, raw: impl Into<String>) -> Self {
        self.max_value = NumberBound::new(raw);
        self
    }

    pub fn disallowing_empty_value(mut self) -> Self {
        self.disallow_empty_value = true;
        self
    }

    pub fn with_phone_parts(
        mut self,
        prefix_field: impl Into<String>,
        suffix_field: impl Into<String>,
    ) -> Self {
        self.phone_prefix_field = Some(prefix_field.into());
        self.phone_suffix_field = Some(suffix_field.into());
        self
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_length(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Value Normalization
// ═══════════════════════════════════════════════════════════════════════════════

/// The trimmed form of a text/textarea value, for callers mirroring
/// normalization back into their form store.
///
/// Returns `Some` only when `trim_whitespace` is on, the field is a text or
/// textarea control, and trimming actually changes the value. The engine
/// itself always tests the trimmed form; this is the write-back half of
/// the contract.
pub fn normalized_text_value(field: &FieldDeclaration, options: &RunOptions) -> Option<String> {
    use crate::field::FieldKind;

    if !options.trim_whitespace {
        return None;
    }
    if !matches!(field.kind, FieldKind::Text | FieldKind::Textarea) {
        return None;
    }
    let raw = field.value.as_text();
    let trimmed = trim_ws(raw);
    if trimmed == raw {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
