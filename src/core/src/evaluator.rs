//! Per-kind priority chains.
//!
//! Each field kind gets an explicit, ordered chain of checks evaluated with
//! early exit: the first failing check produces the field's primary error
//! and stops the chain. Text fields additionally run an independent
//! numeric-range check that can append up to two more errors regardless of
//! the chain's outcome.

use std::collections::HashMap;

use crate::config::RunOptions;
use crate::error::{EngineError, ErrorRecord, Violation};
use crate::field::{FieldDeclaration, FieldKind, FormField};
use crate::pattern::{
    literal_matches, pattern_satisfied, PatternCompileError, PatternSpec, PhoneSiblings,
};
use crate::predicates::{
    is_non_overflowed_date, is_numeric, is_valid_length, parse_strict_date, trim_ws,
};
use crate::rules::ConstraintRecord;

/// Field values addressable by id or name, for sibling references.
pub(crate) type SiblingValues<'a> = HashMap<&'a str, &'a str>;

// ═══════════════════════════════════════════════════════════════════════════════
// Error Construction
// ═══════════════════════════════════════════════════════════════════════════════

/// Build the message for a violation: a custom message wins verbatim, the
/// default text otherwise gets the description prefix, falling back to the
/// name prefix, falling back to no prefix.
pub(crate) fn compose_message(
    violation: &Violation,
    custom: Option<&str>,
    description: Option<&str>,
    name: Option<&str>,
) -> String {
    match (custom, description, name) {
        (Some(custom), _, _) => custom.to_string(),
        (None, Some(description), _) => format!("{} {}", description, violation),
        (None, None, Some(name)) => format!("{} {}", name, violation),
        (None, None, None) => violation.to_string(),
    }
}

/// An error record for `field`, with the composed message.
pub(crate) fn make_error(
    field: &FieldDeclaration,
    violation: &Violation,
    custom: Option<&str>,
) -> ErrorRecord {
    ErrorRecord::new(
        field.id.clone(),
        compose_message(
            violation,
            custom,
            field.description.as_deref(),
            field.name.as_deref(),
        ),
    )
}

fn field_label(field: &FieldDeclaration) -> String {
    field
        .id
        .clone()
        .or_else(|| field.name.clone())
        .unwrap_or_else(|| "?".to_string())
}

fn attribute(error: PatternCompileError, field: &FieldDeclaration) -> EngineError {
    EngineError::BadPatternLiteral {
        field: field_label(field),
        pattern: error.pattern,
        message: error.message,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Evaluation
// ═══════════════════════════════════════════════════════════════════════════════

/// Evaluate one non-grouped field. Radio/checkbox fields are handled by the
/// group tracker in the run loop and yield nothing here.
pub(crate) fn evaluate_field(
    field: &FormField,
    siblings: &SiblingValues<'_>,
    options: &RunOptions,
) -> Result<Vec<ErrorRecord>, EngineError> {
    match field.declaration.kind {
        FieldKind::Text | FieldKind::Textarea => evaluate_text(field, siblings, options),
        FieldKind::Password => Ok(evaluate_password(field)),
        FieldKind::File => Ok(evaluate_file(field)),
        FieldKind::SelectSingle | FieldKind::SelectMultiple => Ok(evaluate_select(field)),
        FieldKind::Radio | FieldKind::Checkbox => Ok(Vec::new()),
    }
}

// ───────────────────────────────────────────────────────────────────────────────
// text / textarea
// ───────────────────────────────────────────────────────────────────────────────

fn evaluate_text(
    field: &FormField,
    siblings: &SiblingValues<'_>,
    options: &RunOptions,
) -> Result<Vec<ErrorRecord>, EngineError> {
    let declaration = &field.declaration;
    let constraints = &field.constraints;
    // every check runs against the trimmed value; the trim_whitespace
    // option only governs write-back (see rules::normalized_text_value)
    let value = trim_ws(declaration.value.as_text());

    let mut errors = primary_text_chain(declaration, constraints, value, siblings, options)?;

    // Numeric range is independent of the chain above: strip
    // thousands-separator commas, and when a non-blank numeric value
    // remains, report each violated bound.
    let numeric = value.replace(',', "");
    if numeric.chars().any(|c| !c.is_whitespace()) && is_numeric(&numeric) {
        // "-", "." and "-." pass the numeric shape but hold no value
        if let Ok(number) = numeric.trim().parse::<f64>() {
            if let Some(min) = &constraints.min_value {
                if number < min.value {
                    errors.push(make_error(
                        declaration,
                        &Violation::BelowMinimum {
                            min: min.raw.clone(),
                        },
                        None,
                    ));
                }
            }
            if let Some(max) = &constraints.max_value {
                if number > max.value {
                    errors.push(make_error(
                        declaration,
                        &Violation::AboveMaximum {
                            max: max.raw.clone(),
                        },
                        None,
                    ));
                }
            }
        }
    }

    Ok(errors)
}

/// The short-circuiting chain for text fields, in priority order:
/// required-blank, max length, min length, date range, pattern, inverse
/// pattern. The date step consumes the chain slot once either date bound
/// is declared, even when it finds nothing wrong — pattern checks do not
/// run for date-bounded fields.
fn primary_text_chain(
    declaration: &FieldDeclaration,
    constraints: &ConstraintRecord,
    value: &str,
    siblings: &SiblingValues<'_>,
    options: &RunOptions,
) -> Result<Vec<ErrorRecord>, EngineError> {
    if constraints.required && value.is_empty() {
        return Ok(vec![make_error(
            declaration,
            &Violation::Blank,
            constraints.required_error.as_deref(),
        )]);
    }

    if let Some(max) = constraints.max_length {
        if !is_valid_length(value, 0, max) {
            return Ok(vec![make_error(
                declaration,
                &Violation::TooLong { max },
                constraints.max_length_error.as_deref(),
            )]);
        }
    }

    if let Some(min) = constraints.min_length {
        if !is_valid_length(value, min, u64::MAX) {
            return Ok(vec![make_error(
                declaration,
                &Violation::TooShort { min },
                constraints.min_length_error.as_deref(),
            )]);
        }
    }

    if constraints.min_date.is_some() || constraints.max_date.is_some() {
        return Ok(date_range_errors(declaration, constraints, value));
    }

    if let Some(raw) = &constraints.pattern {
        if !value.is_empty() {
            let phone = resolve_phone_siblings(constraints, siblings);
            let spec = PatternSpec::parse(raw);
            let satisfied = pattern_satisfied(&spec, value, phone, options)
                .map_err(|e| attribute(e, declaration))?;
            if !satisfied {
                return Ok(vec![make_error(
                    declaration,
                    &Violation::PatternMismatch {
                        pattern: raw.clone(),
                    },
                    constraints.pattern_error.as_deref(),
                )]);
            }
            return Ok(Vec::new());
        }
    }

    if let Some(raw) = &constraints.pattern_inverse {
        // only the literal form is honored for inverse patterns
        if !value.is_empty() {
            if let PatternSpec::Literal { body, flags } = PatternSpec::parse(raw) {
                let matched = literal_matches(&body, &flags, value, options)
                    .map_err(|e| attribute(e, declaration))?;
                if matched {
                    return Ok(vec![make_error(
                        declaration,
                        &Violation::PatternMismatch {
                            pattern: raw.clone(),
                        },
                        constraints.pattern_inverse_error.as_deref(),
                    )]);
                }
            }
        }
    }

    Ok(Vec::new())
}

/// The date step: a format failure reports once (with the pattern message
/// override, when declared); a well-formed date is then compared against
/// whichever bounds parsed.
fn date_range_errors(
    declaration: &FieldDeclaration,
    constraints: &ConstraintRecord,
    value: &str,
) -> Vec<ErrorRecord> {
    if !is_non_overflowed_date(value) {
        return vec![make_error(
            declaration,
            &Violation::NotADate,
            constraints.pattern_error.as_deref(),
        )];
    }
    let date = match parse_strict_date(value) {
        Some(date) => date,
        None => {
            return vec![make_error(
                declaration,
                &Violation::NotADate,
                constraints.pattern_error.as_deref(),
            )]
        }
    };

    let mut errors = Vec::new();
    if let Some(bound) = &constraints.max_date {
        if let Some(max) = bound.date {
            if date > max {
                errors.push(make_error(
                    declaration,
                    &Violation::TooLate {
                        bound: bound.raw.clone(),
                    },
                    constraints.max_date_error.as_deref(),
                ));
            }
        }
    }
    if let Some(bound) = &constraints.min_date {
        if let Some(min) = bound.date {
            if date < min {
                errors.push(make_error(
                    declaration,
                    &Violation::TooEarly {
                        bound: bound.raw.clone(),
                    },
                    constraints.min_date_error.as_deref(),
                ));
            }
        }
    }
    errors
}

/// Resolve the phone prefix/suffix sibling references to field values. A
/// declared reference whose target field is missing resolves to the empty
/// string, which then fails the parts validation.
fn resolve_phone_siblings<'a>(
    constraints: &ConstraintRecord,
    siblings: &SiblingValues<'a>,
) -> PhoneSiblings<'a> {
    let resolve = |reference: &Option<String>| {
        reference
            .as_deref()
            .map(|key| siblings.get(key).copied().unwrap_or(""))
    };
    PhoneSiblings {
        prefix: resolve(&constraints.phone_prefix_field),
        suffix: resolve(&constraints.phone_suffix_field),
    }
}

// ───────────────────────────────────────────────────────────────────────────────
// password / file
// ───────────────────────────────────────────────────────────────────────────────

/// Passwords are never trimmed: a lone space is content.
fn evaluate_password(field: &FormField) -> Vec<ErrorRecord> {
    let declaration = &field.declaration;
    let constraints = &field.constraints;
    let value = declaration.value.as_text();

    if constraints.required && value.is_empty() {
        return vec![make_error(
            declaration,
            &Violation::Blank,
            constraints.required_error.as_deref(),
        )];
    }
    if let Some(max) = constraints.max_length {
        if !is_valid_length(value, 0, max) {
            return vec![make_error(
                declaration,
                &Violation::TooLong { max },
                constraints.max_length_error.as_deref(),
            )];
        }
    }
    if let Some(min) = constraints.min_length {
        if !is_valid_length(value, min, u64::MAX) {
            return vec![make_error(
                declaration,
                &Violation::TooShort { min },
                constraints.min_length_error.as_deref(),
            )];
        }
    }
    Vec::new()
}

fn evaluate_file(field: &FormField) -> Vec<ErrorRecord> {
    let declaration = &field.declaration;
    if field.constraints.required && declaration.value.as_text().is_empty() {
        return vec![make_error(
            declaration,
            &Violation::Blank,
            field.constraints.required_error.as_deref(),
        )];
    }
    Vec::new()
}

// ───────────────────────────────────────────────────────────────────────────────
// select
// ───────────────────────────────────────────────────────────────────────────────

fn evaluate_select(field: &FormField) -> Vec<ErrorRecord> {
    let declaration = &field.declaration;
    let constraints = &field.constraints;
    let selected = declaration.value.selections();

    if constraints.required && selected.is_empty() {
        return vec![make_error(
            declaration,
            &Violation::Blank,
            constraints.required_error.as_deref(),
        )];
    }
    if constraints.disallow_empty_value
        && (selected.is_empty() || selected.first().map(String::as_str) == Some(""))
    {
        return vec![make_error(
            declaration,
            &Violation::Blank,
            constraints.disallow_empty_value_error.as_deref(),
        )];
    }
    Vec::new()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDeclaration;
    use crate::rules::ConstraintRecord;

    fn eval(field: &FormField) -> Vec<ErrorRecord> {
        evaluate_field(field, &SiblingValues::new(), &RunOptions::default()).unwrap()
    }

    fn text_field(value: &str, constraints: ConstraintRecord) -> FormField {
        FormField::new(FieldDeclaration::text("f", value), constraints)
    }

    #[test]
    fn test_chain_stops_at_first_failure() {
        // blank and too short at once: only the blank error fires
        let field = text_field(
            "",
            ConstraintRecord::default().required().with_min_length(5),
        );
        let errors = eval(&field);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "cannot be blank");
    }

    #[test]
    fn test_max_length_before_min_length() {
        let field = text_field(
            "abcdefgh",
            ConstraintRecord::default().with_max_length(3).with_min_length(20),
        );
        let errors = eval(&field);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "cannot be longer than 3 characters");
    }

    #[test]
    fn test_date_step_consumes_chain() {
        // a valid in-range date with a failing pattern: the pattern check
        // is unreachable behind the date step
        let field = text_field(
            "1/5/2020",
            ConstraintRecord::default()
                .with_max_date("12/31/2020")
                .with_pattern("zipcode"),
        );
        assert!(eval(&field).is_empty());
    }

    #[test]
    fn test_date_format_error_uses_pattern_override() {
        let mut constraints = ConstraintRecord::default().with_max_date("12/31/2020");
        constraints.pattern_error = Some("Use mm/dd/yyyy".to_string());
        let field = text_field("tomorrow", constraints);
        let errors = eval(&field);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Use mm/dd/yyyy");
    }

    #[test]
    fn test_date_bounds() {
        let constraints = ConstraintRecord::default()
            .with_min_date("1/1/2020")
            .with_max_date("12/31/2020");

        assert!(eval(&text_field("6/15/2020", constraints.clone())).is_empty());

        let errors = eval(&text_field("1/5/2021", constraints.clone()));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "cannot be later than 12/31/2020");

        let errors = eval(&text_field("12/31/2019", constraints));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "cannot be earlier than 1/1/2020");
    }

    #[test]
    fn test_unparseable_bound_still_requires_date_shape() {
        let field = text_field("not a date", ConstraintRecord::default().with_max_date("someday"));
        let errors = eval(&field);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "must be a valid date");

        // a well-formed date passes: the broken bound never compares
        let field = text_field("1/5/2020", ConstraintRecord::default().with_max_date("someday"));
        assert!(eval(&field).is_empty());
    }

    #[test]
    fn test_pattern_skipped_for_empty_value() {
        let field = text_field("", ConstraintRecord::default().with_pattern("zipcode"));
        assert!(eval(&field).is_empty());
    }

    #[test]
    fn test_inverse_pattern() {
        let constraints = ConstraintRecord::default().with_pattern_inverse("/forbidden/i");
        assert!(eval(&text_field("allowed text", constraints.clone())).is_empty());

        let errors = eval(&text_field("FORBIDDEN word", constraints));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "must be a valid /forbidden/i");
    }

    #[test]
    fn test_inverse_requires_literal_form() {
        let field = text_field(
            "anything",
            ConstraintRecord::default().with_pattern_inverse("zipcode"),
        );
        assert!(eval(&field).is_empty());
    }

    #[test]
    fn test_numeric_range_fires_alongside_chain() {
        // too short AND above maximum: one chain error plus one range error
        let field = text_field(
            "900",
            ConstraintRecord::default()
                .with_min_length(5)
                .with_max_value("500"),
        );
        let errors = eval(&field);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "cannot be shorter than 5 characters");
        assert_eq!(errors[1].message, "cannot be greater than 500");
    }

    #[test]
    fn test_numeric_range_skips_non_numeric_values() {
        let field = text_field("abc", ConstraintRecord::default().with_max_value("500"));
        assert!(eval(&field).is_empty());
    }

    #[test]
    fn test_password_not_trimmed() {
        let field = FormField::new(
            FieldDeclaration::password("pw", "   "),
            ConstraintRecord::default().required(),
        );
        assert!(eval(&field).is_empty());

        let field = FormField::new(
            FieldDeclaration::password("pw", ""),
            ConstraintRecord::default().required(),
        );
        assert_eq!(eval(&field).len(), 1);
    }

    #[test]
    fn test_file_required_only() {
        let field = FormField::new(
            FieldDeclaration::file("upload", ""),
            ConstraintRecord::default().required().with_max_length(1),
        );
        let errors = eval(&field);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "cannot be blank");

        // length constraints do not apply to file fields
        let field = FormField::new(
            FieldDeclaration::file("upload", "very-long-filename.tar.gz"),
            ConstraintRecord::default().required().with_max_length(1),
        );
        assert!(eval(&field).is_empty());
    }

    #[test]
    fn test_select_required_and_disallow_empty() {
        let required = ConstraintRecord::default().required();
        let field = FormField::new(FieldDeclaration::select("state", []), required.clone());
        assert_eq!(eval(&field).len(), 1);

        let field = FormField::new(
            FieldDeclaration::select("state", ["NY".to_string()]),
            required,
        );
        assert!(eval(&field).is_empty());

        // placeholder option with empty value
        let disallow = ConstraintRecord::default().disallowing_empty_value();
        let field = FormField::new(
            FieldDeclaration::select("state", ["".to_string()]),
            disallow.clone(),
        );
        assert_eq!(eval(&field).len(), 1);

        let field = FormField::new(
            FieldDeclaration::select("state", ["NY".to_string()]),
            disallow,
        );
        assert!(eval(&field).is_empty());
    }

    #[test]
    fn test_message_prefixing() {
        let declaration = FieldDeclaration::text("age", "")
            .with_name("age")
            .with_description("Your age");
        let field = FormField::new(declaration, ConstraintRecord::default().required());
        assert_eq!(eval(&field)[0].message, "Your age cannot be blank");

        let declaration = FieldDeclaration::text("age", "").with_name("age");
        let field = FormField::new(declaration, ConstraintRecord::default().required());
        assert_eq!(eval(&field)[0].message, "age cannot be blank");

        let declaration = FieldDeclaration::text("age", "");
        let field = FormField::new(declaration, ConstraintRecord::default().required());
        assert_eq!(eval(&field)[0].message, "cannot be blank");
    }

    #[test]
    fn test_custom_message_has_no_prefix() {
        let declaration = FieldDeclaration::text("age", "").with_description("Your age");
        let field = FormField::new(
            declaration,
            ConstraintRecord::default().required_with_message("Age, please!"),
        );
        assert_eq!(eval(&field)[0].message, "Age, please!");
    }

    #[test]
    fn test_bad_literal_propagates_under_strict_policy() {
        let field = text_field("value", ConstraintRecord::default().with_pattern("/[oops/"));
        let strict = RunOptions::default().fail_on_bad_regex();
        let result = evaluate_field(&field, &SiblingValues::new(), &strict);
        assert!(matches!(
            result,
            Err(EngineError::BadPatternLiteral { .. })
        ));
    }
}
