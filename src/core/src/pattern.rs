//! Pattern dispatch: resolving a constraint's pattern specifier to a
//! predicate call or a compiled-regex match.
//!
//! A specifier starting with `/` is a regex literal of the form
//! `/body/flags`; anything else is matched case-insensitively against a
//! fixed keyword table. An unrecognized keyword enforces no constraint
//! under the default policy (see
//! [`UnknownPatternPolicy`](crate::config::UnknownPatternPolicy)).

use regex::RegexBuilder;

use crate::config::{BadRegexPolicy, RunOptions, UnknownPatternPolicy};
use crate::predicates::{
    is_alphabetic, is_alphanumeric, is_date, is_integer, is_non_overflowed_date, is_numeric,
    is_time, is_valid_credit_card, is_valid_email_strict, is_valid_postalcode,
    is_valid_us_phone_number, is_valid_us_phone_parts, is_valid_zipcode, CardType,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Pattern Specifiers
// ═══════════════════════════════════════════════════════════════════════════════

/// A parsed pattern specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSpec {
    /// A keyword resolved through the dispatch table.
    Named(String),
    /// A `/body/flags` regex literal.
    Literal { body: String, flags: String },
}

impl PatternSpec {
    /// Parse a raw specifier. A leading slash selects the literal form:
    /// the flags are everything after the last slash and the body is
    /// everything between; slashes inside the body need no escaping.
    pub fn parse(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix('/') {
            // rfind over the remainder so "/a/b/i" keeps "a/b" as the body
            match rest.rfind('/') {
                Some(last) => Self::Literal {
                    body: rest[..last].to_string(),
                    flags: rest[last + 1..].to_string(),
                },
                // no closing slash: the remainder doubles as body and flags,
                // which the flag allow-list will reject downstream
                None => Self::Literal {
                    body: rest.to_string(),
                    flags: rest.to_string(),
                },
            }
        } else {
            Self::Named(raw.to_string())
        }
    }
}

/// A compile failure for a regex literal, before it is attributed to a
/// field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PatternCompileError {
    pub pattern: String,
    pub message: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Literal Compilation
// ═══════════════════════════════════════════════════════════════════════════════

/// Compile a literal with its flags mapped onto [`RegexBuilder`].
///
/// Allowed flags: `i` (case-insensitive), `m` (multi-line), `s` (dot
/// matches newline), `x` (ignore whitespace). `g` is accepted and ignored,
/// since a boolean match has no notion of a global cursor. Anything else
/// is a compile fault.
fn compile_literal(body: &str, flags: &str) -> Result<regex::Regex, PatternCompileError> {
    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'g' => {}
            other => {
                return Err(PatternCompileError {
                    pattern: format!("/{}/{}", body, flags),
                    message: format!("unsupported regex flag `{}`", other),
                });
            }
        }
    }
    builder.build().map_err(|e| PatternCompileError {
        pattern: format!("/{}/{}", body, flags),
        message: e.to_string(),
    })
}

/// Whether `value` matches a `/body/flags` literal, under the configured
/// bad-regex policy. Under `TreatAsNoMatch` a broken literal matches
/// nothing.
pub(crate) fn literal_matches(
    body: &str,
    flags: &str,
    value: &str,
    options: &RunOptions,
) -> Result<bool, PatternCompileError> {
    match compile_literal(body, flags) {
        Ok(regex) => Ok(regex.is_match(value)),
        Err(error) => match options.bad_regex {
            BadRegexPolicy::TreatAsNoMatch => Ok(false),
            BadRegexPolicy::Fail => Err(error),
        },
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Keyword Dispatch
// ═══════════════════════════════════════════════════════════════════════════════

/// Sibling phone-number parts resolved by the run, for the
/// `us phone number` keyword.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PhoneSiblings<'a> {
    /// Value of the field referenced by the `prefix` constraint, if any.
    pub prefix: Option<&'a str>,
    /// Value of the field referenced by the `suffix` constraint, if any.
    pub suffix: Option<&'a str>,
}

/// Whether `value` satisfies the pattern specifier.
///
/// Returns `Ok(true)` when the constraint holds (including the permissive
/// unknown-keyword and mismatched-phone-shape outcomes), `Ok(false)` when
/// the field should receive a pattern error.
pub(crate) fn pattern_satisfied(
    spec: &PatternSpec,
    value: &str,
    phone: PhoneSiblings<'_>,
    options: &RunOptions,
) -> Result<bool, PatternCompileError> {
    match spec {
        PatternSpec::Literal { body, flags } => literal_matches(body, flags, value, options),
        PatternSpec::Named(keyword) => Ok(keyword_satisfied(keyword, value, phone, options)),
    }
}

fn keyword_satisfied(
    keyword: &str,
    value: &str,
    phone: PhoneSiblings<'_>,
    options: &RunOptions,
) -> bool {
    let keyword = keyword.to_lowercase();
    match keyword.as_str() {
        "visa" | "mastercard" | "american express" | "diners club" | "discover" | "enroute"
        | "jcb" | "credit card" => is_valid_credit_card(value, Some(CardType::parse(&keyword))),
        "email" => is_valid_email_strict(value),
        "zip or postal code" => is_valid_zipcode(value) || is_valid_postalcode(value),
        "zipcode" => is_valid_zipcode(value),
        "postal code" => is_valid_postalcode(value),
        "us phone number" => match (phone.prefix, phone.suffix) {
            (Some(prefix), Some(suffix)) => is_valid_us_phone_parts(value, prefix, suffix),
            (None, None) => is_valid_us_phone_number(value),
            // exactly one sibling reference matches neither call shape;
            // the permissive fallback accepts
            _ => true,
        },
        "alphanumeric" => is_alphanumeric(value, true),
        "numeric" => is_numeric(value),
        "integer" | "year" => is_integer(value, false),
        "english integer" => is_integer(value, true),
        "datetime" => is_date(value),
        "date" => is_non_overflowed_date(value),
        "time" => is_time(value),
        "alphabetic" => is_alphabetic(value, true),
        _ => match options.unknown_pattern {
            UnknownPatternPolicy::Allow => true,
            UnknownPatternPolicy::Reject => false,
        },
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
