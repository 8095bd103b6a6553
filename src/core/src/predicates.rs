//! Stateless validator predicates over strings.
//!
//! Every function here is total: any input yields a boolean, never a panic
//! or an error. Several predicates carry documented quirks that callers in
//! the wild depend on (see [`is_numeric`], [`is_time`],
//! [`is_valid_us_phone_number`]); those are part of the contract, not bugs
//! to fix.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::luhn;

// ═══════════════════════════════════════════════════════════════════════════════
// Pre-compiled Patterns
// ═══════════════════════════════════════════════════════════════════════════════

/// Permissive RFC-821-style email shape. ASCII word characters only.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_]+((-[A-Za-z0-9_]+)|(\.[A-Za-z0-9_]+)|('[A-Za-z0-9_]+))*@[A-Za-z0-9]+((\.|-)[A-Za-z0-9]+)*\.[A-Za-z0-9]+$",
    )
    .expect("Invalid email regex")
});

/// Top-level domain segment of at least two letters.
static TLD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[a-zA-Z]{2,}$").expect("Invalid TLD regex"));

/// ZIP+4 form, `NNNNN-NNNN`.
static ZIP_PLUS_FOUR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}-\d{4}$").expect("Invalid zip regex"));

/// Canadian postal code, `L#L#L#`.
static POSTAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]\d[a-zA-Z]\d[a-zA-Z]\d$").expect("Invalid postal regex")
});

/// Canadian postal code with a dash after the third character, `L#L-#L#`.
static POSTAL_DASHED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]\d[a-zA-Z]-\d[a-zA-Z]\d$").expect("Invalid postal regex")
});

/// Anything outside ASCII letters, digits and underscore.
static NON_WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("Invalid word regex"));

/// As [`NON_WORD_REGEX`] but tolerating whitespace.
static NON_WORD_WS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("Invalid word regex"));

/// Anything outside ASCII letters.
static NON_ALPHA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z]").expect("Invalid alpha regex"));

/// As [`NON_ALPHA_REGEX`] but tolerating whitespace.
static NON_ALPHA_WS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").expect("Invalid alpha regex"));

/// `m?m[-/]d?d[-/]yyyy` shape accepted by [`is_non_overflowed_date`].
static DATE_SHAPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}[-/]\d{1,2}[-/]\d{4}$").expect("Invalid date regex"));

/// Formats tried by [`is_date`], in order. An approximation of the very
/// permissive date parsing the constraint vocabulary was designed against.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

// ═══════════════════════════════════════════════════════════════════════════════
// String Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Strip leading and trailing spaces and tabs.
///
/// Deliberately narrower than Unicode trimming: other whitespace (newlines
/// in textarea content in particular) is kept, so a textarea holding only a
/// newline is not considered blank.
pub fn trim_ws(s: &str) -> &str {
    s.trim_matches([' ', '\t'])
}

/// Remove every space character.
pub fn remove_spaces(s: &str) -> String {
    s.chars().filter(|&c| c != ' ').collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Length
// ═══════════════════════════════════════════════════════════════════════════════

/// True iff `min <= chars(s) <= max`.
pub fn is_valid_length(s: &str, min: u64, max: u64) -> bool {
    let len = s.chars().count() as u64;
    len >= min && len <= max
}

// ═══════════════════════════════════════════════════════════════════════════════
// Numbers
// ═══════════════════════════════════════════════════════════════════════════════

/// True iff the string is digits with at most one leading `-` and at most
/// one `.`, after end-trimming whitespace.
///
/// Known false positives, relied on by callers: `""`, `"-"`, `"."` and
/// `"-."` all report numeric.
pub fn is_numeric(s: &str) -> bool {
    let s = s.trim();
    let s = s.strip_prefix('-').unwrap_or(s);
    let s = s.replacen('.', "", 1);
    s.chars().all(|c| c.is_ascii_digit())
}

/// True iff the string is a whole number in canonical form.
///
/// With `allow_commas`, thousands-separator commas are stripped first. The
/// remainder must be numeric and must survive a round-trip through
/// round-to-nearest unchanged, which rejects fractional values as well as
/// non-canonical spellings like `"05"` or `"7.0"`.
pub fn is_integer(s: &str, allow_commas: bool) -> bool {
    let candidate: Cow<'_, str> = if allow_commas {
        Cow::Owned(s.replace(',', ""))
    } else {
        Cow::Borrowed(s)
    };
    if !is_numeric(&candidate) {
        return false;
    }

    let trimmed = candidate.trim();
    let value: f64 = if trimmed.is_empty() {
        0.0
    } else {
        match trimmed.parse() {
            Ok(v) => v,
            // "-", "." and "-." pass the numeric gate but hold no value
            Err(_) => return false,
        }
    };
    let rounded = (value + 0.5).floor();

    format!("{}", rounded) == candidate.as_ref()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Dates and Times
// ═══════════════════════════════════════════════════════════════════════════════

/// True iff the string parses as some date or datetime value, with no
/// restriction to a particular shape.
pub fn is_date(s: &str) -> bool {
    parse_date_loose(s).is_some()
}

/// Parse a date in any of the supported loose formats.
pub(crate) fn parse_date_loose(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(s, format) {
            return Some(datetime.date());
        }
    }
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc2822(s) {
        return Some(datetime.date_naive());
    }
    None
}

/// True iff the string is a `m?m[-/]d?d[-/]yyyy` date that reproduces the
/// identical calendar date when parsed and reformatted.
///
/// This rejects dates a lenient parser would roll over into an adjacent
/// month or year, such as `13/13/2007`.
pub fn is_non_overflowed_date(s: &str) -> bool {
    if !DATE_SHAPE_REGEX.is_match(s) {
        return false;
    }

    let normalized = s.replace('-', "/");
    let parsed = match NaiveDate::parse_from_str(&normalized, "%m/%d/%Y") {
        Ok(date) => date,
        Err(_) => return false,
    };
    let canonical = format!("{}/{}/{}", parsed.month(), parsed.day(), parsed.year());

    // Strip one leading zero, then a zero after each separator, so that
    // "01/05/2020" compares equal to the canonical "1/5/2020".
    let mut input = normalized;
    if input.starts_with('0') {
        input.remove(0);
    }
    let input = input.replace("/0", "/");

    canonical == input
}

/// Parse a value already vetted by [`is_non_overflowed_date`].
pub(crate) fn parse_strict_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&s.replace('-', "/"), "%m/%d/%Y").ok()
}

/// Rough time-of-day shape check.
///
/// The empty string is valid; otherwise the string must not begin with a
/// colon and its first colon (if any) must sit four or five characters from
/// the end. This heuristic accepts some invalid strings (`"33:30-pm"`
/// among them) and is kept that way deliberately.
pub fn is_time(s: &str) -> bool {
    let len = s.chars().count() as i64;
    if len == 0 {
        return true;
    }
    if s.starts_with(':') {
        return false;
    }
    let colon = s
        .chars()
        .skip(1)
        .position(|c| c == ':')
        .map(|p| p as i64 + 1)
        .unwrap_or(-1);
    !(colon + 5 < len - 1 || colon + 4 > len - 1)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Character Classes
// ═══════════════════════════════════════════════════════════════════════════════

/// True iff the string holds only ASCII letters, digits and underscores,
/// optionally tolerating whitespace.
pub fn is_alphanumeric(s: &str, ignore_whitespace: bool) -> bool {
    if ignore_whitespace {
        !NON_WORD_WS_REGEX.is_match(s)
    } else {
        !NON_WORD_REGEX.is_match(s)
    }
}

/// True iff the string holds only ASCII letters, optionally tolerating
/// whitespace.
pub fn is_alphabetic(s: &str, ignore_whitespace: bool) -> bool {
    if ignore_whitespace {
        !NON_ALPHA_WS_REGEX.is_match(s)
    } else {
        !NON_ALPHA_REGEX.is_match(s)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Email
// ═══════════════════════════════════════════════════════════════════════════════

/// Permissive email shape check. The empty string is valid; screen blanks
/// with a required or length constraint instead.
pub fn is_valid_email(address: &str) -> bool {
    address.is_empty() || EMAIL_REGEX.is_match(address)
}

/// Stricter `something@something.something` check: the domain must contain
/// an interior dot and end in a top-level segment of at least two letters.
/// Disallows bare hosts like `postmaster@localhost`.
pub fn is_valid_email_strict(address: &str) -> bool {
    if !is_valid_email(address) {
        return false;
    }
    let domain_start = address.find('@').map(|i| i + 1).unwrap_or(0);
    let domain = &address[domain_start..];
    let dot = match domain.find('.') {
        Some(position) => position,
        None => return false,
    };
    if dot == 0 || dot == domain.len() - 1 {
        return false;
    }
    TLD_REGEX.is_match(domain)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Postal Formats
// ═══════════════════════════════════════════════════════════════════════════════

/// US zip code: after removing internal spaces, five digits, nine digits,
/// or the `NNNNN-NNNN` form.
pub fn is_valid_zipcode(zipcode: &str) -> bool {
    let zipcode = remove_spaces(zipcode);
    match zipcode.chars().count() {
        5 | 9 => is_numeric(&zipcode),
        10 => ZIP_PLUS_FOUR_REGEX.is_match(&zipcode),
        _ => false,
    }
}

/// Canadian postal code: `L#L#L#`, with an optional dash after the third
/// character. Internal spaces are ignored.
pub fn is_valid_postalcode(postalcode: &str) -> bool {
    let postalcode = remove_spaces(postalcode);
    match postalcode.chars().count() {
        6 => POSTAL_REGEX.is_match(&postalcode),
        7 => POSTAL_DASHED_REGEX.is_match(&postalcode),
        _ => false,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Phone Numbers
// ═══════════════════════════════════════════════════════════════════════════════

/// US/Canadian phone number given as one freeform string.
///
/// All non-digits are stripped; fewer than seven digits fail outright.
/// The trailing seven digits split into prefix and suffix and the remainder
/// is the area code, which must then be exactly three digits.
pub fn is_valid_us_phone_number(number: &str) -> bool {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 7 {
        return false;
    }
    let split = digits.len() - 7;
    phone_parts_ok(&digits[..split], &digits[split..split + 3], &digits[split + 3..])
}

/// US/Canadian phone number given as three explicit parts.
pub fn is_valid_us_phone_parts(area: &str, prefix: &str, suffix: &str) -> bool {
    phone_parts_ok(area, prefix, suffix)
}

fn phone_parts_ok(area: &str, prefix: &str, suffix: &str) -> bool {
    area.chars().count() == 3
        && is_numeric(area)
        && prefix.chars().count() == 3
        && is_numeric(prefix)
        && suffix.chars().count() == 4
        && is_numeric(suffix)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Credit Cards
// ═══════════════════════════════════════════════════════════════════════════════

/// Card families with length/prefix rules.
///
/// `Generic` is the `"credit card"` keyword: checksum and length only.
/// `Unknown` is any unrecognized family name and accepts every
/// checksum-valid number; the permissiveness is an explicit policy here
/// rather than a silent fallback, so it stays visible and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    Visa,
    Mastercard,
    AmericanExpress,
    DinersClub,
    Discover,
    Enroute,
    Jcb,
    Generic,
    Unknown,
}

impl CardType {
    /// Resolve a family name, case-insensitively. Never fails: names not
    /// in the table become [`CardType::Unknown`].
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "visa" => Self::Visa,
            "mastercard" => Self::Mastercard,
            "american express" => Self::AmericanExpress,
            "diners club" => Self::DinersClub,
            "discover" => Self::Discover,
            "enroute" => Self::Enroute,
            "jcb" => Self::Jcb,
            "credit card" => Self::Generic,
            _ => Self::Unknown,
        }
    }

    /// Length and prefix rules for the recognized families.
    fn matches(&self, number: &str, len: usize) -> bool {
        let first2 = number.get(..2).unwrap_or("");
        let first4 = number.get(..4).unwrap_or("");
        match self {
            Self::Visa => number.starts_with('4') && (len == 16 || len == 13),
            Self::Mastercard => {
                len == 16 && matches!(first2, "51" | "52" | "53" | "54" | "55")
            }
            Self::AmericanExpress => len == 15 && matches!(first2, "34" | "37"),
            Self::DinersClub => len == 14 && matches!(first2, "30" | "36" | "38"),
            Self::Discover => len == 16 && first4 == "6011",
            Self::Enroute => len == 15 && matches!(first4, "2014" | "2149"),
            Self::Jcb => {
                len == 16
                    && matches!(first4, "3088" | "3096" | "3112" | "3158" | "3337" | "3528")
            }
            Self::Generic | Self::Unknown => true,
        }
    }
}

/// Credit card number validation: 13–16 characters, Luhn checksum of zero,
/// and — for a recognized card family — that family's length and prefix
/// rules.
pub fn is_valid_credit_card(number: &str, card_type: Option<CardType>) -> bool {
    let len = number.chars().count();
    if !(13..=16).contains(&len) {
        return false;
    }
    if luhn::compute_mod10(number) != Some(0) {
        return false;
    }
    match card_type {
        Some(card_type) => card_type.matches(number, len),
        None => true,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
