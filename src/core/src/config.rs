//! Run options and permissiveness policies.

use serde::{Deserialize, Serialize};

/// What to do with a pattern keyword that is not in the dispatch table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPatternPolicy {
    /// Enforce no constraint; the field passes silently.
    #[default]
    Allow,
    /// Report a pattern error for the field.
    Reject,
}

/// What to do with a `/body/flags` literal that fails to compile
/// (including one carrying a disallowed flag).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadRegexPolicy {
    /// The literal never matches: a must-match pattern always reports an
    /// error, an inverse pattern never does.
    #[default]
    TreatAsNoMatch,
    /// Surface the compile failure as an [`crate::error::EngineError`]
    /// from the run.
    Fail,
}

/// Options for a single validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// When true (the default), callers are told to write the trimmed form
    /// of text/textarea values back via
    /// [`crate::rules::normalized_text_value`]. The value under test is
    /// trimmed either way, so the required-blank check treats
    /// whitespace-only content as blank in both modes.
    #[serde(default = "default_trim_whitespace")]
    pub trim_whitespace: bool,

    /// Policy for unrecognized pattern keywords.
    #[serde(default)]
    pub unknown_pattern: UnknownPatternPolicy,

    /// Policy for uncompilable regex literals.
    #[serde(default)]
    pub bad_regex: BadRegexPolicy,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            trim_whitespace: default_trim_whitespace(),
            unknown_pattern: UnknownPatternPolicy::default(),
            bad_regex: BadRegexPolicy::default(),
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave text values untouched; only whitespace-only content still
    /// counts as blank for the required check.
    pub fn keep_whitespace(mut self) -> Self {
        self.trim_whitespace = false;
        self
    }

    /// Report unrecognized pattern keywords as errors instead of passing.
    pub fn reject_unknown_patterns(mut self) -> Self {
        self.unknown_pattern = UnknownPatternPolicy::Reject;
        self
    }

    /// Surface uncompilable regex literals as engine errors.
    pub fn fail_on_bad_regex(mut self) -> Self {
        self.bad_regex = BadRegexPolicy::Fail;
        self
    }
}

fn default_trim_whitespace() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RunOptions::default();
        assert!(options.trim_whitespace);
        assert_eq!(options.unknown_pattern, UnknownPatternPolicy::Allow);
        assert_eq!(options.bad_regex, BadRegexPolicy::TreatAsNoMatch);
    }

    #[test]
    fn test_builder_toggles() {
        let options = RunOptions::new()
            .keep_whitespace()
            .reject_unknown_patterns()
            .fail_on_bad_regex();
        assert!(!options.trim_whitespace);
        assert_eq!(options.unknown_pattern, UnknownPatternPolicy::Reject);
        assert_eq!(options.bad_regex, BadRegexPolicy::Fail);
    }

    #[test]
    fn test_deserialize_with_missing_keys() {
        let options: RunOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, RunOptions::default());

        let options: RunOptions =
            serde_json::from_str(r#"{"trim_whitespace": false, "unknown_pattern": "reject"}"#)
                .unwrap();
        assert!(!options.trim_whitespace);
        assert_eq!(options.unknown_pattern, UnknownPatternPolicy::Reject);
    }
}
