//! Form field declarations: the per-field input half of a validation run.
//!
//! A [`FieldDeclaration`] captures what the metadata-reading collaborator saw
//! in the form: the control kind, its identity (`id`, `name`, human
//! `description`) and its current content. The engine never mutates a
//! declaration; normalized values are reported back through
//! [`crate::rules::normalized_text_value`].

use serde::{Deserialize, Serialize};

use crate::rules::ConstraintRecord;

// ═══════════════════════════════════════════════════════════════════════════════
// Field Kind
// ═══════════════════════════════════════════════════════════════════════════════

/// The kind of form control a declaration describes.
///
/// The kind selects which priority chain the evaluator applies (see
/// [`crate::evaluator`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    Textarea,
    Password,
    File,
    SelectSingle,
    SelectMultiple,
    Radio,
    Checkbox,
}

impl FieldKind {
    /// Whether this kind participates in radio/checkbox group handling.
    pub fn is_grouped(&self) -> bool {
        matches!(self, Self::Radio | Self::Checkbox)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Value
// ═══════════════════════════════════════════════════════════════════════════════

/// The current content of a field, as captured by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// Free text content (text, textarea, password, file path).
    Text(String),
    /// The selected option values of a select control, in selection order.
    /// Empty means nothing is selected.
    Selection(Vec<String>),
    /// The checked flag of a radio button or checkbox.
    Checked(bool),
}

impl FieldValue {
    /// The text content, or `""` for non-textual values.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            _ => "",
        }
    }

    /// The selected option values, or an empty slice for non-select values.
    pub fn selections(&self) -> &[String] {
        match self {
            Self::Selection(values) => values,
            _ => &[],
        }
    }

    /// True only for `Checked(true)`.
    pub fn is_checked(&self) -> bool {
        matches!(self, Self::Checked(true))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Declaration
// ═══════════════════════════════════════════════════════════════════════════════

/// A single form field as supplied by the metadata-reading collaborator.
///
/// `id` is optional, but a field without one cannot be addressed by an
/// inline error container; its error records carry `field_id: None` and the
/// display layer falls back to its combined message list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    /// Unique id within the form, when present.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,

    /// The control kind.
    pub kind: FieldKind,

    /// The field name; shared across members of one radio/checkbox group.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,

    /// Current content.
    pub value: FieldValue,

    /// Human label used to prefix default error text.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

impl FieldDeclaration {
    /// Create a declaration with the given kind and value.
    pub fn new(kind: FieldKind, value: impl Into<FieldValue>) -> Self {
        Self {
            id: None,
            kind,
            name: None,
            value: value.into(),
            description: None,
        }
    }

    /// Convenience constructor for a text input.
    pub fn text(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(FieldKind::Text, value.into()).with_id(id)
    }

    /// Convenience constructor for a textarea.
    pub fn textarea(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(FieldKind::Textarea, value.into()).with_id(id)
    }

    /// Convenience constructor for a password input.
    pub fn password(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(FieldKind::Password, value.into()).with_id(id)
    }

    /// Convenience constructor for a file input.
    pub fn file(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(FieldKind::File, value.into()).with_id(id)
    }

    /// Convenience constructor for a single-choice select.
    pub fn select(id: impl Into<String>, selected: impl IntoIterator<Item = String>) -> Self {
        Self::new(
            FieldKind::SelectSingle,
            FieldValue::Selection(selected.into_iter().collect()),
        )
        .with_id(id)
    }

    /// Convenience constructor for a radio button.
    pub fn radio(name: impl Into<String>, checked: bool) -> Self {
        Self::new(FieldKind::Radio, FieldValue::Checked(checked)).with_name(name)
    }

    /// Convenience constructor for a checkbox.
    pub fn checkbox(name: impl Into<String>, checked: bool) -> Self {
        Self::new(FieldKind::Checkbox, FieldValue::Checked(checked)).with_name(name)
    }

    /// Set the field id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the field name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the human label used to prefix default error messages.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Form Field
// ═══════════════════════════════════════════════════════════════════════════════

/// One element of a validation run's input: a declaration paired with its
/// extracted constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub declaration: FieldDeclaration,
    #[serde(default)]
    pub constraints: ConstraintRecord,
}

impl FormField {
    pub fn new(declaration: FieldDeclaration, constraints: ConstraintRecord) -> Self {
        Self {
            declaration,
            constraints,
        }
    }

    /// Pair a declaration with constraints extracted from raw metadata.
    pub fn with_metadata<'a, I>(declaration: FieldDeclaration, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            declaration,
            constraints: ConstraintRecord::from_metadata(pairs),
        }
    }

    /// A field with no constraints at all; it can never produce an error.
    pub fn unconstrained(declaration: FieldDeclaration) -> Self {
        Self {
            declaration,
            constraints: ConstraintRecord::default(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_as_text() {
        assert_eq!(FieldValue::Text("abc".into()).as_text(), "abc");
        assert_eq!(FieldValue::Checked(true).as_text(), "");
        assert_eq!(FieldValue::Selection(vec!["a".into()]).as_text(), "");
    }

    #[test]
    fn test_field_value_is_checked() {
        assert!(FieldValue::Checked(true).is_checked());
        assert!(!FieldValue::Checked(false).is_checked());
        assert!(!FieldValue::Text("on".into()).is_checked());
    }

    #[test]
    fn test_builder_methods() {
        let field = FieldDeclaration::text("email", "a@b.com")
            .with_name("email")
            .with_description("Email address");
        assert_eq!(field.id.as_deref(), Some("email"));
        assert_eq!(field.name.as_deref(), Some("email"));
        assert_eq!(field.description.as_deref(), Some("Email address"));
        assert_eq!(field.kind, FieldKind::Text);
    }

    #[test]
    fn test_grouped_kinds() {
        assert!(FieldKind::Radio.is_grouped());
        assert!(FieldKind::Checkbox.is_grouped());
        assert!(!FieldKind::Text.is_grouped());
        assert!(!FieldKind::SelectMultiple.is_grouped());
    }

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&FieldKind::SelectMultiple).unwrap();
        assert_eq!(json, "\"select-multiple\"");
        let kind: FieldKind = serde_json::from_str("\"textarea\"").unwrap();
        assert_eq!(kind, FieldKind::Textarea);
    }

    #[test]
    fn test_declaration_round_trip() {
        let field = FieldDeclaration::radio("color", true).with_id("color_red");
        let json = serde_json::to_string(&field).unwrap();
        let back: FieldDeclaration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }
}
