//! Single-pass validation over an ordered field list.

use tracing::{debug, trace};

use crate::config::RunOptions;
use crate::error::{EngineError, ErrorRecord};
use crate::evaluator::{evaluate_field, SiblingValues};
use crate::field::{FieldValue, FormField};
use crate::group::GroupTracker;

/// Validate an ordered field list, producing errors in field order.
///
/// An empty result means the form is valid. With the default options this
/// never returns `Err`; the strict bad-regex policy is the only fault
/// path.
pub fn validate_form(
    fields: &[FormField],
    options: &RunOptions,
) -> Result<Vec<ErrorRecord>, EngineError> {
    let mut tracker = GroupTracker::build(fields);
    let siblings = sibling_values(fields);
    let mut errors: Vec<ErrorRecord> = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        if field.declaration.kind.is_grouped() {
            if let Some(error) = tracker.visit_member(field, index) {
                trace!(field = %error_field(&error), "group required error");
                errors.push(error);
            }
        } else {
            for error in evaluate_field(field, &siblings, options)? {
                trace!(field = %error_field(&error), message = %error.message, "field error");
                errors.push(error);
            }
        }
    }

    debug!(
        fields = fields.len(),
        errors = errors.len(),
        "validation run complete"
    );
    Ok(errors)
}

fn error_field(error: &ErrorRecord) -> &str {
    error.field_id.as_deref().unwrap_or("?")
}

/// Text values addressable by field id or name, first occurrence winning,
/// for sibling references like the phone prefix/suffix pair.
fn sibling_values(fields: &[FormField]) -> SiblingValues<'_> {
    let mut values = SiblingValues::new();
    for field in fields {
        if let FieldValue::Text(text) = &field.declaration.value {
            if let Some(id) = field.declaration.id.as_deref() {
                values.entry(id).or_insert(text.as_str());
            }
            if let Some(name) = field.declaration.name.as_deref() {
                values.entry(name).or_insert(text.as_str());
            }
        }
    }
    values
}

// ═══════════════════════════════════════════════════════════════════════════════
// Form Validator
// ═══════════════════════════════════════════════════════════════════════════════

/// A reusable validator holding run options.
///
/// Each [`validate`](Self::validate) call is an independent pass with its
/// own transient group state; a validator can be shared freely across
/// forms and threads.
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    options: RunOptions,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RunOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Validate a field list. See [`validate_form`].
    pub fn validate(&self, fields: &[FormField]) -> Result<Vec<ErrorRecord>, EngineError> {
        validate_form(fields, &self.options)
    }

    /// Convenience check: true when the field list produces no errors.
    pub fn is_valid(&self, fields: &[FormField]) -> bool {
        matches!(self.validate(fields), Ok(errors) if errors.is_empty())
    }
}
