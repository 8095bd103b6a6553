//! Radio/checkbox group tracking.
//!
//! A group is the set of radio/checkbox fields sharing one `name`; it has a
//! single required identity read from its first member, and produces at
//! most one required error per run no matter how many members are
//! unchecked. The tracker is built at run start and discarded at run end —
//! it never outlives a single pass.

use std::collections::HashMap;

use crate::error::{ErrorRecord, Violation};
use crate::evaluator::compose_message;
use crate::field::FormField;

/// Per-group state for one validation run.
#[derive(Debug)]
struct GroupState {
    required: bool,
    /// Custom required message of the first member, used verbatim.
    custom_error: Option<String>,
    /// Identity of the first member, for the error record.
    first_id: Option<String>,
    first_description: Option<String>,
    first_name: Option<String>,
    any_checked: bool,
    member_count: usize,
    visited: usize,
    /// Set once the group's error has been emitted this run; cleared again
    /// when the last member is visited.
    tested: bool,
}

/// Transient per-run state deduplicating group required errors.
#[derive(Debug)]
pub(crate) struct GroupTracker {
    groups: HashMap<String, GroupState>,
}

impl GroupTracker {
    /// Derive the group view from the run's field list. Members without a
    /// name form single-member groups keyed by position.
    pub fn build(fields: &[FormField]) -> Self {
        let mut groups: HashMap<String, GroupState> = HashMap::new();
        for (index, field) in fields.iter().enumerate() {
            if !field.declaration.kind.is_grouped() {
                continue;
            }
            let key = Self::group_key(field, index);
            let checked = field.declaration.value.is_checked();
            let state = groups.entry(key).or_insert_with(|| GroupState {
                required: field.constraints.required,
                custom_error: field.constraints.required_error.clone(),
                first_id: field.declaration.id.clone(),
                first_description: field.declaration.description.clone(),
                first_name: field.declaration.name.clone(),
                any_checked: false,
                member_count: 0,
                visited: 0,
                tested: false,
            });
            state.member_count += 1;
            state.any_checked |= checked;
        }
        Self { groups }
    }

    fn group_key(field: &FormField, index: usize) -> String {
        match &field.declaration.name {
            Some(name) => name.clone(),
            None => format!("__unnamed_{}", index),
        }
    }

    /// Visit one group member during the pass. Returns the group's single
    /// required error when this is the first member of a required,
    /// all-unchecked group.
    pub fn visit_member(&mut self, field: &FormField, index: usize) -> Option<ErrorRecord> {
        let key = Self::group_key(field, index);
        let state = self.groups.get_mut(&key)?;

        let mut error = None;
        if state.required && !state.any_checked && !state.tested {
            let message = compose_message(
                &Violation::Blank,
                state.custom_error.as_deref(),
                state.first_description.as_deref(),
                state.first_name.as_deref(),
            );
            error = Some(ErrorRecord::new(state.first_id.clone(), message));
            state.tested = true;
        }

        state.visited += 1;
        if state.visited == state.member_count {
            state.tested = false;
        }
        error
    }
}
