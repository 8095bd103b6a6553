//! # Formguard Core
//!
//! A declarative, attribute-driven form-field validation engine: given a
//! form's fields, each annotated with constraint metadata, one synchronous
//! pass evaluates every field and produces an ordered list of
//! human-readable errors.
//!
//! ## Architecture
//!
//! - **Predicates**: stateless, total validator functions (length, numeric,
//!   date, time, email, zip/postal, phone, credit card)
//! - **Luhn**: the mod-10 checksum behind credit card validation
//! - **Pattern Dispatch**: named keywords and `/body/flags` regex literals
//!   resolved to predicate calls or compiled matches
//! - **Rules**: extraction of typed [`ConstraintRecord`]s from raw
//!   key/value metadata
//! - **Evaluator**: per-kind priority chains with short-circuiting, plus
//!   the independent numeric-range check for text fields
//! - **Groups**: per-run deduplication of radio/checkbox required errors
//! - **Run**: the single-pass orchestrator producing ordered
//!   [`ErrorRecord`]s
//!
//! ## Quick Start
//!
//! ```rust
//! use formguard_core::{
//!     validate_form, FieldDeclaration, FormField, RunOptions,
//! };
//!
//! let fields = vec![
//!     FormField::with_metadata(
//!         FieldDeclaration::text("email", "not-an-email").with_description("Email"),
//!         [("required", "yes"), ("pattern", "email")],
//!     ),
//!     FormField::with_metadata(
//!         FieldDeclaration::text("zip", "12345"),
//!         [("pattern", "zipcode")],
//!     ),
//! ];
//!
//! let errors = validate_form(&fields, &RunOptions::default()).unwrap();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].field_id.as_deref(), Some("email"));
//! assert_eq!(errors[0].message, "Email must be a valid email");
//! ```
//!
//! The engine's output contract is the ordered error list; rendering it —
//! locating `{field_id}_error` containers, toggling error styling, the
//! alert fallback — belongs to the display collaborator (see
//! [`ErrorRecord`]).

pub mod config;
pub mod error;
mod evaluator;
pub mod field;
mod group;
pub mod luhn;
pub mod pattern;
pub mod predicates;
pub mod rules;
pub mod run;

pub use config::{BadRegexPolicy, RunOptions, UnknownPatternPolicy};
pub use error::{EngineError, ErrorRecord, Violation};
pub use field::{FieldDeclaration, FieldKind, FieldValue, FormField};
pub use pattern::PatternSpec;
pub use predicates::CardType;
pub use rules::{normalized_text_value, ConstraintRecord, DateBound, NumberBound};
pub use run::{validate_form, FormValidator};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::config::RunOptions;
    pub use crate::error::{EngineError, ErrorRecord, Violation};
    pub use crate::field::{FieldDeclaration, FieldKind, FieldValue, FormField};
    pub use crate::rules::ConstraintRecord;
    pub use crate::run::{validate_form, FormValidator};
}
