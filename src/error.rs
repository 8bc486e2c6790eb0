//! Error types
//!
//! Failures come in two tiers. [`ValidationError`] is a field-level data
//! failure: exactly one is produced per failing field per validation run,
//! and its `Display` rendering is the user-facing message collected into a
//! [`ValidationReport`](crate::ValidationReport). [`RegistryError`] is a
//! configuration failure (duplicate field names, a model whose declared
//! fields disagree with its registered descriptors); these are reported
//! loudly through `Result` rather than folded into the validation report.

use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
	/// A required field was never set and has no default.
	#[error("Field '{field}' is required")]
	Required { field: String },

	/// Text shorter than the configured minimum length.
	#[error("Field '{field}' must have at least {min} characters")]
	TooShort { field: String, length: usize, min: usize },

	/// Text longer than the configured maximum length.
	#[error("Field '{field}' must have at most {max} characters")]
	TooLong { field: String, length: usize, max: usize },

	/// Text did not match the configured pattern.
	#[error("Field '{field}' does not match required pattern")]
	PatternMismatch { field: String },

	/// The configured pattern itself failed to compile. Treated as a
	/// validation failure so one bad rule cannot abort the whole run.
	#[error("Field '{field}' has invalid regex pattern")]
	InvalidPattern { field: String },

	/// Scalar below the configured minimum.
	#[error("Field '{field}' must be at least {min}")]
	TooSmall { field: String, value: String, min: String },

	/// Scalar above the configured maximum.
	#[error("Field '{field}' must be at most {max}")]
	TooLarge { field: String, value: String, max: String },

	/// Value absent from a non-empty allow-list.
	#[error("Field '{field}' must be one of the allowed values")]
	NotAllowed { field: String },

	/// Custom predicate returned false.
	#[error("{message}")]
	Custom { field: String, message: String },
}

impl ValidationError {
	/// Name of the field the failure belongs to.
	pub fn field(&self) -> &str {
		match self {
			Self::Required { field }
			| Self::TooShort { field, .. }
			| Self::TooLong { field, .. }
			| Self::PatternMismatch { field }
			| Self::InvalidPattern { field }
			| Self::TooSmall { field, .. }
			| Self::TooLarge { field, .. }
			| Self::NotAllowed { field }
			| Self::Custom { field, .. } => field,
		}
	}
}

/// A model registration or schema-consistency failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
	/// A model declared the same field name twice.
	#[error("duplicate field name '{name}' in model '{model}'")]
	DuplicateField { model: &'static str, name: String },

	/// A live field's value type does not match its registered descriptor.
	#[error(
		"field '{name}' of model '{model}' has type {actual}, but its descriptor expects {expected}"
	)]
	TypeMismatch {
		model: &'static str,
		name: String,
		expected: &'static str,
		actual: &'static str,
	},

	/// A model's declared field enumeration disagrees with its registered
	/// descriptor table (count or order).
	#[error("model '{model}' fields disagree with registration: {detail}")]
	SchemaMismatch { model: &'static str, detail: String },
}
