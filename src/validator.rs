//! Per-field rule engine
//!
//! [`FieldValidator`] pairs a field name with its [`FieldOptions`] and turns
//! a candidate value into a pass/fail verdict. It is stateless apart from a
//! lazily compiled regex cache, and is shared behind an `Arc` by every
//! instance of the owning model type.
//!
//! Rule evaluation short-circuits: the first violated rule wins and its
//! message is the field's single error for that run. Dispatch follows the
//! value category of `T`:
//!
//! - text: `min_length`, `max_length`, `pattern`, then allow-list/custom
//! - ordered scalar: `min_value`, `max_value`, then allow-list/custom
//! - opaque: allow-list/custom only
//!
//! The `required` flag is deliberately not checked here. The engine only
//! ever sees a value, so presence is detected by the owning
//! [`Field`](crate::Field), which knows whether the value was ever set.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::json;

use crate::error::ValidationError;
use crate::options::FieldOptions;
use crate::value::{FieldValue, ValueKind};

/// Object-safe introspection view of one field's declaration.
///
/// Implemented by [`FieldValidator`] and stored type-erased in each
/// [`FieldDescriptor`](crate::registry::FieldDescriptor), so consumers such
/// as schema or documentation generators can describe a model's constraints
/// without knowing the field's value type.
pub trait FieldMeta: Send + Sync {
	/// Declared (JSON-facing) field name.
	fn name(&self) -> &str;

	/// Free-text field description.
	fn description(&self) -> &str;

	/// Whether the field must be present.
	fn required(&self) -> bool;

	/// Configured constraints in a JSON-schema-friendly shape.
	fn constraints(&self) -> serde_json::Value;
}

/// Typed rule engine for a single field.
///
/// # Examples
///
/// ```
/// use fieldset::{FieldOptions, FieldValidator};
///
/// let validator = FieldValidator::new(
///     "title",
///     FieldOptions::<String>::new().with_min_length(3).with_max_length(10),
/// );
///
/// assert!(validator.validate(&"hello".to_string()).is_ok());
/// assert!(validator.validate(&"hi".to_string()).is_err());
/// ```
pub struct FieldValidator<T: FieldValue> {
	name: String,
	options: FieldOptions<T>,
	// Compiled on first use; Err is remembered so a malformed pattern fails
	// every validation instead of being retried.
	compiled_pattern: OnceCell<Result<Regex, regex::Error>>,
}

impl<T: FieldValue> FieldValidator<T> {
	/// Creates a validator for the named field.
	pub fn new(name: impl Into<String>, options: FieldOptions<T>) -> Self {
		Self {
			name: name.into(),
			options,
			compiled_pattern: OnceCell::new(),
		}
	}

	/// Declared field name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The constraint set this validator evaluates.
	pub fn options(&self) -> &FieldOptions<T> {
		&self.options
	}

	/// Whether the field must be present before validation.
	pub fn is_required(&self) -> bool {
		self.options.required
	}

	/// Configured default value, if any.
	pub fn default_value(&self) -> Option<&T> {
		self.options.default.as_ref()
	}

	/// Evaluates the rule set against `value`.
	///
	/// Returns the first violated rule's error; at most one error per call.
	pub fn validate(&self, value: &T) -> Result<(), ValidationError> {
		match T::KIND {
			ValueKind::Text => self.validate_text(value)?,
			ValueKind::Scalar => self.validate_scalar(value)?,
			ValueKind::Opaque => {}
		}
		self.validate_allowed_and_custom(value)
	}

	fn validate_text(&self, value: &T) -> Result<(), ValidationError> {
		let Some(text) = value.as_text() else {
			// A Text-kind type always yields a text view; nothing to check
			// if an implementation opts out.
			return Ok(());
		};

		if let Some(min) = self.options.min_length
			&& text.len() < min
		{
			return Err(ValidationError::TooShort {
				field: self.name.clone(),
				length: text.len(),
				min,
			});
		}

		if let Some(max) = self.options.max_length
			&& text.len() > max
		{
			return Err(ValidationError::TooLong {
				field: self.name.clone(),
				length: text.len(),
				max,
			});
		}

		if let Some(pattern) = &self.options.pattern {
			// Anchored so the pattern must match the whole value.
			let compiled = self
				.compiled_pattern
				.get_or_init(|| Regex::new(&format!(r"\A(?:{pattern})\z")));
			match compiled {
				Ok(regex) => {
					if !regex.is_match(text) {
						return Err(ValidationError::PatternMismatch {
							field: self.name.clone(),
						});
					}
				}
				Err(_) => {
					return Err(ValidationError::InvalidPattern {
						field: self.name.clone(),
					});
				}
			}
		}

		Ok(())
	}

	fn validate_scalar(&self, value: &T) -> Result<(), ValidationError> {
		if let Some(min) = &self.options.min_value
			&& value.compare(min).is_none_or(std::cmp::Ordering::is_lt)
		{
			return Err(ValidationError::TooSmall {
				field: self.name.clone(),
				value: value.describe(),
				min: min.describe(),
			});
		}

		if let Some(max) = &self.options.max_value
			&& value.compare(max).is_none_or(std::cmp::Ordering::is_gt)
		{
			return Err(ValidationError::TooLarge {
				field: self.name.clone(),
				value: value.describe(),
				max: max.describe(),
			});
		}

		Ok(())
	}

	fn validate_allowed_and_custom(&self, value: &T) -> Result<(), ValidationError> {
		if !self.options.allowed_values.is_empty()
			&& !self.options.allowed_values.contains(value)
		{
			return Err(ValidationError::NotAllowed {
				field: self.name.clone(),
			});
		}

		if let Some(custom) = &self.options.custom
			&& !custom(value)
		{
			let message = self.options.custom_message.clone().unwrap_or_else(|| {
				format!("Field '{}' failed custom validation", self.name)
			});
			return Err(ValidationError::Custom {
				field: self.name.clone(),
				message,
			});
		}

		Ok(())
	}
}

impl<T: FieldValue> FieldMeta for FieldValidator<T> {
	fn name(&self) -> &str {
		&self.name
	}

	fn description(&self) -> &str {
		&self.options.description
	}

	fn required(&self) -> bool {
		self.options.required
	}

	fn constraints(&self) -> serde_json::Value {
		let opts = &self.options;
		let mut constraints = serde_json::Map::new();
		if let Some(min) = opts.min_length {
			constraints.insert("min_length".to_string(), json!(min));
		}
		if let Some(max) = opts.max_length {
			constraints.insert("max_length".to_string(), json!(max));
		}
		if let Some(min) = &opts.min_value {
			constraints.insert("min_value".to_string(), json!(min.describe()));
		}
		if let Some(max) = &opts.max_value {
			constraints.insert("max_value".to_string(), json!(max.describe()));
		}
		if let Some(pattern) = &opts.pattern {
			constraints.insert("pattern".to_string(), json!(pattern));
		}
		if let Some(default) = &opts.default {
			constraints.insert("default".to_string(), json!(default.describe()));
		}
		if !opts.allowed_values.is_empty() {
			let allowed: Vec<String> = opts.allowed_values.iter().map(FieldValue::describe).collect();
			constraints.insert("allowed_values".to_string(), json!(allowed));
		}
		if opts.custom.is_some() {
			constraints.insert("custom".to_string(), json!(true));
		}
		serde_json::Value::Object(constraints)
	}
}

impl<T: FieldValue> std::fmt::Debug for FieldValidator<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FieldValidator")
			.field("name", &self.name)
			.field("options", &self.options)
			.finish()
	}
}
