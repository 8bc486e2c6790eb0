//! Field constraint configuration
//!
//! [`FieldOptions`] is the declarative rule set for one field. It is built
//! once per field declaration with the `with_*` builder methods and is
//! immutable afterwards; the [`FieldValidator`](crate::FieldValidator)
//! evaluates it against candidate values.

use std::fmt;
use std::sync::Arc;

use crate::value::FieldValue;

/// Type-erased custom predicate over a field value.
pub type CustomPredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Declarative constraint set for a single field of type `T`.
///
/// Which constraints actually apply depends on the value category of `T`
/// (see [`ValueKind`](crate::value::ValueKind)): length and pattern rules
/// only fire for text, range rules only for ordered scalars. The allow-list
/// and custom predicate apply to every category.
///
/// # Examples
///
/// ```
/// use fieldset::FieldOptions;
///
/// let options = FieldOptions::<String>::new()
///     .required()
///     .with_min_length(3)
///     .with_max_length(100)
///     .with_description("Task title");
///
/// assert!(options.required);
/// assert_eq!(options.min_length, Some(3));
/// ```
#[derive(Clone)]
pub struct FieldOptions<T: FieldValue> {
	/// Whether the field must be set (or carry a default) before validation.
	pub required: bool,
	/// Minimum text length in bytes.
	pub min_length: Option<usize>,
	/// Maximum text length in bytes.
	pub max_length: Option<usize>,
	/// Minimum scalar value (inclusive).
	pub min_value: Option<T>,
	/// Maximum scalar value (inclusive).
	pub max_value: Option<T>,
	/// Regex the full text must match.
	pub pattern: Option<String>,
	/// Initial value assigned to the field; also satisfies `required`.
	pub default: Option<T>,
	/// Non-empty list restricts the value to its members.
	pub allowed_values: Vec<T>,
	/// Custom predicate; `false` fails validation.
	pub custom: Option<CustomPredicate<T>>,
	/// Message reported when the custom predicate fails.
	pub custom_message: Option<String>,
	/// Free-text description surfaced through introspection.
	pub description: String,
}

impl<T: FieldValue> FieldOptions<T> {
	/// Creates an empty, permissive option set.
	pub fn new() -> Self {
		Self {
			required: false,
			min_length: None,
			max_length: None,
			min_value: None,
			max_value: None,
			pattern: None,
			default: None,
			allowed_values: Vec::new(),
			custom: None,
			custom_message: None,
			description: String::new(),
		}
	}

	/// Marks the field as required.
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	/// Sets the minimum text length.
	pub fn with_min_length(mut self, min: usize) -> Self {
		self.min_length = Some(min);
		self
	}

	/// Sets the maximum text length.
	pub fn with_max_length(mut self, max: usize) -> Self {
		self.max_length = Some(max);
		self
	}

	/// Sets the minimum scalar value (inclusive).
	pub fn with_min_value(mut self, min: T) -> Self {
		self.min_value = Some(min);
		self
	}

	/// Sets the maximum scalar value (inclusive).
	pub fn with_max_value(mut self, max: T) -> Self {
		self.max_value = Some(max);
		self
	}

	/// Sets the regex the full text value must match.
	///
	/// The pattern is compiled lazily at first validation; a malformed
	/// pattern turns into a validation failure for the field rather than
	/// an error at declaration time.
	pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
		self.pattern = Some(pattern.into());
		self
	}

	/// Sets the default value. The field starts out holding it, and a
	/// defaulted field counts as present for the `required` check.
	pub fn with_default(mut self, default: T) -> Self {
		self.default = Some(default);
		self
	}

	/// Restricts the value to the given allow-list.
	///
	/// # Examples
	///
	/// ```
	/// use fieldset::FieldOptions;
	///
	/// let options = FieldOptions::<i64>::new().with_allowed_values(vec![2, 4, 6]);
	/// assert_eq!(options.allowed_values, vec![2, 4, 6]);
	/// ```
	pub fn with_allowed_values(mut self, allowed: Vec<T>) -> Self {
		self.allowed_values = allowed;
		self
	}

	/// Installs a custom predicate evaluated after every built-in rule.
	pub fn with_custom(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
		self.custom = Some(Arc::new(predicate));
		self
	}

	/// Sets the message reported when the custom predicate fails.
	pub fn with_custom_message(mut self, message: impl Into<String>) -> Self {
		self.custom_message = Some(message.into());
		self
	}

	/// Sets the human-readable field description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}
}

impl<T: FieldValue> Default for FieldOptions<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: FieldValue> fmt::Debug for FieldOptions<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldOptions")
			.field("required", &self.required)
			.field("min_length", &self.min_length)
			.field("max_length", &self.max_length)
			.field("min_value", &self.min_value)
			.field("max_value", &self.max_value)
			.field("pattern", &self.pattern)
			.field("default", &self.default)
			.field("allowed_values", &self.allowed_values)
			.field("custom", &self.custom.as_ref().map(|_| "<predicate>"))
			.field("custom_message", &self.custom_message)
			.field("description", &self.description)
			.finish()
	}
}
