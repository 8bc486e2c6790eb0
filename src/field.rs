//! Typed field wrapper
//!
//! [`Field`] is the only mutable, instance-owned piece of a model: it holds
//! one value, a presence latch, and a shared handle to the field's rule
//! engine. [`AnyField`] is the object-safe seam the model base uses to
//! enumerate fields of differing value types, validate them through a
//! type-erased check, and build their registry descriptors.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::options::FieldOptions;
use crate::registry::FieldDescriptor;
use crate::validator::{FieldMeta, FieldValidator};
use crate::value::FieldValue;

/// One field's value cell plus its immutable rule engine.
///
/// The value starts out as the configured default (or `T::default()` when
/// none is configured). Assignment through [`set`](Field::set) replaces the
/// value and marks the field as present; a `required` field that was never
/// set and has no default fails validation with
/// [`ValidationError::Required`].
///
/// # Examples
///
/// ```
/// use fieldset::{Field, FieldOptions};
///
/// let mut title = Field::new(
///     "title",
///     FieldOptions::<String>::new().required().with_min_length(3),
/// );
/// assert!(title.validate().is_err()); // never set
///
/// title.set("Learn Rust".to_string());
/// assert!(title.validate().is_ok());
/// assert_eq!(&*title, "Learn Rust");
/// ```
#[derive(Debug, Clone)]
pub struct Field<T: FieldValue> {
	value: T,
	is_set: bool,
	validator: Arc<FieldValidator<T>>,
}

impl<T: FieldValue> Field<T> {
	/// Declares a field with the given JSON-facing name and constraints.
	pub fn new(name: impl Into<String>, options: FieldOptions<T>) -> Self {
		let validator = Arc::new(FieldValidator::new(name, options));
		let (value, is_set) = match validator.default_value() {
			Some(default) => (default.clone(), true),
			None => (T::default(), false),
		};
		Self {
			value,
			is_set,
			validator,
		}
	}

	/// Declares a field with no constraints beyond the `required` flag.
	pub fn required(name: impl Into<String>) -> Self {
		Self::new(name, FieldOptions::new().required())
	}

	/// Declares an unconstrained, optional field.
	pub fn optional(name: impl Into<String>) -> Self {
		Self::new(name, FieldOptions::new())
	}

	/// Declared field name.
	pub fn name(&self) -> &str {
		self.validator.name()
	}

	/// Current value.
	pub fn get(&self) -> &T {
		&self.value
	}

	/// Replaces the value and marks the field as present.
	pub fn set(&mut self, value: T) {
		self.value = value;
		self.is_set = true;
	}

	/// Whether the value was explicitly set or defaulted.
	pub fn is_set(&self) -> bool {
		self.is_set
	}

	/// Shared handle to the field's rule engine.
	pub fn validator(&self) -> &Arc<FieldValidator<T>> {
		&self.validator
	}

	/// Validates the current value: presence first, then the rule engine.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.validator.is_required() && !self.is_set {
			return Err(ValidationError::Required {
				field: self.name().to_string(),
			});
		}
		self.validator.validate(&self.value)
	}
}

impl<T: FieldValue> Deref for Field<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.value
	}
}

impl<T: FieldValue + fmt::Display> fmt::Display for Field<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.value, f)
	}
}

/// Object-safe view of a [`Field`] of any value type.
///
/// A model's [`fields`](crate::Model::fields) hook returns these in
/// declaration order; the model base uses them to validate live instances
/// and to build each field's [`FieldDescriptor`] on first registration.
pub trait AnyField {
	/// Declared field name.
	fn name(&self) -> &str;

	/// The field as `Any`, for the descriptor's type-erased check.
	fn as_any(&self) -> &dyn Any;

	/// `TypeId` of the field's value type.
	fn value_type(&self) -> TypeId;

	/// Human-readable name of the field's value type.
	fn value_type_name(&self) -> &'static str;

	/// Validates this field's current value.
	fn check(&self) -> Result<(), ValidationError>;

	/// Builds the registry descriptor for this field declaration.
	fn descriptor(&self) -> FieldDescriptor;
}

impl<T: FieldValue> AnyField for Field<T> {
	fn name(&self) -> &str {
		Field::name(self)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn value_type(&self) -> TypeId {
		TypeId::of::<T>()
	}

	fn value_type_name(&self) -> &'static str {
		type_name::<T>()
	}

	fn check(&self) -> Result<(), ValidationError> {
		self.validate()
	}

	fn descriptor(&self) -> FieldDescriptor {
		FieldDescriptor::new(
			self.name().to_string(),
			TypeId::of::<T>(),
			type_name::<T>(),
			self.validator.clone() as Arc<dyn FieldMeta>,
			Arc::new(|any: &dyn Any| {
				any.downcast_ref::<Field<T>>().map(|field| field.validate())
			}),
		)
	}
}
