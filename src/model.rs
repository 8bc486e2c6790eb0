//! Model base: registration orchestration and aggregate validation
//!
//! A concrete model type implements [`Model`] by declaring its fields in a
//! fixed order through the [`fields`](Model::fields) hook. The first time
//! any instance is validated or introspected, the model base registers the
//! type's descriptor table in the registry, built from that live instance —
//! there is no disposable instance and no re-entrancy guard, and the
//! registry's own one-time insert linearizes racing first uses.
//!
//! Aggregate validation walks the registered descriptor table in
//! declaration order, pairs each descriptor with the live instance's field
//! at the same position (name and value type verified), runs the
//! type-erased check, and collects failing messages in declaration order,
//! followed by whatever [`custom_validate`](Model::custom_validate)
//! returns.

use std::any::type_name;
use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::error::RegistryError;
use crate::field::AnyField;
use crate::registry::{FieldDescriptor, FieldRegistry};

/// Outcome of validating one model instance.
///
/// Holds the failing fields' messages in declaration order, followed by any
/// cross-field messages from the extension hook. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
	errors: Vec<String>,
}

impl ValidationReport {
	/// `true` iff no error was collected.
	pub fn is_valid(&self) -> bool {
		self.errors.is_empty()
	}

	/// Collected messages, in declaration order.
	pub fn errors(&self) -> &[String] {
		&self.errors
	}

	/// Consumes the report, yielding the messages.
	pub fn into_errors(self) -> Vec<String> {
		self.errors
	}

	fn push(&mut self, message: String) {
		self.errors.push(message);
	}
}

/// A struct whose fields are [`Field`](crate::Field) values.
///
/// Implementors supply the declaration-order field enumeration and may
/// override [`custom_validate`](Model::custom_validate) for cross-field
/// invariants; everything else is provided.
///
/// # Examples
///
/// ```
/// use fieldset::{AnyField, Field, FieldOptions, FieldRegistry, Model};
///
/// struct Task {
///     title: Field<String>,
///     priority: Field<i64>,
/// }
///
/// impl Task {
///     fn new() -> Self {
///         Self {
///             title: Field::new(
///                 "title",
///                 FieldOptions::new().required().with_min_length(3),
///             ),
///             priority: Field::new(
///                 "priority",
///                 FieldOptions::new().with_min_value(0).with_max_value(10),
///             ),
///         }
///     }
/// }
///
/// impl Model for Task {
///     fn fields(&self) -> Vec<&dyn AnyField> {
///         vec![&self.title, &self.priority]
///     }
/// }
///
/// let registry = FieldRegistry::new();
/// let mut task = Task::new();
/// task.title.set("Write docs".to_string());
/// task.priority.set(3);
///
/// let report = task.validate_in(&registry).unwrap();
/// assert!(report.is_valid());
/// ```
pub trait Model: 'static {
	/// References to every declared field, in declaration order.
	///
	/// This order is the registration order and therefore the order of
	/// validation-error reporting.
	fn fields(&self) -> Vec<&dyn AnyField>;

	/// Cross-field extension hook; messages are appended after all
	/// field-level errors. Default: no extra errors.
	fn custom_validate(&self) -> Vec<String> {
		Vec::new()
	}

	/// Model name used in configuration errors and logs.
	fn model_name() -> &'static str
	where
		Self: Sized,
	{
		type_name::<Self>()
	}

	/// Validates this instance against the global registry.
	fn validate(&self) -> Result<ValidationReport, RegistryError>
	where
		Self: Sized,
	{
		self.validate_in(FieldRegistry::global())
	}

	/// Validates this instance against an explicit registry.
	fn validate_in(&self, registry: &FieldRegistry) -> Result<ValidationReport, RegistryError>
	where
		Self: Sized,
	{
		let live = self.fields();
		ensure_registered::<Self>(registry, &live)?;
		let descriptors = registry
			.fields_of::<Self>()
			.unwrap_or_else(|| Arc::from(Vec::new()));

		if descriptors.len() != live.len() {
			return Err(RegistryError::SchemaMismatch {
				model: Self::model_name(),
				detail: format!(
					"instance declares {} fields, {} registered",
					live.len(),
					descriptors.len()
				),
			});
		}

		let mut report = ValidationReport::default();
		for (descriptor, field) in descriptors.iter().zip(&live) {
			if descriptor.name() != field.name() {
				return Err(RegistryError::SchemaMismatch {
					model: Self::model_name(),
					detail: format!(
						"field '{}' registered where instance declares '{}'",
						descriptor.name(),
						field.name()
					),
				});
			}
			match descriptor.check_value(field.as_any()) {
				Some(Ok(())) => {}
				Some(Err(error)) => report.push(error.to_string()),
				None => {
					return Err(RegistryError::TypeMismatch {
						model: Self::model_name(),
						name: descriptor.name().to_string(),
						expected: descriptor.value_type_name(),
						actual: field.value_type_name(),
					});
				}
			}
		}

		for message in self.custom_validate() {
			report.push(message);
		}

		trace!(
			model = Self::model_name(),
			errors = report.errors().len(),
			"validated model instance"
		);
		Ok(report)
	}

	/// Ordered descriptor table for this model type (global registry).
	fn descriptors(&self) -> Result<Arc<[FieldDescriptor]>, RegistryError>
	where
		Self: Sized,
	{
		self.descriptors_in(FieldRegistry::global())
	}

	/// Ordered descriptor table for this model type.
	fn descriptors_in(
		&self,
		registry: &FieldRegistry,
	) -> Result<Arc<[FieldDescriptor]>, RegistryError>
	where
		Self: Sized,
	{
		ensure_registered::<Self>(registry, &self.fields())?;
		Ok(registry
			.fields_of::<Self>()
			.unwrap_or_else(|| Arc::from(Vec::new())))
	}

	/// Whether this model type declares a field of the given name
	/// (global registry).
	fn has_field(&self, name: &str) -> Result<bool, RegistryError>
	where
		Self: Sized,
	{
		self.has_field_in(FieldRegistry::global(), name)
	}

	/// Whether this model type declares a field of the given name.
	fn has_field_in(&self, registry: &FieldRegistry, name: &str) -> Result<bool, RegistryError>
	where
		Self: Sized,
	{
		ensure_registered::<Self>(registry, &self.fields())?;
		Ok(registry.field_of::<Self>(name).is_some())
	}

	/// Descriptor for one declared field, if any (global registry).
	fn field_info(&self, name: &str) -> Result<Option<FieldDescriptor>, RegistryError>
	where
		Self: Sized,
	{
		self.field_info_in(FieldRegistry::global(), name)
	}

	/// Descriptor for one declared field, if any.
	fn field_info_in(
		&self,
		registry: &FieldRegistry,
		name: &str,
	) -> Result<Option<FieldDescriptor>, RegistryError>
	where
		Self: Sized,
	{
		ensure_registered::<Self>(registry, &self.fields())?;
		Ok(registry.field_of::<Self>(name))
	}
}

fn ensure_registered<M: Model>(
	registry: &FieldRegistry,
	live: &[&dyn AnyField],
) -> Result<(), RegistryError> {
	registry.ensure_registered::<M>(|| live.iter().map(|field| field.descriptor()).collect())
}
