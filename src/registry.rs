//! Field-metadata registry
//!
//! [`FieldRegistry`] maps a model type to the ordered descriptor table built
//! from its first-used instance, plus a name index for O(1) lookups. A
//! registry is an explicit object so independent registries can coexist
//! (test isolation without global clears); [`FieldRegistry::global`] offers
//! the conventional process-wide default.
//!
//! Registration is linearized per model type: the build closure runs under
//! the write lock behind a double check, so even racing first uses of the
//! same type from several threads register exactly once. After that a
//! model's entry is immutable and reads only clone an `Arc`, so concurrent
//! readers never contend beyond the shared lock.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{RegistryError, ValidationError};
use crate::validator::FieldMeta;

/// Type-erased per-field check: downcasts the given value back to its
/// concrete `Field<T>` and validates it. `None` means the value was not of
/// the descriptor's field type.
pub(crate) type ErasedCheck =
	Arc<dyn Fn(&dyn Any) -> Option<Result<(), ValidationError>> + Send + Sync>;

/// Registry entry describing one declared field of a model type.
///
/// Carries the declared name, a tag for the field's value type, the shared
/// introspection handle, and the type-erased validation check. Descriptors
/// are immutable once registered and cheap to clone.
#[derive(Clone)]
pub struct FieldDescriptor {
	name: String,
	value_type: TypeId,
	value_type_name: &'static str,
	meta: Arc<dyn FieldMeta>,
	check: ErasedCheck,
}

impl FieldDescriptor {
	pub(crate) fn new(
		name: String,
		value_type: TypeId,
		value_type_name: &'static str,
		meta: Arc<dyn FieldMeta>,
		check: ErasedCheck,
	) -> Self {
		Self {
			name,
			value_type,
			value_type_name,
			meta,
			check,
		}
	}

	/// Declared field name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// `TypeId` of the field's value type.
	pub fn value_type(&self) -> TypeId {
		self.value_type
	}

	/// Human-readable name of the field's value type.
	pub fn value_type_name(&self) -> &'static str {
		self.value_type_name
	}

	/// Introspection view of the field's declaration (constraints,
	/// description, required flag).
	pub fn meta(&self) -> &dyn FieldMeta {
		self.meta.as_ref()
	}

	/// Runs the type-erased check against a live field.
	///
	/// Returns `None` when `field` is not a `Field` of this descriptor's
	/// value type; callers surface that as a configuration error rather
	/// than a validation failure.
	pub fn check_value(&self, field: &dyn Any) -> Option<Result<(), ValidationError>> {
		(self.check)(field)
	}
}

impl fmt::Debug for FieldDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldDescriptor")
			.field("name", &self.name)
			.field("value_type", &self.value_type_name)
			.field("required", &self.meta.required())
			.finish()
	}
}

struct ModelEntry {
	model_name: &'static str,
	descriptors: Arc<[FieldDescriptor]>,
	index: HashMap<String, usize>,
}

/// Store of field descriptors keyed by model type.
pub struct FieldRegistry {
	models: RwLock<HashMap<TypeId, ModelEntry>>,
}

static GLOBAL_REGISTRY: Lazy<FieldRegistry> = Lazy::new(FieldRegistry::new);

impl FieldRegistry {
	/// Creates an empty, independent registry.
	pub fn new() -> Self {
		Self {
			models: RwLock::new(HashMap::new()),
		}
	}

	/// The process-wide default registry.
	pub fn global() -> &'static FieldRegistry {
		&GLOBAL_REGISTRY
	}

	/// Registers model type `M` exactly once.
	///
	/// The first caller for `M` runs `build` under the write lock and
	/// installs its descriptors; every later (or concurrently racing) caller
	/// finds the entry present and returns without building. Duplicate field
	/// names within the built table are rejected with
	/// [`RegistryError::DuplicateField`] and nothing is installed.
	///
	/// `build` must not touch this registry, on pain of deadlock.
	pub fn ensure_registered<M: 'static>(
		&self,
		build: impl FnOnce() -> Vec<FieldDescriptor>,
	) -> Result<(), RegistryError> {
		let type_id = TypeId::of::<M>();
		if self.models.read().contains_key(&type_id) {
			return Ok(());
		}

		let mut models = self.models.write();
		if models.contains_key(&type_id) {
			return Ok(());
		}

		let model_name = type_name::<M>();
		let descriptors = build();
		let mut index = HashMap::with_capacity(descriptors.len());
		for (position, descriptor) in descriptors.iter().enumerate() {
			if index.insert(descriptor.name.clone(), position).is_some() {
				return Err(RegistryError::DuplicateField {
					model: model_name,
					name: descriptor.name.clone(),
				});
			}
		}

		debug!(model = model_name, fields = descriptors.len(), "registered model fields");
		models.insert(
			type_id,
			ModelEntry {
				model_name,
				descriptors: descriptors.into(),
				index,
			},
		);
		Ok(())
	}

	/// Ordered descriptor table for `M`, or `None` if never registered.
	pub fn fields_of<M: 'static>(&self) -> Option<Arc<[FieldDescriptor]>> {
		self.models
			.read()
			.get(&TypeId::of::<M>())
			.map(|entry| entry.descriptors.clone())
	}

	/// Single descriptor lookup by declared name, O(1) via the name index.
	pub fn field_of<M: 'static>(&self, name: &str) -> Option<FieldDescriptor> {
		let models = self.models.read();
		let entry = models.get(&TypeId::of::<M>())?;
		let position = *entry.index.get(name)?;
		entry.descriptors.get(position).cloned()
	}

	/// Whether `M` has any registered fields.
	pub fn has_fields<M: 'static>(&self) -> bool {
		self.models.read().contains_key(&TypeId::of::<M>())
	}

	/// Number of registered fields for `M`.
	pub fn field_count<M: 'static>(&self) -> usize {
		self.models
			.read()
			.get(&TypeId::of::<M>())
			.map_or(0, |entry| entry.descriptors.len())
	}

	/// Registered model name for `M`, if registered.
	pub fn model_name_of<M: 'static>(&self) -> Option<&'static str> {
		self.models
			.read()
			.get(&TypeId::of::<M>())
			.map(|entry| entry.model_name)
	}

	/// Removes every registration. Test isolation only.
	pub fn clear(&self) {
		self.models.write().clear();
	}

	/// Removes `M`'s registration. The entry doubles as the "already
	/// registered" latch, so the next use of `M` re-registers from scratch.
	pub fn clear_model<M: 'static>(&self) {
		self.models.write().remove(&TypeId::of::<M>());
	}
}

impl Default for FieldRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for FieldRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let models = self.models.read();
		let mut map = f.debug_map();
		for entry in models.values() {
			map.entry(&entry.model_name, &entry.descriptors.len());
		}
		map.finish()
	}
}
