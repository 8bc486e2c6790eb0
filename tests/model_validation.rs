//! End-to-end model validation tests
//!
//! Exercises the full quartet — options, field wrapper, registry, model
//! base — through a task-tracker model, including one-time registration,
//! cross-instance descriptor reuse, and concurrent first use.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fieldset::prelude::*;
use rstest::rstest;

static REGISTRATIONS: AtomicUsize = AtomicUsize::new(0);

struct Task {
	title: Field<String>,
	description: Field<String>,
	priority: Field<i64>,
	status: Field<String>,
}

impl Task {
	fn new() -> Self {
		Self {
			title: Field::new(
				"title",
				FieldOptions::new()
					.required()
					.with_min_length(3)
					.with_max_length(100)
					.with_description("Short task title"),
			),
			description: Field::new(
				"description",
				FieldOptions::new().with_max_length(500).with_pattern(r"[^\r\n]*"),
			),
			priority: Field::new(
				"priority",
				FieldOptions::new().with_min_value(0).with_max_value(10).with_default(0),
			),
			status: Field::new(
				"status",
				FieldOptions::new()
					.with_default("pending".to_string())
					.with_allowed_values(vec![
						"pending".to_string(),
						"in_progress".to_string(),
						"done".to_string(),
					]),
			),
		}
	}
}

impl Model for Task {
	fn fields(&self) -> Vec<&dyn AnyField> {
		// Counter lives here so it only moves when the registry actually
		// builds descriptors from this enumeration.
		vec![&self.title, &self.description, &self.priority, &self.status]
	}
}

// Field wrapper that counts descriptor builds. `descriptor()` is only ever
// called on the registration path, so the counter observes exactly how many
// times registration ran.
struct CountedField {
	inner: Field<String>,
}

impl AnyField for CountedField {
	fn name(&self) -> &str {
		AnyField::name(&self.inner)
	}

	fn as_any(&self) -> &dyn std::any::Any {
		self.inner.as_any()
	}

	fn value_type(&self) -> std::any::TypeId {
		self.inner.value_type()
	}

	fn value_type_name(&self) -> &'static str {
		self.inner.value_type_name()
	}

	fn check(&self) -> Result<(), ValidationError> {
		self.inner.check()
	}

	fn descriptor(&self) -> FieldDescriptor {
		REGISTRATIONS.fetch_add(1, Ordering::SeqCst);
		self.inner.descriptor()
	}
}

struct CountedTask {
	title: CountedField,
}

impl CountedTask {
	fn new() -> Self {
		Self {
			title: CountedField {
				inner: Field::<String>::required("title"),
			},
		}
	}
}

impl Model for CountedTask {
	fn fields(&self) -> Vec<&dyn AnyField> {
		vec![&self.title]
	}
}

#[rstest]
fn test_valid_task_passes() {
	let registry = FieldRegistry::new();
	let mut task = Task::new();
	task.title.set("Learn Rust".to_string());
	task.description.set("Read the book".to_string());
	task.priority.set(5);
	task.status.set("in_progress".to_string());

	let report = task.validate_in(&registry).unwrap();
	assert!(report.is_valid());
}

#[rstest]
fn test_two_violations_reported_in_declaration_order() {
	let registry = FieldRegistry::new();
	let mut task = Task::new();
	task.title.set("Do".to_string()); // too short
	task.priority.set(-1); // below minimum
	task.status.set("unknown".to_string()); // not in allow-list

	let report = task.validate_in(&registry).unwrap();
	assert_eq!(
		report.errors(),
		&[
			"Field 'title' must have at least 3 characters".to_string(),
			"Field 'priority' must be at least 0".to_string(),
			"Field 'status' must be one of the allowed values".to_string(),
		]
	);
}

#[rstest]
fn test_unset_required_field_is_reported() {
	let registry = FieldRegistry::new();
	let task = Task::new();

	let report = task.validate_in(&registry).unwrap();
	assert_eq!(report.errors(), &["Field 'title' is required".to_string()]);
}

#[rstest]
fn test_custom_validate_appends_cross_field_errors() {
	struct Gated {
		inner: Task,
	}

	impl Model for Gated {
		fn fields(&self) -> Vec<&dyn AnyField> {
			self.inner.fields()
		}

		fn custom_validate(&self) -> Vec<String> {
			let mut errors = Vec::new();
			if self.inner.status.get() == "done" && *self.inner.priority.get() > 0 {
				errors.push("A finished task must have priority 0".to_string());
			}
			errors
		}
	}

	let registry = FieldRegistry::new();
	let mut gated = Gated { inner: Task::new() };
	gated.inner.title.set("Close out".to_string());
	gated.inner.status.set("done".to_string());
	gated.inner.priority.set(7);

	let report = gated.validate_in(&registry).unwrap();
	assert_eq!(report.errors(), &["A finished task must have priority 0".to_string()]);
}

#[rstest]
fn test_registration_runs_once_across_many_instances() {
	let registry = FieldRegistry::new();
	let before = REGISTRATIONS.load(Ordering::SeqCst);

	for _ in 0..10 {
		let mut task = CountedTask::new();
		task.title.inner.set("anything".to_string());
		assert!(task.validate_in(&registry).unwrap().is_valid());
	}

	let after = REGISTRATIONS.load(Ordering::SeqCst);
	assert_eq!(after - before, 1);
	assert_eq!(registry.field_count::<CountedTask>(), 1);
}

#[rstest]
fn test_descriptor_from_one_instance_validates_another() {
	let registry = FieldRegistry::new();

	let mut first = Task::new();
	first.title.set("Valid title".to_string());
	assert!(first.validate_in(&registry).unwrap().is_valid());

	// Same type, different instance and value: the registered descriptor
	// must see *this* instance's own field.
	let mut second = Task::new();
	second.title.set("no".to_string());
	let descriptor = second.field_info_in(&registry, "title").unwrap().unwrap();
	let verdict = descriptor.check_value(second.fields()[0].as_any()).unwrap();
	assert_eq!(
		verdict.unwrap_err().to_string(),
		"Field 'title' must have at least 3 characters"
	);

	// And the first instance still validates clean through the same table.
	assert!(first.validate_in(&registry).unwrap().is_valid());
}

#[rstest]
fn test_concurrent_first_use_registers_each_field_once() {
	let registry = Arc::new(FieldRegistry::new());
	let threads: Vec<_> = (0..8)
		.map(|i| {
			let registry = Arc::clone(&registry);
			std::thread::spawn(move || {
				let mut task = Task::new();
				task.title.set(format!("Task {i}"));
				task.validate_in(&registry).unwrap()
			})
		})
		.collect();

	for thread in threads {
		assert!(thread.join().unwrap().is_valid());
	}

	let fields = registry.fields_of::<Task>().unwrap();
	let names: Vec<_> = fields.iter().map(|d| d.name().to_string()).collect();
	assert_eq!(names, ["title", "description", "priority", "status"]);
}

#[rstest]
fn test_malformed_pattern_fails_only_its_field() {
	struct Broken {
		code: Field<String>,
		label: Field<String>,
	}

	impl Model for Broken {
		fn fields(&self) -> Vec<&dyn AnyField> {
			vec![&self.code, &self.label]
		}
	}

	let registry = FieldRegistry::new();
	let mut broken = Broken {
		code: Field::new("code", FieldOptions::new().with_pattern(r"[unclosed")),
		label: Field::new("label", FieldOptions::new().with_min_length(2)),
	};
	broken.code.set("abc".to_string());
	broken.label.set("x".to_string());

	let report = broken.validate_in(&registry).unwrap();
	assert_eq!(
		report.errors(),
		&[
			"Field 'code' has invalid regex pattern".to_string(),
			"Field 'label' must have at least 2 characters".to_string(),
		]
	);
}

#[rstest]
fn test_duplicate_field_names_rejected_loudly() {
	struct Shadowed {
		first: Field<String>,
		second: Field<String>,
	}

	impl Model for Shadowed {
		fn fields(&self) -> Vec<&dyn AnyField> {
			vec![&self.first, &self.second]
		}
	}

	let registry = FieldRegistry::new();
	let shadowed = Shadowed {
		first: Field::<String>::optional("name"),
		second: Field::<String>::optional("name"),
	};

	let err = shadowed.validate_in(&registry).unwrap_err();
	assert!(matches!(err, RegistryError::DuplicateField { name, .. } if name == "name"));
}

#[rstest]
fn test_introspection_exposes_constraints() {
	let registry = FieldRegistry::new();
	let task = Task::new();

	let descriptors = task.descriptors_in(&registry).unwrap();
	assert_eq!(descriptors.len(), 4);

	let title = task.field_info_in(&registry, "title").unwrap().unwrap();
	assert!(title.meta().required());
	assert_eq!(title.meta().description(), "Short task title");
	let constraints = title.meta().constraints();
	assert_eq!(constraints["min_length"], 3);
	assert_eq!(constraints["max_length"], 100);

	let status = task.field_info_in(&registry, "status").unwrap().unwrap();
	let allowed = &status.meta().constraints()["allowed_values"];
	assert_eq!(allowed, &serde_json::json!(["pending", "in_progress", "done"]));

	assert!(task.has_field_in(&registry, "priority").unwrap());
	assert!(!task.has_field_in(&registry, "owner").unwrap());
}

#[rstest]
fn test_clear_model_allows_reregistration() {
	let registry = FieldRegistry::new();
	let task = Task::new();
	assert!(task.validate_in(&registry).is_ok());
	assert!(registry.has_fields::<Task>());

	registry.clear_model::<Task>();
	assert!(!registry.has_fields::<Task>());

	// Next use re-registers from scratch; no stale latch survives.
	let report = task.validate_in(&registry).unwrap();
	assert!(!report.is_valid()); // title still unset
	assert_eq!(registry.field_count::<Task>(), 4);
}

#[rstest]
fn test_global_registry_round_trip() {
	let mut task = Task::new();
	task.title.set("Global path".to_string());

	let report = task.validate().unwrap();
	assert!(report.is_valid());
	assert!(task.has_field("title").unwrap());
	assert!(task.field_info("status").unwrap().is_some());
}
