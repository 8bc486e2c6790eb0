//! Declarative field validation and model introspection
//!
//! `fieldset` turns a plain struct whose members are [`Field`] values into a
//! model whose fields are named, typed, constrained, and individually or
//! aggregately validated — reflection-style metadata without a reflection
//! facility.
//!
//! Four cooperating pieces:
//!
//! - [`FieldOptions`] / [`FieldValidator`]: the per-field rule engine — a
//!   pure function from a value plus a constraint set to a verdict.
//! - [`Field`]: the typed wrapper owning one field's value and a shared
//!   handle to its rule engine.
//! - [`FieldRegistry`]: the store mapping a model type to its ordered
//!   [`FieldDescriptor`] table, registered exactly once per type.
//! - [`Model`]: the base trait orchestrating one-time registration,
//!   aggregate [`validate`](Model::validate), and introspection.
//!
//! # Examples
//!
//! ```
//! use fieldset::prelude::*;
//!
//! struct Task {
//!     title: Field<String>,
//!     priority: Field<i64>,
//!     status: Field<String>,
//! }
//!
//! impl Task {
//!     fn new() -> Self {
//!         Self {
//!             title: Field::new(
//!                 "title",
//!                 FieldOptions::new().required().with_min_length(3).with_max_length(100),
//!             ),
//!             priority: Field::new(
//!                 "priority",
//!                 FieldOptions::new().with_min_value(0).with_max_value(10).with_default(0),
//!             ),
//!             status: Field::new(
//!                 "status",
//!                 FieldOptions::new().with_default("pending".to_string()).with_allowed_values(
//!                     vec!["pending".to_string(), "done".to_string()],
//!                 ),
//!             ),
//!         }
//!     }
//! }
//!
//! impl Model for Task {
//!     fn fields(&self) -> Vec<&dyn AnyField> {
//!         vec![&self.title, &self.priority, &self.status]
//!     }
//! }
//!
//! let registry = FieldRegistry::new();
//! let mut task = Task::new();
//! task.title.set("Ship the release".to_string());
//! task.priority.set(12);
//!
//! let report = task.validate_in(&registry).unwrap();
//! assert_eq!(report.errors(), &["Field 'priority' must be at most 10".to_string()]);
//! ```

pub mod error;
pub mod field;
pub mod model;
pub mod options;
pub mod registry;
pub mod validator;
pub mod value;

pub use error::{RegistryError, ValidationError};
pub use field::{AnyField, Field};
pub use model::{Model, ValidationReport};
pub use options::FieldOptions;
pub use registry::{FieldDescriptor, FieldRegistry};
pub use validator::{FieldMeta, FieldValidator};
pub use value::{FieldValue, ValueKind};

/// Commonly used types.
pub mod prelude {
	pub use crate::error::{RegistryError, ValidationError};
	pub use crate::field::{AnyField, Field};
	pub use crate::model::{Model, ValidationReport};
	pub use crate::options::FieldOptions;
	pub use crate::registry::{FieldDescriptor, FieldRegistry};
	pub use crate::validator::{FieldMeta, FieldValidator};
	pub use crate::value::{FieldValue, ValueKind};
}
