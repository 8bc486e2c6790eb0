//! Value categories for field validation
//!
//! Every type stored in a [`Field`](crate::Field) implements [`FieldValue`],
//! which tags it with a closed [`ValueKind`]. The rule engine dispatches on
//! the kind, so the mapping from value category to applicable rules is
//! explicit and exhaustive: length and pattern rules apply to text, range
//! rules apply to ordered scalars, and opaque values only ever see the
//! allow-list and custom-predicate checks.

use std::cmp::Ordering;
use std::fmt;

/// The closed set of value categories the rule engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
	/// Textual values; length and pattern rules apply.
	Text,
	/// Ordered scalar values; min/max range rules apply.
	Scalar,
	/// Everything else; only allow-list and custom rules apply.
	Opaque,
}

/// A value that can live inside a [`Field`](crate::Field).
///
/// Implementations are provided for `String`, the primitive integer and
/// float types, and `bool`. Custom types (e.g. enums used with an
/// allow-list) can implement it themselves; the defaults classify them as
/// [`ValueKind::Opaque`].
///
/// # Examples
///
/// ```
/// use fieldset::value::{FieldValue, ValueKind};
///
/// assert_eq!(String::KIND, ValueKind::Text);
/// assert_eq!(i64::KIND, ValueKind::Scalar);
/// assert_eq!(bool::KIND, ValueKind::Opaque);
/// ```
pub trait FieldValue: Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
	/// The value category the rule engine dispatches on.
	const KIND: ValueKind = ValueKind::Opaque;

	/// Text view of the value. `Some` for every [`ValueKind::Text`] type.
	fn as_text(&self) -> Option<&str> {
		None
	}

	/// Ordering against another value of the same type. `Some` for every
	/// [`ValueKind::Scalar`] type (except incomparable floats, e.g. NaN).
	fn compare(&self, _other: &Self) -> Option<Ordering> {
		None
	}

	/// Human-readable rendering used in error messages and constraint
	/// descriptions.
	fn describe(&self) -> String {
		format!("{self:?}")
	}
}

impl FieldValue for String {
	const KIND: ValueKind = ValueKind::Text;

	fn as_text(&self) -> Option<&str> {
		Some(self)
	}

	fn describe(&self) -> String {
		self.clone()
	}
}

impl FieldValue for bool {}

macro_rules! impl_scalar_value {
	($($ty:ty),* $(,)?) => {
		$(
			impl FieldValue for $ty {
				const KIND: ValueKind = ValueKind::Scalar;

				fn compare(&self, other: &Self) -> Option<Ordering> {
					self.partial_cmp(other)
				}

				fn describe(&self) -> String {
					self.to_string()
				}
			}
		)*
	};
}

impl_scalar_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
