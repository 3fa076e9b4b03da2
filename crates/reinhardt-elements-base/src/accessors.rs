//! Typed property keys.
//!
//! [`Prop`] names a property together with its Rust type, so reads return
//! `T` rather than a [`PropertyValue`]:
//!
//! ```ignore
//! const COUNT: Prop<f64> = Prop::new("count");
//!
//! element.set_prop(COUNT, 5.0)?;
//! assert_eq!(element.prop(COUNT), Some(5.0));
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use reinhardt_elements_core::{JsonMap, PropertyKind, PropertyValue, RawValue};
use serde_json::Value;

/// Rust types that can be stored in a property.
pub trait PropertyType: Sized {
	/// The property kind this type is stored as.
	const KIND: PropertyKind;

	/// Extracts the typed value, or `None` if `value` is of another kind.
	fn from_value(value: &PropertyValue) -> Option<Self>;

	/// Converts into a setter input.
	fn into_raw(self) -> RawValue;
}

impl PropertyType for String {
	const KIND: PropertyKind = PropertyKind::String;

	fn from_value(value: &PropertyValue) -> Option<Self> {
		value.as_str().map(str::to_string)
	}

	fn into_raw(self) -> RawValue {
		RawValue::String(self)
	}
}

impl PropertyType for f64 {
	const KIND: PropertyKind = PropertyKind::Number;

	fn from_value(value: &PropertyValue) -> Option<Self> {
		value.as_number()
	}

	fn into_raw(self) -> RawValue {
		RawValue::Number(self)
	}
}

impl PropertyType for bool {
	const KIND: PropertyKind = PropertyKind::Boolean;

	fn from_value(value: &PropertyValue) -> Option<Self> {
		value.as_bool()
	}

	fn into_raw(self) -> RawValue {
		RawValue::Boolean(self)
	}
}

impl PropertyType for Rc<JsonMap> {
	const KIND: PropertyKind = PropertyKind::Object;

	fn from_value(value: &PropertyValue) -> Option<Self> {
		value.as_object().cloned()
	}

	fn into_raw(self) -> RawValue {
		RawValue::Object(self)
	}
}

impl PropertyType for Rc<Vec<Value>> {
	const KIND: PropertyKind = PropertyKind::Array;

	fn from_value(value: &PropertyValue) -> Option<Self> {
		value.as_array().cloned()
	}

	fn into_raw(self) -> RawValue {
		RawValue::Array(self)
	}
}

/// A property name paired with its Rust type.
pub struct Prop<T> {
	name: &'static str,
	_marker: PhantomData<fn() -> T>,
}

impl<T> Prop<T> {
	/// Creates a key for the camelCase property `name`.
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			_marker: PhantomData,
		}
	}

	/// The property name.
	pub const fn name(&self) -> &'static str {
		self.name
	}
}

impl<T> Clone for Prop<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for Prop<T> {}

impl<T> fmt::Debug for Prop<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Prop").field(&self.name).finish()
	}
}
