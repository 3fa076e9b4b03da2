//! Per-instance property storage.

use indexmap::IndexMap;
use reinhardt_elements_core::{PropertyValue, RawValue};

/// Current property values of one element, plus values assigned before the
/// element was first attached.
///
/// Coerced values are only written by the property setter. Pre-attach values
/// are kept uncoerced and consumed when initial values are applied.
#[derive(Debug, Default)]
pub struct PropertyStore {
	values: IndexMap<String, PropertyValue>,
	pending: IndexMap<String, RawValue>,
}

impl PropertyStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the coerced value of a property.
	pub fn get(&self, name: &str) -> Option<&PropertyValue> {
		self.values.get(name)
	}

	/// Stores a coerced value and returns the previous one.
	pub fn insert(&mut self, name: &str, value: PropertyValue) -> Option<PropertyValue> {
		self.values.insert(name.to_string(), value)
	}

	/// Records a value assigned before the first attach. Later assignments win.
	pub fn set_pending(&mut self, name: &str, raw: RawValue) {
		self.pending.insert(name.to_string(), raw);
	}

	/// Returns a pre-attach value without consuming it.
	pub fn pending(&self, name: &str) -> Option<&RawValue> {
		self.pending.get(name)
	}

	/// Removes and returns a pre-attach value.
	pub fn take_pending(&mut self, name: &str) -> Option<RawValue> {
		self.pending.shift_remove(name)
	}

	/// Number of stored values.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns true if no value has been stored yet.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Stored values in first-assignment order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
		self.values.iter().map(|(name, value)| (name.as_str(), value))
	}
}
