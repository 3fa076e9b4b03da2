//! Property declarations.
//!
//! A component declares its properties once, as an ordered [`Properties`]
//! table. The table is turned into a [`PropertyTable`] when the component is
//! defined and shared read-only by every instance.
//!
//! ## Example
//!
//! ```
//! use reinhardt_elements_base::{Observer, Properties, Property};
//! # use reinhardt_elements_base::CustomElement;
//! # #[derive(Default)]
//! # struct Counter;
//! # impl CustomElement for Counter { const TAG: &'static str = "x-counter"; }
//!
//! let properties: Properties<Counter> = Properties::new()
//!     .with("count", Property::number().default_value(1).reflect_to_attribute(true))
//!     .with("label", Property::string().observer(Observer::method("labelChanged")));
//!
//! assert_eq!(properties.len(), 2);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use reinhardt_elements_core::{
	CoercionError, PropertyKind, PropertyValue, RawValue, camel_case_to_dashes,
};

use crate::element::Element;

/// Observer signature: `(element, new_value, old_value)`.
///
/// `old_value` is `None` the first time a property is set.
pub type ObserverFn<C> = fn(&mut Element<C>, &PropertyValue, Option<&PropertyValue>);

type DirectObserver<C> = Rc<dyn Fn(&mut Element<C>, &PropertyValue, Option<&PropertyValue>)>;

/// How a property change is reported to the component.
pub enum Observer<C> {
	/// A function called directly.
	Direct(DirectObserver<C>),
	/// A method resolved by name through
	/// [`CustomElement::observer_method`](crate::CustomElement::observer_method)
	/// every time it fires.
	Method(Cow<'static, str>),
}

impl<C> Observer<C> {
	/// Creates a direct observer from a closure.
	pub fn direct<F>(f: F) -> Self
	where
		F: Fn(&mut Element<C>, &PropertyValue, Option<&PropertyValue>) + 'static,
	{
		Self::Direct(Rc::new(f))
	}

	/// Creates an observer resolved by method name.
	pub fn method(name: impl Into<Cow<'static, str>>) -> Self {
		Self::Method(name.into())
	}
}

impl<C> Clone for Observer<C> {
	fn clone(&self) -> Self {
		match self {
			Self::Direct(f) => Self::Direct(Rc::clone(f)),
			Self::Method(name) => Self::Method(name.clone()),
		}
	}
}

impl<C> fmt::Debug for Observer<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Direct(_) => f.write_str("Observer::Direct(..)"),
			Self::Method(name) => f.debug_tuple("Observer::Method").field(name).finish(),
		}
	}
}

/// Declaration of one property.
pub struct Property<C> {
	kind: PropertyKind,
	default: Option<RawValue>,
	reflect: bool,
	observer: Option<Observer<C>>,
}

impl<C> Property<C> {
	/// Declares a property of the given kind.
	pub fn new(kind: PropertyKind) -> Self {
		Self {
			kind,
			default: None,
			reflect: false,
			observer: None,
		}
	}

	/// Declares a String property.
	pub fn string() -> Self {
		Self::new(PropertyKind::String)
	}

	/// Declares a Number property.
	pub fn number() -> Self {
		Self::new(PropertyKind::Number)
	}

	/// Declares a Boolean property.
	pub fn boolean() -> Self {
		Self::new(PropertyKind::Boolean)
	}

	/// Declares an Object property.
	pub fn object() -> Self {
		Self::new(PropertyKind::Object)
	}

	/// Declares an Array property.
	pub fn array() -> Self {
		Self::new(PropertyKind::Array)
	}

	/// Sets the default value, coerced when it is applied.
	///
	/// Object and Array defaults are shared by reference between instances.
	pub fn default_value(mut self, value: impl Into<RawValue>) -> Self {
		self.default = Some(value.into());
		self
	}

	/// Mirrors the coerced value into the host attribute.
	pub fn reflect_to_attribute(mut self, reflect: bool) -> Self {
		self.reflect = reflect;
		self
	}

	/// Sets the observer.
	pub fn observer(mut self, observer: Observer<C>) -> Self {
		self.observer = Some(observer);
		self
	}

	/// Returns the declared kind.
	pub fn kind(&self) -> PropertyKind {
		self.kind
	}

	/// Returns the raw default value.
	pub fn default(&self) -> Option<&RawValue> {
		self.default.as_ref()
	}

	/// Returns whether the property reflects to its attribute.
	pub fn reflects(&self) -> bool {
		self.reflect
	}

	/// Returns the observer.
	pub fn observer_ref(&self) -> Option<&Observer<C>> {
		self.observer.as_ref()
	}

	/// The value applied when neither an attribute nor a pre-attach value
	/// is available: the coerced default, or the kind's zero value.
	pub fn initial_value(&self) -> Result<PropertyValue, CoercionError> {
		match &self.default {
			Some(raw) => self.kind.coerce(raw.clone()),
			None => Ok(self.kind.zero_value()),
		}
	}
}

impl<C> Clone for Property<C> {
	fn clone(&self) -> Self {
		Self {
			kind: self.kind,
			default: self.default.clone(),
			reflect: self.reflect,
			observer: self.observer.clone(),
		}
	}
}

impl<C> fmt::Debug for Property<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Property")
			.field("kind", &self.kind)
			.field("default", &self.default)
			.field("reflect", &self.reflect)
			.field("observer", &self.observer)
			.finish()
	}
}

/// Ordered property declarations, keyed by camelCase property name.
pub struct Properties<C> {
	entries: IndexMap<String, Property<C>>,
}

impl<C> Properties<C> {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self {
			entries: IndexMap::new(),
		}
	}

	/// Adds a property. Redeclaring a name replaces the earlier declaration
	/// but keeps its position.
	pub fn with(mut self, name: impl Into<String>, property: Property<C>) -> Self {
		self.entries.insert(name.into(), property);
		self
	}

	/// Returns the declaration for `name`.
	pub fn get(&self, name: &str) -> Option<&Property<C>> {
		self.entries.get(name)
	}

	/// Number of declared properties.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if nothing is declared.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Declarations in order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Property<C>)> {
		self.entries
			.iter()
			.map(|(name, property)| (name.as_str(), property))
	}
}

impl<C> Default for Properties<C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<C> fmt::Debug for Properties<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.entries.iter()).finish()
	}
}

/// A property declaration resolved for one component type.
pub struct PropertyEntry<C> {
	name: String,
	attribute: String,
	property: Property<C>,
}

impl<C> PropertyEntry<C> {
	/// The camelCase property name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The dashed attribute name.
	pub fn attribute(&self) -> &str {
		&self.attribute
	}

	/// The declaration.
	pub fn property(&self) -> &Property<C> {
		&self.property
	}
}

/// Property declarations of one component type, resolved once at definition.
pub struct PropertyTable<C> {
	entries: IndexMap<String, PropertyEntry<C>>,
	observed_attributes: Rc<[String]>,
}

impl<C> PropertyTable<C> {
	/// Resolves attribute names and the observed attribute list.
	pub fn new(properties: Properties<C>) -> Self {
		let entries: IndexMap<String, PropertyEntry<C>> = properties
			.entries
			.into_iter()
			.map(|(name, property)| {
				let attribute = camel_case_to_dashes(&name);
				let entry = PropertyEntry {
					name: name.clone(),
					attribute,
					property,
				};
				(name, entry)
			})
			.collect();
		let observed_attributes = entries
			.values()
			.map(|entry| entry.attribute.clone())
			.collect();
		Self {
			entries,
			observed_attributes,
		}
	}

	/// Returns the entry for a camelCase property name.
	pub fn get(&self, name: &str) -> Option<&PropertyEntry<C>> {
		self.entries.get(name)
	}

	/// Entries in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = &PropertyEntry<C>> {
		self.entries.values()
	}

	/// Number of properties.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if the component declares no properties.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Dashed names of every declared property, in declaration order.
	pub fn observed_attributes(&self) -> &Rc<[String]> {
		&self.observed_attributes
	}

	/// Returns true if the host should report changes of `attribute`.
	pub fn is_observed(&self, attribute: &str) -> bool {
		self.observed_attributes
			.iter()
			.any(|observed| observed.eq_ignore_ascii_case(attribute))
	}
}

impl<C> fmt::Debug for PropertyTable<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PropertyTable")
			.field("observed_attributes", &self.observed_attributes)
			.finish()
	}
}
