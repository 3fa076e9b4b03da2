//! Custom element base.
//!
//! A component type implements [`CustomElement`] to declare its tag, its
//! template and its properties. Instances are [`Element<C>`] values created
//! through an [`ElementRegistry`](crate::ElementRegistry): they own the host
//! node, its shadow root, the property store and the listener ledger, and
//! they dereference to the component so its own fields stay reachable.
//!
//! ## Example
//!
//! ```
//! use reinhardt_elements_base::{CustomElement, ElementRegistry, Properties, Property};
//!
//! #[derive(Default)]
//! struct Toggle;
//!
//! impl CustomElement for Toggle {
//!     const TAG: &'static str = "x-toggle";
//!
//!     fn template() -> &'static str {
//!         r#"<button id="toggle-button"><slot></slot></button>"#
//!     }
//!
//!     fn properties() -> Properties<Self> {
//!         Properties::new().with("flag", Property::boolean().reflect_to_attribute(true))
//!     }
//! }
//!
//! let mut registry = ElementRegistry::new();
//! registry.define::<Toggle>().unwrap();
//!
//! let mut toggle = registry.create::<Toggle>().unwrap();
//! toggle.connected_callback().unwrap();
//! toggle.set("flag", true).unwrap();
//!
//! assert_eq!(toggle.host().get_attribute("flag").as_deref(), Some(""));
//! assert!(toggle.quick_access().unwrap().contains_key("toggleButton"));
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use reinhardt_elements_core::{
	ConfigurationWarning, ElementSettings, PropertyValue, RawValue, warn_log,
};
use reinhardt_elements_dom::{EventListener, Node, QuickAccess, Template};

use crate::accessors::{Prop, PropertyType};
use crate::error::ElementError;
use crate::factory::create_root;
use crate::ledger::{AutoListener, EventLedger};
use crate::lifecycle::{AttachedHook, DetachedHook, LifecycleState};
use crate::property::{Observer, ObserverFn, Properties, PropertyEntry, PropertyTable};
use crate::store::PropertyStore;

/// Placeholder tag of the base type. Components must declare their own.
pub const BASE_TAG: &str = "web-component-base-element";

/// A custom element type.
///
/// Every method has a default so a component only declares what it needs,
/// but [`TAG`](Self::TAG) must be overridden: defining a component that
/// keeps [`BASE_TAG`] fails with
/// [`ElementError::MisconfiguredComponent`].
pub trait CustomElement: Sized + 'static {
	/// The tag name, a valid custom element name such as `my-element`.
	const TAG: &'static str = BASE_TAG;

	/// Template markup, optionally wrapped in `<template>`.
	fn template() -> &'static str {
		""
	}

	/// Property declarations, read once when the type is defined.
	fn properties() -> Properties<Self> {
		Properties::new()
	}

	/// Resolves observers declared with [`Observer::method`].
	///
	/// Returning `None` for a declared name produces a
	/// [`ConfigurationWarning`] each time the observer should fire.
	fn observer_method(_name: &str) -> Option<ObserverFn<Self>> {
		None
	}

	/// Called on every attach, after initial values are applied.
	fn attached(_element: &mut Element<Self>) {}

	/// Called on every detach, before listeners are removed.
	fn detached(_element: &mut Element<Self>) {}
}

/// Everything shared by the instances of one component type.
pub struct ElementDefinition<C> {
	pub(crate) tag: &'static str,
	pub(crate) template: Rc<Template>,
	pub(crate) properties: PropertyTable<C>,
	pub(crate) settings: Rc<ElementSettings>,
}

impl<C> ElementDefinition<C> {
	/// The tag name.
	pub fn tag(&self) -> &'static str {
		self.tag
	}

	/// The parsed template.
	pub fn template(&self) -> &Template {
		&self.template
	}

	/// The resolved property table.
	pub fn properties(&self) -> &PropertyTable<C> {
		&self.properties
	}

	/// The settings in effect when the type was defined.
	pub fn settings(&self) -> &ElementSettings {
		&self.settings
	}
}

impl<C> fmt::Debug for ElementDefinition<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ElementDefinition")
			.field("tag", &self.tag)
			.field("properties", &self.properties)
			.finish()
	}
}

/// One instance of a custom element.
pub struct Element<C> {
	component: C,
	pub(crate) definition: Rc<ElementDefinition<C>>,
	pub(crate) host: Node,
	pub(crate) root: Node,
	pub(crate) store: PropertyStore,
	pub(crate) ledger: EventLedger,
	pub(crate) quick_access: Option<QuickAccess>,
	pub(crate) state: LifecycleState,
	pub(crate) initialized: bool,
	pub(crate) on_attached: AttachedHook<C>,
	pub(crate) on_detached: Option<DetachedHook<C>>,
	pub(crate) warnings: Vec<ConfigurationWarning>,
}

impl<C: CustomElement> Element<C> {
	/// Builds the shadow root on `host` and an empty instance around it.
	pub(crate) fn construct(
		definition: Rc<ElementDefinition<C>>,
		host: Node,
		component: C,
	) -> Result<Self, ElementError> {
		let root = create_root(&host, &definition.template)?;
		Ok(Self {
			component,
			definition,
			host,
			root,
			store: PropertyStore::new(),
			ledger: EventLedger::new(),
			quick_access: None,
			state: LifecycleState::Unattached,
			initialized: false,
			on_attached: AttachedHook::default(),
			on_detached: None,
			warnings: Vec::new(),
		})
	}

	/// The tag name.
	pub fn is(&self) -> &'static str {
		self.definition.tag
	}

	/// The host element.
	pub fn host(&self) -> &Node {
		&self.host
	}

	/// The isolated rendering root.
	pub fn shadow_root(&self) -> &Node {
		&self.root
	}

	/// The shared type definition.
	pub fn definition(&self) -> &ElementDefinition<C> {
		&self.definition
	}

	/// The wrapped component.
	pub fn component(&self) -> &C {
		&self.component
	}

	/// The wrapped component, mutably.
	pub fn component_mut(&mut self) -> &mut C {
		&mut self.component
	}

	/// Configuration warnings recorded so far.
	pub fn warnings(&self) -> &[ConfigurationWarning] {
		&self.warnings
	}

	// ------------------------------------------------------------------
	// Properties
	// ------------------------------------------------------------------

	/// Returns the current value of a property.
	///
	/// Properties have no value until the first attach applies initial
	/// values.
	pub fn get(&self, name: &str) -> Option<&PropertyValue> {
		self.store.get(name)
	}

	/// Assigns a property.
	///
	/// Before the first attach the raw value is kept for initialization.
	/// Afterwards it is coerced, stored, reflected and observed.
	pub fn set(&mut self, name: &str, value: impl Into<RawValue>) -> Result<(), ElementError> {
		let definition = Rc::clone(&self.definition);
		let entry = lookup(&definition, name)?;
		let raw = value.into();
		if !self.initialized {
			self.store.set_pending(name, raw);
			return Ok(());
		}
		self.assign(entry, raw)
	}

	/// Returns a property as its Rust type.
	pub fn prop<T: PropertyType>(&self, key: Prop<T>) -> Option<T> {
		self.get(key.name()).and_then(T::from_value)
	}

	/// Assigns a property from its Rust type.
	///
	/// Fails with [`ElementError::KindMismatch`] if `T` is not stored as the
	/// declared kind of the property.
	pub fn set_prop<T: PropertyType>(&mut self, key: Prop<T>, value: T) -> Result<(), ElementError> {
		let declared = lookup(&self.definition, key.name())?.property().kind();
		if declared != T::KIND {
			return Err(ElementError::KindMismatch {
				tag: self.is().to_string(),
				property: key.name().to_string(),
				expected: declared,
				found: T::KIND,
			});
		}
		self.set(key.name(), value.into_raw())
	}

	/// Coerces and commits a value. Nothing is stored if coercion fails.
	pub(crate) fn assign(
		&mut self,
		entry: &PropertyEntry<C>,
		raw: RawValue,
	) -> Result<(), ElementError> {
		let value = entry
			.property()
			.kind()
			.coerce(raw)
			.map_err(|source| ElementError::MalformedAttributeValue {
				property: entry.name().to_string(),
				source,
			})?;
		self.commit(entry, value);
		Ok(())
	}

	/// Stores, reflects and then observes an already coerced value.
	pub(crate) fn commit(&mut self, entry: &PropertyEntry<C>, value: PropertyValue) {
		let old = self.store.insert(entry.name(), value.clone());

		if entry.property().reflects() {
			match value.to_attribute() {
				Some(text) => {
					self.host.set_attribute(entry.attribute(), &text);
				}
				None => {
					self.host.remove_attribute(entry.attribute());
				}
			}
		}

		if old.as_ref() == Some(&value) {
			return;
		}
		if let Some(observer) = entry.property().observer_ref() {
			self.notify(entry.name(), observer, &value, old.as_ref());
		}
	}

	fn notify(
		&mut self,
		property: &str,
		observer: &Observer<C>,
		value: &PropertyValue,
		old: Option<&PropertyValue>,
	) {
		match observer {
			Observer::Direct(f) => f(self, value, old),
			Observer::Method(method) => match C::observer_method(method) {
				Some(f) => f(self, value, old),
				None => {
					let warning = ConfigurationWarning {
						tag: self.definition.tag.to_string(),
						property: property.to_string(),
						observer: method.to_string(),
					};
					warn_log!("{}", warning);
					self.warnings.push(warning);
				}
			},
		}
	}

	// ------------------------------------------------------------------
	// Host attributes
	// ------------------------------------------------------------------

	/// Sets a host attribute the way the host environment would, delivering
	/// the attribute-changed notification for observed attributes.
	///
	/// Names are ASCII-lowercased first, as HTML hosts do.
	pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), ElementError> {
		let name = name.to_ascii_lowercase();
		let old = self.host.set_attribute(&name, value);
		if !self.definition.properties.is_observed(&name) {
			return Ok(());
		}
		self.attribute_changed_callback(&name, old.as_deref(), Some(value))
	}

	/// Removes a host attribute the way the host environment would.
	pub fn remove_attribute(&mut self, name: &str) -> Result<(), ElementError> {
		let name = name.to_ascii_lowercase();
		let Some(old) = self.host.remove_attribute(&name) else {
			return Ok(());
		};
		if !self.definition.properties.is_observed(&name) {
			return Ok(());
		}
		self.attribute_changed_callback(&name, Some(&old), None)
	}

	// ------------------------------------------------------------------
	// Shadow root queries
	// ------------------------------------------------------------------

	/// The quick-access index (`$`), built on attach or on the first
	/// attribute notification.
	pub fn quick_access(&self) -> Option<&QuickAccess> {
		self.quick_access.as_ref()
	}

	/// Rebuilds the quick-access index from the current shadow root.
	pub fn refresh_quick_access(&mut self) -> &QuickAccess {
		let index = self.build_quick_access();
		self.quick_access.insert(index)
	}

	pub(crate) fn ensure_quick_access(&mut self) {
		if self.quick_access.is_none() {
			self.quick_access = Some(self.build_quick_access());
		}
	}

	fn build_quick_access(&self) -> QuickAccess {
		QuickAccess::build(&self.root, &self.definition.settings.quick_access_attribute)
	}

	/// Returns the first shadow root descendant matching `selector` (`$$`).
	pub fn query(&self, selector: &str) -> Result<Option<Node>, ElementError> {
		Ok(self.root.query_selector(selector)?)
	}

	/// Returns every shadow root descendant matching `selector` (`$$$`).
	pub fn query_all(&self, selector: &str) -> Result<Vec<Node>, ElementError> {
		Ok(self.root.query_selector_all(selector)?)
	}

	// ------------------------------------------------------------------
	// Listeners
	// ------------------------------------------------------------------

	/// Registers a listener that is removed automatically on detach.
	///
	/// Returns `None` if the exact triple is already registered.
	pub fn add_auto_event_listener(
		&self,
		target: &Node,
		event: &str,
		listener: &EventListener,
	) -> Option<AutoListener> {
		self.ledger.add(target, event, listener)
	}

	/// Removes a listener registered with
	/// [`add_auto_event_listener`](Self::add_auto_event_listener).
	/// Missing entries are ignored.
	pub fn remove_auto_event_listener(
		&self,
		target: &Node,
		event: &str,
		listener: &EventListener,
	) -> bool {
		self.ledger.remove(target, event, listener)
	}

	/// The listener ledger.
	pub fn ledger(&self) -> &EventLedger {
		&self.ledger
	}
}

/// Looks up a declared property by camelCase name.
pub(crate) fn lookup<'d, C>(
	definition: &'d ElementDefinition<C>,
	name: &str,
) -> Result<&'d PropertyEntry<C>, ElementError> {
	definition
		.properties
		.get(name)
		.ok_or_else(|| ElementError::UnknownProperty {
			tag: definition.tag.to_string(),
			property: name.to_string(),
		})
}

impl<C> Deref for Element<C> {
	type Target = C;

	fn deref(&self) -> &C {
		&self.component
	}
}

impl<C> DerefMut for Element<C> {
	fn deref_mut(&mut self) -> &mut C {
		&mut self.component
	}
}

impl<C> fmt::Debug for Element<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Element")
			.field("tag", &self.definition.tag)
			.field("state", &self.state)
			.field("store", &self.store)
			.field("ledger", &self.ledger)
			.finish()
	}
}
