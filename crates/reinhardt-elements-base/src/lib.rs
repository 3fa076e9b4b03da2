//! Reinhardt Elements Base - a base for custom elements
//!
//! This crate centralizes what every custom element repeats:
//!
//! - instantiating an isolated shadow root from a template ([`factory`])
//! - keeping typed properties in sync with their attributes ([`property`],
//!   [`store`], [`accessors`])
//! - running attach, detach and attribute-change hooks ([`lifecycle`])
//! - tracking listeners on other nodes for cleanup on detach ([`ledger`])
//!
//! ## Property Synchronization
//!
//! Every assignment goes through one setter that coerces the value to the
//! declared kind, stores it, reflects it to the host attribute if requested,
//! and then calls the observer if the value changed. Object and Array values
//! are compared by reference.
//!
//! ## Example
//!
//! ```
//! use reinhardt_elements_base::prelude::*;
//!
//! #[derive(Default)]
//! struct Counter {
//!     changes: usize,
//! }
//!
//! impl CustomElement for Counter {
//!     const TAG: &'static str = "x-counter";
//!
//!     fn template() -> &'static str {
//!         r#"<template><span id="value"></span></template>"#
//!     }
//!
//!     fn properties() -> Properties<Self> {
//!         Properties::new().with(
//!             "count",
//!             Property::number()
//!                 .reflect_to_attribute(true)
//!                 .observer(Observer::direct(|element: &mut Element<Counter>, value, _old| {
//!                     element.changes += 1;
//!                     if let Some(span) = element.quick_access().and_then(|qa| qa.get("value")) {
//!                         span.set_text_content(&value.to_string());
//!                     }
//!                 })),
//!         )
//!     }
//! }
//!
//! const COUNT: Prop<f64> = Prop::new("count");
//!
//! let mut registry = ElementRegistry::new();
//! registry.define::<Counter>().unwrap();
//!
//! let mut counter = registry.create::<Counter>().unwrap();
//! counter.set_attribute("count", "3").unwrap();
//! counter.connected_callback().unwrap();
//!
//! assert_eq!(counter.prop(COUNT), Some(3.0));
//! counter.set_prop(COUNT, 4.0).unwrap();
//! assert_eq!(counter.host().get_attribute("count").as_deref(), Some("4"));
//! assert_eq!(counter.query("#value").unwrap().unwrap().text_content(), "4");
//! assert_eq!(counter.changes, 2);
//! ```

#![warn(missing_docs)]

pub mod accessors;
pub mod element;
pub mod error;
pub mod factory;
pub mod ledger;
pub mod lifecycle;
pub mod property;
pub mod registry;
pub mod store;

pub use accessors::{Prop, PropertyType};
pub use element::{BASE_TAG, CustomElement, Element, ElementDefinition};
pub use error::ElementError;
pub use factory::TemplateCache;
pub use ledger::{AutoListener, EventLedger};
pub use lifecycle::LifecycleState;
pub use property::{
	Observer, ObserverFn, Properties, Property, PropertyEntry, PropertyTable,
};
pub use registry::{ElementRegistry, is_valid_custom_element_name};
pub use store::PropertyStore;

/// Common imports for component authors.
pub mod prelude {
	pub use crate::{
		CustomElement, Element, ElementError, ElementRegistry, Observer, ObserverFn, Prop,
		Properties, Property,
	};
	pub use reinhardt_elements_core::{PropertyKind, PropertyValue, RawValue};
	pub use reinhardt_elements_dom::{Event, EventListener, Node};
}
