//! # Reinhardt Elements
//!
//! A base for custom elements. Components declare a template and a table of
//! typed properties; the base keeps each property in sync with its host
//! attribute, calls observers on change, and removes listeners registered on
//! other nodes when the element is detached.
//!
//! ## Crates
//!
//! - [`core`]: property kinds, coercion, case conversion and settings
//! - [`dom`]: the in-memory host (nodes, shadow roots, events, selectors)
//! - [`base`]: the element base, its lifecycle and the registry
//!
//! ## Quick Example
//!
//! ```
//! use reinhardt_elements::prelude::*;
//!
//! #[derive(Default)]
//! struct Greeting;
//!
//! impl CustomElement for Greeting {
//!     const TAG: &'static str = "x-greeting";
//!
//!     fn template() -> &'static str {
//!         r#"<p id="text"></p>"#
//!     }
//!
//!     fn properties() -> Properties<Self> {
//!         Properties::new().with(
//!             "name",
//!             Property::string()
//!                 .default_value("world")
//!                 .observer(Observer::direct(|element: &mut Element<Greeting>, value, _old| {
//!                     if let Some(text) = element.quick_access().and_then(|qa| qa.get("text")) {
//!                         text.set_text_content(&format!("Hello, {}!", value));
//!                     }
//!                 })),
//!         )
//!     }
//! }
//!
//! let mut registry = ElementRegistry::new();
//! registry.define::<Greeting>().unwrap();
//!
//! let mut greeting = registry.create::<Greeting>().unwrap();
//! greeting.connected_callback().unwrap();
//! assert_eq!(greeting.query("#text").unwrap().unwrap().text_content(), "Hello, world!");
//! ```

pub use reinhardt_elements_base as base;
pub use reinhardt_elements_core as core;
pub use reinhardt_elements_dom as dom;

pub use reinhardt_elements_base::{
	CustomElement, Element, ElementError, ElementRegistry, LifecycleState, Observer, Prop,
	Properties, Property,
};
pub use reinhardt_elements_core::{ElementSettings, PropertyKind, PropertyValue, RawValue};
pub use reinhardt_elements_dom::{Event, EventListener, Node};

/// Everything a component author needs.
pub mod prelude {
	pub use reinhardt_elements_base::prelude::*;
	pub use reinhardt_elements_base::{AutoListener, LifecycleState};
	pub use reinhardt_elements_core::ElementSettings;
}
