//! Element registry.
//!
//! The registry is the custom element registry of the in-memory host: a
//! component type is defined once, which validates its tag, parses its
//! template and resolves its property table. Instances are then created from
//! the shared definition.

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use reinhardt_elements_core::{ElementSettings, debug_log, error_log};
use reinhardt_elements_dom::Node;

use crate::element::{BASE_TAG, CustomElement, Element, ElementDefinition};
use crate::error::ElementError;
use crate::factory::TemplateCache;
use crate::property::PropertyTable;

/// Names the HTML specification reserves even though they contain a dash.
const RESERVED_TAGS: &[&str] = &[
	"annotation-xml",
	"color-profile",
	"font-face",
	"font-face-src",
	"font-face-uri",
	"font-face-format",
	"font-face-name",
	"missing-glyph",
];

struct Registration {
	type_id: TypeId,
	definition: Rc<dyn Any>,
	observed_attributes: Rc<[String]>,
}

/// Registry of defined component types.
pub struct ElementRegistry {
	settings: Rc<ElementSettings>,
	templates: TemplateCache,
	registrations: IndexMap<&'static str, Registration>,
}

impl ElementRegistry {
	/// Creates a registry with default settings.
	pub fn new() -> Self {
		Self::with_settings(ElementSettings::default())
	}

	/// Creates a registry with the given settings.
	pub fn with_settings(settings: ElementSettings) -> Self {
		Self {
			settings: Rc::new(settings),
			templates: TemplateCache::new(),
			registrations: IndexMap::new(),
		}
	}

	/// The settings shared by every definition.
	pub fn settings(&self) -> &ElementSettings {
		&self.settings
	}

	/// The template cache.
	pub fn templates(&self) -> &TemplateCache {
		&self.templates
	}

	/// Defines a component type under [`CustomElement::TAG`].
	///
	/// # Errors
	///
	/// A component that keeps [`BASE_TAG`], or whose tag is not a valid
	/// custom element name while validation is enabled, is rejected with
	/// [`ElementError::MisconfiguredComponent`]. The error is logged at error
	/// level and returned in every build profile; nothing panics, so hosts
	/// and tests can inspect it. A tag that is already defined yields
	/// [`ElementError::AlreadyDefined`].
	pub fn define<C: CustomElement>(&mut self) -> Result<(), ElementError> {
		let tag = C::TAG;
		if let Err(reason) = self.check_tag(tag) {
			let error = ElementError::MisconfiguredComponent {
				tag: tag.to_string(),
				reason,
			};
			error_log!("{}", error);
			return Err(error);
		}
		if self.registrations.contains_key(tag) {
			return Err(ElementError::AlreadyDefined(tag.to_string()));
		}

		let template = self.templates.get_or_parse(tag, C::template());
		let properties = PropertyTable::new(C::properties());
		let observed_attributes = Rc::clone(properties.observed_attributes());
		let definition: Rc<ElementDefinition<C>> = Rc::new(ElementDefinition {
			tag,
			template,
			properties,
			settings: Rc::clone(&self.settings),
		});

		debug_log!(
			"Defined <{}> observing {:?}",
			tag,
			observed_attributes
		);
		self.registrations.insert(
			tag,
			Registration {
				type_id: TypeId::of::<C>(),
				definition,
				observed_attributes,
			},
		);
		Ok(())
	}

	fn check_tag(&self, tag: &str) -> Result<(), String> {
		if tag == BASE_TAG {
			return Err("the component must declare its own `CustomElement::TAG`".to_string());
		}
		if self.settings.validate_tag_names && !is_valid_custom_element_name(tag) {
			return Err(format!("{:?} is not a valid custom element name", tag));
		}
		Ok(())
	}

	/// Returns true if `tag` is defined.
	pub fn is_defined(&self, tag: &str) -> bool {
		self.registrations.contains_key(tag)
	}

	/// Dashed names of the attributes the host reports for `tag`.
	pub fn observed_attributes(&self, tag: &str) -> Option<&[String]> {
		self.registrations
			.get(tag)
			.map(|registration| &*registration.observed_attributes)
	}

	/// Defined tags in definition order.
	pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.registrations.keys().copied()
	}

	/// Returns the shared definition of a component type.
	pub fn definition<C: CustomElement>(&self) -> Result<Rc<ElementDefinition<C>>, ElementError> {
		let not_defined = || ElementError::NotDefined(C::TAG.to_string());
		let registration = self.registrations.get(C::TAG).ok_or_else(not_defined)?;
		if registration.type_id != TypeId::of::<C>() {
			return Err(not_defined());
		}
		Rc::clone(&registration.definition)
			.downcast::<ElementDefinition<C>>()
			.map_err(|_| not_defined())
	}

	/// Creates an unattached element with a default component.
	pub fn create<C: CustomElement + Default>(&self) -> Result<Element<C>, ElementError> {
		self.create_with(C::default())
	}

	/// Creates an unattached element around `component` on a new host node.
	pub fn create_with<C: CustomElement>(&self, component: C) -> Result<Element<C>, ElementError> {
		let definition = self.definition::<C>()?;
		Element::construct(definition, Node::element(C::TAG), component)
	}

	/// Turns an existing host node, e.g. one parsed from markup, into an
	/// element.
	///
	/// Every observed attribute already on the host is delivered through
	/// [`Element::attribute_changed_callback`], as a browser does on upgrade.
	pub fn upgrade<C: CustomElement>(
		&self,
		host: &Node,
		component: C,
	) -> Result<Element<C>, ElementError> {
		let definition = self.definition::<C>()?;
		let found = host.tag_name().unwrap_or_default();
		if found != C::TAG {
			return Err(ElementError::TagMismatch {
				expected: C::TAG.to_string(),
				found: found.to_string(),
			});
		}

		let observed = Rc::clone(definition.properties.observed_attributes());
		let mut element = Element::construct(definition, host.clone(), component)?;
		for attribute in observed.iter() {
			if let Some(value) = host.get_attribute(attribute) {
				element.attribute_changed_callback(attribute, None, Some(&value))?;
			}
		}
		Ok(element)
	}
}

impl Default for ElementRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for ElementRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ElementRegistry")
			.field("settings", &self.settings)
			.field("tags", &self.registrations.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Checks the custom element name rules: a lowercase ASCII letter first, at
/// least one dash, no uppercase ASCII, and not a reserved name.
pub fn is_valid_custom_element_name(tag: &str) -> bool {
	let mut chars = tag.chars();
	let starts_lowercase = chars.next().is_some_and(|c| c.is_ascii_lowercase());
	starts_lowercase
		&& tag.contains('-')
		&& tag.chars().all(|c| {
			c.is_ascii_lowercase()
				|| c.is_ascii_digit()
				|| matches!(c, '-' | '.' | '_')
				|| (!c.is_ascii() && !c.is_whitespace())
		})
		&& !RESERVED_TAGS.contains(&tag)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("my-element", true)]
	#[case("x-1", true)]
	#[case("math-α", true)]
	#[case("a.b-c_d", true)]
	#[case("element", false)]
	#[case("My-element", false)]
	#[case("my-Element", false)]
	#[case("1-element", false)]
	#[case("-element", false)]
	#[case("my element-x", false)]
	#[case("font-face", false)]
	#[case("", false)]
	fn test_custom_element_names(#[case] tag: &str, #[case] valid: bool) {
		assert_eq!(is_valid_custom_element_name(tag), valid);
	}
}
