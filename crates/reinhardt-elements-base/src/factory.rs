//! Component factory.
//!
//! Templates are parsed once per component type, when the type is defined,
//! and kept in a [`TemplateCache`] owned by the registry. Every instance gets
//! its own shadow root filled with a deep copy of the cached content.

use std::rc::Rc;

use indexmap::IndexMap;
use reinhardt_elements_core::debug_log;
use reinhardt_elements_dom::{DomError, Node, Template};

/// Parsed templates keyed by tag name.
#[derive(Debug, Default)]
pub struct TemplateCache {
	templates: IndexMap<String, Rc<Template>>,
}

impl TemplateCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the template cached for `tag`, parsing `markup` on first use.
	pub fn get_or_parse(&mut self, tag: &str, markup: &str) -> Rc<Template> {
		if let Some(template) = self.templates.get(tag) {
			return Rc::clone(template);
		}
		debug_log!("Parsing template for <{}>", tag);
		let template = Rc::new(Template::parse(markup));
		self.templates
			.insert(tag.to_string(), Rc::clone(&template));
		template
	}

	/// Returns the template cached for `tag`.
	pub fn get(&self, tag: &str) -> Option<Rc<Template>> {
		self.templates.get(tag).cloned()
	}

	/// Returns true if a template is cached for `tag`.
	pub fn contains(&self, tag: &str) -> bool {
		self.templates.contains_key(tag)
	}

	/// Number of cached templates.
	pub fn len(&self) -> usize {
		self.templates.len()
	}

	/// Returns true if nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.templates.is_empty()
	}
}

/// Attaches a shadow root to `host` and fills it with a copy of `template`.
pub fn create_root(host: &Node, template: &Template) -> Result<Node, DomError> {
	let root = host.attach_shadow()?;
	root.append_child(&template.instantiate())?;
	Ok(root)
}
