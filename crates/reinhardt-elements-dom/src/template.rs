//! Template markup parsing.
//!
//! Markup is parsed with `scraper` (html5ever) and converted into [`Node`]s.
//! A template may be authored either as bare markup or wrapped in a
//! `<template>` element; both forms produce the same content.

use scraper::{ElementRef, Html};

use crate::node::Node;

/// Parsed template content, ready to be cloned into shadow roots.
#[derive(Debug, Clone)]
pub struct Template {
	content: Node,
}

impl Template {
	/// Parses template markup.
	///
	/// Surrounding whitespace is ignored. If the first parsed node is a
	/// `<template>` element its children become the content, otherwise the
	/// whole markup does.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_elements_dom::Template;
	///
	/// let bare = Template::parse("<b>hi</b>");
	/// let wrapped = Template::parse("<template><b>hi</b></template>");
	/// assert_eq!(bare.content().inner_html(), wrapped.content().inner_html());
	/// ```
	pub fn parse(markup: &str) -> Self {
		let html = Html::parse_fragment(markup.trim());
		let root = html.root_element();

		let first = root.children().next().and_then(ElementRef::wrap);
		let source = match first {
			Some(element) if element.value().name() == "template" => element,
			_ => root,
		};

		let content = Node::fragment();
		convert_children(source, &content);
		Self { content }
	}

	/// Returns the content fragment.
	pub fn content(&self) -> &Node {
		&self.content
	}

	/// Returns a deep copy of the content.
	pub fn instantiate(&self) -> Node {
		self.content.deep_clone()
	}

	/// Returns true if the template has no content.
	pub fn is_empty(&self) -> bool {
		self.content.first_child().is_none()
	}
}

impl Default for Template {
	fn default() -> Self {
		Self {
			content: Node::fragment(),
		}
	}
}

fn convert_children(source: ElementRef<'_>, into: &Node) {
	for child in source.children() {
		// A `<template>` element keeps its parsed content in a fragment child.
		if matches!(child.value(), scraper::Node::Fragment) {
			for inner in child.children() {
				append_converted(into, inner.value(), ElementRef::wrap(inner));
			}
		} else {
			append_converted(into, child.value(), ElementRef::wrap(child));
		}
	}
}

fn append_converted(into: &Node, value: &scraper::Node, element_ref: Option<ElementRef<'_>>) {
	let converted = match value {
		scraper::Node::Element(element) => {
			let node = Node::element(element.name());
			for (name, value) in element.attrs() {
				node.set_attribute(name, value);
			}
			if let Some(element_ref) = element_ref {
				convert_children(element_ref, &node);
			}
			node
		}
		scraper::Node::Text(text) => Node::text(&text.text),
		scraper::Node::Comment(comment) => Node::comment(&comment.comment),
		_ => return,
	};
	// Freshly created nodes always have a valid parent here.
	let _ = into.append_child(&converted);
}
