//! Quick-access index over marker attributes.
//!
//! The index maps the camelCase form of each marker value to the element
//! carrying it. It is a snapshot: edits to the tree after it is built are
//! not reflected until it is rebuilt.

use indexmap::IndexMap;
use reinhardt_elements_core::dashes_to_camel_case;

use crate::node::Node;

/// Read-only snapshot of marked descendants, keyed by camelCase marker value.
///
/// Keys are only unique if marker values are; a later element with the same
/// key replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickAccess {
	entries: IndexMap<String, Node>,
}

impl QuickAccess {
	/// Indexes every descendant element of `root` that carries `attribute`.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_elements_dom::{Node, QuickAccess, Template};
	///
	/// let root = Node::fragment();
	/// root.append_child(&Template::parse(r#"<input id="user-name">"#).instantiate())
	///     .unwrap();
	///
	/// let index = QuickAccess::build(&root, "id");
	/// assert!(index.contains_key("userName"));
	/// ```
	pub fn build(root: &Node, attribute: &str) -> Self {
		let entries = root
			.descendant_elements()
			.into_iter()
			.filter_map(|node| {
				let value = node.get_attribute(attribute)?;
				Some((dashes_to_camel_case(&value), node))
			})
			.collect();
		Self { entries }
	}

	/// Returns the element stored under `key`.
	pub fn get(&self, key: &str) -> Option<&Node> {
		self.entries.get(key)
	}

	/// Returns true if `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if nothing was indexed.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Keys in document order of first appearance.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Entries in document order of first appearance.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
		self.entries.iter().map(|(key, node)| (key.as_str(), node))
	}
}
