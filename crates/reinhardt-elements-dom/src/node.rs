//! Node handles for the in-memory host.
//!
//! A [`Node`] is a cheap, cloneable handle. Two handles are equal only when
//! they refer to the same node, which is what listener bookkeeping and the
//! quick-access index rely on.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::error::DomError;
use crate::event::EventListener;
use crate::selector::Selector;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// The type of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	/// A document, the root of a live tree.
	Document,
	/// A detached container used for template content.
	Fragment,
	/// The isolated rendering root attached to an element.
	ShadowRoot,
	/// An element with its lowercase tag name.
	Element(String),
	/// A text node.
	Text,
	/// A comment node.
	Comment,
}

pub(crate) struct NodeData {
	kind: NodeKind,
	attributes: RefCell<IndexMap<String, String>>,
	data: RefCell<String>,
	children: RefCell<Vec<Node>>,
	parent: RefCell<Weak<NodeData>>,
	host: RefCell<Weak<NodeData>>,
	shadow_root: RefCell<Option<Node>>,
	pub(crate) listeners: RefCell<Vec<(String, EventListener)>>,
}

/// Handle to a node in the in-memory host.
#[derive(Clone)]
pub struct Node(Rc<NodeData>);

impl Node {
	fn with_kind(kind: NodeKind, data: impl Into<String>) -> Self {
		Self(Rc::new(NodeData {
			kind,
			attributes: RefCell::new(IndexMap::new()),
			data: RefCell::new(data.into()),
			children: RefCell::new(Vec::new()),
			parent: RefCell::new(Weak::new()),
			host: RefCell::new(Weak::new()),
			shadow_root: RefCell::new(None),
			listeners: RefCell::new(Vec::new()),
		}))
	}

	/// Creates a document node.
	pub fn document() -> Self {
		Self::with_kind(NodeKind::Document, "")
	}

	/// Creates an element. The tag name is lowercased.
	pub fn element(tag: &str) -> Self {
		Self::with_kind(NodeKind::Element(tag.to_ascii_lowercase()), "")
	}

	/// Creates a text node.
	pub fn text(data: &str) -> Self {
		Self::with_kind(NodeKind::Text, data)
	}

	/// Creates a comment node.
	pub fn comment(data: &str) -> Self {
		Self::with_kind(NodeKind::Comment, data)
	}

	/// Creates an empty fragment.
	pub fn fragment() -> Self {
		Self::with_kind(NodeKind::Fragment, "")
	}

	pub(crate) fn data(&self) -> &NodeData {
		&self.0
	}

	/// Returns the node's kind.
	pub fn kind(&self) -> &NodeKind {
		&self.0.kind
	}

	/// Returns the lowercase tag name for elements.
	pub fn tag_name(&self) -> Option<&str> {
		match &self.0.kind {
			NodeKind::Element(tag) => Some(tag),
			_ => None,
		}
	}

	/// Returns true for element nodes.
	pub fn is_element(&self) -> bool {
		matches!(self.0.kind, NodeKind::Element(_))
	}

	/// Returns true if both handles refer to the same node.
	pub fn ptr_eq(&self, other: &Node) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	// ------------------------------------------------------------------
	// Attributes
	// ------------------------------------------------------------------

	/// Returns the value of an attribute.
	pub fn get_attribute(&self, name: &str) -> Option<String> {
		self.0
			.attributes
			.borrow()
			.get(&name.to_ascii_lowercase())
			.cloned()
	}

	/// Returns whether the attribute is present.
	pub fn has_attribute(&self, name: &str) -> bool {
		self.0
			.attributes
			.borrow()
			.contains_key(&name.to_ascii_lowercase())
	}

	/// Sets an attribute and returns its previous value.
	pub fn set_attribute(&self, name: &str, value: &str) -> Option<String> {
		self.0
			.attributes
			.borrow_mut()
			.insert(name.to_ascii_lowercase(), value.to_string())
	}

	/// Removes an attribute and returns its previous value.
	pub fn remove_attribute(&self, name: &str) -> Option<String> {
		self.0
			.attributes
			.borrow_mut()
			.shift_remove(&name.to_ascii_lowercase())
	}

	/// Returns attribute names in insertion order.
	pub fn attribute_names(&self) -> Vec<String> {
		self.0.attributes.borrow().keys().cloned().collect()
	}

	// ------------------------------------------------------------------
	// Tree
	// ------------------------------------------------------------------

	/// Returns the parent node. Shadow roots have no parent, see [`host`](Self::host).
	pub fn parent(&self) -> Option<Node> {
		self.0.parent.borrow().upgrade().map(Node)
	}

	/// Returns the parent if it is an element.
	pub fn parent_element(&self) -> Option<Node> {
		self.parent().filter(Node::is_element)
	}

	/// Returns the host element of a shadow root.
	pub fn host(&self) -> Option<Node> {
		self.0.host.borrow().upgrade().map(Node)
	}

	/// Returns the children in order.
	pub fn children(&self) -> Vec<Node> {
		self.0.children.borrow().clone()
	}

	/// Returns the first child.
	pub fn first_child(&self) -> Option<Node> {
		self.0.children.borrow().first().cloned()
	}

	/// Returns whether the node is a descendant of `other`, or `other` itself.
	///
	/// Shadow boundaries are not crossed.
	pub fn is_inclusive_descendant_of(&self, other: &Node) -> bool {
		let mut current = Some(self.clone());
		while let Some(node) = current {
			if node.ptr_eq(other) {
				return true;
			}
			current = node.parent();
		}
		false
	}

	/// Appends a child, moving it out of its current parent.
	///
	/// Appending a fragment moves the fragment's children instead.
	pub fn append_child(&self, child: &Node) -> Result<(), DomError> {
		match child.kind() {
			NodeKind::Document | NodeKind::ShadowRoot => {
				return Err(DomError::HierarchyRequest(format!(
					"{:?} nodes cannot be inserted",
					child.kind()
				)));
			}
			NodeKind::Fragment => {
				if self.ptr_eq(child) {
					return Err(DomError::HierarchyRequest(
						"a fragment cannot be appended to itself".to_string(),
					));
				}
				for grandchild in child.children() {
					self.append_child(&grandchild)?;
				}
				return Ok(());
			}
			_ => {}
		}
		if matches!(self.kind(), NodeKind::Text | NodeKind::Comment) {
			return Err(DomError::HierarchyRequest(
				"text and comment nodes cannot have children".to_string(),
			));
		}
		if self.is_inclusive_descendant_of(child) {
			return Err(DomError::HierarchyRequest(
				"a node cannot be appended into itself or its descendants".to_string(),
			));
		}

		child.remove();
		*child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
		self.0.children.borrow_mut().push(child.clone());
		Ok(())
	}

	/// Removes a direct child.
	pub fn remove_child(&self, child: &Node) -> Result<(), DomError> {
		let position = self
			.0
			.children
			.borrow()
			.iter()
			.position(|c| c.ptr_eq(child));
		let index = position.ok_or(DomError::NotFound)?;
		self.0.children.borrow_mut().remove(index);
		*child.0.parent.borrow_mut() = Weak::new();
		Ok(())
	}

	/// Detaches the node from its parent, if any.
	pub fn remove(&self) {
		if let Some(parent) = self.parent() {
			let _ = parent.remove_child(self);
		}
	}

	/// Returns every descendant in document order, excluding the node itself.
	pub fn descendants(&self) -> Vec<Node> {
		let mut output = Vec::new();
		self.collect_descendants(&mut output);
		output
	}

	fn collect_descendants(&self, output: &mut Vec<Node>) {
		for child in self.0.children.borrow().iter() {
			output.push(child.clone());
			child.collect_descendants(output);
		}
	}

	/// Returns every descendant element in document order.
	pub fn descendant_elements(&self) -> Vec<Node> {
		self.descendants()
			.into_iter()
			.filter(Node::is_element)
			.collect()
	}

	/// Returns whether the node is inside a document, crossing shadow roots.
	pub fn is_connected(&self) -> bool {
		let mut current = Some(self.clone());
		while let Some(node) = current {
			if *node.kind() == NodeKind::Document {
				return true;
			}
			current = node.parent().or_else(|| node.host());
		}
		false
	}

	// ------------------------------------------------------------------
	// Text
	// ------------------------------------------------------------------

	/// Returns the text content.
	///
	/// Text and comment nodes return their data, other nodes concatenate the
	/// data of every descendant text node.
	pub fn text_content(&self) -> String {
		match self.kind() {
			NodeKind::Text | NodeKind::Comment => self.0.data.borrow().clone(),
			_ => self
				.descendants()
				.iter()
				.filter(|node| *node.kind() == NodeKind::Text)
				.map(|node| node.0.data.borrow().clone())
				.collect(),
		}
	}

	/// Replaces the text content.
	///
	/// On containers every child is replaced by a single text node.
	pub fn set_text_content(&self, text: &str) {
		match self.kind() {
			NodeKind::Text | NodeKind::Comment => {
				*self.0.data.borrow_mut() = text.to_string();
			}
			_ => {
				for child in self.children() {
					let _ = self.remove_child(&child);
				}
				if !text.is_empty() {
					let _ = self.append_child(&Node::text(text));
				}
			}
		}
	}

	// ------------------------------------------------------------------
	// Cloning and shadow roots
	// ------------------------------------------------------------------

	/// Returns a deep copy of the node.
	///
	/// Listeners and shadow roots are not copied.
	pub fn deep_clone(&self) -> Node {
		let copy = Self::with_kind(self.0.kind.clone(), self.0.data.borrow().clone());
		*copy.0.attributes.borrow_mut() = self.0.attributes.borrow().clone();
		for child in self.0.children.borrow().iter() {
			let child_copy = child.deep_clone();
			*child_copy.0.parent.borrow_mut() = Rc::downgrade(&copy.0);
			copy.0.children.borrow_mut().push(child_copy);
		}
		copy
	}

	/// Attaches an isolated shadow root to this element.
	pub fn attach_shadow(&self) -> Result<Node, DomError> {
		let tag = self.tag_name().ok_or(DomError::ShadowRootUnsupported)?;
		if self.0.shadow_root.borrow().is_some() {
			return Err(DomError::ShadowRootExists(tag.to_string()));
		}
		let root = Self::with_kind(NodeKind::ShadowRoot, "");
		*root.0.host.borrow_mut() = Rc::downgrade(&self.0);
		*self.0.shadow_root.borrow_mut() = Some(root.clone());
		Ok(root)
	}

	/// Returns the attached shadow root.
	pub fn shadow_root(&self) -> Option<Node> {
		self.0.shadow_root.borrow().clone()
	}

	// ------------------------------------------------------------------
	// Queries
	// ------------------------------------------------------------------

	/// Returns the first descendant element matching the selector.
	pub fn query_selector(&self, selector: &str) -> Result<Option<Node>, DomError> {
		let selector = Selector::parse(selector)?;
		Ok(self
			.descendant_elements()
			.into_iter()
			.find(|node| selector.matches(node)))
	}

	/// Returns every descendant element matching the selector, in document order.
	pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Node>, DomError> {
		let selector = Selector::parse(selector)?;
		Ok(self
			.descendant_elements()
			.into_iter()
			.filter(|node| selector.matches(node))
			.collect())
	}

	// ------------------------------------------------------------------
	// Serialization
	// ------------------------------------------------------------------

	/// Serializes the children of this node as HTML.
	pub fn inner_html(&self) -> String {
		let mut output = String::new();
		for child in self.0.children.borrow().iter() {
			child.write_html(&mut output);
		}
		output
	}

	/// Serializes this node and its children as HTML.
	pub fn outer_html(&self) -> String {
		let mut output = String::new();
		self.write_html(&mut output);
		output
	}

	fn write_html(&self, output: &mut String) {
		match &self.0.kind {
			NodeKind::Text => output.push_str(&escape_text(&self.0.data.borrow())),
			NodeKind::Comment => {
				output.push_str("<!--");
				output.push_str(&self.0.data.borrow());
				output.push_str("-->");
			}
			NodeKind::Element(tag) => {
				output.push('<');
				output.push_str(tag);
				for (name, value) in self.0.attributes.borrow().iter() {
					output.push(' ');
					output.push_str(name);
					output.push_str("=\"");
					output.push_str(&escape_attribute(value));
					output.push('"');
				}
				output.push('>');
				if VOID_ELEMENTS.contains(&tag.as_str()) {
					return;
				}
				output.push_str(&self.inner_html());
				output.push_str("</");
				output.push_str(tag);
				output.push('>');
			}
			_ => output.push_str(&self.inner_html()),
		}
	}
}

fn escape_text(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
	value.replace('&', "&amp;").replace('"', "&quot;")
}

impl PartialEq for Node {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl Eq for Node {}

impl Hash for Node {
	fn hash<H: Hasher>(&self, state: &mut H) {
		Rc::as_ptr(&self.0).hash(state);
	}
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.0.kind {
			NodeKind::Element(tag) => f
				.debug_struct("Element")
				.field("tag", tag)
				.field("attributes", &*self.0.attributes.borrow())
				.finish(),
			NodeKind::Text => f
				.debug_tuple("Text")
				.field(&*self.0.data.borrow())
				.finish(),
			kind => write!(f, "{:?}", kind),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_attributes_are_case_insensitive() {
		let node = Node::element("DIV");
		assert_eq!(node.tag_name(), Some("div"));

		assert_eq!(node.set_attribute("Data-Value", "1"), None);
		assert_eq!(node.get_attribute("data-value").as_deref(), Some("1"));
		assert_eq!(node.set_attribute("data-value", "2").as_deref(), Some("1"));
		assert_eq!(node.remove_attribute("DATA-VALUE").as_deref(), Some("2"));
		assert!(!node.has_attribute("data-value"));
	}

	#[rstest]
	fn test_append_moves_node_between_parents() {
		let first = Node::element("div");
		let second = Node::element("div");
		let child = Node::element("span");

		first.append_child(&child).unwrap();
		second.append_child(&child).unwrap();

		assert!(first.children().is_empty());
		assert_eq!(second.children(), vec![child.clone()]);
		assert_eq!(child.parent(), Some(second));
	}

	#[rstest]
	fn test_append_rejects_cycles() {
		let parent = Node::element("div");
		let child = Node::element("span");
		parent.append_child(&child).unwrap();

		let err = child.append_child(&parent).unwrap_err();
		assert!(matches!(err, DomError::HierarchyRequest(_)));
		let err = parent.append_child(&parent).unwrap_err();
		assert!(matches!(err, DomError::HierarchyRequest(_)));
	}

	#[rstest]
	fn test_append_fragment_moves_children() {
		let fragment = Node::fragment();
		fragment.append_child(&Node::element("a")).unwrap();
		fragment.append_child(&Node::element("b")).unwrap();

		let parent = Node::element("div");
		parent.append_child(&fragment).unwrap();

		assert!(fragment.children().is_empty());
		assert_eq!(parent.inner_html(), "<a></a><b></b>");
	}

	#[rstest]
	fn test_remove_child_not_found() {
		let parent = Node::element("div");
		let stranger = Node::element("span");
		assert_eq!(parent.remove_child(&stranger), Err(DomError::NotFound));
	}

	#[rstest]
	fn test_deep_clone_copies_structure_not_identity() {
		let original = Node::element("div");
		original.set_attribute("id", "box");
		original.append_child(&Node::text("hi")).unwrap();

		let copy = original.deep_clone();
		assert_ne!(copy, original);
		assert_eq!(copy.outer_html(), r#"<div id="box">hi</div>"#);

		copy.set_attribute("id", "other");
		assert_eq!(original.get_attribute("id").as_deref(), Some("box"));
	}

	#[rstest]
	fn test_attach_shadow_once() {
		let host = Node::element("x-host");
		let root = host.attach_shadow().unwrap();

		assert_eq!(host.shadow_root(), Some(root.clone()));
		assert_eq!(root.host(), Some(host.clone()));
		assert_eq!(root.parent(), None);
		assert!(matches!(
			host.attach_shadow(),
			Err(DomError::ShadowRootExists(_))
		));
		assert_eq!(
			Node::text("t").attach_shadow(),
			Err(DomError::ShadowRootUnsupported)
		);
	}

	#[rstest]
	fn test_is_connected_crosses_shadow_roots() {
		let document = Node::document();
		let host = Node::element("x-host");
		let root = host.attach_shadow().unwrap();
		let inner = Node::element("span");
		root.append_child(&inner).unwrap();

		assert!(!inner.is_connected());
		document.append_child(&host).unwrap();
		assert!(inner.is_connected());
		host.remove();
		assert!(!inner.is_connected());
	}

	#[rstest]
	fn test_text_content() {
		let parent = Node::element("p");
		parent.append_child(&Node::text("a")).unwrap();
		parent.append_child(&Node::comment("skip")).unwrap();
		let inner = Node::element("b");
		inner.append_child(&Node::text("c")).unwrap();
		parent.append_child(&inner).unwrap();

		assert_eq!(parent.text_content(), "ac");

		parent.set_text_content("replaced");
		assert_eq!(parent.children().len(), 1);
		assert_eq!(parent.inner_html(), "replaced");
	}

	#[rstest]
	fn test_serialization_escapes() {
		let node = Node::element("span");
		node.set_attribute("title", r#"a "quoted" & b"#);
		node.append_child(&Node::text("<b>")).unwrap();
		assert_eq!(
			node.outer_html(),
			r#"<span title="a &quot;quoted&quot; &amp; b">&lt;b&gt;</span>"#
		);
	}

	#[rstest]
	fn test_void_elements_have_no_closing_tag() {
		let node = Node::element("div");
		node.append_child(&Node::element("input")).unwrap();
		assert_eq!(node.inner_html(), "<input>");
	}
}
