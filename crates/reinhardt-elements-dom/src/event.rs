//! Events and event listeners.
//!
//! [`EventListener`] wraps a handler in an `Rc`, making it cheaply cloneable
//! while keeping a stable identity. Registering the same listener twice for
//! the same event on the same node is a no-op, as in the browser.
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use reinhardt_elements_dom::{Event, EventListener, Node};
//!
//! let button = Node::element("button");
//! let clicks = Rc::new(Cell::new(0));
//! let listener = EventListener::new({
//!     let clicks = clicks.clone();
//!     move |_event| clicks.set(clicks.get() + 1)
//! });
//!
//! button.add_event_listener("click", &listener);
//! button.add_event_listener("click", &listener);
//! button.dispatch_event(&Event::new("click"));
//! assert_eq!(clicks.get(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::node::Node;

/// An event dispatched through the node tree.
pub struct Event {
	event_type: String,
	bubbles: bool,
	cancelable: bool,
	detail: Option<Value>,
	default_prevented: Cell<bool>,
	propagation_stopped: Cell<bool>,
	target: RefCell<Option<Node>>,
	current_target: RefCell<Option<Node>>,
}

impl Event {
	/// Creates an event that does not bubble.
	pub fn new(event_type: impl Into<String>) -> Self {
		Self {
			event_type: event_type.into(),
			bubbles: false,
			cancelable: false,
			detail: None,
			default_prevented: Cell::new(false),
			propagation_stopped: Cell::new(false),
			target: RefCell::new(None),
			current_target: RefCell::new(None),
		}
	}

	/// Sets whether the event bubbles to ancestors.
	pub fn bubbles(mut self, bubbles: bool) -> Self {
		self.bubbles = bubbles;
		self
	}

	/// Sets whether `prevent_default` has an effect.
	pub fn cancelable(mut self, cancelable: bool) -> Self {
		self.cancelable = cancelable;
		self
	}

	/// Attaches a JSON payload, like `CustomEvent.detail`.
	pub fn with_detail(mut self, detail: Value) -> Self {
		self.detail = Some(detail);
		self
	}

	/// Returns the event type.
	pub fn event_type(&self) -> &str {
		&self.event_type
	}

	/// Returns the payload.
	pub fn detail(&self) -> Option<&Value> {
		self.detail.as_ref()
	}

	/// Marks the default action as cancelled. Ignored for non-cancelable events.
	pub fn prevent_default(&self) {
		if self.cancelable {
			self.default_prevented.set(true);
		}
	}

	/// Returns whether `prevent_default` took effect.
	pub fn default_prevented(&self) -> bool {
		self.default_prevented.get()
	}

	/// Stops the event from reaching further nodes.
	pub fn stop_propagation(&self) {
		self.propagation_stopped.set(true);
	}

	/// Returns the node the event was dispatched on.
	pub fn target(&self) -> Option<Node> {
		self.target.borrow().clone()
	}

	/// Returns the node whose listeners are currently running.
	pub fn current_target(&self) -> Option<Node> {
		self.current_target.borrow().clone()
	}
}

impl fmt::Debug for Event {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Event")
			.field("event_type", &self.event_type)
			.field("bubbles", &self.bubbles)
			.field("cancelable", &self.cancelable)
			.field("detail", &self.detail)
			.finish()
	}
}

/// A cloneable event handler with identity equality.
#[derive(Clone)]
pub struct EventListener {
	inner: Rc<dyn Fn(&Event)>,
}

impl EventListener {
	/// Creates a new listener from a closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&Event) + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	/// Calls the handler.
	pub fn call(&self, event: &Event) {
		(self.inner)(event)
	}
}

impl PartialEq for EventListener {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Eq for EventListener {}

impl fmt::Debug for EventListener {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventListener")
			.field("ptr", &Rc::as_ptr(&self.inner).cast::<()>())
			.finish()
	}
}

impl Node {
	/// Registers a listener. Returns false if the pair was already registered.
	pub fn add_event_listener(&self, event_type: &str, listener: &EventListener) -> bool {
		let mut listeners = self.data().listeners.borrow_mut();
		if listeners
			.iter()
			.any(|(name, existing)| name == event_type && existing == listener)
		{
			return false;
		}
		listeners.push((event_type.to_string(), listener.clone()));
		true
	}

	/// Removes a listener. Returns false if it was not registered.
	pub fn remove_event_listener(&self, event_type: &str, listener: &EventListener) -> bool {
		let mut listeners = self.data().listeners.borrow_mut();
		match listeners
			.iter()
			.position(|(name, existing)| name == event_type && existing == listener)
		{
			Some(index) => {
				listeners.remove(index);
				true
			}
			None => false,
		}
	}

	/// Returns the number of listeners registered for an event type.
	pub fn listener_count(&self, event_type: &str) -> usize {
		self.data()
			.listeners
			.borrow()
			.iter()
			.filter(|(name, _)| name == event_type)
			.count()
	}

	/// Dispatches an event to this node and, if it bubbles, to its ancestors.
	///
	/// Bubbling crosses from a shadow root to its host. Listeners added or
	/// removed while a node's listeners run take effect on the next dispatch.
	/// Returns false if the default action was prevented.
	pub fn dispatch_event(&self, event: &Event) -> bool {
		*event.target.borrow_mut() = Some(self.clone());
		event.propagation_stopped.set(false);

		let mut current = Some(self.clone());
		while let Some(node) = current {
			*event.current_target.borrow_mut() = Some(node.clone());
			let snapshot: Vec<EventListener> = node
				.data()
				.listeners
				.borrow()
				.iter()
				.filter(|(name, _)| *name == event.event_type)
				.map(|(_, listener)| listener.clone())
				.collect();
			for listener in snapshot {
				listener.call(event);
			}
			if !event.bubbles || event.propagation_stopped.get() {
				break;
			}
			current = node.parent().or_else(|| node.host());
		}

		*event.current_target.borrow_mut() = None;
		!event.default_prevented()
	}
}
