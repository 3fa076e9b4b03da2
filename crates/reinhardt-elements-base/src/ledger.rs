//! Event listener ledger.
//!
//! Listeners registered through the ledger are removed from their targets
//! when the element detaches, so targets that outlive the element do not
//! keep calling into it.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use reinhardt_elements_dom::{EventListener, Node};

struct LedgerEntry {
	target: Node,
	event: String,
	listener: EventListener,
}

impl LedgerEntry {
	fn is(&self, target: &Node, event: &str, listener: &EventListener) -> bool {
		self.target == *target && self.event == event && self.listener == *listener
	}
}

type Entries = Rc<RefCell<Vec<LedgerEntry>>>;

/// Ordered record of listeners an element registered on other nodes.
///
/// Holds at most one entry per exact `(target, event, listener)` triple.
#[derive(Clone, Default)]
pub struct EventLedger {
	entries: Entries,
}

impl EventLedger {
	/// Creates an empty ledger.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a listener on `target` and records it.
	///
	/// Returns `None` without touching the target if the triple is already
	/// recorded.
	pub fn add(
		&self,
		target: &Node,
		event: &str,
		listener: &EventListener,
	) -> Option<AutoListener> {
		if self.contains(target, event, listener) {
			return None;
		}
		target.add_event_listener(event, listener);
		self.entries.borrow_mut().push(LedgerEntry {
			target: target.clone(),
			event: event.to_string(),
			listener: listener.clone(),
		});
		Some(AutoListener {
			ledger: Rc::downgrade(&self.entries),
			target: target.clone(),
			event: event.to_string(),
			listener: listener.clone(),
		})
	}

	/// Removes a recorded listener from the ledger and from its target.
	///
	/// Returns false, and does nothing, if the triple is not recorded.
	pub fn remove(&self, target: &Node, event: &str, listener: &EventListener) -> bool {
		remove_entry(&self.entries, target, event, listener)
	}

	/// Returns true if the triple is recorded.
	pub fn contains(&self, target: &Node, event: &str, listener: &EventListener) -> bool {
		self.entries
			.borrow()
			.iter()
			.any(|entry| entry.is(target, event, listener))
	}

	/// Removes every recorded listener from its target and empties the ledger.
	///
	/// Returns the number of listeners removed.
	pub fn drain(&self) -> usize {
		let entries: Vec<LedgerEntry> = self.entries.borrow_mut().drain(..).collect();
		for entry in &entries {
			entry
				.target
				.remove_event_listener(&entry.event, &entry.listener);
		}
		entries.len()
	}

	/// Number of recorded listeners.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Returns true if nothing is recorded.
	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}
}

impl fmt::Debug for EventLedger {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventLedger")
			.field("len", &self.len())
			.finish()
	}
}

fn remove_entry(entries: &Entries, target: &Node, event: &str, listener: &EventListener) -> bool {
	let position = entries
		.borrow()
		.iter()
		.position(|entry| entry.is(target, event, listener));
	match position {
		Some(index) => {
			let entry = entries.borrow_mut().remove(index);
			entry
				.target
				.remove_event_listener(&entry.event, &entry.listener);
			true
		}
		None => false,
	}
}

/// Handle returned by [`EventLedger::add`] that undoes that one registration.
pub struct AutoListener {
	ledger: Weak<RefCell<Vec<LedgerEntry>>>,
	target: Node,
	event: String,
	listener: EventListener,
}

impl AutoListener {
	/// Removes the listener from its target and from the ledger.
	///
	/// Returns false if the registration was already undone.
	pub fn detach(self) -> bool {
		match self.ledger.upgrade() {
			Some(entries) => remove_entry(&entries, &self.target, &self.event, &self.listener),
			None => self
				.target
				.remove_event_listener(&self.event, &self.listener),
		}
	}

	/// The node the listener was registered on.
	pub fn target(&self) -> &Node {
		&self.target
	}

	/// The event type.
	pub fn event(&self) -> &str {
		&self.event
	}
}

impl fmt::Debug for AutoListener {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AutoListener")
			.field("target", &self.target)
			.field("event", &self.event)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn target() -> Node {
		Node::element("button")
	}

	#[rstest]
	fn test_same_triple_is_recorded_once(target: Node) {
		let ledger = EventLedger::new();
		let listener = EventListener::new(|_| {});

		assert!(ledger.add(&target, "click", &listener).is_some());
		assert!(ledger.add(&target, "click", &listener).is_none());

		assert_eq!(ledger.len(), 1);
		assert_eq!(target.listener_count("click"), 1);
	}

	#[rstest]
	fn test_distinct_triples_are_recorded(target: Node) {
		let ledger = EventLedger::new();
		let other = Node::element("input");
		let first = EventListener::new(|_| {});
		let second = EventListener::new(|_| {});

		ledger.add(&target, "click", &first);
		ledger.add(&target, "click", &second);
		ledger.add(&target, "focus", &first);
		ledger.add(&other, "click", &first);

		assert_eq!(ledger.len(), 4);
		assert_eq!(ledger.drain(), 4);
		assert!(ledger.is_empty());
		assert_eq!(target.listener_count("click"), 0);
		assert_eq!(target.listener_count("focus"), 0);
		assert_eq!(other.listener_count("click"), 0);
	}

	#[rstest]
	fn test_remove_missing_entry_is_noop(target: Node) {
		let ledger = EventLedger::new();
		let listener = EventListener::new(|_| {});

		assert!(!ledger.remove(&target, "click", &listener));

		ledger.add(&target, "click", &listener);
		assert!(ledger.remove(&target, "click", &listener));
		assert!(!ledger.remove(&target, "click", &listener));
		assert_eq!(target.listener_count("click"), 0);
	}

	#[rstest]
	fn test_auto_listener_detach(target: Node) {
		let ledger = EventLedger::new();
		let listener = EventListener::new(|_| {});
		let handle = ledger.add(&target, "click", &listener).unwrap();
		assert_eq!(handle.event(), "click");
		assert_eq!(handle.target(), &target);

		assert!(handle.detach());
		assert!(ledger.is_empty());
		assert_eq!(target.listener_count("click"), 0);
	}

	#[rstest]
	fn test_auto_listener_after_drain(target: Node) {
		let ledger = EventLedger::new();
		let listener = EventListener::new(|_| {});
		let handle = ledger.add(&target, "click", &listener).unwrap();

		ledger.drain();
		assert!(!handle.detach());
	}
}
