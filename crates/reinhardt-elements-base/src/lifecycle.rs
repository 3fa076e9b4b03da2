//! Lifecycle controller.
//!
//! The host environment drives an element through three callbacks:
//!
//! | Callback | When |
//! |----------|------|
//! | [`connected_callback`](Element::connected_callback) | inserted into a document |
//! | [`disconnected_callback`](Element::disconnected_callback) | removed from a document |
//! | [`attribute_changed_callback`](Element::attribute_changed_callback) | an observed attribute changed |
//!
//! Initial property values are applied on the first attach only. Re-attaching
//! a detached element runs the `attached` hooks again and nothing else.

use std::mem;
use std::rc::Rc;

use reinhardt_elements_core::{
	PropertyKind, RawValue, dashes_to_camel_case, debug_log, error_log,
};

use crate::element::{CustomElement, Element};
use crate::error::ElementError;

/// Where an element is in its mount cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
	/// Constructed, never attached.
	Unattached,
	/// In a live document.
	Attached,
	/// Removed after having been attached. May be attached again.
	Detached,
}

type AttachedFn<C> = Box<dyn FnOnce(&mut Element<C>)>;

/// Storage for the `on_attached` hook, which fires at most once.
pub(crate) enum AttachedHook<C> {
	Waiting(Option<AttachedFn<C>>),
	Fired,
}

impl<C> Default for AttachedHook<C> {
	fn default() -> Self {
		Self::Waiting(None)
	}
}

pub(crate) type DetachedHook<C> = Rc<dyn Fn(&mut Element<C>)>;

impl<C: CustomElement> Element<C> {
	/// Returns the lifecycle state.
	pub fn state(&self) -> LifecycleState {
		self.state
	}

	/// Host callback: the element was inserted into a document.
	///
	/// On the first attach every property gets its initial value. A property
	/// whose value cannot be coerced is logged, set to its default, and
	/// reported in an [`ElementError::Initialization`] returned after all
	/// other properties and both attach hooks have run.
	pub fn connected_callback(&mut self) -> Result<(), ElementError> {
		if self.state == LifecycleState::Attached {
			debug_log!("<{}> is already attached", self.is());
			return Ok(());
		}
		self.state = LifecycleState::Attached;
		self.ensure_quick_access();

		let failures = if self.initialized {
			Vec::new()
		} else {
			self.initialized = true;
			self.apply_initial_values()
		};

		C::attached(self);
		if let AttachedHook::Waiting(Some(hook)) =
			mem::replace(&mut self.on_attached, AttachedHook::Fired)
		{
			hook(self);
		}

		if failures.is_empty() {
			Ok(())
		} else {
			Err(ElementError::Initialization {
				tag: self.is().to_string(),
				failures,
			})
		}
	}

	/// Host callback: the element was removed from its document.
	///
	/// Runs the `detached` hooks, then removes every listener in the ledger.
	pub fn disconnected_callback(&mut self) {
		if self.state != LifecycleState::Attached {
			debug_log!("<{}> is not attached", self.is());
			return;
		}
		self.state = LifecycleState::Detached;

		C::detached(self);
		if let Some(hook) = self.on_detached.clone() {
			hook(self);
		}

		let removed = self.ledger.drain();
		debug_log!("<{}> removed {} auto listener(s)", self.is(), removed);
	}

	/// Host callback: an observed attribute changed.
	///
	/// `old` and `new` are `None` when the attribute is absent. Boolean
	/// properties compare presence rather than text, so `""` and `"true"`
	/// are the same value.
	pub fn attribute_changed_callback(
		&mut self,
		attribute: &str,
		old: Option<&str>,
		new: Option<&str>,
	) -> Result<(), ElementError> {
		let name = dashes_to_camel_case(attribute);
		self.ensure_quick_access();

		let definition = Rc::clone(&self.definition);
		let Some(entry) = definition.properties.get(&name) else {
			debug_log!("<{}> ignores undeclared attribute {}", self.is(), attribute);
			return Ok(());
		};

		let raw = if entry.property().kind() == PropertyKind::Boolean {
			let (old, new) = (is_present(old), is_present(new));
			if old == new {
				return Ok(());
			}
			RawValue::Boolean(new)
		} else {
			if old == new {
				return Ok(());
			}
			RawValue::from(new)
		};

		if !self.initialized {
			self.store.set_pending(entry.name(), raw);
			return Ok(());
		}
		self.assign(entry, raw)
	}

	/// Assigns the `on_attached` hook.
	///
	/// Before the first attach the hook is stored and fires once during it.
	/// Afterwards it is called immediately.
	pub fn set_on_attached<F>(&mut self, hook: F)
	where
		F: FnOnce(&mut Element<C>) + 'static,
	{
		if matches!(self.on_attached, AttachedHook::Fired) {
			hook(self);
		} else {
			self.on_attached = AttachedHook::Waiting(Some(Box::new(hook)));
		}
	}

	/// Assigns the `on_detached` hook, which fires on every detach.
	pub fn set_on_detached<F>(&mut self, hook: F)
	where
		F: Fn(&mut Element<C>) + 'static,
	{
		self.on_detached = Some(Rc::new(hook));
	}

	/// Removes the `on_detached` hook.
	pub fn clear_on_detached(&mut self) {
		self.on_detached = None;
	}

	/// Applies every property's initial value in declaration order.
	///
	/// For each property the host attribute wins if it is present and the
	/// property reflects or was not assigned before attach. Otherwise a
	/// pre-attach value of the declared kind wins. Otherwise the default, or
	/// the kind's zero value, applies.
	fn apply_initial_values(&mut self) -> Vec<ElementError> {
		let definition = Rc::clone(&self.definition);
		let mut failures = Vec::new();

		for entry in definition.properties.iter() {
			let property = entry.property();
			let kind = property.kind();

			let pending = self.store.take_pending(entry.name()).filter(|raw| {
				let usable = raw.kind() == Some(kind);
				if !usable {
					debug_log!(
						"<{}> ignores pre-attach value of {} for {} property {}",
						definition.tag,
						raw.kind().map_or("null", |k| k.as_str()),
						kind,
						entry.name()
					);
				}
				usable
			});
			let attribute = self.host.get_attribute(entry.attribute());

			let value = match (attribute, pending) {
				(Some(text), None) => kind.from_attribute(&text),
				(Some(text), Some(_)) if property.reflects() => kind.from_attribute(&text),
				(_, Some(raw)) => kind.coerce(raw),
				(None, None) => property.initial_value(),
			};

			match value {
				Ok(value) => self.commit(entry, value),
				Err(source) => {
					let error = ElementError::MalformedAttributeValue {
						property: entry.name().to_string(),
						source,
					};
					error_log!("<{}> {}", definition.tag, error);
					failures.push(error);
					let fallback = property
						.initial_value()
						.unwrap_or_else(|_| kind.zero_value());
					self.commit(entry, fallback);
				}
			}
		}

		failures
	}
}

/// Presence rule for boolean attributes: absent or `"false"` is false.
fn is_present(value: Option<&str>) -> bool {
	value.is_some_and(|text| text != "false")
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(None, false)]
	#[case(Some(""), true)]
	#[case(Some("true"), true)]
	#[case(Some("0"), true)]
	#[case(Some("false"), false)]
	fn test_presence_rule(#[case] value: Option<&str>, #[case] expected: bool) {
		assert_eq!(is_present(value), expected);
	}
}
