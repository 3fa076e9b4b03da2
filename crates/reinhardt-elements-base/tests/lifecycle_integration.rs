//! Lifecycle and registry integration tests
//!
//! Success Criteria:
//! 1. Hooks run in order: initial values, `attached`, `on_attached`
//! 2. `on_attached` fires once, later assignments run immediately
//! 3. Detach removes every auto listener
//! 4. Definitions validate tags and expose observed attributes
//! 5. Upgrades deliver existing attributes
//!
//! Test Categories:
//! - Happy Path: 3 tests
//! - Error Path: 4 tests
//! - State Transitions: 3 tests
//! - Edge Cases: 3 tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use reinhardt_elements_base::LifecycleState;
use reinhardt_elements_base::prelude::*;
use reinhardt_elements_core::ElementSettings;
use rstest::*;

// ============================================================================
// Test Components
// ============================================================================

#[derive(Default)]
struct Tracked {
	log: Vec<String>,
}

impl CustomElement for Tracked {
	const TAG: &'static str = "tracked-element";

	fn template() -> &'static str {
		r#"<template><button id="main-button">go</button><ul><li class="item"></li><li class="item"></li></ul></template>"#
	}

	fn properties() -> Properties<Self> {
		Properties::new()
			.with(
				"label",
				Property::string().observer(Observer::direct(
					|element: &mut Element<Self>, value, _old| {
						element.log.push(format!("label={}", value));
					},
				)),
			)
			.with("maxItems", Property::number().default_value(3))
	}

	fn attached(element: &mut Element<Self>) {
		element.log.push("attached".to_string());
	}

	fn detached(element: &mut Element<Self>) {
		element.log.push("detached".to_string());
	}
}

#[derive(Default)]
struct Unnamed;

impl CustomElement for Unnamed {}

#[derive(Default)]
struct NoDash;

impl CustomElement for NoDash {
	const TAG: &'static str = "nodash";
}

// ============================================================================
// Fixtures
// ============================================================================

#[fixture]
fn registry() -> ElementRegistry {
	let mut registry = ElementRegistry::new();
	registry.define::<Tracked>().unwrap();
	registry
}

#[fixture]
fn element(registry: ElementRegistry) -> Element<Tracked> {
	registry.create::<Tracked>().unwrap()
}

// ============================================================================
// Happy Path Tests
// ============================================================================

/// Success Criterion 1
#[rstest]
fn test_attach_order(mut element: Element<Tracked>) {
	element.set_on_attached(|element| element.log.push("on_attached".to_string()));

	element.connected_callback().unwrap();

	assert_eq!(element.log, vec!["label=", "attached", "on_attached"]);
	assert_eq!(element.state(), LifecycleState::Attached);
	assert_eq!(element.get("maxItems"), Some(&PropertyValue::Number(3.0)));
}

/// The quick-access index and query helpers cover the shadow root
#[rstest]
fn test_shadow_root_queries(mut element: Element<Tracked>) {
	assert!(element.quick_access().is_none());
	element.connected_callback().unwrap();

	let button = element.quick_access().unwrap().get("mainButton").cloned();
	assert_eq!(button.map(|node| node.text_content()), Some("go".to_string()));
	assert_eq!(element.query_all(".item").unwrap().len(), 2);
	assert!(element.query("ul > .item").unwrap().is_some());
	assert!(element.query("span").unwrap().is_none());
	assert!(matches!(element.query("[oops"), Err(ElementError::Dom(_))));
}

/// Manual edits need an explicit refresh
#[rstest]
fn test_refresh_quick_access(mut element: Element<Tracked>) {
	element.connected_callback().unwrap();
	let extra = Node::element("span");
	extra.set_attribute("id", "late-comer");
	element.shadow_root().append_child(&extra).unwrap();

	assert!(!element.quick_access().unwrap().contains_key("lateComer"));
	assert!(element.refresh_quick_access().contains_key("lateComer"));
	assert!(element.quick_access().unwrap().contains_key("lateComer"));
}

// ============================================================================
// State Transitions Tests
// ============================================================================

/// Success Criterion 2
#[rstest]
fn test_on_attached_fires_once(mut element: Element<Tracked>) {
	let calls = Rc::new(RefCell::new(Vec::new()));
	element.set_on_attached({
		let calls = calls.clone();
		move |_| calls.borrow_mut().push("stored")
	});

	element.connected_callback().unwrap();
	element.disconnected_callback();
	element.connected_callback().unwrap();
	assert_eq!(*calls.borrow(), vec!["stored"]);

	element.set_on_attached({
		let calls = calls.clone();
		move |_| calls.borrow_mut().push("immediate")
	});
	assert_eq!(*calls.borrow(), vec!["stored", "immediate"]);
}

/// Re-attaching runs hooks again but keeps property values
#[rstest]
fn test_reattach_does_not_reapply(mut element: Element<Tracked>) {
	let detaches = Rc::new(Cell::new(0));
	element.set_on_detached({
		let detaches = detaches.clone();
		move |_| detaches.set(detaches.get() + 1)
	});

	element.connected_callback().unwrap();
	element.set("maxItems", 10).unwrap();
	element.disconnected_callback();
	assert_eq!(element.state(), LifecycleState::Detached);
	element.connected_callback().unwrap();
	element.disconnected_callback();

	assert_eq!(element.get("maxItems"), Some(&PropertyValue::Number(10.0)));
	assert_eq!(detaches.get(), 2);
	assert_eq!(
		element.log,
		vec!["label=", "attached", "detached", "attached", "detached"]
	);
}

/// Duplicate notifications are ignored
#[rstest]
fn test_duplicate_callbacks_are_noops(mut element: Element<Tracked>) {
	element.disconnected_callback();
	assert_eq!(element.state(), LifecycleState::Unattached);

	element.connected_callback().unwrap();
	element.connected_callback().unwrap();
	assert_eq!(element.log, vec!["label=", "attached"]);
}

// ============================================================================
// Edge Cases Tests
// ============================================================================

/// Success Criterion 3
#[rstest]
fn test_auto_listeners_are_drained_on_detach(mut element: Element<Tracked>) {
	let target = Node::element("button");
	let hits = Rc::new(Cell::new(0));
	let listener = EventListener::new({
		let hits = hits.clone();
		move |_| hits.set(hits.get() + 1)
	});
	let other = EventListener::new(|_| {});

	element.connected_callback().unwrap();
	assert!(element.add_auto_event_listener(&target, "click", &listener).is_some());
	assert!(element.add_auto_event_listener(&target, "click", &listener).is_none());
	assert!(element.add_auto_event_listener(&target, "focus", &other).is_some());
	assert_eq!(element.ledger().len(), 2);

	target.dispatch_event(&Event::new("click"));
	assert_eq!(hits.get(), 1);

	element.disconnected_callback();
	assert!(element.ledger().is_empty());
	assert_eq!(target.listener_count("click"), 0);
	assert_eq!(target.listener_count("focus"), 0);

	target.dispatch_event(&Event::new("click"));
	assert_eq!(hits.get(), 1);
}

#[rstest]
fn test_remove_auto_event_listener(element: Element<Tracked>) {
	let target = Node::element("input");
	let listener = EventListener::new(|_| {});

	assert!(!element.remove_auto_event_listener(&target, "change", &listener));

	let handle = element
		.add_auto_event_listener(&target, "change", &listener)
		.unwrap();
	assert!(element.remove_auto_event_listener(&target, "change", &listener));
	assert!(!handle.detach());
	assert_eq!(target.listener_count("change"), 0);
}

/// Attributes that no property declares are ignored
#[rstest]
fn test_undeclared_attribute_is_ignored(mut element: Element<Tracked>) {
	element.connected_callback().unwrap();

	element
		.attribute_changed_callback("data-extra", None, Some("1"))
		.unwrap();
	element.set_attribute("max-items", "7").unwrap();

	assert_eq!(element.get("dataExtra"), None);
	assert_eq!(element.get("maxItems"), Some(&PropertyValue::Number(7.0)));
}

// ============================================================================
// Error Path Tests
// ============================================================================

/// Success Criterion 4
#[rstest]
fn test_observed_attributes(registry: ElementRegistry) {
	assert!(registry.is_defined("tracked-element"));
	assert_eq!(
		registry.observed_attributes("tracked-element"),
		Some(&["label".to_string(), "max-items".to_string()][..])
	);
	assert_eq!(registry.observed_attributes("unknown-element"), None);
}

/// Success Criterion 4: components must declare a valid tag
#[rstest]
fn test_misconfigured_components(mut registry: ElementRegistry) {
	assert!(matches!(
		registry.define::<Unnamed>(),
		Err(ElementError::MisconfiguredComponent { .. })
	));
	assert!(matches!(
		registry.define::<NoDash>(),
		Err(ElementError::MisconfiguredComponent { .. })
	));
	assert!(matches!(
		registry.define::<Tracked>(),
		Err(ElementError::AlreadyDefined(ref tag)) if tag == "tracked-element"
	));
	assert!(matches!(
		registry.create::<NoDash>(),
		Err(ElementError::NotDefined(_))
	));
}

#[rstest]
fn test_tag_validation_can_be_disabled() {
	let mut registry =
		ElementRegistry::with_settings(ElementSettings::new().with_tag_validation(false));

	registry.define::<NoDash>().unwrap();
	assert!(matches!(
		registry.define::<Unnamed>(),
		Err(ElementError::MisconfiguredComponent { .. })
	));
}

/// Success Criterion 5
#[rstest]
fn test_upgrade(registry: ElementRegistry) {
	let host = Node::element("tracked-element");
	host.set_attribute("label", "from markup");

	let mut element = registry.upgrade(&host, Tracked::default()).unwrap();
	element.connected_callback().unwrap();

	assert_eq!(element.host(), &host);
	assert_eq!(
		element.get("label"),
		Some(&PropertyValue::String("from markup".to_string()))
	);

	let wrong = Node::element("other-element");
	assert!(matches!(
		registry.upgrade(&wrong, Tracked::default()),
		Err(ElementError::TagMismatch { .. })
	));
	assert!(matches!(
		registry.upgrade(&host, Tracked::default()),
		Err(ElementError::Dom(_))
	));
}

/// The quick-access marker attribute is configurable
#[rstest]
fn test_quick_access_attribute_setting() {
	let mut registry = ElementRegistry::with_settings(
		ElementSettings::new().with_quick_access_attribute("class"),
	);
	registry.define::<Tracked>().unwrap();
	let mut element = registry.create::<Tracked>().unwrap();

	element.connected_callback().unwrap();

	let index = element.quick_access().unwrap();
	assert!(index.contains_key("item"));
	assert!(!index.contains_key("mainButton"));
}
