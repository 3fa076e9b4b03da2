//! Integration tests for a complete sample component
//!
//! `<my-element>` exercises the whole base together: a styled template, a
//! reflected property with a direct observer, quick access, selector queries
//! and an auto listener that must disappear on detach.
//!
//! Test Categories:
//! - Happy Path: 3 tests
//! - State Transitions: 1 test

use reinhardt_elements_base::prelude::*;
use rstest::*;

// ============================================================================
// Test Component
// ============================================================================

#[derive(Default)]
struct MyElement;

impl MyElement {
	fn log(element: &Element<Self>, line: &str) {
		if let Some(output) = element.quick_access().and_then(|qa| qa.get("output")) {
			output.set_text_content(&format!("{}{}\n", output.text_content(), line));
		}
	}
}

impl CustomElement for MyElement {
	const TAG: &'static str = "my-element";

	fn template() -> &'static str {
		r#"
			<style>
				.exampleElement {
					display: flex;
					flex-direction: column;
				}
				#output {
					overflow: auto;
				}
			</style>
			<!-- content -->
			<div class="exampleElement">
				<span></span>
				<span></span>
				<span></span>
				<span></span>
			</div>
			<input id="exampleInput">
			<pre id="output"></pre>
		"#
	}

	fn properties() -> Properties<Self> {
		Properties::new().with(
			"propertyName",
			Property::string()
				.default_value("value")
				.reflect_to_attribute(true)
				.observer(Observer::direct(|element: &mut Element<Self>, value, old| {
					let old = old.map_or_else(|| "undefined".to_string(), ToString::to_string);
					let line = format!(
						"The component property 'propertyName' for web component {}, was changed from {} to {}",
						element.is(),
						old,
						value
					);
					MyElement::log(element, &line);
				})),
		)
	}

	fn attached(element: &mut Element<Self>) {
		let Some(input) = element
			.quick_access()
			.and_then(|qa| qa.get("exampleInput"))
			.cloned()
		else {
			return;
		};
		let Ok(spans) = element.query_all(".exampleElement span") else {
			return;
		};
		let Some(output) = element.quick_access().and_then(|qa| qa.get("output")).cloned() else {
			return;
		};

		let on_change = EventListener::new({
			let input = input.clone();
			move |_| {
				let value = input.get_attribute("value").unwrap_or_default();
				output.set_text_content(&format!(
					"{}The input has changed to {}\n",
					output.text_content(),
					value
				));
				for (index, span) in spans.iter().enumerate() {
					span.set_text_content(&format!("{} - {}", value, index));
				}
			}
		});
		element.add_auto_event_listener(&input, "change", &on_change);

		let line = format!("web component {} was attached to the DOM", element.is());
		MyElement::log(element, &line);

		if let Ok(Some(container)) = element.query(".exampleElement") {
			container.set_attribute("style", "border: 1px solid red");
		}
		if let Ok(spans) = element.query_all(".exampleElement span") {
			for (index, span) in spans.iter().enumerate() {
				let color = if index % 2 == 1 { "green" } else { "blue" };
				span.set_attribute("style", &format!("background-color: {}", color));
			}
		}
	}
}

// ============================================================================
// Fixtures
// ============================================================================

#[fixture]
fn element() -> Element<MyElement> {
	let mut registry = ElementRegistry::new();
	registry.define::<MyElement>().unwrap();
	registry.create::<MyElement>().unwrap()
}

fn output(element: &Element<MyElement>) -> String {
	element.query("#output").unwrap().unwrap().text_content()
}

fn fire_change(element: &Element<MyElement>, value: &str) -> Node {
	let input = element.query("#exampleInput").unwrap().unwrap();
	input.set_attribute("value", value);
	input.dispatch_event(&Event::new("change"));
	input
}

// ============================================================================
// Happy Path Tests
// ============================================================================

#[rstest]
fn test_attach_renders_and_reflects(mut element: Element<MyElement>) {
	element.connected_callback().unwrap();

	assert_eq!(
		output(&element),
		"The component property 'propertyName' for web component my-element, was changed from undefined to value\n\
		 web component my-element was attached to the DOM\n"
	);
	assert_eq!(
		element.host().get_attribute("property-name").as_deref(),
		Some("value")
	);

	let spans = element.query_all(".exampleElement span").unwrap();
	assert_eq!(spans.len(), 4);
	assert_eq!(
		spans[1].get_attribute("style").as_deref(),
		Some("background-color: green")
	);
	assert!(element.query("style").unwrap().is_some());
}

#[rstest]
fn test_property_change_is_observed(mut element: Element<MyElement>) {
	element.connected_callback().unwrap();

	element.set("propertyName", "updated").unwrap();
	element.set_attribute("property-name", "from attribute").unwrap();

	let text = output(&element);
	assert!(text.contains("was changed from value to updated\n"));
	assert!(text.ends_with("was changed from updated to from attribute\n"));
	assert_eq!(
		element.get("propertyName"),
		Some(&PropertyValue::String("from attribute".to_string()))
	);
}

#[rstest]
fn test_change_listener_updates_spans(mut element: Element<MyElement>) {
	element.connected_callback().unwrap();

	fire_change(&element, "hello");

	let texts: Vec<String> = element
		.query_all(".exampleElement span")
		.unwrap()
		.iter()
		.map(Node::text_content)
		.collect();
	assert_eq!(texts, vec!["hello - 0", "hello - 1", "hello - 2", "hello - 3"]);
	assert!(output(&element).ends_with("The input has changed to hello\n"));
}

// ============================================================================
// State Transitions Tests
// ============================================================================

#[rstest]
fn test_detach_removes_change_listener(mut element: Element<MyElement>) {
	element.connected_callback().unwrap();
	element.disconnected_callback();

	let input = fire_change(&element, "ignored");

	assert_eq!(input.listener_count("change"), 0);
	assert!(!output(&element).contains("ignored"));
}
