//! Settings flow from a configuration file into every defined element

use reinhardt_elements::prelude::*;
use rstest::*;

#[derive(Default)]
struct Panel;

impl CustomElement for Panel {
	const TAG: &'static str = "settings-panel";

	fn template() -> &'static str {
		r#"<section data-ref="body-text"></section><footer id="footer"></footer>"#
	}

	fn properties() -> Properties<Self> {
		Properties::new().with("open", Property::boolean().reflect_to_attribute(true))
	}
}

#[rstest]
fn test_toml_settings_drive_quick_access() {
	let settings = ElementSettings::from_toml_str(r#"quick_access_attribute = "data-ref""#).unwrap();
	let mut registry = ElementRegistry::with_settings(settings);
	registry.define::<Panel>().unwrap();

	let mut panel = registry.create::<Panel>().unwrap();
	panel.connected_callback().unwrap();

	let index = panel.quick_access().unwrap();
	assert!(index.contains_key("bodyText"));
	assert!(!index.contains_key("footer"));
}

#[rstest]
fn test_boolean_reflection_through_facade() {
	let mut registry = ElementRegistry::default();
	registry.define::<Panel>().unwrap();
	let mut panel = registry.create::<Panel>().unwrap();
	panel.connected_callback().unwrap();

	panel.set("open", true).unwrap();
	assert_eq!(panel.host().get_attribute("open").as_deref(), Some(""));

	panel.set("open", false).unwrap();
	assert!(!panel.host().has_attribute("open"));
	assert_eq!(panel.state(), LifecycleState::Attached);
}
