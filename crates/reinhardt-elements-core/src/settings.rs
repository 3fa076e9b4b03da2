//! Element settings.
//!
//! Settings are shared by every element created through one registry. They
//! can be built in code or loaded from TOML or JSON:
//!
//! ```toml
//! quick_access_attribute = "data-ref"
//! validate_tag_names = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Default marker attribute for the quick-access index.
pub const DEFAULT_QUICK_ACCESS_ATTRIBUTE: &str = "id";

/// Settings applied to element definitions and instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementSettings {
	/// Attribute whose values key the quick-access index (`$`).
	pub quick_access_attribute: String,
	/// Reject definitions whose tag is not a valid custom element name.
	pub validate_tag_names: bool,
}

impl Default for ElementSettings {
	fn default() -> Self {
		Self {
			quick_access_attribute: DEFAULT_QUICK_ACCESS_ATTRIBUTE.to_string(),
			validate_tag_names: true,
		}
	}
}

impl ElementSettings {
	/// Creates the default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the quick-access marker attribute.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_elements_core::ElementSettings;
	///
	/// let settings = ElementSettings::new().with_quick_access_attribute("name");
	/// assert_eq!(settings.quick_access_attribute, "name");
	/// ```
	pub fn with_quick_access_attribute(mut self, attribute: impl Into<String>) -> Self {
		self.quick_access_attribute = attribute.into();
		self
	}

	/// Enables or disables tag name validation.
	pub fn with_tag_validation(mut self, enabled: bool) -> Self {
		self.validate_tag_names = enabled;
		self
	}

	/// Loads settings from TOML text. Missing keys keep their defaults.
	pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(text)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Loads settings from JSON text. Missing keys keep their defaults.
	pub fn from_json_str(text: &str) -> Result<Self, SettingsError> {
		let settings: Self = serde_json::from_str(text)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Checks that every setting is usable.
	pub fn validate(&self) -> Result<(), SettingsError> {
		let attribute = &self.quick_access_attribute;
		if attribute.is_empty() {
			return Err(SettingsError::Invalid {
				name: "quick_access_attribute",
				reason: "must not be empty".to_string(),
			});
		}
		if attribute
			.chars()
			.any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '>' | '/' | '='))
		{
			return Err(SettingsError::Invalid {
				name: "quick_access_attribute",
				reason: format!("{:?} is not a valid attribute name", attribute),
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let settings = ElementSettings::default();
		assert_eq!(settings.quick_access_attribute, "id");
		assert!(settings.validate_tag_names);
	}

	#[rstest]
	fn test_from_toml_keeps_missing_defaults() {
		let settings = ElementSettings::from_toml_str(r#"quick_access_attribute = "name""#).unwrap();
		assert_eq!(settings.quick_access_attribute, "name");
		assert!(settings.validate_tag_names);
	}

	#[rstest]
	fn test_from_json() {
		let settings =
			ElementSettings::from_json_str(r#"{"validate_tag_names": false}"#).unwrap();
		assert_eq!(settings.quick_access_attribute, "id");
		assert!(!settings.validate_tag_names);
	}

	#[rstest]
	#[case(r#"quick_access_attribute = """#)]
	#[case(r#"quick_access_attribute = "data ref""#)]
	fn test_invalid_attribute_is_rejected(#[case] text: &str) {
		let err = ElementSettings::from_toml_str(text).unwrap_err();
		assert!(matches!(
			err,
			SettingsError::Invalid {
				name: "quick_access_attribute",
				..
			}
		));
	}

	#[rstest]
	fn test_malformed_toml() {
		let err = ElementSettings::from_toml_str("quick_access_attribute = ").unwrap_err();
		assert!(matches!(err, SettingsError::Toml(_)));
	}
}
