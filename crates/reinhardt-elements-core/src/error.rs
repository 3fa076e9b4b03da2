//! Error and diagnostic types shared by all element crates.

use std::fmt;

use crate::value::PropertyKind;

/// Failure to coerce a raw value into its declared kind.
///
/// Only Object and Array kinds can fail, and only when handed text.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CoercionError {
	/// The text is not valid JSON.
	#[error("{kind} value is not valid JSON: {text:?}")]
	MalformedJson {
		/// The declared kind.
		kind: PropertyKind,
		/// The offending text.
		text: String,
		/// The underlying parse error.
		#[source]
		source: serde_json::Error,
	},

	/// The text is valid JSON but not of the declared shape.
	#[error("{kind} value has the wrong JSON shape: {text:?}")]
	UnexpectedShape {
		/// The declared kind.
		kind: PropertyKind,
		/// The offending text.
		text: String,
	},
}

impl CoercionError {
	/// Returns the kind that failed to coerce.
	pub fn kind(&self) -> PropertyKind {
		match self {
			Self::MalformedJson { kind, .. } | Self::UnexpectedShape { kind, .. } => *kind,
		}
	}

	/// Returns the text that failed to coerce.
	pub fn text(&self) -> &str {
		match self {
			Self::MalformedJson { text, .. } | Self::UnexpectedShape { text, .. } => text,
		}
	}
}

/// Error raised while loading [`ElementSettings`](crate::ElementSettings).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	/// TOML input could not be parsed.
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	/// JSON input could not be parsed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// A setting has an unusable value.
	#[error("Invalid setting `{name}`: {reason}")]
	Invalid {
		/// Setting name.
		name: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
}

/// Non-fatal diagnostic: a property names an observer method that the
/// component does not provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationWarning {
	/// Tag name of the component.
	pub tag: String,
	/// The property whose observer could not be resolved.
	pub property: String,
	/// The observer method name.
	pub observer: String,
}

impl fmt::Display for ConfigurationWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"The observer with the name '{}' (property '{}') was not found for web component {}. \
			 Make sure the component resolves '{}' in `observer_method`.",
			self.observer, self.property, self.tag, self.observer
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::value::RawValue;
	use rstest::rstest;

	#[rstest]
	fn test_coercion_error_accessors() {
		let err = PropertyKind::Array
			.coerce(RawValue::from("nope"))
			.unwrap_err();
		assert_eq!(err.kind(), PropertyKind::Array);
		assert_eq!(err.text(), "nope");
		assert!(err.to_string().contains("Array value is not valid JSON"));
	}

	#[rstest]
	fn test_configuration_warning_display() {
		let warning = ConfigurationWarning {
			tag: "my-element".to_string(),
			property: "count".to_string(),
			observer: "countChanged".to_string(),
		};
		let message = warning.to_string();
		assert!(message.contains("'countChanged'"));
		assert!(message.contains("my-element"));
	}
}
