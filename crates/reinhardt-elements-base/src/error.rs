//! Errors raised by element definitions and instances.

use reinhardt_elements_core::{CoercionError, PropertyKind};
use reinhardt_elements_dom::DomError;

/// Error type for element registration, lifecycle and property access.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ElementError {
	/// A value could not be coerced into its property's kind.
	///
	/// Nothing is stored when a setter fails this way.
	#[error("Malformed value for property `{property}`: {source}")]
	MalformedAttributeValue {
		/// The property name.
		property: String,
		/// The coercion failure.
		#[source]
		source: CoercionError,
	},

	/// The component type is not usable, e.g. it never declared its tag.
	#[error("Misconfigured component <{tag}>: {reason}")]
	MisconfiguredComponent {
		/// The declared tag.
		tag: String,
		/// What is wrong with the declaration.
		reason: String,
	},

	/// The tag is already registered.
	#[error("Element <{0}> is already defined")]
	AlreadyDefined(String),

	/// The tag is not registered for this component type.
	#[error("Element <{0}> is not defined")]
	NotDefined(String),

	/// An upgrade was attempted on a host with another tag.
	#[error("Cannot upgrade <{found}> as <{expected}>")]
	TagMismatch {
		/// The component's tag.
		expected: String,
		/// The host's tag.
		found: String,
	},

	/// The component declares no property with this name.
	#[error("<{tag}> has no property named `{property}`")]
	UnknownProperty {
		/// The component's tag.
		tag: String,
		/// The requested name.
		property: String,
	},

	/// A typed key does not match the declared kind of its property.
	#[error("<{tag}> property `{property}` is {expected}, not {found}")]
	KindMismatch {
		/// The component's tag.
		tag: String,
		/// The property name.
		property: String,
		/// The declared kind.
		expected: PropertyKind,
		/// The kind of the typed key.
		found: PropertyKind,
	},

	/// One or more properties failed while applying initial values.
	///
	/// Every other property and every attach hook still ran; the failed
	/// properties hold their default values.
	#[error("<{tag}> failed to initialize {} propert(ies)", .failures.len())]
	Initialization {
		/// The component's tag.
		tag: String,
		/// One error per failed property, in declaration order.
		failures: Vec<ElementError>,
	},

	/// The host tree rejected an operation.
	#[error(transparent)]
	Dom(#[from] DomError),
}

impl ElementError {
	/// Returns the property name for property-scoped errors.
	pub fn property(&self) -> Option<&str> {
		match self {
			Self::MalformedAttributeValue { property, .. }
			| Self::UnknownProperty { property, .. }
			| Self::KindMismatch { property, .. } => Some(property),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reinhardt_elements_core::RawValue;
	use rstest::rstest;

	#[rstest]
	fn test_malformed_value_keeps_source() {
		let source = PropertyKind::Object
			.coerce(RawValue::from("{oops"))
			.unwrap_err();
		let err = ElementError::MalformedAttributeValue {
			property: "config".to_string(),
			source,
		};

		assert_eq!(err.property(), Some("config"));
		assert!(err.to_string().starts_with("Malformed value for property `config`"));
		assert!(std::error::Error::source(&err).is_some());
	}

	#[rstest]
	fn test_initialization_message_counts_failures() {
		let err = ElementError::Initialization {
			tag: "x-a".to_string(),
			failures: vec![ElementError::UnknownProperty {
				tag: "x-a".to_string(),
				property: "p".to_string(),
			}],
		};
		assert_eq!(err.to_string(), "<x-a> failed to initialize 1 propert(ies)");
		assert_eq!(err.property(), None);
	}

	#[rstest]
	fn test_kind_mismatch_message() {
		let err = ElementError::KindMismatch {
			tag: "x-a".to_string(),
			property: "count".to_string(),
			expected: PropertyKind::Number,
			found: PropertyKind::Boolean,
		};
		assert_eq!(err.to_string(), "<x-a> property `count` is Number, not Boolean");
		assert_eq!(err.property(), Some("count"));
	}

	#[rstest]
	fn test_dom_errors_convert() {
		let err: ElementError = DomError::NotFound.into();
		assert!(matches!(err, ElementError::Dom(DomError::NotFound)));
	}
}
