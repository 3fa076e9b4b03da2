//! Reinhardt Elements Core
//!
//! Building blocks shared by every Reinhardt custom element:
//!
//! - [`case`]: conversion between dashed attribute names and camelCase property names
//! - [`value`]: property kinds, typed property values and attribute coercion
//! - [`error`]: coercion errors and configuration warnings
//! - [`settings`]: element settings loadable from TOML or JSON
//! - [`logging`]: logging macros that work on WASM and native targets
//!
//! ## Example
//!
//! ```
//! use reinhardt_elements_core::{PropertyKind, RawValue, camel_case_to_dashes};
//!
//! assert_eq!(camel_case_to_dashes("stringDefault"), "string-default");
//!
//! let value = PropertyKind::Number.coerce(RawValue::from("42")).unwrap();
//! assert_eq!(value.as_number(), Some(42.0));
//! ```

#![warn(missing_docs)]

pub mod case;
pub mod error;
pub mod logging;
pub mod settings;
pub mod value;

pub use case::{camel_case_to_dashes, dashes_to_camel_case};
pub use error::{CoercionError, ConfigurationWarning, SettingsError};
pub use settings::ElementSettings;
pub use value::{JsonMap, PropertyKind, PropertyValue, RawValue};

/// Re-exports used by the exported logging macros.
#[doc(hidden)]
pub mod __private {
	pub use tracing;

	#[cfg(target_arch = "wasm32")]
	pub use web_sys;
}
