//! Property kinds, property values and attribute coercion.
//!
//! Every declared property has a [`PropertyKind`]. Incoming values arrive as a
//! [`RawValue`] (anything a caller may assign, including attribute strings) and
//! are coerced into a [`PropertyValue`] that is always of the declared kind.
//!
//! | Kind | From string | From native | To attribute |
//! |------|-------------|-------------|--------------|
//! | String | identity | JavaScript `String(v)`, null is `''` | raw string |
//! | Number | JavaScript `Number(v)`, NaN is `0` | same | JavaScript `String(v)` |
//! | Boolean | non-empty and not `"false"` | truthy and not `"false"` | `""` when true |
//! | Object | JSON parse | pass-through, else `{}` | JSON |
//! | Array | JSON parse | pass-through, else `[]` | JSON |
//!
//! Attribute strings read from the host use the presence rule for booleans
//! instead, see [`PropertyKind::from_attribute`].

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoercionError;

/// JSON object storage used by Object properties.
pub type JsonMap = serde_json::Map<String, Value>;

/// The declared value type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
	/// Text value.
	String,
	/// Double precision number, never NaN once stored.
	Number,
	/// Boolean flag.
	Boolean,
	/// JSON object, compared by reference.
	Object,
	/// JSON array, compared by reference.
	Array,
}

impl PropertyKind {
	/// Returns the kind's name as used in diagnostics.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::String => "String",
			Self::Number => "Number",
			Self::Boolean => "Boolean",
			Self::Object => "Object",
			Self::Array => "Array",
		}
	}

	/// Returns the value used when a property has no default.
	///
	/// `''`, `0`, `false`, `{}` and `[]` respectively. Object and Array zero
	/// values are freshly allocated on every call.
	pub fn zero_value(&self) -> PropertyValue {
		match self {
			Self::String => PropertyValue::String(String::new()),
			Self::Number => PropertyValue::Number(0.0),
			Self::Boolean => PropertyValue::Boolean(false),
			Self::Object => PropertyValue::Object(Rc::new(JsonMap::new())),
			Self::Array => PropertyValue::Array(Rc::new(Vec::new())),
		}
	}

	/// Coerces any raw input into a value of this kind.
	///
	/// The only failure is a string handed to an Object or Array kind that is
	/// not JSON of the matching shape.
	pub fn coerce(&self, raw: RawValue) -> Result<PropertyValue, CoercionError> {
		let value = match self {
			Self::String => PropertyValue::String(match raw {
				RawValue::String(s) => s,
				other => other.to_js_string(),
			}),
			Self::Number => PropertyValue::Number(raw.to_js_number()),
			Self::Boolean => PropertyValue::Boolean(raw.is_truthy_input()),
			Self::Object => match raw {
				RawValue::Object(map) => PropertyValue::Object(map),
				RawValue::String(text) => PropertyValue::Object(parse_object(&text)?),
				_ => self.zero_value(),
			},
			Self::Array => match raw {
				RawValue::Array(items) => PropertyValue::Array(items),
				RawValue::String(text) => PropertyValue::Array(parse_array(&text)?),
				_ => self.zero_value(),
			},
		};
		Ok(value)
	}

	/// Parses an attribute string that is present on the host element.
	///
	/// Identical to [`coerce`](Self::coerce) with a string input, except for
	/// Boolean where presence means `true` unless the text is `"false"`, so an
	/// empty attribute (`<x-el flag>`) reads as `true`.
	pub fn from_attribute(&self, text: &str) -> Result<PropertyValue, CoercionError> {
		match self {
			Self::Boolean => Ok(PropertyValue::Boolean(text != "false")),
			_ => self.coerce(RawValue::String(text.to_string())),
		}
	}
}

impl fmt::Display for PropertyKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A coerced property value, always matching its property's kind.
///
/// Equality mirrors strict equality: String, Number and Boolean compare by
/// value, Object and Array compare by reference (`Rc::ptr_eq`). Two maps with
/// the same content but different allocations are not equal.
#[derive(Debug, Clone)]
pub enum PropertyValue {
	/// String value.
	String(String),
	/// Number value.
	Number(f64),
	/// Boolean value.
	Boolean(bool),
	/// Shared JSON object.
	Object(Rc<JsonMap>),
	/// Shared JSON array.
	Array(Rc<Vec<Value>>),
}

impl PropertyValue {
	/// Returns the kind of this value.
	pub fn kind(&self) -> PropertyKind {
		match self {
			Self::String(_) => PropertyKind::String,
			Self::Number(_) => PropertyKind::Number,
			Self::Boolean(_) => PropertyKind::Boolean,
			Self::Object(_) => PropertyKind::Object,
			Self::Array(_) => PropertyKind::Array,
		}
	}

	/// Returns whether the value counts as set for attribute reflection.
	///
	/// `''`, `0`, `false` and empty objects or arrays are falsy and clear a
	/// reflected attribute.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::String(s) => !s.is_empty(),
			Self::Number(n) => *n != 0.0 && !n.is_nan(),
			Self::Boolean(b) => *b,
			Self::Object(map) => !map.is_empty(),
			Self::Array(items) => !items.is_empty(),
		}
	}

	/// Serializes the value for a reflected attribute.
	///
	/// Returns `None` when the attribute must be removed instead.
	pub fn to_attribute(&self) -> Option<String> {
		if !self.is_truthy() {
			return None;
		}
		let text = match self {
			Self::String(s) => s.clone(),
			Self::Number(n) => format_js_number(*n),
			Self::Boolean(_) => String::new(),
			Self::Object(map) => Value::Object((**map).clone()).to_string(),
			Self::Array(items) => Value::Array((**items).clone()).to_string(),
		};
		Some(text)
	}

	/// Returns the string if this is a String value.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the number if this is a Number value.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(n) => Some(*n),
			_ => None,
		}
	}

	/// Returns the flag if this is a Boolean value.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Boolean(b) => Some(*b),
			_ => None,
		}
	}

	/// Returns the shared map if this is an Object value.
	pub fn as_object(&self) -> Option<&Rc<JsonMap>> {
		match self {
			Self::Object(map) => Some(map),
			_ => None,
		}
	}

	/// Returns the shared items if this is an Array value.
	pub fn as_array(&self) -> Option<&Rc<Vec<Value>>> {
		match self {
			Self::Array(items) => Some(items),
			_ => None,
		}
	}
}

impl PartialEq for PropertyValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::String(a), Self::String(b)) => a == b,
			(Self::Number(a), Self::Number(b)) => a == b,
			(Self::Boolean(a), Self::Boolean(b)) => a == b,
			(Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
			(Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl fmt::Display for PropertyValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&RawValue::from(self.clone()).to_js_string())
	}
}

/// An uncoerced input for a property setter.
#[derive(Debug, Clone, Default)]
pub enum RawValue {
	/// Absent value (`null`/`undefined`, or a removed attribute).
	#[default]
	Null,
	/// Text, including attribute strings.
	String(String),
	/// Number.
	Number(f64),
	/// Boolean.
	Boolean(bool),
	/// JSON object.
	Object(Rc<JsonMap>),
	/// JSON array.
	Array(Rc<Vec<Value>>),
}

impl RawValue {
	/// Returns the native kind of the input, or `None` for [`RawValue::Null`].
	pub fn kind(&self) -> Option<PropertyKind> {
		match self {
			Self::Null => None,
			Self::String(_) => Some(PropertyKind::String),
			Self::Number(_) => Some(PropertyKind::Number),
			Self::Boolean(_) => Some(PropertyKind::Boolean),
			Self::Object(_) => Some(PropertyKind::Object),
			Self::Array(_) => Some(PropertyKind::Array),
		}
	}

	fn to_js_string(&self) -> String {
		match self {
			Self::Null => String::new(),
			Self::String(s) => s.clone(),
			Self::Number(n) => format_js_number(*n),
			Self::Boolean(b) => b.to_string(),
			Self::Object(_) => "[object Object]".to_string(),
			Self::Array(items) => join_js_array(items),
		}
	}

	fn to_js_number(&self) -> f64 {
		let n = match self {
			Self::Null | Self::Object(_) => 0.0,
			Self::String(s) => parse_js_number(s),
			Self::Number(n) => *n,
			Self::Boolean(b) => f64::from(u8::from(*b)),
			Self::Array(items) => parse_js_number(&join_js_array(items)),
		};
		if n.is_nan() { 0.0 } else { n }
	}

	fn is_truthy_input(&self) -> bool {
		match self {
			Self::Null => false,
			Self::String(s) => !s.is_empty() && s != "false",
			Self::Number(n) => *n != 0.0 && !n.is_nan(),
			Self::Boolean(b) => *b,
			Self::Object(_) | Self::Array(_) => true,
		}
	}
}

impl From<&str> for RawValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for RawValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<&String> for RawValue {
	fn from(value: &String) -> Self {
		Self::String(value.clone())
	}
}

impl From<f64> for RawValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<f32> for RawValue {
	fn from(value: f32) -> Self {
		Self::Number(f64::from(value))
	}
}

impl From<i32> for RawValue {
	fn from(value: i32) -> Self {
		Self::Number(f64::from(value))
	}
}

impl From<u32> for RawValue {
	fn from(value: u32) -> Self {
		Self::Number(f64::from(value))
	}
}

impl From<bool> for RawValue {
	fn from(value: bool) -> Self {
		Self::Boolean(value)
	}
}

impl From<JsonMap> for RawValue {
	fn from(value: JsonMap) -> Self {
		Self::Object(Rc::new(value))
	}
}

impl From<Rc<JsonMap>> for RawValue {
	fn from(value: Rc<JsonMap>) -> Self {
		Self::Object(value)
	}
}

impl From<Vec<Value>> for RawValue {
	fn from(value: Vec<Value>) -> Self {
		Self::Array(Rc::new(value))
	}
}

impl From<Rc<Vec<Value>>> for RawValue {
	fn from(value: Rc<Vec<Value>>) -> Self {
		Self::Array(value)
	}
}

impl From<Value> for RawValue {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => Self::Null,
			Value::Bool(b) => Self::Boolean(b),
			Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
			Value::String(s) => Self::String(s),
			Value::Array(items) => Self::Array(Rc::new(items)),
			Value::Object(map) => Self::Object(Rc::new(map)),
		}
	}
}

impl From<PropertyValue> for RawValue {
	fn from(value: PropertyValue) -> Self {
		match value {
			PropertyValue::String(s) => Self::String(s),
			PropertyValue::Number(n) => Self::Number(n),
			PropertyValue::Boolean(b) => Self::Boolean(b),
			PropertyValue::Object(map) => Self::Object(map),
			PropertyValue::Array(items) => Self::Array(items),
		}
	}
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

fn parse_object(text: &str) -> Result<Rc<JsonMap>, CoercionError> {
	match parse_json(PropertyKind::Object, text)? {
		Value::Object(map) => Ok(Rc::new(map)),
		_ => Err(CoercionError::UnexpectedShape {
			kind: PropertyKind::Object,
			text: text.to_string(),
		}),
	}
}

fn parse_array(text: &str) -> Result<Rc<Vec<Value>>, CoercionError> {
	match parse_json(PropertyKind::Array, text)? {
		Value::Array(items) => Ok(Rc::new(items)),
		_ => Err(CoercionError::UnexpectedShape {
			kind: PropertyKind::Array,
			text: text.to_string(),
		}),
	}
}

fn parse_json(kind: PropertyKind, text: &str) -> Result<Value, CoercionError> {
	serde_json::from_str(text).map_err(|source| CoercionError::MalformedJson {
		kind,
		text: text.to_string(),
		source,
	})
}

/// Parses text the way JavaScript's `Number(text)` does.
///
/// Surrounding whitespace is ignored and empty text is `0`. Decimal and
/// exponent notation, `Infinity` and the `0x`/`0o`/`0b` prefixes are accepted.
/// Anything else yields NaN.
pub fn parse_js_number(text: &str) -> f64 {
	let trimmed = text.trim();
	if trimmed.is_empty() {
		return 0.0;
	}

	match trimmed {
		"Infinity" | "+Infinity" => return f64::INFINITY,
		"-Infinity" => return f64::NEG_INFINITY,
		_ => {}
	}

	let radix = match trimmed.get(..2) {
		Some("0x" | "0X") => Some(16),
		Some("0o" | "0O") => Some(8),
		Some("0b" | "0B") => Some(2),
		_ => None,
	};
	if let Some(radix) = radix {
		return parse_radix_digits(&trimmed[2..], radix);
	}

	// Rust accepts "inf" and "nan" spellings that JavaScript rejects
	let is_decimal = trimmed
		.chars()
		.all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
	if !is_decimal {
		return f64::NAN;
	}
	trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

// Digits accumulate in f64 so literals past u64::MAX stay finite.
fn parse_radix_digits(digits: &str, radix: u32) -> f64 {
	if digits.is_empty() {
		return f64::NAN;
	}
	digits
		.chars()
		.try_fold(0.0_f64, |acc, c| {
			c.to_digit(radix)
				.map(|digit| acc * f64::from(radix) + f64::from(digit))
		})
		.unwrap_or(f64::NAN)
}

/// Formats a number the way JavaScript's `String(number)` does.
pub fn format_js_number(n: f64) -> String {
	if n.is_nan() {
		return "NaN".to_string();
	}
	if n.is_infinite() {
		return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
	}
	if n == 0.0 {
		return "0".to_string();
	}

	let magnitude = n.abs();
	if !(1e-6..1e21).contains(&magnitude) {
		let formatted = format!("{:e}", n);
		return match formatted.split_once('e') {
			Some((mantissa, exponent)) if !exponent.starts_with('-') => {
				format!("{}e+{}", mantissa, exponent)
			}
			_ => formatted,
		};
	}
	format!("{}", n)
}

fn join_js_array(items: &[Value]) -> String {
	items
		.iter()
		.map(|item| match item {
			Value::Null => String::new(),
			Value::Bool(b) => b.to_string(),
			Value::Number(n) => n.as_f64().map(format_js_number).unwrap_or_default(),
			Value::String(s) => s.clone(),
			Value::Array(inner) => join_js_array(inner),
			Value::Object(_) => "[object Object]".to_string(),
		})
		.collect::<Vec<_>>()
		.join(",")
}
