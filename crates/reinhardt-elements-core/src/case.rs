//! Conversion between attribute names and property names.
//!
//! Attributes use the dashed form (`string-default`), properties use camelCase
//! (`stringDefault`). The two functions are not inverses of each other:
//! leading dashes and runs of uppercase letters do not survive a round trip.

/// Converts a dashed string to camelCase.
///
/// Every dash followed by an ASCII letter or digit is removed and the following
/// character is uppercased. A single trailing dash is dropped.
///
/// # Example
///
/// ```
/// use reinhardt_elements_core::dashes_to_camel_case;
///
/// assert_eq!(dashes_to_camel_case("test-with-dashes"), "testWithDashes");
/// assert_eq!(dashes_to_camel_case("-test"), "Test");
/// assert_eq!(dashes_to_camel_case("dash-on-the-end-"), "dashOnTheEnd");
/// ```
pub fn dashes_to_camel_case(input: &str) -> String {
	let mut output = String::with_capacity(input.len());
	let mut chars = input.chars().peekable();

	while let Some(c) = chars.next() {
		if c == '-'
			&& let Some(&next) = chars.peek()
			&& next.is_ascii_alphanumeric()
		{
			output.push(next.to_ascii_uppercase());
			chars.next();
			continue;
		}
		output.push(c);
	}

	if output.ends_with('-') {
		output.pop();
	}
	output
}

/// Converts a camelCase string to lowercase with dashes.
///
/// Each uppercase ASCII letter becomes a dash followed by its lowercase form.
/// A leading uppercase letter therefore yields a leading dash.
///
/// # Example
///
/// ```
/// use reinhardt_elements_core::camel_case_to_dashes;
///
/// assert_eq!(camel_case_to_dashes("testTest"), "test-test");
/// assert_eq!(camel_case_to_dashes("ThisIsATest"), "-this-is-a-test");
/// ```
pub fn camel_case_to_dashes(input: &str) -> String {
	let chars: Vec<char> = input.chars().collect();
	let mut output = String::with_capacity(input.len() + 4);
	let mut index = 0;

	while index < chars.len() {
		let current = chars[index];
		let next = chars.get(index + 1).copied();

		match next {
			Some(upper) if current.is_ascii_lowercase() && upper.is_ascii_uppercase() => {
				output.push(current);
				output.push('-');
				output.push(upper.to_ascii_lowercase());
				index += 2;
			}
			_ if current.is_ascii_uppercase() => {
				output.push('-');
				output.push(current.to_ascii_lowercase());
				index += 1;
			}
			_ => {
				output.push(current);
				index += 1;
			}
		}
	}
	output
}
