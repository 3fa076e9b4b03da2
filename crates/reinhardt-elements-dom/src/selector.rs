//! Selector engine.
//!
//! Supports the subset of CSS selectors that element authors use to reach
//! into their own shadow roots:
//!
//! - type (`div`) and universal (`*`) selectors
//! - `#id` and `.class`
//! - attribute selectors `[a]`, `[a=v]`, `[a~=v]`, `[a|=v]`, `[a^=v]`,
//!   `[a$=v]` and `[a*=v]`, with quoted or unquoted values
//! - descendant (whitespace) and child (`>`) combinators
//! - selector lists (`a, b`)

use std::iter::Peekable;
use std::str::Chars;

use crate::error::DomError;
use crate::node::Node;

/// Attribute value operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeOperator {
	Exists,
	Equals,
	Includes,
	DashMatch,
	Prefix,
	Suffix,
	Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SimpleSelector {
	Type(String),
	Universal,
	Id(String),
	Class(String),
	Attribute {
		name: String,
		operator: AttributeOperator,
		value: String,
	},
}

impl SimpleSelector {
	fn matches(&self, node: &Node) -> bool {
		match self {
			Self::Type(tag) => node.tag_name() == Some(tag.as_str()),
			Self::Universal => node.is_element(),
			Self::Id(id) => node.get_attribute("id").as_deref() == Some(id.as_str()),
			Self::Class(class) => node
				.get_attribute("class")
				.is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
			Self::Attribute {
				name,
				operator,
				value,
			} => {
				let Some(actual) = node.get_attribute(name) else {
					return false;
				};
				match operator {
					AttributeOperator::Exists => true,
					AttributeOperator::Equals => actual == *value,
					AttributeOperator::Includes => {
						!value.is_empty() && actual.split_whitespace().any(|part| part == value)
					}
					AttributeOperator::DashMatch => {
						actual == *value || actual.starts_with(&format!("{}-", value))
					}
					AttributeOperator::Prefix => !value.is_empty() && actual.starts_with(value.as_str()),
					AttributeOperator::Suffix => !value.is_empty() && actual.ends_with(value.as_str()),
					AttributeOperator::Substring => !value.is_empty() && actual.contains(value.as_str()),
				}
			}
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
	Descendant,
	Child,
}

/// A sequence of simple selectors that all apply to one element.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound(Vec<SimpleSelector>);

impl Compound {
	fn matches(&self, node: &Node) -> bool {
		node.is_element() && self.0.iter().all(|simple| simple.matches(node))
	}
}

/// Compounds joined by combinators, stored left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
	first: Compound,
	rest: Vec<(Combinator, Compound)>,
}

impl Complex {
	fn matches(&self, node: &Node) -> bool {
		let mut compounds: Vec<&Compound> = vec![&self.first];
		let mut combinators = Vec::with_capacity(self.rest.len());
		for (combinator, compound) in &self.rest {
			combinators.push(*combinator);
			compounds.push(compound);
		}
		match_from(&compounds, &combinators, compounds.len() - 1, node)
	}
}

/// Matches `compounds[..=index]` with `node` as the subject of `compounds[index]`.
fn match_from(
	compounds: &[&Compound],
	combinators: &[Combinator],
	index: usize,
	node: &Node,
) -> bool {
	if !compounds[index].matches(node) {
		return false;
	}
	if index == 0 {
		return true;
	}
	match combinators[index - 1] {
		Combinator::Child => node
			.parent_element()
			.is_some_and(|parent| match_from(compounds, combinators, index - 1, &parent)),
		Combinator::Descendant => {
			let mut ancestor = node.parent_element();
			while let Some(candidate) = ancestor {
				if match_from(compounds, combinators, index - 1, &candidate) {
					return true;
				}
				ancestor = candidate.parent_element();
			}
			false
		}
	}
}

/// A parsed selector list.
///
/// # Example
///
/// ```
/// use reinhardt_elements_dom::{Node, Selector};
///
/// let node = Node::element("input");
/// node.set_attribute("name", "user-email");
///
/// let selector = Selector::parse(r#"input[name^="user"]"#).unwrap();
/// assert!(selector.matches(&node));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
	alternatives: Vec<Complex>,
}

impl Selector {
	/// Parses a selector list.
	pub fn parse(text: &str) -> Result<Self, DomError> {
		Parser::new(text).parse_list()
	}

	/// Returns true if the element matches any selector in the list.
	pub fn matches(&self, node: &Node) -> bool {
		self.alternatives
			.iter()
			.any(|complex| complex.matches(node))
	}
}

struct Parser<'a> {
	text: &'a str,
	chars: Peekable<Chars<'a>>,
}

impl<'a> Parser<'a> {
	fn new(text: &'a str) -> Self {
		Self {
			text,
			chars: text.chars().peekable(),
		}
	}

	fn error(&self, reason: impl Into<String>) -> DomError {
		DomError::InvalidSelector {
			selector: self.text.to_string(),
			reason: reason.into(),
		}
	}

	fn skip_whitespace(&mut self) -> bool {
		let mut skipped = false;
		while self.chars.next_if(|c| c.is_whitespace()).is_some() {
			skipped = true;
		}
		skipped
	}

	fn parse_list(&mut self) -> Result<Selector, DomError> {
		let mut alternatives = Vec::new();
		loop {
			self.skip_whitespace();
			alternatives.push(self.parse_complex()?);
			match self.chars.next() {
				Some(',') => continue,
				None => break,
				Some(c) => return Err(self.error(format!("unexpected {:?}", c))),
			}
		}
		Ok(Selector { alternatives })
	}

	fn parse_complex(&mut self) -> Result<Complex, DomError> {
		let first = self.parse_compound()?;
		let mut rest = Vec::new();
		loop {
			let had_space = self.skip_whitespace();
			let combinator = match self.chars.peek() {
				None | Some(',') => break,
				Some('>') => {
					self.chars.next();
					self.skip_whitespace();
					Combinator::Child
				}
				Some(_) if had_space => Combinator::Descendant,
				Some(&c) => return Err(self.error(format!("unexpected {:?}", c))),
			};
			rest.push((combinator, self.parse_compound()?));
		}
		Ok(Complex { first, rest })
	}

	fn parse_compound(&mut self) -> Result<Compound, DomError> {
		let mut simples = Vec::new();
		match self.chars.peek() {
			Some('*') => {
				self.chars.next();
				simples.push(SimpleSelector::Universal);
			}
			Some(&c) if is_ident_char(c) => {
				simples.push(SimpleSelector::Type(self.parse_ident()?.to_ascii_lowercase()));
			}
			_ => {}
		}
		loop {
			match self.chars.peek() {
				Some('#') => {
					self.chars.next();
					simples.push(SimpleSelector::Id(self.parse_ident()?));
				}
				Some('.') => {
					self.chars.next();
					simples.push(SimpleSelector::Class(self.parse_ident()?));
				}
				Some('[') => {
					self.chars.next();
					simples.push(self.parse_attribute()?);
				}
				_ => break,
			}
		}
		if simples.is_empty() {
			return Err(self.error("expected a selector"));
		}
		Ok(Compound(simples))
	}

	fn parse_ident(&mut self) -> Result<String, DomError> {
		let mut ident = String::new();
		while let Some(c) = self.chars.next_if(|c| is_ident_char(*c)) {
			ident.push(c);
		}
		if ident.is_empty() {
			return Err(self.error("expected an identifier"));
		}
		Ok(ident)
	}

	fn parse_attribute(&mut self) -> Result<SimpleSelector, DomError> {
		self.skip_whitespace();
		let name = self.parse_ident()?.to_ascii_lowercase();
		self.skip_whitespace();

		let operator = match self.chars.next() {
			Some(']') => {
				return Ok(SimpleSelector::Attribute {
					name,
					operator: AttributeOperator::Exists,
					value: String::new(),
				});
			}
			Some('=') => AttributeOperator::Equals,
			Some(prefix @ ('~' | '|' | '^' | '$' | '*')) => {
				if self.chars.next() != Some('=') {
					return Err(self.error(format!("expected '=' after {:?}", prefix)));
				}
				match prefix {
					'~' => AttributeOperator::Includes,
					'|' => AttributeOperator::DashMatch,
					'^' => AttributeOperator::Prefix,
					'$' => AttributeOperator::Suffix,
					_ => AttributeOperator::Substring,
				}
			}
			Some(c) => return Err(self.error(format!("unexpected {:?} in attribute selector", c))),
			None => return Err(self.error("unterminated attribute selector")),
		};

		self.skip_whitespace();
		let value = match self.chars.peek() {
			Some(&quote) if quote == '"' || quote == '\'' => {
				self.chars.next();
				let mut value = String::new();
				loop {
					match self.chars.next() {
						Some(c) if c == quote => break,
						Some(c) => value.push(c),
						None => return Err(self.error("unterminated string")),
					}
				}
				value
			}
			_ => self.parse_ident()?,
		};
		self.skip_whitespace();
		if self.chars.next() != Some(']') {
			return Err(self.error("expected ']'"));
		}
		Ok(SimpleSelector::Attribute {
			name,
			operator,
			value,
		})
	}
}

fn is_ident_char(c: char) -> bool {
	c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	/// ```text
	/// <div id="outer" class="panel main">
	///   <ul>
	///     <li lang="en-US" data-kind="first item">one</li>
	///     <li lang="en">two</li>
	///   </ul>
	///   <input name="user-email">
	/// </div>
	/// ```
	#[fixture]
	fn tree() -> Node {
		let root = Node::fragment();
		let outer = Node::element("div");
		outer.set_attribute("id", "outer");
		outer.set_attribute("class", "panel main");
		let list = Node::element("ul");
		let first = Node::element("li");
		first.set_attribute("lang", "en-US");
		first.set_attribute("data-kind", "first item");
		let second = Node::element("li");
		second.set_attribute("lang", "en");
		let input = Node::element("input");
		input.set_attribute("name", "user-email");

		list.append_child(&first).unwrap();
		list.append_child(&second).unwrap();
		outer.append_child(&list).unwrap();
		outer.append_child(&input).unwrap();
		root.append_child(&outer).unwrap();
		root
	}

	fn count(root: &Node, selector: &str) -> usize {
		root.query_selector_all(selector).unwrap().len()
	}

	#[rstest]
	#[case("li", 2)]
	#[case("LI", 2)]
	#[case("*", 5)]
	#[case("#outer", 1)]
	#[case(".panel", 1)]
	#[case(".panel.main", 1)]
	#[case(".missing", 0)]
	#[case("[lang]", 2)]
	#[case("[lang=en]", 1)]
	#[case("[lang|=en]", 2)]
	#[case("[data-kind~=item]", 1)]
	#[case("[data-kind~=ite]", 0)]
	#[case(r#"[name^="user"]"#, 1)]
	#[case("[name$='email']", 1)]
	#[case("[name*=r-e]", 1)]
	#[case("div li", 2)]
	#[case("div > li", 0)]
	#[case("div > ul > li", 2)]
	#[case("#outer input", 1)]
	#[case("ul, input", 2)]
	#[case("li[lang=en], li[lang=en]", 1)]
	fn test_query_counts(tree: Node, #[case] selector: &str, #[case] expected: usize) {
		assert_eq!(count(&tree, selector), expected);
	}

	#[rstest]
	fn test_results_are_in_document_order(tree: Node) {
		let langs: Vec<_> = tree
			.query_selector_all("input, li")
			.unwrap()
			.iter()
			.map(|node| node.get_attribute("lang").unwrap_or_default())
			.collect();
		assert_eq!(langs, vec!["en-US", "en", ""]);
	}

	#[rstest]
	#[case("")]
	#[case("  ")]
	#[case("div >")]
	#[case("[lang")]
	#[case("[lang=\"en]")]
	#[case("[lang!=en]")]
	#[case("#")]
	#[case("a,")]
	#[case("a ~ b")]
	#[case("a+b")]
	#[case("li:first-child")]
	fn test_invalid_selectors(#[case] selector: &str) {
		let err = Selector::parse(selector).unwrap_err();
		assert!(matches!(err, DomError::InvalidSelector { .. }));
	}
}
