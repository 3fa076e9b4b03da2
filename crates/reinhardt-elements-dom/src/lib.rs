//! Reinhardt Elements DOM - in-memory host environment
//!
//! Custom elements need a host to live in: a tree of nodes with attributes,
//! isolated shadow roots, event listeners and descendant queries. This crate
//! provides that host natively so elements can be constructed, attached and
//! tested without a browser.
//!
//! ## Modules
//!
//! - [`node`]: reference-counted node handles with identity equality
//! - [`event`]: events, listeners and dispatch with bubbling
//! - [`template`]: template markup parsing and instantiation
//! - [`selector`]: the selector engine behind `query_selector`
//! - [`quick_access`]: the rebuildable marker-attribute index
//!
//! ## Example
//!
//! ```
//! use reinhardt_elements_dom::{Node, Template};
//!
//! let host = Node::element("my-element");
//! let root = host.attach_shadow().unwrap();
//! let template = Template::parse(r#"<p id="greeting">Hello</p>"#);
//! root.append_child(&template.instantiate()).unwrap();
//!
//! let greeting = root.query_selector("#greeting").unwrap().unwrap();
//! assert_eq!(greeting.text_content(), "Hello");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod node;
pub mod quick_access;
pub mod selector;
pub mod template;

pub use error::DomError;
pub use event::{Event, EventListener};
pub use node::{Node, NodeKind};
pub use quick_access::QuickAccess;
pub use selector::Selector;
pub use template::Template;
