//! Errors raised by the in-memory host.

/// Error type for node tree operations and selector parsing.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
	/// The selector could not be parsed.
	#[error("Invalid selector {selector:?}: {reason}")]
	InvalidSelector {
		/// The selector text.
		selector: String,
		/// What the parser rejected.
		reason: String,
	},

	/// The element already hosts a shadow root.
	#[error("Element <{0}> already hosts a shadow root")]
	ShadowRootExists(String),

	/// Shadow roots can only be attached to elements.
	#[error("Shadow roots can only be attached to elements")]
	ShadowRootUnsupported,

	/// The requested insertion would produce an invalid tree.
	#[error("Hierarchy request error: {0}")]
	HierarchyRequest(String),

	/// The node is not a child of the given parent.
	#[error("The node to be removed is not a child of this node")]
	NotFound,
}
