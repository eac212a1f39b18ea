//! Error types for document operations.

use thiserror::Error;

use crate::NodeId;

/// Errors raised by structural misuse of a [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
	/// The id does not belong to this document.
	#[error("unknown node {0}")]
	UnknownNode(NodeId),

	/// An element operation was attempted on a non-element node.
	#[error("node {0} is not an element")]
	NotAnElement(NodeId),

	/// The insertion would create a cycle or put a node under a text node.
	#[error("cannot insert {child} under {parent}")]
	HierarchyRequest {
		/// Intended parent.
		parent: NodeId,
		/// Node being inserted.
		child: NodeId,
	},

	/// The referenced node is not a child of the given parent.
	#[error("{child} is not a child of {parent}")]
	NotAChild {
		/// Expected parent.
		parent: NodeId,
		/// Node that was expected to be a child.
		child: NodeId,
	},

	/// Attribute or element name is empty or contains forbidden characters.
	#[error("invalid name {0:?}")]
	InvalidName(String),
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DomError>;
