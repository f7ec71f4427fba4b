//! Error types for imgradio.

use crate::node::NodeId;

/// Result type alias for document operations.
pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

/// Errors raised by a host document when a query or mutation cannot be served.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// The node handle is invalid or the element was removed.
    #[error("Invalid or removed node {0:?}")]
    InvalidNode(NodeId),

    /// The node exists but is not a form input.
    #[error("Node {0:?} is not an input element")]
    NotAnInput(NodeId),
}

/// Errors raised while binding controls to image proxies.
///
/// A failing bind call leaves the document untouched: every control in the
/// batch is validated before the first proxy is inserted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// The control has no identifier, or an empty one.
    #[error("Control {node:?} has no usable identifier")]
    MissingIdentifier { node: NodeId },

    /// No element in the document carries the requested identifier.
    #[error("No element with identifier '{id}'")]
    UnknownIdentifier { id: String },

    /// Another element in the document carries the same identifier.
    #[error("Identifier '{id}' is not unique in the document")]
    DuplicateIdentifier { id: String },

    /// The element is not a radio button or checkbox.
    #[error("Element '{id}' is not a radio or checkbox input")]
    NotAControl { id: String },

    /// The control already has a proxy.
    #[error("Control '{id}' is already bound")]
    AlreadyBound { id: String },

    /// The derived proxy identifier is used by another element.
    #[error("Proxy identifier '{proxy_id}' for control '{id}' is already taken")]
    ProxyIdTaken { id: String, proxy_id: String },

    /// The control would join a group that was bound with another mode.
    #[error("Control '{id}' joins group '{group}' which is bound with a different mode")]
    ModeConflict { id: String, group: String },

    /// The document refused a query or mutation.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

impl BindingError {
    /// Create a missing-identifier error.
    pub fn missing_identifier(node: NodeId) -> Self {
        Self::MissingIdentifier { node }
    }

    /// Create a duplicate-identifier error.
    pub fn duplicate_identifier(id: impl Into<String>) -> Self {
        Self::DuplicateIdentifier { id: id.into() }
    }

    /// Create a not-a-control error.
    pub fn not_a_control(id: impl Into<String>) -> Self {
        Self::NotAControl { id: id.into() }
    }
}

/// Errors raised while applying an activation to the document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivationError {
    /// The document refused a read or write for a bound element.
    #[error("Document error during activation: {0}")]
    Document(#[from] DocumentError),
}
