//! Host document contract and an in-memory implementation.
//!
//! The binding layer never owns the element tree it decorates. Everything it
//! needs from the host goes through [`HostDocument`]:
//!
//! - lookup of an element by identifier
//! - lookup of the nearest enclosing form of an element
//! - lookup of all elements carrying an attribute value (or class) within a
//!   scope, in document order
//! - the handful of writes binding and activation perform: hiding elements,
//!   inserting the proxy after its control, toggling checked state and classes
//!
//! [`Document`] is a small arena-backed tree implementing the contract, used
//! by tests and by hosts that keep their form model in Rust.
//!
//! # Example
//!
//! ```
//! use imgradio::document::{Document, Element, HostDocument};
//!
//! let mut doc = Document::new();
//! let form = doc.append(None, Element::form()).unwrap();
//! let r1 = doc.append(Some(form), Element::radio("r1", "color")).unwrap();
//!
//! assert_eq!(doc.element_by_id("r1"), Some(r1));
//! assert_eq!(doc.enclosing_form(r1), Some(form));
//! ```

mod element;
mod tree;

pub use element::{Element, InputKind, Tag};
pub use tree::Document;

use imgradio_core::{DocumentResult, NodeId};

/// The region of the document a group lookup is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The whole document, used when a control has no enclosing form.
    Document,
    /// All descendants of a form element.
    Form(NodeId),
}

/// A snapshot of a native input's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kind: InputKind,
    pub checked: bool,
}

/// The primitives the binding layer requires from a host document.
///
/// Query results that return several nodes must be in document order.
pub trait HostDocument {
    /// Find the first element with the given identifier.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Find the nearest `<form>` ancestor of a node.
    fn enclosing_form(&self, node: NodeId) -> Option<NodeId>;

    /// All elements within `scope` whose attribute `name` equals `value`.
    fn elements_with_attribute(&self, scope: Scope, name: &str, value: &str) -> Vec<NodeId>;

    /// All elements within `scope` carrying the class.
    fn elements_with_class(&self, scope: Scope, class: &str) -> Vec<NodeId>;

    /// All `<label>` elements whose `for` attribute names `id`.
    fn labels_for(&self, id: &str) -> Vec<NodeId>;

    /// Read the state of an input element.
    fn control(&self, node: NodeId) -> DocumentResult<ControlInfo>;

    /// Set an input's checked state.
    fn set_checked(&mut self, node: NodeId, checked: bool) -> DocumentResult<()>;

    /// Remove an element from layout while keeping it in the document.
    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> DocumentResult<()>;

    /// Insert a new element immediately after `anchor`, as its next sibling.
    fn insert_after(&mut self, anchor: NodeId, element: Element) -> DocumentResult<NodeId>;

    /// Whether an element carries a class.
    fn has_class(&self, node: NodeId, class: &str) -> DocumentResult<bool>;

    /// Add (`present = true`) or remove a class.
    fn set_class(&mut self, node: NodeId, class: &str, present: bool) -> DocumentResult<()>;

    /// The lookup scope for a node: its enclosing form, or the document.
    fn scope_of(&self, node: NodeId) -> Scope {
        self.enclosing_form(node)
            .map(Scope::Form)
            .unwrap_or(Scope::Document)
    }
}
