//! Arena-backed in-memory document.

use imgradio_core::logging::targets;
use imgradio_core::{DocumentError, DocumentResult, NodeId};
use slotmap::SlotMap;

use super::element::{Element, Tag};
use super::{ControlInfo, HostDocument, Scope};

struct NodeData {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An in-memory element tree.
///
/// Nodes live in a SlotMap arena, so [`NodeId`]s are stable while the tree is
/// edited. Document order is a depth-first pre-order walk over the root
/// elements in insertion order.
pub struct Document {
    nodes: SlotMap<NodeId, NodeData>,
    roots: Vec<NodeId>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
        }
    }

    /// Append an element as the last child of `parent`, or as a new root.
    pub fn append(&mut self, parent: Option<NodeId>, element: Element) -> DocumentResult<NodeId> {
        if let Some(parent_id) = parent {
            if !self.nodes.contains_key(parent_id) {
                return Err(DocumentError::InvalidNode(parent_id));
            }
        }

        let id = self.nodes.insert(NodeData {
            element,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent_id) => self.nodes[parent_id].children.push(id),
            None => self.roots.push(id),
        }
        Ok(id)
    }

    /// Get an element.
    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node).map(|d| &d.element)
    }

    /// Get the parent of a node, `None` for roots.
    pub fn parent(&self, node: NodeId) -> DocumentResult<Option<NodeId>> {
        self.data(node).map(|d| d.parent)
    }

    /// Get the children of a node.
    pub fn children(&self, node: NodeId) -> DocumentResult<&[NodeId]> {
        self.data(node).map(|d| d.children.as_slice())
    }

    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node in document order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut result = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            self.preorder_recursive(root, &mut result);
        }
        result
    }

    fn preorder_recursive(&self, id: NodeId, result: &mut Vec<NodeId>) {
        result.push(id);
        if let Some(data) = self.nodes.get(id) {
            for &child in &data.children {
                self.preorder_recursive(child, result);
            }
        }
    }

    /// Nodes within a scope in document order. A form scope excludes the form.
    fn scope_nodes(&self, scope: Scope) -> Vec<NodeId> {
        match scope {
            Scope::Document => self.preorder(),
            Scope::Form(form) => {
                let mut result = Vec::new();
                if let Some(data) = self.nodes.get(form) {
                    for &child in &data.children {
                        self.preorder_recursive(child, &mut result);
                    }
                }
                result
            }
        }
    }

    fn data(&self, node: NodeId) -> DocumentResult<&NodeData> {
        self.nodes.get(node).ok_or(DocumentError::InvalidNode(node))
    }

    fn element_mut(&mut self, node: NodeId) -> DocumentResult<&mut Element> {
        self.nodes
            .get_mut(node)
            .map(|d| &mut d.element)
            .ok_or(DocumentError::InvalidNode(node))
    }

    // =========================================================================
    // Debug / Diagnostics
    // =========================================================================

    /// Debug dump of the element tree, one element per line.
    pub fn dump_tree(&self) -> String {
        let mut output = String::new();
        for &root in &self.roots {
            self.dump_tree_recursive(root, 0, &mut output);
        }
        output
    }

    fn dump_tree_recursive(&self, id: NodeId, depth: usize, output: &mut String) {
        let Some(data) = self.nodes.get(id) else {
            return;
        };
        output.push_str(&"  ".repeat(depth));
        data.element.write_open_tag(output);
        output.push('\n');
        for &child in &data.children {
            self.dump_tree_recursive(child, depth + 1, output);
        }
    }

    /// Serialize an element and its subtree as HTML.
    pub fn outer_html(&self, node: NodeId) -> DocumentResult<String> {
        let mut output = String::new();
        self.outer_html_recursive(node, &mut output)?;
        Ok(output)
    }

    fn outer_html_recursive(&self, id: NodeId, output: &mut String) -> DocumentResult<()> {
        let data = self.data(id)?;
        data.element.write_open_tag(output);
        if let Tag::Input(_) = data.element.tag() {
            return Ok(());
        }
        if let Some(text) = data.element.text() {
            output.push_str(text);
        }
        for &child in &data.children {
            self.outer_html_recursive(child, output)?;
        }
        output.push_str("</");
        output.push_str(data.element.tag().name());
        output.push('>');
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl HostDocument for Document {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.preorder()
            .into_iter()
            .find(|&node| self.nodes[node].element.id() == Some(id))
    }

    fn enclosing_form(&self, node: NodeId) -> Option<NodeId> {
        let mut current = self.nodes.get(node).and_then(|d| d.parent);
        while let Some(id) = current {
            let data = &self.nodes[id];
            if data.element.tag() == Tag::Form {
                return Some(id);
            }
            current = data.parent;
        }
        None
    }

    fn elements_with_attribute(&self, scope: Scope, name: &str, value: &str) -> Vec<NodeId> {
        self.scope_nodes(scope)
            .into_iter()
            .filter(|&node| self.nodes[node].element.attribute(name) == Some(value))
            .collect()
    }

    fn elements_with_class(&self, scope: Scope, class: &str) -> Vec<NodeId> {
        self.scope_nodes(scope)
            .into_iter()
            .filter(|&node| self.nodes[node].element.has_class(class))
            .collect()
    }

    fn labels_for(&self, id: &str) -> Vec<NodeId> {
        self.elements_with_attribute(Scope::Document, "for", id)
            .into_iter()
            .filter(|&node| self.nodes[node].element.tag() == Tag::Label)
            .collect()
    }

    fn control(&self, node: NodeId) -> DocumentResult<ControlInfo> {
        let element = &self.data(node)?.element;
        let kind = element.input_kind().ok_or(DocumentError::NotAnInput(node))?;
        Ok(ControlInfo {
            id: element.id().map(str::to_owned),
            name: element.name().map(str::to_owned),
            kind,
            checked: element.is_checked(),
        })
    }

    fn set_checked(&mut self, node: NodeId, checked: bool) -> DocumentResult<()> {
        let element = self.element_mut(node)?;
        if element.input_kind().is_none() {
            return Err(DocumentError::NotAnInput(node));
        }
        element.set_checked(checked);
        Ok(())
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> DocumentResult<()> {
        self.element_mut(node)?.set_hidden(hidden);
        Ok(())
    }

    fn insert_after(&mut self, anchor: NodeId, element: Element) -> DocumentResult<NodeId> {
        let parent = self.data(anchor)?.parent;

        let id = self.nodes.insert(NodeData {
            element,
            parent,
            children: Vec::new(),
        });
        let siblings = match parent {
            Some(parent_id) => &mut self.nodes[parent_id].children,
            None => &mut self.roots,
        };
        let position = siblings
            .iter()
            .position(|&sibling| sibling == anchor)
            .map_or(siblings.len(), |pos| pos + 1);
        siblings.insert(position, id);

        tracing::trace!(target: targets::DOCUMENT, ?anchor, ?id, "inserted element");
        Ok(id)
    }

    fn has_class(&self, node: NodeId, class: &str) -> DocumentResult<bool> {
        Ok(self.data(node)?.element.has_class(class))
    }

    fn set_class(&mut self, node: NodeId, class: &str, present: bool) -> DocumentResult<()> {
        let element = self.element_mut(node)?;
        if present {
            element.add_class(class);
        } else {
            element.remove_class(class);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::InputKind;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let form = doc.append(None, Element::form()).unwrap();
        let r1 = doc.append(Some(form), Element::radio("r1", "color")).unwrap();
        let r2 = doc
            .append(Some(form), Element::radio("r2", "color").with_checked(true))
            .unwrap();
        (doc, form, r1, r2)
    }

    #[test]
    fn test_append_and_lookup() {
        let (doc, form, r1, r2) = sample();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.children(form).unwrap(), [r1, r2]);
        assert_eq!(doc.parent(r1).unwrap(), Some(form));
        assert_eq!(doc.element_by_id("r2"), Some(r2));
        assert_eq!(doc.element_by_id("missing"), None);
    }

    #[test]
    fn test_append_to_invalid_parent() {
        let (mut doc, ..) = sample();
        let bogus = NodeId::from_raw(u64::MAX);
        assert_eq!(
            doc.append(Some(bogus), Element::div()),
            Err(DocumentError::InvalidNode(bogus))
        );
    }

    #[test]
    fn test_enclosing_form_and_scope() {
        let (mut doc, form, r1, _) = sample();
        let loose = doc.append(None, Element::checkbox("c1", "extras")).unwrap();

        assert_eq!(doc.enclosing_form(r1), Some(form));
        assert_eq!(doc.scope_of(r1), Scope::Form(form));
        assert_eq!(doc.enclosing_form(loose), None);
        assert_eq!(doc.scope_of(loose), Scope::Document);
    }

    #[test]
    fn test_insert_after_keeps_document_order() {
        let (mut doc, form, r1, r2) = sample();
        let proxy = doc.insert_after(r1, Element::span().with_id("r1_img")).unwrap();
        assert_eq!(doc.children(form).unwrap(), [r1, proxy, r2]);
        assert_eq!(doc.preorder(), vec![form, r1, proxy, r2]);

        let tail = doc.insert_after(form, Element::div()).unwrap();
        assert_eq!(doc.preorder().last(), Some(&tail));
    }

    #[test]
    fn test_attribute_queries_respect_scope() {
        let (mut doc, form, r1, r2) = sample();
        let other_form = doc.append(None, Element::form()).unwrap();
        let r3 = doc.append(Some(other_form), Element::radio("r3", "color")).unwrap();

        assert_eq!(
            doc.elements_with_attribute(Scope::Form(form), "name", "color"),
            vec![r1, r2]
        );
        assert_eq!(
            doc.elements_with_attribute(Scope::Document, "name", "color"),
            vec![r1, r2, r3]
        );
        assert_eq!(
            doc.elements_with_attribute(Scope::Document, "type", "radio").len(),
            3
        );
    }

    #[test]
    fn test_control_and_checked() {
        let (mut doc, form, r1, r2) = sample();
        let info = doc.control(r2).unwrap();
        assert_eq!(info.kind, InputKind::Radio);
        assert_eq!(info.name.as_deref(), Some("color"));
        assert!(info.checked);

        doc.set_checked(r1, true).unwrap();
        assert!(doc.control(r1).unwrap().checked);
        assert_eq!(doc.control(form), Err(DocumentError::NotAnInput(form)));
        assert_eq!(doc.set_checked(form, true), Err(DocumentError::NotAnInput(form)));
    }

    #[test]
    fn test_labels_and_classes() {
        let (mut doc, form, r1, _) = sample();
        let label = doc.append(Some(form), Element::label("r1", "Red")).unwrap();
        doc.append(Some(form), Element::div().with_attribute("for", "r1"))
            .unwrap();

        assert_eq!(doc.labels_for("r1"), vec![label]);

        doc.set_class(r1, "picked", true).unwrap();
        assert!(doc.has_class(r1, "picked").unwrap());
        assert_eq!(doc.elements_with_class(Scope::Document, "picked"), vec![r1]);
        doc.set_class(r1, "picked", false).unwrap();
        assert!(!doc.has_class(r1, "picked").unwrap());
    }

    #[test]
    fn test_outer_html() {
        let (mut doc, form, r1, _) = sample();
        doc.set_hidden(r1, true).unwrap();
        doc.append(Some(form), Element::label("r1", "Red")).unwrap();

        assert_eq!(
            doc.outer_html(form).unwrap(),
            concat!(
                r#"<form><input type="radio" id="r1" name="color" style="display: none">"#,
                r#"<input type="radio" id="r2" name="color" checked>"#,
                r#"<label for="r1">Red</label></form>"#,
            )
        );
    }

    #[test]
    fn test_dump_tree_indents_children() {
        let (doc, ..) = sample();
        let dump = doc.dump_tree();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "<form>");
        assert!(lines[1].starts_with("  <input"));
    }
}
