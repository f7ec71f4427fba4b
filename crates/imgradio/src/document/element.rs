//! Element data stored in a [`Document`](super::Document).

use std::collections::BTreeMap;
use std::fmt;

/// The `type` of an `<input>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// `<input type="radio">`
    Radio,
    /// `<input type="checkbox">`
    Checkbox,
    /// `<input type="text">`
    Text,
    /// `<input type="hidden">`
    Hidden,
}

impl InputKind {
    /// The value of the `type` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Text => "text",
            Self::Hidden => "hidden",
        }
    }

    /// Whether the input carries a boolean checked state.
    pub fn is_toggle(self) -> bool {
        matches!(self, Self::Radio | Self::Checkbox)
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Form,
    Input(InputKind),
    Label,
    Span,
    Div,
}

impl Tag {
    /// The HTML tag name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Input(_) => "input",
            Self::Label => "label",
            Self::Span => "span",
            Self::Div => "div",
        }
    }
}

/// A single element: its tag, identity, classes, attributes and, for inputs,
/// the checked state.
///
/// Elements are built with the `with_*` methods and then handed to
/// [`Document::append`](super::Document::append) or
/// [`HostDocument::insert_after`](super::HostDocument::insert_after).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: Tag,
    id: Option<String>,
    name: Option<String>,
    checked: bool,
    hidden: bool,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
}

impl Element {
    /// Create an element with the given tag and nothing else.
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            id: None,
            name: None,
            checked: false,
            hidden: false,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: None,
        }
    }

    pub fn form() -> Self {
        Self::new(Tag::Form)
    }

    pub fn div() -> Self {
        Self::new(Tag::Div)
    }

    pub fn span() -> Self {
        Self::new(Tag::Span)
    }

    /// Create an `<input>` of the given kind.
    pub fn input(kind: InputKind) -> Self {
        Self::new(Tag::Input(kind))
    }

    /// Create a radio button with an identifier and a group name.
    pub fn radio(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::input(InputKind::Radio).with_id(id).with_name(name)
    }

    /// Create a checkbox with an identifier and a group name.
    pub fn checkbox(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::input(InputKind::Checkbox).with_id(id).with_name(name)
    }

    /// Create a `<label for="...">` with text content.
    pub fn label(for_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Tag::Label)
            .with_attribute("for", for_id)
            .with_text(text)
    }

    // =========================================================================
    // Builders
    // =========================================================================

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    /// Set a generic attribute. `id` and `name` have dedicated builders.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The input kind, or `None` for non-input elements.
    pub fn input_kind(&self) -> Option<InputKind> {
        match self.tag {
            Tag::Input(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Whether the element is removed from layout (`display: none`).
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Look up an attribute value.
    ///
    /// `id`, `name` and `type` resolve to the element's identity fields so
    /// attribute queries see the same values a selector engine would.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id(),
            "name" => self.name(),
            "type" => self.input_kind().map(InputKind::as_str),
            _ => self.attributes.get(name).map(String::as_str),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    pub(crate) fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Add a class. Returns `false` if it was already present.
    pub(crate) fn add_class(&mut self, class: impl Into<String>) -> bool {
        let class = class.into();
        if self.has_class(&class) {
            return false;
        }
        self.classes.push(class);
        true
    }

    /// Remove a class. Returns `false` if it was not present.
    pub(crate) fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        self.classes.len() != before
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Write the opening tag, e.g. `<span class="radio_img" id="r1_img">`.
    pub(crate) fn write_open_tag(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag.name());
        if let Some(kind) = self.input_kind() {
            push_attr(out, "type", kind.as_str());
        }
        if !self.classes.is_empty() {
            push_attr(out, "class", &self.classes.join(" "));
        }
        if let Some(id) = &self.id {
            push_attr(out, "id", id);
        }
        if let Some(name) = &self.name {
            push_attr(out, "name", name);
        }
        for (name, value) in &self.attributes {
            push_attr(out, name, value);
        }
        if self.checked {
            out.push_str(" checked");
        }
        if self.hidden {
            push_attr(out, "style", "display: none");
        }
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}
