//! In-memory document tree.
//!
//! [`MemoryDocument`] implements [`DomDocument`] without a rendering
//! engine.  Resolved styles are modelled as a document-wide initial
//! style (what an unstyled element resolves to) with per-element
//! overrides on top; there is no cascade and no inheritance.  Every
//! style query is recorded, see [`MemoryDocument::take_style_queries`].
//! Geometry is whatever the builder stores.
//!
//! Serialization writes the subtree as XML.  Like a browser's
//! `XMLSerializer`, it declares the prefix of a namespaced element or
//! attribute when no ancestor in the written subtree does.  It rejects
//! anything that would not be namespace-well-formed: invalid names,
//! duplicate attributes and prefixes bound to no namespace.

use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

use crate::dom::{ComputedStyle, DomDocument};
use crate::types::{BoundingBox, DomError};

/// Handle to a node of a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Which element hosts an embedded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// An `<iframe>` element.
    IFrame,
    /// An `<object>` element.
    Object,
}

/// What an embedded-document host gives access to.
#[derive(Debug, Clone)]
pub enum FrameContent {
    /// A same-origin document.
    Accessible(MemoryDocument),
    /// A document the embedding page may not read.
    CrossOrigin,
    /// No document loaded.
    Empty,
}

/// An `<iframe>` or `<object>` element of a [`MemoryDocument`].
#[derive(Debug, Clone)]
pub struct MemoryFrame {
    /// Hosting element kind.
    pub kind: FrameKind,
    /// Hosted document.
    pub content: FrameContent,
}

#[derive(Debug, Clone)]
struct Attribute {
    namespace: Option<String>,
    name: String,
    value: String,
}

impl Attribute {
    fn local_name(&self) -> &str {
        self.name.rsplit_once(':').map_or(&self.name, |(_, local)| local)
    }
}

#[derive(Debug)]
enum NodeData {
    Element {
        name: String,
        namespace: Option<String>,
        attributes: Vec<Attribute>,
        style_overrides: Vec<(String, String)>,
        bounds: BoundingBox,
    },
    Text(String),
}

#[derive(Debug)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    title: Option<String>,
    initial_style: ComputedStyle,
    frames: Vec<MemoryFrame>,
    style_queries: Vec<NodeId>,
}

impl Tree {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn push(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent
            && let Some(node) = self.nodes.get_mut(parent.0)
        {
            node.children.push(id);
        }
        id
    }

    fn attributes_mut(&mut self, id: NodeId) -> Result<&mut Vec<Attribute>, DomError> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.data) {
            Some(NodeData::Element { attributes, .. }) => Ok(attributes),
            _ => Err(DomError::UnknownElement),
        }
    }

    fn element_name(&self, id: NodeId) -> Option<&str> {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Element { name, .. }) => Some(name),
            _ => None,
        }
    }

    fn is_element(&self, id: NodeId) -> bool {
        self.element_name(id).is_some()
    }

    fn preorder_elements(&self, from: NodeId, out: &mut Vec<NodeId>) {
        if !self.is_element(from) {
            return;
        }
        out.push(from);
        if let Some(node) = self.node(from) {
            for &child in &node.children {
                self.preorder_elements(child, out);
            }
        }
    }

    /// Write `id` and its subtree.  `scope` holds the `(prefix, uri)`
    /// bindings declared by the ancestors written so far; `""` is the
    /// default namespace.
    fn write_node(
        &self,
        id: NodeId,
        scope: &mut Vec<(String, String)>,
        out: &mut String,
    ) -> Result<(), DomError> {
        let node = self.node(id).ok_or(DomError::UnknownElement)?;
        match &node.data {
            NodeData::Text(text) => {
                out.push_str(&xml_escape_text(text));
                Ok(())
            }
            NodeData::Element {
                name,
                namespace,
                attributes,
                ..
            } => {
                if !is_qualified_name(name) {
                    return Err(DomError::Serialization(format!(
                        "invalid element name {name:?}"
                    )));
                }
                let outer = scope.len();
                for (i, attr) in attributes.iter().enumerate() {
                    if !is_qualified_name(&attr.name) {
                        return Err(DomError::Serialization(format!(
                            "invalid attribute name {:?} on <{name}>",
                            attr.name
                        )));
                    }
                    if attributes[..i].iter().any(|a| a.name == attr.name) {
                        return Err(DomError::Serialization(format!(
                            "duplicate attribute {:?} on <{name}>",
                            attr.name
                        )));
                    }
                    if attr.name == "xmlns" {
                        scope.push((String::new(), attr.value.clone()));
                    } else if let Some(prefix) = attr.name.strip_prefix("xmlns:") {
                        scope.push((prefix.to_owned(), attr.value.clone()));
                    }
                }

                let mut declared = Vec::new();
                if let Some(prefix) = prefix_of(name) {
                    bind_prefix(prefix, namespace.as_deref(), scope, &mut declared)
                        .map_err(|e| DomError::Serialization(format!("{e} on <{name}>")))?;
                }
                for attr in attributes {
                    if let Some(prefix) = prefix_of(&attr.name).filter(|&p| p != "xmlns") {
                        bind_prefix(prefix, attr.namespace.as_deref(), scope, &mut declared)
                            .map_err(|e| {
                                DomError::Serialization(format!(
                                    "{e} in attribute {:?} on <{name}>",
                                    attr.name
                                ))
                            })?;
                    }
                }

                let _ = write!(out, "<{name}");
                for attr in attributes {
                    let _ = write!(out, " {}=\"{}\"", attr.name, xml_escape_attr(&attr.value));
                }
                for (prefix, uri) in &declared {
                    let _ = write!(out, " xmlns:{prefix}=\"{}\"", xml_escape_attr(uri));
                }
                if node.children.is_empty() {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    for &child in &node.children {
                        self.write_node(child, scope, out)?;
                    }
                    let _ = write!(out, "</{name}>");
                }
                scope.truncate(outer);
                Ok(())
            }
        }
    }
}

/// A synthetic, shared, mutable document.
///
/// Cloning yields another handle onto the same tree.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    tree: Rc<RefCell<Tree>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create a document containing `<html><body/></html>` and an empty
    /// initial style.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Tree {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            title: None,
            initial_style: ComputedStyle::default(),
            frames: Vec::new(),
            style_queries: Vec::new(),
        };
        let root = tree.push(element_data("html", None), None);
        let body = tree.push(element_data("body", None), Some(root));
        tree.root = root;
        tree.body = body;
        Self {
            tree: Rc::new(RefCell::new(tree)),
        }
    }

    /// Set the style every element resolves to before its own overrides,
    /// including freshly created unstyled elements.
    pub fn set_initial_style(&self, style: ComputedStyle) {
        self.tree.borrow_mut().initial_style = style;
    }

    /// Set the document title.
    pub fn set_title(&self, title: &str) {
        self.tree.borrow_mut().title = Some(title.to_owned());
    }

    /// The `<html>` element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.tree.borrow().root
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.tree.borrow().body
    }

    /// Append a new element named `name` (which may carry a prefix) as
    /// the last child of `parent`.
    pub fn append_element(&self, parent: NodeId, name: &str) -> NodeId {
        self.tree
            .borrow_mut()
            .push(element_data(name, None), Some(parent))
    }

    /// Append a text node as the last child of `parent`.
    pub fn append_text(&self, parent: NodeId, text: &str) -> NodeId {
        self.tree
            .borrow_mut()
            .push(NodeData::Text(text.to_owned()), Some(parent))
    }

    /// Make `property` resolve to `value` on `element`.
    pub fn set_resolved(&self, element: NodeId, property: &str, value: &str) {
        let mut tree = self.tree.borrow_mut();
        if let Some(NodeData::Element {
            style_overrides, ..
        }) = tree.nodes.get_mut(element.0).map(|n| &mut n.data)
        {
            if let Some(slot) = style_overrides.iter_mut().find(|(k, _)| k == property) {
                value.clone_into(&mut slot.1);
            } else {
                style_overrides.push((property.to_owned(), value.to_owned()));
            }
        }
    }

    /// Store the geometry reported for `element`.
    pub fn set_bounding_box(&self, element: NodeId, bounds: BoundingBox) {
        let mut tree = self.tree.borrow_mut();
        if let Some(NodeData::Element { bounds: slot, .. }) =
            tree.nodes.get_mut(element.0).map(|n| &mut n.data)
        {
            *slot = bounds;
        }
    }

    /// Add an embedded-document host.
    pub fn add_frame(&self, kind: FrameKind, content: FrameContent) {
        self.tree
            .borrow_mut()
            .frames
            .push(MemoryFrame { kind, content });
    }

    /// Elements whose style was queried since the last call, in query
    /// order.  Clears the record.
    #[must_use]
    pub fn take_style_queries(&self) -> Vec<NodeId> {
        std::mem::take(&mut self.tree.borrow_mut().style_queries)
    }

    /// Parent of `node`, if attached.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.borrow().node(node).and_then(|n| n.parent)
    }

    /// Namespace an element was created in, if any.
    #[must_use]
    pub fn namespace_uri(&self, element: NodeId) -> Option<String> {
        match self.tree.borrow().node(element).map(|n| &n.data) {
            Some(NodeData::Element { namespace, .. }) => namespace.clone(),
            _ => None,
        }
    }

    /// Qualified names of the attributes of `element` in storage order,
    /// paired with their namespace.
    #[must_use]
    pub fn attribute_names(&self, element: NodeId) -> Vec<(Option<String>, String)> {
        match self.tree.borrow().node(element).map(|n| &n.data) {
            Some(NodeData::Element { attributes, .. }) => attributes
                .iter()
                .map(|a| (a.namespace.clone(), a.name.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl DomDocument for MemoryDocument {
    type Element = NodeId;
    type Frame = MemoryFrame;

    fn svg_elements(&self) -> Vec<NodeId> {
        let tree = self.tree.borrow();
        let mut all = Vec::new();
        tree.preorder_elements(tree.root, &mut all);
        all.into_iter()
            .filter(|&id| tree.element_name(id).is_some_and(|n| local_part(n) == "svg"))
            .collect()
    }

    fn child_elements(&self, element: &NodeId) -> Vec<NodeId> {
        let tree = self.tree.borrow();
        tree.node(*element)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|&c| tree.is_element(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn local_name(&self, element: &NodeId) -> String {
        self.tree
            .borrow()
            .element_name(*element)
            .map(|n| local_part(n).to_owned())
            .unwrap_or_default()
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        match self.tree.borrow().node(*element).map(|n| &n.data) {
            Some(NodeData::Element { attributes, .. }) => attributes
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.clone()),
            _ => None,
        }
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        let attributes = tree.attributes_mut(*element)?;
        if let Some(attr) = attributes.iter_mut().find(|a| a.name == name) {
            value.clone_into(&mut attr.value);
        } else {
            attributes.push(Attribute {
                namespace: None,
                name: name.to_owned(),
                value: value.to_owned(),
            });
        }
        Ok(())
    }

    fn remove_attribute(&self, element: &NodeId, name: &str) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        let attributes = tree.attributes_mut(*element)?;
        if let Some(pos) = attributes.iter().position(|a| a.name == name) {
            attributes.remove(pos);
        }
        Ok(())
    }

    fn has_attribute_ns(&self, element: &NodeId, namespace: &str, local_name: &str) -> bool {
        match self.tree.borrow().node(*element).map(|n| &n.data) {
            Some(NodeData::Element { attributes, .. }) => attributes.iter().any(|a| {
                a.namespace.as_deref() == Some(namespace) && a.local_name() == local_name
            }),
            _ => false,
        }
    }

    fn set_attribute_ns(
        &self,
        element: &NodeId,
        namespace: &str,
        qualified_name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        if !is_qualified_name(qualified_name) {
            return Err(DomError::Host(format!(
                "invalid qualified name {qualified_name:?}"
            )));
        }
        let local = local_part(qualified_name);
        let mut tree = self.tree.borrow_mut();
        let attributes = tree.attributes_mut(*element)?;
        if let Some(attr) = attributes
            .iter_mut()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.local_name() == local)
        {
            value.clone_into(&mut attr.value);
        } else {
            attributes.push(Attribute {
                namespace: Some(namespace.to_owned()),
                name: qualified_name.to_owned(),
                value: value.to_owned(),
            });
        }
        Ok(())
    }

    fn computed_style(&self, element: &NodeId) -> Result<ComputedStyle, DomError> {
        self.tree.borrow_mut().style_queries.push(*element);
        let tree = self.tree.borrow();
        let Some(NodeData::Element {
            style_overrides, ..
        }) = tree.node(*element).map(|n| &n.data)
        else {
            return Err(DomError::UnknownElement);
        };
        let mut resolved: Vec<(String, String)> = tree
            .initial_style
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        for (property, value) in style_overrides {
            if let Some(slot) = resolved.iter_mut().find(|(k, _)| k == property) {
                value.clone_into(&mut slot.1);
            } else {
                resolved.push((property.clone(), value.clone()));
            }
        }
        Ok(ComputedStyle::new(resolved))
    }

    fn bounding_box(&self, element: &NodeId) -> BoundingBox {
        match self.tree.borrow().node(*element).map(|n| &n.data) {
            Some(NodeData::Element { bounds, .. }) => *bounds,
            _ => BoundingBox::default(),
        }
    }

    fn child_element_count(&self, element: &NodeId) -> usize {
        self.child_elements(element).len()
    }

    fn serialize(&self, element: &NodeId) -> Result<String, DomError> {
        let tree = self.tree.borrow();
        if !tree.is_element(*element) {
            return Err(DomError::UnknownElement);
        }
        let mut out = String::new();
        tree.write_node(*element, &mut Vec::new(), &mut out)?;
        Ok(out)
    }

    fn title(&self) -> Option<String> {
        self.tree.borrow().title.clone()
    }

    fn create_element_ns(&self, namespace: &str, name: &str) -> Result<NodeId, DomError> {
        if !is_qualified_name(name) {
            return Err(DomError::Host(format!("invalid element name {name:?}")));
        }
        Ok(self
            .tree
            .borrow_mut()
            .push(element_data(name, Some(namespace)), None))
    }

    fn attach(&self, element: &NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        if !tree.is_element(*element) {
            return Err(DomError::UnknownElement);
        }
        let body = tree.body;
        detach_node(&mut tree, *element);
        if let Some(node) = tree.nodes.get_mut(element.0) {
            node.parent = Some(body);
        }
        if let Some(node) = tree.nodes.get_mut(body.0) {
            node.children.push(*element);
        }
        Ok(())
    }

    fn detach(&self, element: &NodeId) {
        detach_node(&mut self.tree.borrow_mut(), *element);
    }

    fn embedded_frames(&self) -> Vec<MemoryFrame> {
        let tree = self.tree.borrow();
        let iframes = tree.frames.iter().filter(|f| f.kind == FrameKind::IFrame);
        let objects = tree.frames.iter().filter(|f| f.kind == FrameKind::Object);
        iframes.chain(objects).cloned().collect()
    }

    fn try_get_accessible_document(&self, frame: &MemoryFrame) -> Option<Self> {
        match &frame.content {
            FrameContent::Accessible(doc) => Some(doc.clone()),
            FrameContent::CrossOrigin | FrameContent::Empty => None,
        }
    }
}

fn element_data(name: &str, namespace: Option<&str>) -> NodeData {
    NodeData::Element {
        name: name.to_owned(),
        namespace: namespace.map(str::to_owned),
        attributes: Vec::new(),
        style_overrides: Vec::new(),
        bounds: BoundingBox::default(),
    }
}

fn detach_node(tree: &mut Tree, id: NodeId) {
    let Some(parent) = tree.nodes.get_mut(id.0).and_then(|n| n.parent.take()) else {
        return;
    };
    if let Some(node) = tree.nodes.get_mut(parent.0) {
        node.children.retain(|&c| c != id);
    }
}

fn prefix_of(name: &str) -> Option<&str> {
    name.split_once(':').map(|(prefix, _)| prefix)
}

/// Make sure `prefix` is bound, declaring it for `namespace` if needed.
/// New declarations go to both `scope` and `declared`.
fn bind_prefix(
    prefix: &str,
    namespace: Option<&str>,
    scope: &mut Vec<(String, String)>,
    declared: &mut Vec<(String, String)>,
) -> Result<(), String> {
    if prefix == "xml" || scope.iter().any(|(p, _)| p == prefix) {
        return Ok(());
    }
    let uri = namespace.ok_or_else(|| format!("unbound namespace prefix {prefix:?}"))?;
    scope.push((prefix.to_owned(), uri.to_owned()));
    declared.push((prefix.to_owned(), uri.to_owned()));
    Ok(())
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// An XML name with at most one colon, neither leading nor trailing.
fn is_qualified_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | ':')) {
        return false;
    }
    match name.matches(':').count() {
        0 => true,
        1 => !name.ends_with(':'),
        _ => false,
    }
}

/// Escape text content: `&`, `<` and `>`.
fn xml_escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
///
/// Tabs and line breaks become character references so that attribute
/// value normalization does not rewrite them on re-parse.
fn xml_escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            other => out.push(other),
        }
    }
    out
}
