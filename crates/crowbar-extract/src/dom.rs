//! Document tree abstraction the pipeline runs against.
//!
//! The pipeline never touches a concrete DOM.  It only needs child
//! traversal, attribute access, a resolved-style query and a
//! serializer, which [`DomDocument`] exposes.  The browser binding in
//! `crowbar-io` implements it over `web_sys`; [`MemoryDocument`] is a
//! synthetic implementation used by tests.
//!
//! A document value is a *handle* onto a shared, live tree, exactly
//! like a DOM `Document`, so every operation takes `&self`.
//!
//! [`MemoryDocument`]: crate::memory::MemoryDocument

use crate::types::{BoundingBox, DomError};

/// The resolved style of one element: property names and values in the
/// order the rendering engine reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedStyle(Vec<(String, String)>);

impl ComputedStyle {
    /// Create a resolved style from ordered `(property, value)` pairs.
    #[must_use]
    pub const fn new(properties: Vec<(String, String)>) -> Self {
        Self(properties)
    }

    /// Iterate over `(property, value)` pairs in engine order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Value of `property`, if the style lists it.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the number of listed properties.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no property is listed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ComputedStyle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A live document the extraction pipeline can read and mutate.
pub trait DomDocument: Sized {
    /// Handle to an element of this document.
    type Element: Clone;

    /// Handle to an embedded-document host (`<iframe>` or `<object>`).
    type Frame;

    /// Every `<svg>` element in document order.
    fn svg_elements(&self) -> Vec<Self::Element>;

    /// Direct element children of `element`, in order.
    fn child_elements(&self, element: &Self::Element) -> Vec<Self::Element>;

    /// Local (unprefixed) tag name of `element`.
    fn local_name(&self, element: &Self::Element) -> String;

    /// Value of the attribute with qualified name `name`.
    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Set the attribute with qualified name `name`.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if the host rejects the name or the element.
    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str)
    -> Result<(), DomError>;

    /// Remove the first attribute whose qualified name is `name`,
    /// regardless of its namespace.  Removing a missing attribute is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if the host rejects the element.
    fn remove_attribute(&self, element: &Self::Element, name: &str) -> Result<(), DomError>;

    /// Whether an attribute with namespace `namespace` and local name
    /// `local_name` exists.
    fn has_attribute_ns(&self, element: &Self::Element, namespace: &str, local_name: &str)
    -> bool;

    /// Create or replace the attribute identified by `namespace` and the
    /// local part of `qualified_name`.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if the qualified name is invalid for the
    /// namespace.
    fn set_attribute_ns(
        &self,
        element: &Self::Element,
        namespace: &str,
        qualified_name: &str,
        value: &str,
    ) -> Result<(), DomError>;

    /// The resolved style of `element`, owned (not a live view).
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if the host cannot resolve a style.
    fn computed_style(&self, element: &Self::Element) -> Result<ComputedStyle, DomError>;

    /// Current geometry of `element` in viewport coordinates.
    fn bounding_box(&self, element: &Self::Element) -> BoundingBox;

    /// Number of direct element children of `element`.
    fn child_element_count(&self, element: &Self::Element) -> usize;

    /// Serialize `element` and its subtree as XML.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Serialization`] if the subtree cannot be
    /// written as well-formed XML.
    fn serialize(&self, element: &Self::Element) -> Result<String, DomError>;

    /// The document title, if any.
    fn title(&self) -> Option<String>;

    /// Create a detached element in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if the host refuses to create the element.
    fn create_element_ns(&self, namespace: &str, name: &str) -> Result<Self::Element, DomError>;

    /// Connect a detached element to the document body so that style
    /// resolution works on engines that require a connected node.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if the document has no body.
    fn attach(&self, element: &Self::Element) -> Result<(), DomError>;

    /// Disconnect `element` from its parent.  A no-op when detached.
    fn detach(&self, element: &Self::Element);

    /// Every `<iframe>` followed by every `<object>` element, each group
    /// in document order.
    fn embedded_frames(&self) -> Vec<Self::Frame>;

    /// The document hosted by `frame`, or `None` when it is missing or
    /// cross-origin restricted.
    fn try_get_accessible_document(&self, frame: &Self::Frame) -> Option<Self>;
}
