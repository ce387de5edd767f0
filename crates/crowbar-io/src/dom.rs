//! [`DomDocument`] over the live browser DOM.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use crowbar_extract::{BoundingBox, ComputedStyle, DomDocument, DomError};
use wasm_bindgen::{JsCast, JsValue};

/// Convert a thrown JS value into a [`DomError`].
fn host_error(value: &JsValue) -> DomError {
    DomError::Host(format!("{value:?}"))
}

/// Every element of `document` matching `selector`, in document order.
///
/// `document` may belong to another realm (a same-origin frame), where
/// `instanceof` checks against this module's constructors fail, so the
/// nodes are cast unchecked.  `querySelectorAll` only yields elements.
fn query_all(document: &web_sys::Document, selector: &str) -> Vec<web_sys::Element> {
    let list = match document.query_selector_all(selector) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("querySelectorAll({selector}) failed: {e:?}");
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|node| node.unchecked_into::<web_sys::Element>())
        .collect()
}

/// `value` as a document, when it is an object at all.
fn document_from_value(value: JsValue) -> Option<web_sys::Document> {
    value
        .is_object()
        .then(|| value.unchecked_into::<web_sys::Document>())
}

/// A browser `Document` handle.
#[derive(Debug, Clone)]
pub struct BrowserDocument(web_sys::Document);

impl BrowserDocument {
    /// Wrap an existing document.
    #[must_use]
    pub const fn new(document: web_sys::Document) -> Self {
        Self(document)
    }

    /// The document of the global window.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Host`] outside a browser window.
    pub fn current() -> Result<Self, DomError> {
        web_sys::window()
            .ok_or_else(|| DomError::Host("no global window".into()))?
            .document()
            .map(Self)
            .ok_or_else(|| DomError::Host("no document".into()))
    }

    /// The wrapped document.
    #[must_use]
    pub const fn inner(&self) -> &web_sys::Document {
        &self.0
    }
}

impl DomDocument for BrowserDocument {
    type Element = web_sys::Element;
    type Frame = web_sys::Element;

    fn svg_elements(&self) -> Vec<web_sys::Element> {
        query_all(&self.0, "svg")
    }

    fn child_elements(&self, element: &web_sys::Element) -> Vec<web_sys::Element> {
        let children = element.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .collect()
    }

    fn local_name(&self, element: &web_sys::Element) -> String {
        element.local_name()
    }

    fn attribute(&self, element: &web_sys::Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(
        &self,
        element: &web_sys::Element,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        element.set_attribute(name, value).map_err(|e| host_error(&e))
    }

    fn remove_attribute(&self, element: &web_sys::Element, name: &str) -> Result<(), DomError> {
        element.remove_attribute(name).map_err(|e| host_error(&e))
    }

    fn has_attribute_ns(&self, element: &web_sys::Element, namespace: &str, local_name: &str) -> bool {
        element.has_attribute_ns(Some(namespace), local_name)
    }

    fn set_attribute_ns(
        &self,
        element: &web_sys::Element,
        namespace: &str,
        qualified_name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        element
            .set_attribute_ns(Some(namespace), qualified_name, value)
            .map_err(|e| host_error(&e))
    }

    fn computed_style(&self, element: &web_sys::Element) -> Result<ComputedStyle, DomError> {
        let window = self
            .0
            .default_view()
            .ok_or_else(|| DomError::Host("document has no window".into()))?;
        let declaration = window
            .get_computed_style(element)
            .map_err(|e| host_error(&e))?
            .ok_or_else(|| DomError::Host("no computed style".into()))?;

        // Copy out: the declaration is live and changes as styles are inlined.
        let mut properties = Vec::with_capacity(declaration.length() as usize);
        for i in 0..declaration.length() {
            let name = declaration.item(i);
            let value = declaration
                .get_property_value(&name)
                .map_err(|e| host_error(&e))?;
            properties.push((name, value));
        }
        Ok(ComputedStyle::new(properties))
    }

    fn bounding_box(&self, element: &web_sys::Element) -> BoundingBox {
        let rect = element.get_bounding_client_rect();
        BoundingBox::new(rect.top(), rect.left(), rect.width(), rect.height())
    }

    fn child_element_count(&self, element: &web_sys::Element) -> usize {
        element.child_element_count() as usize
    }

    fn serialize(&self, element: &web_sys::Element) -> Result<String, DomError> {
        let serializer = web_sys::XmlSerializer::new().map_err(|e| host_error(&e))?;
        serializer
            .serialize_to_string(element)
            .map_err(|e| DomError::Serialization(format!("{e:?}")))
    }

    fn title(&self) -> Option<String> {
        Some(self.0.title()).filter(|t| !t.is_empty())
    }

    fn create_element_ns(&self, namespace: &str, name: &str) -> Result<web_sys::Element, DomError> {
        self.0
            .create_element_ns(Some(namespace), name)
            .map_err(|e| host_error(&e))
    }

    fn attach(&self, element: &web_sys::Element) -> Result<(), DomError> {
        let body = self
            .0
            .body()
            .ok_or_else(|| DomError::Host("document has no body".into()))?;
        body.append_child(element).map_err(|e| host_error(&e))?;
        Ok(())
    }

    fn detach(&self, element: &web_sys::Element) {
        element.remove();
    }

    fn embedded_frames(&self) -> Vec<web_sys::Element> {
        let mut frames = query_all(&self.0, "iframe");
        frames.extend(query_all(&self.0, "object"));
        frames
    }

    fn try_get_accessible_document(&self, frame: &web_sys::Element) -> Option<Self> {
        // Cross-origin hosts report `null` or throw; both mean "not ours".
        // A readable document comes from the frame's own realm, where
        // `instanceof Document` is false, so it is cast unchecked.
        let value = js_sys::Reflect::get(frame, &JsValue::from_str("contentDocument")).ok()?;
        document_from_value(value).map(Self)
    }
}
