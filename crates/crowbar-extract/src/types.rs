//! Shared types for the svg-crowbar extraction pipeline.

use serde::{Deserialize, Serialize};

/// Geometry of an SVG element in viewport coordinates.
///
/// Captured once at extraction time; the element may move afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Distance from the top edge of the viewport.
    pub top: f64,
    /// Distance from the left edge of the viewport.
    pub left: f64,
    /// Rendered width.
    pub width: f64,
    /// Rendered height.
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    #[must_use]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }
}

/// Identifying attributes copied verbatim from an `<svg>` element.
///
/// None of these are guaranteed to be present or unique.  They only
/// feed filename derivation and on-screen labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The `id` attribute.
    pub id: Option<String>,
    /// The `class` attribute.
    pub class_name: Option<String>,
    /// The `name` attribute.
    pub name: Option<String>,
}

/// One standalone SVG document extracted from a page.
///
/// A plain value: it holds no reference to the live tree it came from,
/// so it stays valid after the page mutates.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedSource {
    /// Geometry at capture time.
    pub bounding_box: BoundingBox,
    /// Identifying attributes of the `<svg>` element.
    pub identity: Identity,
    /// Number of direct element children at capture time.
    pub child_element_count: usize,
    serialized_document: String,
    markup_start: usize,
}

impl ExtractedSource {
    /// Assemble a source from a document preamble (XML declaration and
    /// doctype) and the serialized `<svg>` markup.
    #[must_use]
    pub fn new(
        bounding_box: BoundingBox,
        identity: Identity,
        child_element_count: usize,
        preamble: &str,
        markup: &str,
    ) -> Self {
        let mut serialized_document = String::with_capacity(preamble.len() + markup.len());
        serialized_document.push_str(preamble);
        serialized_document.push_str(markup);
        Self {
            bounding_box,
            identity,
            child_element_count,
            serialized_document,
            markup_start: preamble.len(),
        }
    }

    /// The complete standalone document: prolog, doctype and markup.
    #[must_use]
    pub fn serialized_document(&self) -> &str {
        &self.serialized_document
    }

    /// Only the `<svg>` markup, without prolog and doctype.
    ///
    /// Suitable for embedding into an HTML preview.
    #[must_use]
    pub fn svg_markup(&self) -> &str {
        &self.serialized_document[self.markup_start..]
    }
}

/// Errors reported by a [`DomDocument`](crate::DomDocument) operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The host environment rejected the operation.
    #[error("DOM operation failed: {0}")]
    Host(String),

    /// The element handle does not refer to a node of this document.
    #[error("element is not part of this document")]
    UnknownElement,

    /// The subtree cannot be written out as well-formed XML.
    #[error("cannot serialize subtree: {0}")]
    Serialization(String),
}

/// Errors that abort the extraction of a single `<svg>` element.
///
/// Other elements of the same run are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Writing the version or namespace attributes failed.
    #[error("failed to normalize svg element: {0}")]
    Normalize(#[source] DomError),

    /// Resolving or writing inline styles failed.
    #[error("failed to inline styles: {0}")]
    InlineStyles(#[source] DomError),

    /// The styled subtree could not be serialized.
    #[error("failed to serialize svg element: {0}")]
    Serialization(#[source] DomError),
}

/// Errors reported by [`collect_all`](crate::collect_all).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectError {
    /// No `<svg>` element was found in the page or in any accessible
    /// nested document.
    #[error("no SVG elements found in the page")]
    NoSourcesFound,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PREAMBLE: &str = r#"<?xml version="1.0" standalone="no"?>"#;

    #[test]
    fn source_exposes_document_and_markup() {
        let source = ExtractedSource::new(
            BoundingBox::default(),
            Identity::default(),
            0,
            PREAMBLE,
            "<svg/>",
        );
        assert_eq!(
            source.serialized_document(),
            r#"<?xml version="1.0" standalone="no"?><svg/>"#
        );
        assert_eq!(source.svg_markup(), "<svg/>");
    }

    #[test]
    fn source_with_empty_preamble() {
        let source = ExtractedSource::new(BoundingBox::default(), Identity::default(), 0, "", "<svg/>");
        assert_eq!(source.serialized_document(), source.svg_markup());
    }

    #[test]
    fn bounding_box_serde_round_trip() {
        let bbox = BoundingBox::new(10.0, 20.5, 300.0, 150.0);
        let json = serde_json::to_string(&bbox).unwrap();
        let deserialized: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(bbox, deserialized);
    }

    #[test]
    fn extract_error_display_includes_cause() {
        let err = ExtractError::Serialization(DomError::Serialization("bad name".into()));
        assert_eq!(
            err.to_string(),
            "failed to serialize svg element: cannot serialize subtree: bad name"
        );
    }

    #[test]
    fn collect_error_display() {
        assert_eq!(
            CollectError::NoSourcesFound.to_string(),
            "no SVG elements found in the page"
        );
    }
}
