//! Namespace normalization of `<svg>` roots.
//!
//! An `<svg>` copied out of an HTML page inherits its namespaces from
//! context and usually carries no declarations of its own.  Written out
//! on its own it would not be valid SVG, so the root gets an explicit
//! version and proper `xmlns` / `xmlns:xlink` declarations.

use crate::config::Namespaces;
use crate::dom::DomDocument;
use crate::types::DomError;

/// Qualified names of pre-existing declarations removed before the
/// namespaced ones are (re)added.
const STALE_DECLARATIONS: [&str; 3] = ["xmlns", "xlink", "xmlns:xlink"];

/// Give `svg` a `version="1.1"` attribute and namespace-qualified
/// declarations of the SVG and XLink namespaces.
///
/// Idempotent: normalizing twice leaves the same attribute set as
/// normalizing once.
///
/// # Errors
///
/// Returns the [`DomError`] of the first attribute operation the
/// document rejects.
pub fn normalize<D: DomDocument>(
    document: &D,
    svg: &D::Element,
    namespaces: &Namespaces,
) -> Result<(), DomError> {
    document.set_attribute(svg, "version", "1.1")?;

    for name in STALE_DECLARATIONS {
        document.remove_attribute(svg, name)?;
    }

    if !document.has_attribute_ns(svg, &namespaces.xmlns, "xmlns") {
        document.set_attribute_ns(svg, &namespaces.xmlns, "xmlns", &namespaces.svg)?;
    }
    if !document.has_attribute_ns(svg, &namespaces.xmlns, "xlink") {
        document.set_attribute_ns(svg, &namespaces.xmlns, "xmlns:xlink", &namespaces.xlink)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;

    fn xmlns() -> Option<String> {
        Some(Namespaces::XMLNS.to_owned())
    }

    #[test]
    fn adds_version_and_declarations() {
        let doc = MemoryDocument::new();
        let svg = doc.append_element(doc.body(), "svg");
        normalize(&doc, &svg, &Namespaces::default()).unwrap();

        assert_eq!(doc.attribute(&svg, "version").as_deref(), Some("1.1"));
        assert_eq!(doc.attribute(&svg, "xmlns").as_deref(), Some(Namespaces::SVG));
        assert_eq!(
            doc.attribute(&svg, "xmlns:xlink").as_deref(),
            Some(Namespaces::XLINK)
        );
        assert!(doc.has_attribute_ns(&svg, Namespaces::XMLNS, "xmlns"));
        assert!(doc.has_attribute_ns(&svg, Namespaces::XMLNS, "xlink"));
    }

    #[test]
    fn normalizing_twice_equals_normalizing_once() {
        let doc = MemoryDocument::new();
        let once = doc.append_element(doc.body(), "svg");
        let twice = doc.append_element(doc.body(), "svg");
        let namespaces = Namespaces::default();

        normalize(&doc, &once, &namespaces).unwrap();
        normalize(&doc, &twice, &namespaces).unwrap();
        normalize(&doc, &twice, &namespaces).unwrap();

        let mut a = doc.attribute_names(once);
        let mut b = doc.attribute_names(twice);
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn replaces_plain_string_declarations() {
        let doc = MemoryDocument::new();
        let svg = doc.append_element(doc.body(), "svg");
        doc.set_attribute(&svg, "xmlns", "urn:wrong").unwrap();
        doc.set_attribute(&svg, "xmlns:xlink", "urn:wrong").unwrap();
        doc.set_attribute(&svg, "xlink", "urn:wrong").unwrap();

        normalize(&doc, &svg, &Namespaces::default()).unwrap();

        let names = doc.attribute_names(svg);
        assert!(names.contains(&(xmlns(), "xmlns".to_owned())));
        assert!(names.contains(&(xmlns(), "xmlns:xlink".to_owned())));
        assert!(!names.iter().any(|(_, n)| n == "xlink"));
        assert_eq!(names.len(), 3);
        assert!(doc.serialize(&svg).is_ok());
    }

    #[test]
    fn keeps_unrelated_attributes() {
        let doc = MemoryDocument::new();
        let svg = doc.append_element(doc.body(), "svg");
        doc.set_attribute(&svg, "viewBox", "0 0 10 10").unwrap();
        doc.set_attribute(&svg, "version", "2.0").unwrap();

        normalize(&doc, &svg, &Namespaces::default()).unwrap();

        assert_eq!(doc.attribute(&svg, "viewBox").as_deref(), Some("0 0 10 10"));
        assert_eq!(doc.attribute(&svg, "version").as_deref(), Some("1.1"));
    }

    #[test]
    fn uses_injected_namespaces() {
        let doc = MemoryDocument::new();
        let svg = doc.append_element(doc.body(), "svg");
        let namespaces = Namespaces {
            svg: "urn:test:svg".into(),
            ..Namespaces::default()
        };
        normalize(&doc, &svg, &namespaces).unwrap();
        assert_eq!(doc.attribute(&svg, "xmlns").as_deref(), Some("urn:test:svg"));
    }
}
