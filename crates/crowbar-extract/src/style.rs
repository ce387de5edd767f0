//! Baseline probing and style inlining.
//!
//! An extracted SVG must look the same without the page's stylesheets,
//! so every element gets its resolved style written into its `style`
//! attribute.  Writing *every* property would bloat the output with
//! defaults, so properties whose value matches an unstyled `<svg>`
//! element (the [`StyleBaseline`]) are left out.

use std::collections::HashMap;
use std::fmt::Write;

use crate::config::Namespaces;
use crate::dom::{ComputedStyle, DomDocument};
use crate::types::DomError;

/// Resolved style of a freshly created, unstyled `<svg>` element.
///
/// Computed once per collection run and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleBaseline(HashMap<String, String>);

impl StyleBaseline {
    /// Snapshot a resolved style as a baseline.
    #[must_use]
    pub fn from_style(style: &ComputedStyle) -> Self {
        Self(
            style
                .iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        )
    }

    /// Baseline value of `property`.
    ///
    /// Unknown properties report the empty string, as a style
    /// declaration does.
    #[must_use]
    pub fn value(&self, property: &str) -> &str {
        self.0.get(property).map_or("", String::as_str)
    }

    /// Returns the number of properties in the baseline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the baseline holds no property.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compute the [`StyleBaseline`] for `document`.
///
/// Creates an `<svg>` element in the SVG namespace, connects it to the
/// body so that style resolution works, snapshots its resolved style
/// and disconnects it again before returning.  Nothing runs in between,
/// so the page never renders the probe.
///
/// Never fails: if the probe cannot be created or resolved, the failure
/// is logged and an empty baseline is returned, which makes the inliner
/// write every resolved property.
pub fn compute_baseline<D: DomDocument>(document: &D, namespaces: &Namespaces) -> StyleBaseline {
    match probe_style(document, namespaces) {
        Ok(style) => StyleBaseline::from_style(&style),
        Err(e) => {
            log::warn!("baseline style probe failed, inlining all properties: {e}");
            StyleBaseline::default()
        }
    }
}

fn probe_style<D: DomDocument>(
    document: &D,
    namespaces: &Namespaces,
) -> Result<ComputedStyle, DomError> {
    let probe = document.create_element_ns(&namespaces.svg, "svg")?;
    let attached = document.attach(&probe);
    if let Err(e) = &attached {
        log::debug!("resolving baseline on a detached probe: {e}");
    }
    let style = document.computed_style(&probe);
    if attached.is_ok() {
        document.detach(&probe);
    }
    style
}

/// Build the inline declaration for one element: `name:value;` for each
/// property of `style` whose value differs from the baseline, in the
/// order of `style`.
#[must_use]
pub fn inline_declaration(style: &ComputedStyle, baseline: &StyleBaseline) -> String {
    let mut declaration = String::new();
    for (property, value) in style.iter() {
        if value != baseline.value(property) {
            let _ = write!(declaration, "{property}:{value};");
        }
    }
    declaration
}

/// `root` and its descendant elements in depth-first pre-order.
///
/// Script elements are skipped together with their subtrees.
pub fn styled_elements<D: DomDocument>(document: &D, root: &D::Element) -> Vec<D::Element> {
    let mut visited = vec![root.clone()];
    visit(document, root, &mut visited);
    visited
}

fn visit<D: DomDocument>(document: &D, node: &D::Element, visited: &mut Vec<D::Element>) {
    for child in document.child_elements(node) {
        if document.local_name(&child).eq_ignore_ascii_case("script") {
            continue;
        }
        visited.push(child.clone());
        visit(document, &child, visited);
    }
}

/// Write the inline style of every element under `root` (inclusive).
///
/// Elements are styled in reverse pre-order, children before their
/// parents, so no element is resolved after an ancestor's `style`
/// attribute has been rewritten.  The attribute is always written, even
/// when empty.
///
/// # Errors
///
/// Returns the first [`DomError`] raised while resolving or writing a
/// style.  Elements already processed keep their new style.
pub fn inline_styles<D: DomDocument>(
    document: &D,
    root: &D::Element,
    baseline: &StyleBaseline,
) -> Result<(), DomError> {
    for element in styled_elements(document, root).iter().rev() {
        let style = document.computed_style(element)?;
        let declaration = inline_declaration(&style, baseline);
        document.set_attribute(element, "style", &declaration)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;

    fn defaults() -> ComputedStyle {
        ComputedStyle::from_iter([
            ("fill", "rgb(0, 0, 0)"),
            ("stroke", "none"),
            ("display", "inline"),
            ("font-size", "16px"),
        ])
    }

    fn document() -> MemoryDocument {
        let doc = MemoryDocument::new();
        doc.set_initial_style(defaults());
        doc
    }

    #[test]
    fn baseline_snapshots_unstyled_svg() {
        let doc = document();
        let baseline = compute_baseline(&doc, &Namespaces::default());
        assert_eq!(baseline.len(), 4);
        assert_eq!(baseline.value("fill"), "rgb(0, 0, 0)");
        assert_eq!(baseline.value("no-such-property"), "");
    }

    #[test]
    fn baseline_leaves_nothing_behind() {
        let doc = document();
        let before = doc.child_elements(&doc.body());
        let _ = compute_baseline(&doc, &Namespaces::default());
        assert_eq!(doc.child_elements(&doc.body()), before);
        assert!(doc.svg_elements().is_empty());
    }

    #[test]
    fn baseline_element_is_created_in_svg_namespace() {
        let doc = document();
        let probe = doc.create_element_ns(Namespaces::SVG, "svg").unwrap();
        assert_eq!(doc.namespace_uri(probe).as_deref(), Some(Namespaces::SVG));
    }

    #[test]
    fn empty_baseline_inlines_everything() {
        let baseline = StyleBaseline::default();
        assert!(baseline.is_empty());
        assert_eq!(
            inline_declaration(&defaults(), &baseline),
            "fill:rgb(0, 0, 0);stroke:none;display:inline;font-size:16px;"
        );
    }

    #[test]
    fn declaration_empty_when_style_equals_baseline() {
        let baseline = StyleBaseline::from_style(&defaults());
        assert_eq!(inline_declaration(&defaults(), &baseline), "");
    }

    #[test]
    fn declaration_lists_each_differing_property_once_in_order() {
        let baseline = StyleBaseline::from_style(&defaults());
        let style = ComputedStyle::from_iter([
            ("fill", "rgb(255, 0, 0)"),
            ("stroke", "none"),
            ("display", "inline"),
            ("font-size", "12px"),
        ]);
        assert_eq!(
            inline_declaration(&style, &baseline),
            "fill:rgb(255, 0, 0);font-size:12px;"
        );
    }

    #[test]
    fn declaration_includes_properties_missing_from_baseline() {
        let baseline = StyleBaseline::from_style(&defaults());
        let style = ComputedStyle::from_iter([("width", "300px"), ("height", "")]);
        // An empty value equals the implicit empty baseline value.
        assert_eq!(inline_declaration(&style, &baseline), "width:300px;");
    }

    #[test]
    fn styled_elements_preorder_without_scripts() {
        let doc = document();
        let svg = doc.append_element(doc.body(), "svg");
        let g = doc.append_element(svg, "g");
        let rect = doc.append_element(g, "rect");
        let script = doc.append_element(svg, "script");
        let inside_script = doc.append_element(script, "g");
        let upper_script = doc.append_element(g, "SCRIPT");
        let circle = doc.append_element(svg, "circle");

        let visited = styled_elements(&doc, &svg);
        assert_eq!(visited, vec![svg, g, rect, circle]);
        assert!(!visited.contains(&script));
        assert!(!visited.contains(&inside_script));
        assert!(!visited.contains(&upper_script));
    }

    #[test]
    fn inline_styles_writes_every_visited_element() {
        let doc = document();
        let svg = doc.append_element(doc.body(), "svg");
        let rect = doc.append_element(svg, "rect");
        doc.set_resolved(rect, "fill", "rgb(0, 128, 0)");
        let baseline = compute_baseline(&doc, &Namespaces::default());

        inline_styles(&doc, &svg, &baseline).unwrap();

        assert_eq!(doc.attribute(&svg, "style").as_deref(), Some(""));
        assert_eq!(
            doc.attribute(&rect, "style").as_deref(),
            Some("fill:rgb(0, 128, 0);")
        );
    }

    #[test]
    fn inline_styles_resolves_children_before_parents() {
        let doc = document();
        let svg = doc.append_element(doc.body(), "svg");
        let g = doc.append_element(svg, "g");
        let rect = doc.append_element(g, "rect");
        let circle = doc.append_element(g, "circle");
        let text = doc.append_element(svg, "text");
        let baseline = compute_baseline(&doc, &Namespaces::default());
        let _ = doc.take_style_queries();

        inline_styles(&doc, &svg, &baseline).unwrap();

        assert_eq!(doc.take_style_queries(), vec![text, circle, rect, g, svg]);
    }

    #[test]
    fn inline_styles_never_touches_scripts() {
        let doc = document();
        let svg = doc.append_element(doc.body(), "svg");
        let script = doc.append_element(svg, "script");
        doc.append_text(script, "alert(1)");
        doc.set_resolved(script, "display", "none");
        let baseline = compute_baseline(&doc, &Namespaces::default());
        let _ = doc.take_style_queries();

        inline_styles(&doc, &svg, &baseline).unwrap();

        assert_eq!(doc.attribute(&script, "style"), None);
        assert_eq!(doc.take_style_queries(), vec![svg]);
    }

    #[test]
    fn inline_styles_replaces_authored_style() {
        let doc = document();
        let svg = doc.append_element(doc.body(), "svg");
        doc.set_attribute(&svg, "style", "fill: red").unwrap();
        let baseline = compute_baseline(&doc, &Namespaces::default());

        inline_styles(&doc, &svg, &baseline).unwrap();

        // The memory tree does not parse authored styles, so the element
        // resolves to the baseline.
        assert_eq!(doc.attribute(&svg, "style").as_deref(), Some(""));
    }
}
