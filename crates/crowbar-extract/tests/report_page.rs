//! Integration test: extract every SVG from a synthetic report page with
//! embedded documents and check that each result stands on its own.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crowbar_extract::memory::{FrameContent, FrameKind, MemoryDocument, NodeId};
use crowbar_extract::{BoundingBox, ComputedStyle, DomDocument, ExtractConfig, Namespaces, collect_all};

fn initial_style() -> ComputedStyle {
    ComputedStyle::from_iter([
        ("display", "inline"),
        ("fill", "rgb(0, 0, 0)"),
        ("font-family", "\"Times New Roman\""),
        ("stroke", "none"),
        ("stroke-width", "1px"),
    ])
}

fn report_page() -> (MemoryDocument, NodeId) {
    let doc = MemoryDocument::new();
    doc.set_title("Quarterly Report");
    doc.set_initial_style(initial_style());

    let chart = doc.append_element(doc.body(), "svg");
    doc.set_attribute(&chart, "id", "revenue").unwrap();
    doc.set_attribute(&chart, "viewBox", "0 0 400 200").unwrap();
    doc.set_bounding_box(chart, BoundingBox::new(80.0, 16.0, 400.0, 200.0));

    let defs = doc.append_element(chart, "defs");
    let marker = doc.append_element(defs, "circle");
    doc.set_attribute(&marker, "id", "dot").unwrap();

    let bars = doc.append_element(chart, "g");
    doc.set_resolved(bars, "fill", "rgb(70, 130, 180)");
    for x in ["10", "60", "110"] {
        let bar = doc.append_element(bars, "rect");
        doc.set_attribute(&bar, "x", x).unwrap();
        doc.set_resolved(bar, "fill", "rgb(70, 130, 180)");
    }

    let reuse = doc.append_element(chart, "use");
    doc.set_attribute_ns(&reuse, Namespaces::XLINK, "xlink:href", "#dot")
        .unwrap();

    let label = doc.append_element(chart, "text");
    doc.set_resolved(label, "font-family", "\"Helvetica Neue\", sans-serif");
    doc.append_text(label, "Revenue & Costs <2024>");

    let script = doc.append_element(chart, "script");
    doc.append_text(script, "if (a < b) { draw(); }");

    (doc, script)
}

fn embedded_map() -> MemoryDocument {
    let doc = MemoryDocument::new();
    doc.set_initial_style(initial_style());
    let map = doc.append_element(doc.body(), "svg");
    doc.set_attribute(&map, "class", "map").unwrap();
    let path = doc.append_element(map, "path");
    doc.set_resolved(path, "stroke", "rgb(0, 0, 255)");
    doc.set_resolved(path, "stroke-width", "2px");
    doc
}

fn parse(text: &str) -> roxmltree::Document<'_> {
    roxmltree::Document::parse_with_options(
        text,
        roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        },
    )
    .expect("extracted document should be well-formed XML")
}

#[test]
fn report_page_extracts_standalone_documents() {
    let (root, script) = report_page();
    root.add_frame(FrameKind::IFrame, FrameContent::CrossOrigin);
    root.add_frame(FrameKind::Object, FrameContent::Accessible(embedded_map()));

    let sources = collect_all(root.clone(), &ExtractConfig::default()).unwrap();
    assert_eq!(sources.len(), 2);

    for source in &sources {
        let text = source.serialized_document();
        assert!(text.starts_with(r#"<?xml version="1.0" standalone="no"?><!DOCTYPE svg PUBLIC"#));
        let parsed = parse(text);
        let svg = parsed.root_element();
        assert_eq!(svg.tag_name().namespace(), Some(Namespaces::SVG));
        assert_eq!(svg.attribute("version"), Some("1.1"));
        assert_eq!(svg.lookup_namespace_uri(Some("xlink")), Some(Namespaces::XLINK));
    }

    let chart = &sources[0];
    assert_eq!(chart.identity.id.as_deref(), Some("revenue"));
    assert_eq!(chart.child_element_count, 5);
    assert_eq!(chart.bounding_box, BoundingBox::new(80.0, 16.0, 400.0, 200.0));

    let parsed = parse(chart.serialized_document());
    let rects: Vec<_> = parsed
        .descendants()
        .filter(|n| n.has_tag_name((Namespaces::SVG, "rect")))
        .collect();
    assert_eq!(rects.len(), 3);
    for rect in rects {
        assert_eq!(rect.attribute("style"), Some("fill:rgb(70, 130, 180);"));
    }

    let text = parsed
        .descendants()
        .find(|n| n.has_tag_name((Namespaces::SVG, "text")))
        .unwrap();
    assert_eq!(text.text(), Some("Revenue & Costs <2024>"));
    assert_eq!(
        text.attribute("style"),
        Some("font-family:\"Helvetica Neue\", sans-serif;")
    );

    let reuse = parsed
        .descendants()
        .find(|n| n.has_tag_name((Namespaces::SVG, "use")))
        .unwrap();
    assert_eq!(reuse.attribute((Namespaces::XLINK, "href")), Some("#dot"));

    // The script survives as content but is never styled.
    assert_eq!(root.attribute(&script, "style"), None);
    let script_node = parsed
        .descendants()
        .find(|n| n.has_tag_name((Namespaces::SVG, "script")))
        .unwrap();
    assert_eq!(script_node.attribute("style"), None);
    assert_eq!(script_node.text(), Some("if (a < b) { draw(); }"));

    let map = &sources[1];
    assert_eq!(map.identity.class_name.as_deref(), Some("map"));
    assert!(
        map.svg_markup()
            .contains(r#"<path style="stroke:rgb(0, 0, 255);stroke-width:2px;"/>"#)
    );
}
