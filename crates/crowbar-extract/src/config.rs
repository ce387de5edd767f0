//! Extraction configuration.
//!
//! The namespace URIs and the document preamble are plain values
//! handed to the components that need them, never process-wide state.

use serde::{Deserialize, Serialize};

/// Namespace URIs used when normalizing and probing SVG elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespaces {
    /// The SVG namespace.
    pub svg: String,
    /// The XLink namespace.
    pub xlink: String,
    /// The namespace that namespace declarations themselves live in.
    pub xmlns: String,
}

impl Namespaces {
    /// `http://www.w3.org/2000/svg`
    pub const SVG: &'static str = "http://www.w3.org/2000/svg";
    /// `http://www.w3.org/1999/xlink`
    pub const XLINK: &'static str = "http://www.w3.org/1999/xlink";
    /// `http://www.w3.org/2000/xmlns/`
    pub const XMLNS: &'static str = "http://www.w3.org/2000/xmlns/";
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            svg: Self::SVG.to_owned(),
            xlink: Self::XLINK.to_owned(),
            xmlns: Self::XMLNS.to_owned(),
        }
    }
}

/// Configuration for [`SourceExtractor`](crate::SourceExtractor) and
/// [`collect_all`](crate::collect_all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Namespace URIs declared on every extracted `<svg>` root.
    pub namespaces: Namespaces,

    /// XML declaration written at the very start of every document.
    pub xml_declaration: String,

    /// Document type declaration written after the XML declaration.
    pub doctype: String,
}

impl ExtractConfig {
    /// Default XML declaration.
    pub const DEFAULT_XML_DECLARATION: &'static str = r#"<?xml version="1.0" standalone="no"?>"#;

    /// Default doctype: the public SVG 1.1 DTD.
    pub const DEFAULT_DOCTYPE: &'static str = r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#;

    /// The text prepended to every serialized `<svg>` element.
    #[must_use]
    pub fn preamble(&self) -> String {
        format!("{}{}", self.xml_declaration, self.doctype)
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            namespaces: Namespaces::default(),
            xml_declaration: Self::DEFAULT_XML_DECLARATION.to_owned(),
            doctype: Self::DEFAULT_DOCTYPE.to_owned(),
        }
    }
}
