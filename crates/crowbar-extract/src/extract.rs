//! Extraction of standalone SVG documents from one page document.
//!
//! Extraction is destructive to the *attributes* of the page's own
//! `<svg>` elements: namespace declarations and inline styles are
//! written onto the live tree before it is serialized.  Structure and
//! rendering are unchanged, since the inlined styles reproduce what the
//! stylesheets applied.

use crate::config::ExtractConfig;
use crate::dom::DomDocument;
use crate::normalize::normalize;
use crate::style::{StyleBaseline, inline_styles};
use crate::types::{ExtractError, ExtractedSource, Identity};

/// Turns every `<svg>` of a document into an [`ExtractedSource`].
#[derive(Debug)]
pub struct SourceExtractor<'a> {
    config: &'a ExtractConfig,
    baseline: &'a StyleBaseline,
    preamble: String,
}

impl<'a> SourceExtractor<'a> {
    /// Create an extractor sharing one configuration and baseline.
    #[must_use]
    pub fn new(config: &'a ExtractConfig, baseline: &'a StyleBaseline) -> Self {
        Self {
            config,
            baseline,
            preamble: config.preamble(),
        }
    }

    /// Extract every `<svg>` element of `document`, in document order.
    ///
    /// An element that fails to extract is logged and skipped; the
    /// remaining elements are still extracted.
    pub fn extract<D: DomDocument>(&self, document: &D) -> Vec<ExtractedSource> {
        document
            .svg_elements()
            .iter()
            .enumerate()
            .filter_map(|(index, svg)| match self.extract_one(document, svg) {
                Ok(source) => Some(source),
                Err(e) => {
                    log::warn!("skipping svg #{index}: {e}");
                    None
                }
            })
            .collect()
    }

    /// Normalize, inline, serialize and measure one `<svg>` element.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractError`] naming the step that failed.  The
    /// element may already carry the attributes written by earlier
    /// steps.
    pub fn extract_one<D: DomDocument>(
        &self,
        document: &D,
        svg: &D::Element,
    ) -> Result<ExtractedSource, ExtractError> {
        normalize(document, svg, &self.config.namespaces).map_err(ExtractError::Normalize)?;
        inline_styles(document, svg, self.baseline).map_err(ExtractError::InlineStyles)?;
        let markup = document
            .serialize(svg)
            .map_err(ExtractError::Serialization)?;

        let identity = Identity {
            id: document.attribute(svg, "id"),
            class_name: document.attribute(svg, "class"),
            name: document.attribute(svg, "name"),
        };

        Ok(ExtractedSource::new(
            document.bounding_box(svg),
            identity,
            document.child_element_count(svg),
            &self.preamble,
            &markup,
        ))
    }
}
