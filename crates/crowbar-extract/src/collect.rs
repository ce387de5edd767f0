//! Collection of sources across a page and its embedded documents.

use crate::config::ExtractConfig;
use crate::dom::DomDocument;
use crate::extract::SourceExtractor;
use crate::style::compute_baseline;
use crate::types::{CollectError, ExtractedSource};

/// The page document followed by every accessible embedded document.
///
/// Each document's `<iframe>` hosts come before its `<object>` hosts,
/// and an accessible embedded document is searched for frames of its
/// own before the next host of its parent (depth-first).  A host whose
/// document is missing or cross-origin is skipped.
pub fn candidate_documents<D: DomDocument>(root: D) -> Vec<D> {
    let mut documents = Vec::new();
    push_with_frames(root, &mut documents);
    documents
}

fn push_with_frames<D: DomDocument>(document: D, out: &mut Vec<D>) {
    let frames = document.embedded_frames();
    let accessible: Vec<D> = frames
        .iter()
        .enumerate()
        .filter_map(|(index, frame)| {
            let nested = document.try_get_accessible_document(frame);
            if nested.is_none() {
                log::debug!("skipping embedded document #{index}: not accessible");
            }
            nested
        })
        .collect();
    out.push(document);
    for nested in accessible {
        push_with_frames(nested, out);
    }
}

/// Extract every `<svg>` of `root` and of its accessible embedded
/// documents, in document-then-frame order.
///
/// The style baseline is computed once, from `root`, and shared by all
/// documents.
///
/// # Errors
///
/// Returns [`CollectError::NoSourcesFound`] when no source could be
/// extracted anywhere.
pub fn collect_all<D: DomDocument>(
    root: D,
    config: &ExtractConfig,
) -> Result<Vec<ExtractedSource>, CollectError> {
    let baseline = compute_baseline(&root, &config.namespaces);
    let extractor = SourceExtractor::new(config, &baseline);

    let documents = candidate_documents(root);
    let document_count = documents.len();
    let sources: Vec<ExtractedSource> = documents
        .iter()
        .flat_map(|document| extractor.extract(document))
        .collect();

    log::info!(
        "extracted {} svg source(s) from {document_count} document(s)",
        sources.len()
    );

    if sources.is_empty() {
        return Err(CollectError::NoSourcesFound);
    }
    Ok(sources)
}
