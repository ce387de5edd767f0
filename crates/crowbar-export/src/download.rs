//! Presenter configuration and download requests.
//!
//! Everything the browser layer needs to decide *what* to show or save
//! is computed here; `crowbar-io` only performs it.

use crowbar_extract::ExtractedSource;
use serde::{Deserialize, Serialize};

use crate::filename::{FALLBACK_BASENAME, derive_filename};

/// Settings of the result presenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    /// Activators closer than this on both axes are pushed apart by it.
    pub overlap_threshold: f64,

    /// MIME type of the downloaded file.
    pub mime_type: String,

    /// Delay before the download's object URL is released, in
    /// milliseconds.
    pub release_delay_ms: u32,

    /// Base name used when neither the source nor the page title offers
    /// one.
    pub fallback_filename: String,

    /// Skip the popover and download at once when the page holds a
    /// single source.
    pub download_single_immediately: bool,
}

impl PresenterConfig {
    /// Default overlap threshold.
    pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 38.0;
    /// Default MIME type.
    pub const DEFAULT_MIME_TYPE: &'static str = "text/xml";
    /// Default release delay.
    pub const DEFAULT_RELEASE_DELAY_MS: u32 = 10;
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: Self::DEFAULT_OVERLAP_THRESHOLD,
            mime_type: Self::DEFAULT_MIME_TYPE.to_owned(),
            release_delay_ms: Self::DEFAULT_RELEASE_DELAY_MS,
            fallback_filename: FALLBACK_BASENAME.to_owned(),
            download_single_immediately: true,
        }
    }
}

/// A file the browser layer should offer for saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest<'a> {
    /// Suggested filename, including the `.svg` extension.
    pub filename: String,
    /// MIME type of the blob.
    pub mime_type: &'a str,
    /// File contents.
    pub contents: &'a str,
}

/// Build the download request for `source`.
#[must_use]
pub fn prepare_download<'a>(
    source: &'a ExtractedSource,
    page_title: Option<&str>,
    config: &'a PresenterConfig,
) -> DownloadRequest<'a> {
    DownloadRequest {
        filename: derive_filename(&source.identity, page_title, &config.fallback_filename),
        mime_type: &config.mime_type,
        contents: source.serialized_document(),
    }
}

/// What to do with the sources of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Tell the user nothing was found.
    NothingFound,
    /// Download the only source right away.
    DownloadSingle,
    /// Show one activator per source.
    Popover,
}

/// Choose how to present `source_count` sources.
#[must_use]
pub const fn choose_presentation(source_count: usize, config: &PresenterConfig) -> Presentation {
    match source_count {
        0 => Presentation::NothingFound,
        1 if config.download_single_immediately => Presentation::DownloadSingle,
        _ => Presentation::Popover,
    }
}
