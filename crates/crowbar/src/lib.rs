//! Bookmarklet entry point for svg-crowbar.
//!
//! This crate compiles to a standalone WASM module.  Instantiating it on
//! a page runs one extraction: every `<svg>` of the page and of its
//! same-origin embedded documents becomes a standalone SVG document,
//! which is then downloaded directly (single source) or offered through
//! the on-page popover.

use crowbar_export::{Presentation, choose_presentation, prepare_download};
use crowbar_extract::{CollectError, DomDocument, collect_all};
use crowbar_io::{BrowserDocument, console, load_settings, show_popover, trigger_download};
use wasm_bindgen::prelude::*;

/// Shown when the page holds no extractable `<svg>`.
const NOTHING_FOUND_MESSAGE: &str = "The Crowbar couldn't find any SVG nodes.";

/// Called automatically when the WASM module is instantiated.
#[wasm_bindgen(start)]
pub fn crowbar_main() {
    console_error_panic_hook::set_once();
    console::init(log::LevelFilter::Info);

    if let Err(e) = run() {
        log::error!("{e}");
    }
}

/// Errors that end a run early.
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Dom(#[from] crowbar_extract::DomError),

    #[error(transparent)]
    Download(#[from] crowbar_io::DownloadError),

    #[error(transparent)]
    Present(#[from] crowbar_io::PresentError),
}

fn run() -> Result<(), RunError> {
    let settings = load_settings();
    log::set_max_level(settings.log_level);

    let document = BrowserDocument::current()?;
    let page_title = document.title();

    let sources = match collect_all(document, &settings.extract) {
        Ok(sources) => sources,
        Err(CollectError::NoSourcesFound) => Vec::new(),
    };

    match choose_presentation(sources.len(), &settings.presenter) {
        Presentation::NothingFound => alert(NOTHING_FOUND_MESSAGE),
        Presentation::DownloadSingle => {
            if let Some(source) = sources.first() {
                let request = prepare_download(source, page_title.as_deref(), &settings.presenter);
                trigger_download(&request, settings.presenter.release_delay_ms)?;
            }
        }
        Presentation::Popover => show_popover(sources, page_title, settings.presenter)?,
    }
    Ok(())
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
