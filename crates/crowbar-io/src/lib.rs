//! crowbar-io: Browser I/O for svg-crowbar.
//!
//! Binds the extraction pipeline to the live DOM, triggers Blob
//! downloads, builds the on-page popover, forwards `log` records to the
//! browser console, and reads page-supplied settings.

pub mod console;
pub mod dom;
pub mod download;
pub mod popover;
pub mod settings;

pub use dom::BrowserDocument;
pub use download::{DownloadError, trigger_download};
pub use popover::{CROWBAR_CLASS, PresentError, cleanup, show_popover};
pub use settings::{CrowbarConfig, SettingsError, load_settings, parse_settings};
