//! crowbar-export: Pure presentation helpers (sans-IO)
//!
//! Decides how extracted sources are offered to the user: download
//! filenames, activator labels and positions, and download requests.
//! The browser side effects live in `crowbar-io`.

pub mod download;
pub mod filename;
pub mod layout;

pub use download::{DownloadRequest, Presentation, PresenterConfig, choose_presentation, prepare_download};
pub use filename::{derive_filename, sanitize_title};
pub use layout::{Position, activator_label, place_activators, resolve_overlaps};
