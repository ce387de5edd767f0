//! crowbar-extract: Pure SVG extraction pipeline (sans-IO).
//!
//! Turns the `<svg>` elements of a live page into standalone,
//! style-complete SVG documents:
//! collect documents -> per `<svg>`: normalize namespaces ->
//! inline resolved styles (minus an unstyled baseline) ->
//! serialize with XML prolog and SVG 1.1 doctype.
//!
//! The pipeline runs against the [`DomDocument`] trait.  This crate has
//! **no browser dependencies**; the `web_sys` binding lives in
//! `crowbar-io`, and [`memory::MemoryDocument`] provides a synthetic
//! tree for tests and non-browser use.

pub mod collect;
pub mod config;
pub mod dom;
pub mod extract;
pub mod memory;
pub mod normalize;
pub mod style;
pub mod types;

pub use collect::{candidate_documents, collect_all};
pub use config::{ExtractConfig, Namespaces};
pub use dom::{ComputedStyle, DomDocument};
pub use extract::SourceExtractor;
pub use normalize::normalize;
pub use style::{StyleBaseline, compute_baseline, inline_declaration, inline_styles, styled_elements};
pub use types::{BoundingBox, CollectError, DomError, ExtractError, ExtractedSource, Identity};
