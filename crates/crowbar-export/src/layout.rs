//! Activator placement and labels.
//!
//! Every extracted source gets an activator at the top-left corner of
//! the graphic it came from.  Graphics that share a corner (stacked or
//! nested SVGs) would hide each other's activators, so near-coincident
//! positions are pushed apart diagonally.

use crowbar_extract::{ExtractedSource, Identity};
use serde::{Deserialize, Serialize};

/// Top-left corner of an activator in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Distance from the top of the page.
    pub top: f64,
    /// Distance from the left of the page.
    pub left: f64,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// Push apart positions that are closer than `threshold` on both axes.
///
/// Visits every ordered pair `(a, b)` with `a != b` in sequence; when
/// both the vertical and horizontal distance are below `threshold`, `b`
/// moves by `threshold` down and right.  Later pairs see earlier moves.
pub fn resolve_overlaps(positions: &mut [Position], threshold: f64) {
    let n = positions.len();
    for a in 0..n {
        for b in 0..n {
            if a == b {
                continue;
            }
            let (pa, pb) = (positions[a], positions[b]);
            if (pa.top - pb.top).abs() < threshold && (pa.left - pb.left).abs() < threshold {
                positions[b].top += threshold;
                positions[b].left += threshold;
            }
        }
    }
}

/// Activator positions for `sources`: each captured viewport corner
/// offset by the page scroll, then de-overlapped.
#[must_use]
pub fn place_activators(sources: &[ExtractedSource], scroll: Position, threshold: f64) -> Vec<Position> {
    let mut positions: Vec<Position> = sources
        .iter()
        .map(|s| Position::new(s.bounding_box.top + scroll.top, s.bounding_box.left + scroll.left))
        .collect();
    resolve_overlaps(&mut positions, threshold);
    positions
}

/// On-screen label of the activator for source number `index`:
/// `SVG #<index>: ` followed by `#<id>` and `.<class>` when present.
#[must_use]
pub fn activator_label(index: usize, identity: &Identity) -> String {
    let mut label = format!("SVG #{index}: ");
    if let Some(id) = identity.id.as_deref().filter(|v| !v.is_empty()) {
        label.push('#');
        label.push_str(id);
    }
    if let Some(class_name) = identity.class_name.as_deref().filter(|v| !v.is_empty()) {
        label.push('.');
        label.push_str(class_name);
    }
    label
}
