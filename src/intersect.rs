//! # Intersection Test
//!
//! The worker-side kernel. A candidate is a *hit* (and therefore not an
//! empty rectangle) if any boundary edge crosses one of its sides:
//!
//! - a vertical edge at `x` hits if `x ∈ [xmin, xmax]` and either `ymin`
//!   or `ymax` lies within the edge's `y` extent;
//! - a horizontal edge at `y` hits symmetrically with the axes swapped.
//!
//! The first hit short-circuits. Cost is `O(E)` per candidate; a batch of
//! candidates runs in parallel across the pool, so a batch costs `O(E)`
//! wall-clock as well.

use crate::candidate::Rect;
use crate::edges::{Edge, EdgeSet};

#[inline]
fn crosses(edge: &Edge, lo: i64, hi: i64, side_a: i64, side_b: i64) -> bool {
    let at = i64::from(edge.at);
    lo <= at && at <= hi && (edge.covers(side_a) || edge.covers(side_b))
}

/// True if `rect` is crossed by a vertical edge.
pub fn hits_vertical(rect: &Rect, vertical: &[Edge]) -> bool {
    vertical
        .iter()
        .any(|edge| crosses(edge, rect.xmin, rect.xmax, rect.ymin, rect.ymax))
}

/// True if `rect` is crossed by a horizontal edge.
pub fn hits_horizontal(rect: &Rect, horizontal: &[Edge]) -> bool {
    horizontal
        .iter()
        .any(|edge| crosses(edge, rect.ymin, rect.ymax, rect.xmin, rect.xmax))
}

/// Run the full test against both edge lists.
#[inline]
pub fn intersects(rect: &Rect, edges: &EdgeSet) -> bool {
    hits_vertical(rect, edges.vertical()) || hits_horizontal(rect, edges.horizontal())
}
