//! # Edge Model
//!
//! Splits the closed boundary into two edge lists (horizontal and
//! vertical), each edge summarised as its constant coordinate plus the
//! `[min, max]` extent along the other axis.
//!
//! ```text
//!   vertical edge             horizontal edge
//!
//!   x = at                    y = at
//!   │  max                    min ─────────── max
//!   │
//!   │  min
//! ```
//!
//! The lists are built once at startup by the control core and are
//! read-only for the rest of the run, so workers share them without any
//! synchronisation.

use crate::boundary::{Boundary, Segment};
use crate::config::MAX_EDGES;
use crate::error::{Fault, Result};

/// Orientation of an axis-aligned boundary segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Constant `y`, spans an `x` range.
    Horizontal,
    /// Constant `x`, spans a `y` range.
    Vertical,
}

/// One axis-aligned boundary edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edge {
    /// The constant coordinate (`y` for horizontal, `x` for vertical).
    pub at: u32,
    /// Lower end of the extent on the other axis.
    pub min: u32,
    /// Upper end of the extent on the other axis.
    pub max: u32,
}

impl Edge {
    /// An edge at `at` spanning the two ends in either order.
    #[inline]
    pub fn spanning(at: u32, a: u32, b: u32) -> Self {
        Self { at, min: a.min(b), max: a.max(b) }
    }

    /// True if `v` lies within `[min, max]`.
    #[inline]
    pub fn covers(&self, v: i64) -> bool {
        i64::from(self.min) <= v && v <= i64::from(self.max)
    }
}

/// Classify one segment. Equal `x` coordinates make it vertical, anything
/// else horizontal; callers validate the segment first.
pub fn classify(segment: &Segment) -> (Orientation, Edge) {
    let Segment { from, to, .. } = *segment;
    if from.x == to.x {
        (Orientation::Vertical, Edge::spanning(to.x, from.y, to.y))
    } else {
        (Orientation::Horizontal, Edge::spanning(to.y, from.x, to.x))
    }
}

/// The two read-only edge lists shared with every worker.
pub struct EdgeSet {
    horizontal: [Edge; MAX_EDGES],
    num_horizontal: usize,
    vertical: [Edge; MAX_EDGES],
    num_vertical: usize,
}

impl EdgeSet {
    /// Create an empty edge set.
    pub const fn new() -> Self {
        const EMPTY: Edge = Edge { at: 0, min: 0, max: 0 };
        Self {
            horizontal: [EMPTY; MAX_EDGES],
            num_horizontal: 0,
            vertical: [EMPTY; MAX_EDGES],
            num_vertical: 0,
        }
    }

    /// Validate the boundary and classify every segment, wraparound
    /// included, into exactly one of the two lists.
    ///
    /// # Errors
    /// Any fault from [`Boundary::validate`], or
    /// [`Fault::CapacityExceeded`] if a list outgrows `MAX_EDGES`.
    pub fn from_boundary(boundary: &Boundary) -> Result<Self> {
        boundary.validate()?;

        let mut edges = Self::new();
        for segment in boundary.segments() {
            let (orientation, edge) = classify(&segment);
            edges.push(orientation, edge)?;
        }
        Ok(edges)
    }

    /// Append one edge to the list for `orientation`.
    pub fn push(&mut self, orientation: Orientation, edge: Edge) -> Result<()> {
        let (list, len) = match orientation {
            Orientation::Horizontal => (&mut self.horizontal, &mut self.num_horizontal),
            Orientation::Vertical => (&mut self.vertical, &mut self.num_vertical),
        };
        if *len >= MAX_EDGES {
            return Err(Fault::CapacityExceeded {
                resource: "edges",
                capacity: MAX_EDGES,
            });
        }
        list[*len] = edge;
        *len += 1;
        Ok(())
    }

    /// Horizontal edges, in boundary order.
    #[inline]
    pub fn horizontal(&self) -> &[Edge] {
        &self.horizontal[..self.num_horizontal]
    }

    /// Vertical edges, in boundary order.
    #[inline]
    pub fn vertical(&self) -> &[Edge] {
        &self.vertical[..self.num_vertical]
    }

    /// Total number of edges across both lists.
    #[inline]
    pub fn len(&self) -> usize {
        self.num_horizontal + self.num_vertical
    }

    /// True if no edge has been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EdgeSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Point;

    fn l_shape() -> Boundary {
        Boundary::from_points(&[
            Point::new(0, 0),
            Point::new(0, 10),
            Point::new(5, 10),
            Point::new(5, 5),
            Point::new(10, 5),
            Point::new(10, 0),
        ])
        .unwrap()
    }

    #[test]
    fn test_l_shape_edges() {
        let edges = EdgeSet::from_boundary(&l_shape()).unwrap();

        assert_eq!(
            edges.vertical(),
            &[
                Edge { at: 0, min: 0, max: 10 },
                Edge { at: 5, min: 5, max: 10 },
                Edge { at: 10, min: 0, max: 5 },
            ]
        );
        // The closing segment (10, 0) -> (0, 0) lands last.
        assert_eq!(
            edges.horizontal(),
            &[
                Edge { at: 10, min: 0, max: 5 },
                Edge { at: 5, min: 5, max: 10 },
                Edge { at: 0, min: 0, max: 10 },
            ]
        );
        assert_eq!(edges.len(), 6);
    }

    #[test]
    fn test_every_segment_classified_once() {
        let boundary = l_shape();
        let edges = EdgeSet::from_boundary(&boundary).unwrap();
        assert_eq!(edges.len(), boundary.len());
    }

    #[test]
    fn test_classify_orders_extent() {
        let segment = Segment { index: 0, from: Point::new(7, 9), to: Point::new(2, 9) };
        assert_eq!(
            classify(&segment),
            (Orientation::Horizontal, Edge { at: 9, min: 2, max: 7 })
        );
    }

    #[test]
    fn test_invalid_boundary_is_rejected() {
        let boundary =
            Boundary::from_points(&[Point::new(0, 0), Point::new(3, 3), Point::new(3, 0)]).unwrap();
        assert!(matches!(
            EdgeSet::from_boundary(&boundary),
            Err(Fault::NonRectilinear { index: 0, .. })
        ));
    }

    #[test]
    fn test_edge_list_capacity() {
        let mut edges = EdgeSet::new();
        for i in 0..MAX_EDGES as u32 {
            edges.push(Orientation::Vertical, Edge::spanning(i, 0, 1)).unwrap();
        }
        assert!(matches!(
            edges.push(Orientation::Vertical, Edge::spanning(0, 0, 1)),
            Err(Fault::CapacityExceeded { resource: "edges", .. })
        ));
        assert!(edges.push(Orientation::Horizontal, Edge::spanning(0, 0, 1)).is_ok());
    }

    #[test]
    fn test_edge_covers_is_inclusive() {
        let edge = Edge::spanning(3, 10, 4);
        assert!(edge.covers(4));
        assert!(edge.covers(10));
        assert!(!edge.covers(3));
        assert!(!edge.covers(-1));
    }
}
