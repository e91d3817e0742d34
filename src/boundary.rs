//! # Boundary Points
//!
//! The ordered vertex list of the input polygon, stored inline in a
//! fixed-size arena. Points are appended once during ingestion and are
//! immutable afterwards.
//!
//! ## Rectilinear Invariant
//!
//! Every pair of consecutive points, including the wraparound from the
//! last point back to the first, must differ in exactly one coordinate.
//! [`Boundary::validate`] checks this before any edge is built.

use core::fmt;

use crate::config::{MAX_POINTS, MIN_POINTS};
use crate::error::{Fault, Result};

/// An integer boundary vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: u32,
    /// Vertical coordinate.
    pub y: u32,
}

impl Point {
    /// Create a point from its coordinates.
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One closed-polygon segment, from point `index` to its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Index of the segment's first point.
    pub index: usize,
    /// Segment start.
    pub from: Point,
    /// Segment end (the first point for the closing segment).
    pub to: Point,
}

/// Fixed-capacity arena of boundary points in input order.
pub struct Boundary {
    points: [Point; MAX_POINTS],
    len: usize,
}

impl Boundary {
    /// Create an empty boundary.
    pub const fn new() -> Self {
        Self {
            points: [Point::new(0, 0); MAX_POINTS],
            len: 0,
        }
    }

    /// Build a boundary from a slice of points, failing if it does not fit.
    ///
    /// The rectilinear invariant is *not* checked here; call
    /// [`validate`](Self::validate) (or build an
    /// [`EdgeSet`](crate::edges::EdgeSet), which validates) before use.
    pub fn from_points(points: &[Point]) -> Result<Self> {
        let mut boundary = Self::new();
        for &point in points {
            boundary.push(point)?;
        }
        Ok(boundary)
    }

    /// Append one point.
    ///
    /// # Errors
    /// [`Fault::CapacityExceeded`] once `MAX_POINTS` points are stored.
    pub fn push(&mut self, point: Point) -> Result<()> {
        if self.len >= MAX_POINTS {
            return Err(Fault::CapacityExceeded {
                resource: "boundary points",
                capacity: MAX_POINTS,
            });
        }
        self.points[self.len] = point;
        self.len += 1;
        Ok(())
    }

    /// Number of stored points.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no point has been stored yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The stored points in input order.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points[..self.len]
    }

    /// Iterate over the closed polygon's segments, wraparound included.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        let points = self.points();
        let n = points.len();
        (0..n).map(move |index| Segment {
            index,
            from: points[index],
            to: points[(index + 1) % n],
        })
    }

    /// Check the closed-polygon preconditions.
    ///
    /// # Errors
    /// - [`Fault::TooFewPoints`] for fewer than `MIN_POINTS` points.
    /// - [`Fault::DegenerateSegment`] for two identical consecutive points.
    /// - [`Fault::NonRectilinear`] for a segment that changes both coordinates.
    pub fn validate(&self) -> Result<()> {
        if self.len < MIN_POINTS {
            return Err(Fault::TooFewPoints { count: self.len });
        }
        for segment in self.segments() {
            let Segment { index, from, to } = segment;
            match (from.x == to.x, from.y == to.y) {
                (true, true) => return Err(Fault::DegenerateSegment { index, at: from }),
                (false, false) => return Err(Fault::NonRectilinear { index, from, to }),
                _ => {}
            }
        }
        Ok(())
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::new()
    }
}

// Only the occupied prefix of the arena is shown.
impl fmt::Debug for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Boundary")
            .field("len", &self.len)
            .field("points", &self.points())
            .finish()
    }
}
