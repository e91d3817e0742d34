//! # Candidate Generator
//!
//! Every unordered pair of boundary points spans an axis-aligned box. The
//! candidate tested for emptiness is that box inset by one unit on all
//! four sides, and its score is the inclusive lattice area of the box:
//!
//! ```text
//!   area = (|dx| + 1) × (|dy| + 1)
//! ```
//!
//! This equals `(xmax − xmin + 3) × (ymax − ymin + 3)` over the inset
//! bounds: the two insets are undone and the fencepost counted. Area is
//! accumulated in 64 bits; coordinates are 32-bit, so only the full
//! `u32` range in both axes saturates.
//!
//! Insets use signed arithmetic and never wrap. A pair sharing an `x` (or
//! `y`) coordinate yields an empty inset interval (`xmin > xmax`), which
//! the intersection test handles naturally.

use crate::boundary::{Boundary, Point};

/// The bounding box of a point pair, on the input lattice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Corners {
    /// Smaller `x` of the pair.
    pub x_lo: u32,
    /// Larger `x` of the pair.
    pub x_hi: u32,
    /// Smaller `y` of the pair.
    pub y_lo: u32,
    /// Larger `y` of the pair.
    pub y_hi: u32,
}

impl Corners {
    /// Bounding box of two points, in either order.
    #[inline]
    pub fn of(a: Point, b: Point) -> Self {
        Self {
            x_lo: a.x.min(b.x),
            x_hi: a.x.max(b.x),
            y_lo: a.y.min(b.y),
            y_hi: a.y.max(b.y),
        }
    }

    /// The box inset by one unit on every side.
    #[inline]
    pub fn inset(&self) -> Rect {
        Rect {
            xmin: i64::from(self.x_lo) + 1,
            xmax: i64::from(self.x_hi) - 1,
            ymin: i64::from(self.y_lo) + 1,
            ymax: i64::from(self.y_hi) - 1,
        }
    }

    /// Inclusive lattice area of the box.
    #[inline]
    pub fn area(&self) -> u64 {
        let width = u64::from(self.x_hi - self.x_lo) + 1;
        let height = u64::from(self.y_hi - self.y_lo) + 1;
        width.saturating_mul(height)
    }
}

/// An inset rectangle, as seen by the intersection test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left side.
    pub xmin: i64,
    /// Right side.
    pub xmax: i64,
    /// Bottom side.
    pub ymin: i64,
    /// Top side.
    pub ymax: i64,
}

/// A rectangle candidate with its precomputed score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Candidate {
    /// Bounding box of the generating point pair.
    pub corners: Corners,
    /// Precomputed area, see [`Corners::area`].
    pub area: u64,
}

impl Candidate {
    /// Candidate spanned by two boundary points.
    #[inline]
    pub fn from_pair(a: Point, b: Point) -> Self {
        let corners = Corners::of(a, b);
        Self { corners, area: corners.area() }
    }

    /// The inset rectangle handed to a worker.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.corners.inset()
    }
}

/// Iterator over all pairs `(i, j)` with `i < j`, yielding the outer index
/// alongside each candidate so the scan can report progress per point.
pub struct CandidatePairs<'a> {
    points: &'a [Point],
    i: usize,
    j: usize,
}

impl<'a> CandidatePairs<'a> {
    /// Enumerate the pairs of `boundary` in row-major order.
    pub fn new(boundary: &'a Boundary) -> Self {
        Self::over(boundary.points())
    }

    /// Enumerate the pairs of an arbitrary point slice.
    pub fn over(points: &'a [Point]) -> Self {
        Self { points, i: 0, j: 1 }
    }
}

impl Iterator for CandidatePairs<'_> {
    type Item = (usize, Candidate);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.points.len();
        while self.i < n {
            if self.j < n {
                let item = (self.i, Candidate::from_pair(self.points[self.i], self.points[self.j]));
                self.j += 1;
                return Some(item);
            }
            self.i += 1;
            self.j = self.i + 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.points.len();
        if self.i >= n {
            return (0, Some(0));
        }
        // Rest of the current row plus every full row after it.
        let row = n.saturating_sub(self.j);
        let after = n - self.i - 1;
        let remaining = row + after * after.saturating_sub(1) / 2;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CandidatePairs<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inset_and_area() {
        let candidate = Candidate::from_pair(Point::new(10, 0), Point::new(0, 10));
        assert_eq!(
            candidate.rect(),
            Rect { xmin: 1, xmax: 9, ymin: 1, ymax: 9 }
        );
        // (xmax - xmin + 3) * (ymax - ymin + 3)
        assert_eq!(candidate.area, 121);
    }

    #[test]
    fn test_shared_coordinate_gives_empty_inset() {
        let candidate = Candidate::from_pair(Point::new(0, 0), Point::new(0, 10));
        let rect = candidate.rect();
        assert!(rect.xmin > rect.xmax);
        assert_eq!(rect.xmax, -1);
        assert_eq!(candidate.area, 11);
    }

    #[test]
    fn test_area_is_wide() {
        let candidate = Candidate::from_pair(Point::new(0, 0), Point::new(100_000, 100_000));
        assert_eq!(candidate.area, 100_001u64 * 100_001);
        assert!(candidate.area > u64::from(u32::MAX));

        let full = Candidate::from_pair(Point::new(0, 0), Point::new(u32::MAX, u32::MAX));
        assert_eq!(full.area, u64::MAX);
    }

    #[test]
    fn test_pairs_enumerated_once() {
        let points = [
            Point::new(0, 0),
            Point::new(0, 4),
            Point::new(4, 4),
            Point::new(4, 0),
        ];
        let pairs = CandidatePairs::over(&points);
        assert_eq!(pairs.len(), 6);

        let rows: Vec<usize> = pairs.map(|(i, _)| i).collect();
        assert_eq!(rows, [0, 0, 0, 1, 1, 2]);
    }

    #[test]
    fn test_pairs_size_hint_tracks_progress() {
        let points = [Point::new(0, 0); 5];
        let mut pairs = CandidatePairs::over(&points);
        assert_eq!(pairs.len(), 10);
        pairs.next();
        pairs.next();
        assert_eq!(pairs.len(), 8);
        for _ in 0..8 {
            assert!(pairs.next().is_some());
        }
        assert_eq!(pairs.len(), 0);
        assert!(pairs.next().is_none());
    }

    #[test]
    fn test_pairs_of_single_point() {
        let points = [Point::new(3, 3)];
        assert_eq!(CandidatePairs::over(&points).count(), 0);
    }
}
