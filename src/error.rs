//! # Faults
//!
//! Malformed, non-rectilinear and oversized input is detected up front and
//! reported as a [`Fault`] before the worker pool is ever armed.
//!
//! Protocol deadlock (a worker that never reaches its expected generation)
//! is not a fault: there is no timeout, and the control core spins
//! forever, as on bare metal with no supervisor.

use thiserror::Error;

use crate::boundary::Point;

/// Fatal conditions detected while ingesting or modelling the boundary.
#[derive(Debug, Error)]
pub enum Fault {
    /// The polygon has fewer than three boundary points.
    #[error("polygon needs at least 3 boundary points, got {count}")]
    TooFewPoints {
        /// Number of points supplied.
        count: usize,
    },

    /// A boundary segment is neither horizontal nor vertical.
    #[error("segment {index} from {from} to {to} is not axis-aligned")]
    NonRectilinear {
        /// Index of the segment's first point.
        index: usize,
        /// Segment start.
        from: Point,
        /// Segment end.
        to: Point,
    },

    /// Two consecutive boundary points coincide.
    #[error("segment {index} has zero length at {at}")]
    DegenerateSegment {
        /// Index of the segment's first point.
        index: usize,
        /// The repeated point.
        at: Point,
    },

    /// A fixed-size arena would overflow.
    #[error("{resource} capacity of {capacity} exceeded")]
    CapacityExceeded {
        /// Which arena overflowed.
        resource: &'static str,
        /// Its compile-time capacity.
        capacity: usize,
    },

    /// An input line does not follow the `x,y` protocol.
    #[error("line {line}: {reason}")]
    MalformedLine {
        /// One-based input line number.
        line: usize,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// Reading the input stream failed.
    #[cfg(feature = "std")]
    #[error("input read failed")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results carrying a [`Fault`].
pub type Result<T> = core::result::Result<T, Fault>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_messages() {
        let fault = Fault::NonRectilinear {
            index: 2,
            from: Point::new(1, 1),
            to: Point::new(3, 4),
        };
        assert_eq!(fault.to_string(), "segment 2 from (1, 1) to (3, 4) is not axis-aligned");

        let fault = Fault::CapacityExceeded { resource: "boundary points", capacity: 1024 };
        assert_eq!(fault.to_string(), "boundary points capacity of 1024 exceeded");
    }
}
