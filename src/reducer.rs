//! # Reducer
//!
//! Folds a completed batch into the running best answer. Runs on the
//! control core strictly after the batch barrier, and is the only place
//! the best area changes, so it needs no synchronisation of its own.

use crate::candidate::Candidate;
use crate::protocol::Batch;

/// The run's best non-hit candidate so far. Area is monotonically
/// non-decreasing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestArea {
    area: u64,
    candidate: Option<Candidate>,
}

impl BestArea {
    /// Best area 0, no candidate.
    pub const fn new() -> Self {
        Self { area: 0, candidate: None }
    }

    /// Current best area.
    #[inline]
    pub fn area(&self) -> u64 {
        self.area
    }

    /// The candidate that produced [`area`](Self::area), if any.
    #[inline]
    pub fn candidate(&self) -> Option<Candidate> {
        self.candidate
    }

    /// Keep `candidate` if it beats the current best. Ties keep the
    /// incumbent.
    pub fn offer(&mut self, candidate: Candidate) -> bool {
        if candidate.area > self.area {
            self.area = candidate.area;
            self.candidate = Some(candidate);
            true
        } else {
            false
        }
    }
}

/// What one batch contributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reduction {
    /// Valid slots whose candidate was crossed by an edge.
    pub hits: usize,
    /// Whether the best area grew.
    pub improved: bool,
}

/// Fold every valid, non-hit slot of `batch` into `best`. `staged` is the
/// control core's mirror of the batch, indexed like the slots.
///
/// Comparison order across slots does not matter: this is a max.
pub fn reduce<const N: usize>(
    best: &mut BestArea,
    batch: &Batch<'_, N>,
    staged: &[Candidate],
) -> Reduction {
    let mut reduction = Reduction::default();
    for result in batch.results() {
        if result.hit {
            reduction.hits += 1;
        } else if let Some(&candidate) = staged.get(result.slot) {
            reduction.improved |= best.offer(candidate);
        }
    }
    reduction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{Boundary, Point};
    use crate::edges::EdgeSet;
    use crate::protocol::{Dispatcher, Fabric, Worker};
    use crate::queue::OffloadQueue;

    #[test]
    fn test_offer_is_strict_max() {
        let mut best = BestArea::new();
        let small = Candidate::from_pair(Point::new(0, 0), Point::new(1, 1));
        let large = Candidate::from_pair(Point::new(0, 0), Point::new(5, 5));
        let same = Candidate::from_pair(Point::new(10, 10), Point::new(15, 15));

        assert!(best.offer(small));
        assert!(best.offer(large));
        assert!(!best.offer(small));
        assert!(!best.offer(same));
        assert_eq!(best.area(), 36);
        assert_eq!(best.candidate(), Some(large));
    }

    #[test]
    fn test_reduce_skips_hits() {
        let boundary = Boundary::from_points(&[
            Point::new(0, 0),
            Point::new(0, 10),
            Point::new(10, 10),
            Point::new(10, 0),
        ])
        .unwrap();
        let edges = EdgeSet::from_boundary(&boundary).unwrap();
        let fabric = Fabric::<3>::new();
        let mut queue = OffloadQueue::<3>::new();
        let mut dispatcher = Dispatcher::new();
        let mut workers = [Worker::new(0), Worker::new(1), Worker::new(2)];

        let clear = Candidate::from_pair(Point::new(2, 2), Point::new(6, 6));
        let crossing = Candidate::from_pair(Point::new(5, 5), Point::new(30, 30));
        queue.push(&fabric, clear).unwrap();
        queue.push(&fabric, crossing).unwrap();

        let mut best = BestArea::new();
        let mut batch = dispatcher.arm(&fabric, queue.len());
        batch.wait(|| {
            for worker in &mut workers {
                worker.step(&fabric, &edges);
            }
        });
        let reduction = reduce(&mut best, &batch, queue.staged());

        assert_eq!(reduction, Reduction { hits: 1, improved: true });
        assert_eq!(best.area(), clear.area);
        assert_eq!(best.candidate(), Some(clear));
    }
}
