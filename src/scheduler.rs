//! # Scheduler
//!
//! The control core's main loop. Walks every candidate pair, prunes the
//! ones that cannot beat the best area, batches the rest through the
//! Offload Queue and reduces each completed batch before the next one is
//! armed.
//!
//! ## Control Loop
//!
//! ```text
//!   for each pair (i, j), i < j:
//!       area <= best?  ──yes──► pruned
//!            │ no
//!            ▼
//!       queue full?    ──yes──► drain: arm ─► wait ─► reduce ─► retire
//!            │ no                                                  │
//!            ▼                                                     │
//!       stage into next slot ◄─────────────────────────────────────┘
//!
//!   end of scan: drain the partial batch (unused slots invalid)
//! ```
//!
//! ## Executors
//!
//! The control core spins on the completion flags while a batch is in
//! flight. What it does between polls is an [`Executor`]:
//!
//! - [`SpinWait`]: the workers run on their own cores (or threads); the
//!   control core only relaxes.
//! - [`InlinePool`]: a single-core simulation; the control core steps every
//!   admitted worker itself between polls.
//!
//! Drains are synchronous, so the best area the pruning check reads has
//! always seen every earlier batch. Pruning stays advisory all the same:
//! a candidate it lets through is tested and reduced like any other.

use crate::boundary::Boundary;
use crate::candidate::{Candidate, CandidatePairs};
use crate::diag::{Console, Device};
use crate::edges::EdgeSet;
use crate::protocol::{Dispatcher, Fabric, Worker};
use crate::queue::OffloadQueue;
use crate::reducer::{reduce, BestArea};
use crate::sync::relax;

// ---------------------------------------------------------------------------
// Executor seam
// ---------------------------------------------------------------------------

/// What the control core does while it waits for a batch.
pub trait Executor<const N: usize> {
    /// Called between completion polls of an in-flight batch.
    fn idle(&mut self, fabric: &Fabric<N>);

    /// Called once a batch has been reaped.
    fn reaped(&mut self) {}
}

/// Executor for workers running on dedicated cores or threads.
///
/// On bare metal it is a plain spin-loop hint. Hosted builds switch to
/// yielding after [`SPIN_CHECK_INTERVAL`](crate::config::SPIN_CHECK_INTERVAL)
/// polls of one batch, so a pool wider than the host is not starved.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinWait {
    polls: u32,
}

impl SpinWait {
    /// A spinner that has not polled yet.
    pub const fn new() -> Self {
        Self { polls: 0 }
    }
}

impl<const N: usize> Executor<N> for SpinWait {
    #[inline]
    fn idle(&mut self, _fabric: &Fabric<N>) {
        #[cfg(feature = "std")]
        if self.polls >= crate::config::SPIN_CHECK_INTERVAL {
            std::thread::yield_now();
            return;
        }
        self.polls = self.polls.saturating_add(1);
        relax();
    }

    fn reaped(&mut self) {
        self.polls = 0;
    }
}

/// Single-core simulation of an `N`-worker pool.
pub struct InlinePool<'e, const N: usize> {
    edges: &'e EdgeSet,
    workers: [Worker; N],
}

impl<'e, const N: usize> InlinePool<'e, N> {
    /// One fresh worker per slot, all testing against `edges`.
    pub fn new(edges: &'e EdgeSet) -> Self {
        Self { edges, workers: core::array::from_fn(Worker::new) }
    }

    /// The simulated workers, in slot order.
    pub fn workers(&self) -> &[Worker; N] {
        &self.workers
    }
}

impl<const N: usize> Executor<N> for InlinePool<'_, N> {
    fn idle(&mut self, fabric: &Fabric<N>) {
        for worker in &mut self.workers {
            worker.step(fabric, self.edges);
        }
    }
}

impl<const N: usize, X: Executor<N> + ?Sized> Executor<N> for &mut X {
    fn idle(&mut self, fabric: &Fabric<N>) {
        (**self).idle(fabric);
    }

    fn reaped(&mut self) {
        (**self).reaped();
    }
}

// ---------------------------------------------------------------------------
// Run counters
// ---------------------------------------------------------------------------

/// Work accounting for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Candidates produced by the pair enumeration.
    pub generated: u64,
    /// Candidates discarded without being staged.
    pub pruned: u64,
    /// Candidates sent through the worker pool.
    pub dispatched: u64,
    /// Batches armed.
    pub batches: u64,
    /// Dispatched candidates crossed by an edge.
    pub hits: u64,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// The control core's scheduler/context object: owns the dispatcher, the
/// staging queue and the best area, and borrows the shared fabric.
pub struct Controller<'a, const N: usize, E: Executor<N>, C: Console> {
    fabric: &'a Fabric<N>,
    dispatcher: Dispatcher,
    queue: OffloadQueue<N>,
    best: BestArea,
    counters: Counters,
    executor: E,
    console: C,
}

impl<'a, const N: usize, E: Executor<N>, C: Console> Controller<'a, N, E, C> {
    /// A controller with best area 0 driving `fabric`.
    pub fn new(fabric: &'a Fabric<N>, executor: E, console: C) -> Self {
        Self {
            fabric,
            dispatcher: Dispatcher::new(),
            queue: OffloadQueue::new(),
            best: BestArea::new(),
            counters: Counters::default(),
            executor,
            console,
        }
    }

    /// Best area reduced so far.
    #[inline]
    pub fn best(&self) -> &BestArea {
        &self.best
    }

    /// Work accounting so far.
    #[inline]
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Candidates staged but not yet dispatched.
    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The console, for the caller's own reporting.
    #[inline]
    pub fn console(&mut self) -> &mut C {
        &mut self.console
    }

    /// Prune or stage one candidate, draining the queue first if it is
    /// full. Returns whether the candidate was staged.
    pub fn offer(&mut self, candidate: Candidate) -> bool {
        self.counters.generated += 1;
        if candidate.area <= self.best.area() {
            self.counters.pruned += 1;
            return false;
        }
        let mut candidate = candidate;
        while let Err(back) = self.queue.push(self.fabric, candidate) {
            candidate = back;
            self.drain();
        }
        true
    }

    /// Dispatch whatever is staged, even a partial batch.
    pub fn flush(&mut self) {
        if !self.queue.is_empty() {
            self.drain();
        }
    }

    /// Enumerate every pair of `boundary`, reporting each outer point index
    /// on the console (the last one included), and flush at the end.
    pub fn scan(&mut self, boundary: &Boundary) -> &BestArea {
        let mut pairs = CandidatePairs::new(boundary).peekable();
        for i in 0..boundary.len() {
            let _ = write!(self.console, "\rpoint {i}");
            while let Some((_, candidate)) = pairs.next_if(|&(row, _)| row == i) {
                self.offer(candidate);
            }
        }
        self.flush();
        if !boundary.is_empty() {
            let _ = self.console.write_char('\n');
        }
        &self.best
    }

    /// Run the staged candidates through the pool and fold the results.
    fn drain(&mut self) {
        let fill = self.queue.len();
        self.console.select(Device::Worker);

        let mut batch = self.dispatcher.arm(self.fabric, fill);
        batch.wait(|| self.executor.idle(self.fabric));
        let reduction = reduce(&mut self.best, &batch, self.queue.staged());
        log_event!(
            debug,
            generation = batch.generation(),
            fill,
            hits = reduction.hits,
            "batch reaped"
        );
        if reduction.improved {
            log_event!(
                info,
                best_area = self.best.area(),
                generation = batch.generation(),
                "best area improved"
            );
        }
        drop(batch);

        self.console.select(Device::Control);
        self.executor.reaped();
        self.queue.clear();

        self.counters.batches += 1;
        self.counters.dispatched += fill as u64;
        self.counters.hits += reduction.hits as u64;
    }

    /// Hand back the best area and the counters.
    pub fn finish(self) -> (BestArea, Counters) {
        (self.best, self.counters)
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Point;
    use crate::diag::NullConsole;

    fn boundary(points: &[(u32, u32)]) -> Boundary {
        let points: Vec<Point> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        Boundary::from_points(&points).unwrap()
    }

    fn run<const N: usize>(boundary: &Boundary) -> (BestArea, Counters) {
        let edges = EdgeSet::from_boundary(boundary).unwrap();
        let fabric = Fabric::<N>::new();
        let mut controller = Controller::new(&fabric, InlinePool::<N>::new(&edges), NullConsole);
        controller.scan(boundary);
        controller.finish()
    }

    const L_SHAPE: [(u32, u32); 6] = [(0, 0), (0, 10), (5, 10), (5, 5), (10, 5), (10, 0)];

    #[test]
    fn test_l_shape_best_area() {
        let (best, counters) = run::<4>(&boundary(&L_SHAPE));
        assert_eq!(best.area(), 66);
        assert_eq!(counters.generated, 15);
        assert_eq!(counters.generated, counters.pruned + counters.dispatched);
    }

    #[test]
    fn test_pool_size_does_not_change_result() {
        let shape = boundary(&L_SHAPE);
        let one = run::<1>(&shape).0.area();
        let four = run::<4>(&shape).0.area();
        let wide = run::<64>(&shape).0.area();
        assert_eq!((one, four, wide), (66, 66, 66));
    }

    #[test]
    fn test_pruning_skips_small_candidates() {
        let edges = EdgeSet::from_boundary(&boundary(&L_SHAPE)).unwrap();
        let fabric = Fabric::<2>::new();
        let mut controller = Controller::new(&fabric, InlinePool::<2>::new(&edges), NullConsole);

        let big = Candidate::from_pair(Point::new(0, 0), Point::new(5, 10));
        let small = Candidate::from_pair(Point::new(0, 0), Point::new(2, 2));
        assert!(controller.offer(big));
        controller.flush();
        assert_eq!(controller.best().area(), 66);

        assert!(!controller.offer(small));
        assert_eq!(controller.pending(), 0);
        assert_eq!(controller.counters().pruned, 1);
    }

    #[test]
    fn test_full_queue_drains_before_staging() {
        let edges = EdgeSet::from_boundary(&boundary(&L_SHAPE)).unwrap();
        let fabric = Fabric::<2>::new();
        let mut controller = Controller::new(&fabric, InlinePool::<2>::new(&edges), NullConsole);

        // Descending areas so none is pruned by an earlier one.
        controller.offer(Candidate::from_pair(Point::new(0, 0), Point::new(10, 10)));
        controller.offer(Candidate::from_pair(Point::new(0, 0), Point::new(9, 9)));
        assert_eq!(controller.counters().batches, 0);
        assert_eq!(controller.pending(), 2);

        controller.offer(Candidate::from_pair(Point::new(0, 0), Point::new(8, 9)));
        assert_eq!(controller.counters().batches, 1);
        assert_eq!(controller.pending(), 1);

        controller.flush();
        controller.flush();
        let (_, counters) = controller.finish();
        assert_eq!(counters.batches, 2);
        assert_eq!(counters.dispatched, 3);
    }

    #[test]
    fn test_inline_workers_track_generations() {
        let shape = boundary(&L_SHAPE);
        let edges = EdgeSet::from_boundary(&shape).unwrap();
        let fabric = Fabric::<4>::new();
        let mut pool = InlinePool::<4>::new(&edges);
        let mut controller = Controller::new(&fabric, &mut pool, NullConsole);
        controller.scan(&shape);
        let batches = controller.counters().batches as u32;
        drop(controller);

        assert!(batches > 0);
        assert!(pool.workers().iter().all(|w| w.completed() == batches));
    }

    #[test]
    #[cfg(feature = "std")]
    fn test_scan_reports_progress_per_row() {
        let shape = boundary(&[(0, 0), (0, 4), (4, 4), (4, 0)]);
        let edges = EdgeSet::from_boundary(&shape).unwrap();
        let fabric = Fabric::<4>::new();
        let mut transcript = crate::diag::Transcript::new();
        let mut controller =
            Controller::new(&fabric, InlinePool::<4>::new(&edges), &mut transcript);
        controller.scan(&shape);
        drop(controller);

        assert_eq!(transcript.control, "\rpoint 0\rpoint 1\rpoint 2\rpoint 3\n");
        assert_eq!(transcript.device(), Device::Control);
        assert!(transcript.switches >= 2);
    }

    #[test]
    fn test_empty_flush_arms_nothing() {
        let edges = EdgeSet::from_boundary(&boundary(&L_SHAPE)).unwrap();
        let fabric = Fabric::<4>::new();
        let mut controller = Controller::new(&fabric, InlinePool::<4>::new(&edges), NullConsole);
        controller.flush();
        assert_eq!(controller.counters().batches, 0);
        assert!(fabric.slots().iter().all(|s| s.generation() == 0));
    }
}
