//! # Kernel
//!
//! Top-level search API. Builds the edge model once, allocates the shared
//! fabric, runs the control core's scan against a worker pool and reports
//! throughput and the best area.
//!
//! ## Run Sequence
//!
//! ```text
//! search_inline / search_threaded
//!   ├─► EdgeSet::from_boundary()     ← validate + classify, fail fast
//!   ├─► Fabric::<N>::new()           ← every slot idle at generation 0
//!   ├─► (threaded) spawn N workers   ← pool::run
//!   └─► drive()
//!         ├─► clock.now()
//!         ├─► Controller::scan()     ← prune · stage · drain · reduce
//!         ├─► clock.now()
//!         └─► report()               ← "thread 1 finish at …", "best area: …"
//! ```

use crate::boundary::Boundary;
use crate::candidate::Candidate;
use crate::config::CONTROL_THREAD_ID;
use crate::diag::{Console, Device};
use crate::edges::EdgeSet;
use crate::error::Result;
use crate::protocol::Fabric;
use crate::reducer::BestArea;
use crate::scheduler::{Controller, Counters, Executor, InlinePool};
use crate::stats::{Clock, Elapsed, Throughput};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Outcome of one search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchReport {
    /// Best non-hit candidate and its area.
    pub best: BestArea,
    /// Work accounting.
    pub counters: Counters,
    /// Clock deltas across the scan.
    pub elapsed: Elapsed,
}

impl SearchReport {
    /// The final best area.
    #[inline]
    pub fn best_area(&self) -> u64 {
        self.best.area()
    }

    /// The candidate that produced the best area, if any.
    #[inline]
    pub fn best_candidate(&self) -> Option<Candidate> {
        self.best.candidate()
    }

    /// The throughput line for the control core.
    pub fn throughput(&self) -> Throughput {
        Throughput { thread: CONTROL_THREAD_ID, elapsed: self.elapsed }
    }
}

/// Print the throughput line and the final best area on the control
/// device.
pub fn report<C: Console>(console: &mut C, report: &SearchReport) {
    console.select(Device::Control);
    let _ = writeln!(console, "{}", report.throughput());
    let _ = writeln!(console, "best area: {}", report.best_area());
}

// ---------------------------------------------------------------------------
// Search API
// ---------------------------------------------------------------------------

/// Scan `boundary` with the control core driving `fabric` through
/// `executor`, timed by `clock`. The fabric's workers must already be
/// running (or be simulated by the executor).
pub fn drive<const N: usize, E, C, K>(
    boundary: &Boundary,
    fabric: &Fabric<N>,
    executor: E,
    mut console: C,
    clock: K,
) -> SearchReport
where
    E: Executor<N>,
    C: Console,
    K: Clock,
{
    log_event!(info, points = boundary.len(), pool = N, "search started");
    let start = clock.now();

    let mut controller = Controller::new(fabric, executor, &mut console);
    controller.scan(boundary);
    let (best, counters) = controller.finish();

    let end = clock.now();
    let result = SearchReport { best, counters, elapsed: Elapsed::between(&start, &end) };
    log_event!(
        info,
        best_area = result.best_area(),
        generated = counters.generated,
        pruned = counters.pruned,
        batches = counters.batches,
        "search finished"
    );
    report(&mut console, &result);
    result
}

/// Search on a single core: the control core steps `N` simulated workers
/// between completion polls. This is the firmware path on single-core
/// parts and the deterministic path in tests.
///
/// # Errors
/// Any [`Fault`](crate::error::Fault) from validating or modelling the
/// boundary.
pub fn search_inline<const N: usize, C, K>(
    boundary: &Boundary,
    console: C,
    clock: K,
) -> Result<SearchReport>
where
    C: Console,
    K: Clock,
{
    let edges = EdgeSet::from_boundary(boundary)?;
    let fabric = Fabric::<N>::new();
    Ok(drive(boundary, &fabric, InlinePool::<N>::new(&edges), console, clock))
}

/// Search with `N` worker threads spinning on the fabric, one per slot.
///
/// # Errors
/// Any boundary [`Fault`](crate::error::Fault), or
/// [`Fault::Io`](crate::error::Fault::Io) if a worker thread cannot be
/// spawned.
#[cfg(feature = "std")]
pub fn search_threaded<const N: usize, C, K>(
    boundary: &Boundary,
    console: C,
    clock: K,
) -> Result<SearchReport>
where
    C: Console,
    K: Clock,
{
    let edges = EdgeSet::from_boundary(boundary)?;
    let fabric = Fabric::<N>::new();
    crate::pool::run(&fabric, &edges, || {
        drive(boundary, &fabric, crate::scheduler::SpinWait::new(), console, clock)
    })
}
