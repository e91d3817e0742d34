//! # Offrect: Control/Worker Offload Firmware
//!
//! Searches a rectilinear polygon for the largest empty axis-aligned
//! rectangle spanned by two of its vertices, using one control core that
//! generates work and a fixed pool of worker cores that test it. The two
//! sides talk only through shared memory and busy-wait flags.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │        Binaries: offrect (CLI) · offrect-fw (M4)        │
//! ├────────────────────────────────────────────────────────┤
//! │                Search API (kernel.rs)                   │
//! │     search_inline() · search_threaded() · report()     │
//! ├──────────────┬────────────────────┬───────────────────┤
//! │  Scheduler   │  Dispatch Protocol │  Worker Pool      │
//! │  scheduler.rs│  protocol.rs       │  pool.rs (std)    │
//! │  ─ scan()    │  ─ Dispatcher::arm │  ─ run()          │
//! │  ─ offer()   │  ─ Batch::wait     │                   │
//! │  ─ drain()   │  ─ Worker::step    │  InlinePool       │
//! ├──────────────┴──────┬─────────────┴───────────────────┤
//! │ Offload Queue       │ Intersection Test · Reducer      │
//! │ queue.rs            │ intersect.rs · reducer.rs        │
//! ├─────────────────────┴──────────────────────────────────┤
//! │  Boundary Model: boundary.rs · edges.rs · candidate.rs │
//! ├────────────────────────────────────────────────────────┤
//! │ Collaborators: ingest.rs · diag.rs · stats.rs · arch/  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Memory Model
//!
//! - **No heap** in the core: boundary, edge lists, staging queue and
//!   fabric are fixed arrays sized by [`config`]
//! - **One owner per slot field**: control writes candidates and the
//!   generation counter, the slot's worker writes the hit and completion
//!   flags; `Release`/`Acquire` on the two signals transfers ownership
//! - **Best area** lives in the control core's [`scheduler::Controller`]
//!   and changes only after a batch barrier
//!
//! ## Features
//!
//! - `std`: threaded pool, host clock and console, `BufRead` ingestion,
//!   `tracing` events
//! - `cli` (default): the `offrect` command-line binary
//! - `firmware`: the `offrect-fw` bare-metal image

#![cfg_attr(not(any(feature = "std", test)), no_std)]

/// Structured event, forwarded to `tracing` when it is available and
/// compiled away otherwise.
#[cfg(feature = "std")]
macro_rules! log_event {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

#[cfg(not(feature = "std"))]
macro_rules! log_event {
    ($level:ident, $($arg:tt)+) => {};
}

pub mod config;
pub mod error;
pub mod sync;

pub mod boundary;
pub mod candidate;
pub mod edges;

pub mod intersect;
pub mod protocol;
pub mod queue;
pub mod reducer;
pub mod scheduler;

#[cfg(feature = "std")]
pub mod pool;

pub mod kernel;

pub mod arch;
pub mod diag;
pub mod ingest;
pub mod stats;
