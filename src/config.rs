//! # Offrect Configuration
//!
//! Compile-time constants governing the worker pool and the fixed arenas.
//! All limits are fixed at compile time; no dynamic allocation.

/// Number of worker cores (and therefore Offload Queue slots) in the
/// default pool. Every protocol type also takes the pool size as a const
/// generic, so smaller pools can be instantiated for tests or for targets
/// with fewer cores.
pub const NCPU: usize = 4 * 16;

/// Maximum number of boundary points the ingestion arena can hold.
pub const MAX_POINTS: usize = 1024;

/// Maximum number of edges per orientation. A closed boundary of `n`
/// points has exactly `n` segments, so this can never be smaller than
/// `MAX_POINTS`.
pub const MAX_EDGES: usize = MAX_POINTS;

/// Longest accepted input line in bytes, terminator excluded.
pub const LINE_CAPACITY: usize = 256;

/// Minimum number of boundary points for a closed polygon.
pub const MIN_POINTS: usize = 3;

/// Identifier the control core reports in its throughput line.
pub const CONTROL_THREAD_ID: u32 = 1;

/// Hosted pools only: busy polls a waiting thread makes before it starts
/// yielding its time slice on every further poll. Bare-metal cores spin
/// without limit.
pub const SPIN_CHECK_INTERVAL: u32 = 1 << 10;

const _: () = assert!(MAX_EDGES >= MAX_POINTS);
const _: () = assert!(NCPU > 0);
