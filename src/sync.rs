//! # Spin-Wait Primitives
//!
//! Busy-wait polling is the only suspension mechanism in Offrect: there
//! are no locks, condition variables or interrupts. Every wait is written
//! as an explicit predicate plus an idle body, so the same wait can run on
//! real parallel cores or be stepped deterministically in a single-core
//! simulation (the idle body then advances the simulated workers).

/// Spin until `ready()` returns true, running `idle()` between polls.
///
/// There is no timeout. A predicate that never becomes true spins
/// forever, which is the accepted failure mode of the protocol.
#[inline]
pub fn spin_until<P, I>(mut ready: P, mut idle: I)
where
    P: FnMut() -> bool,
    I: FnMut(),
{
    while !ready() {
        idle();
    }
}

/// Idle body for dedicated cores: a pure spin-loop hint.
#[inline]
pub fn relax() {
    core::hint::spin_loop();
}

/// Idle body for hosted threads sharing CPUs with each other: spin for
/// `spin_limit` polls, then yield the OS time slice on every further poll.
///
/// A worker pool wider than the host's CPU count would otherwise starve
/// the very threads it is waiting on.
#[cfg(feature = "std")]
pub fn spin_then_yield(spin_limit: u32) -> impl FnMut() {
    let mut spins = 0u32;
    move || {
        if spins < spin_limit {
            spins += 1;
            core::hint::spin_loop();
        } else {
            std::thread::yield_now();
        }
    }
}
