//! # Hosted Worker Pool
//!
//! One OS thread per fabric slot, standing in for the worker cores. Each
//! thread runs [`Worker::run`]: spin on its slot's generation counter,
//! test, publish, repeat. The only addition over bare metal is the
//! fabric's halt flag, raised once the control closure returns so the
//! scoped threads can be joined.
//!
//! ```text
//!   caller thread (control core)         worker-0 … worker-{N-1}
//!   ────────────────────────────         ───────────────────────
//!   spawn N scoped workers ───────────►  spin until admitted | halted
//!   control() … arm / wait / reduce ◄──► test, hit, done
//!   fabric.halt() ────────────────────►  leave spin loop, exit
//!   join (end of scope)
//! ```

use std::thread;

use crate::config::SPIN_CHECK_INTERVAL;
use crate::edges::EdgeSet;
use crate::error::{Fault, Result};
use crate::protocol::{Fabric, Worker};
use crate::sync::spin_then_yield;

/// Raises the halt flag when dropped, so workers leave their spin loop
/// even if the control closure unwinds.
struct HaltOnDrop<'f, const N: usize>(&'f Fabric<N>);

impl<const N: usize> Drop for HaltOnDrop<'_, N> {
    fn drop(&mut self) {
        self.0.halt();
    }
}

/// Run `control` on the calling thread while `N` worker threads serve
/// `fabric` against `edges`. Workers are halted and joined before this
/// returns.
///
/// # Errors
/// [`Fault::Io`] if a worker thread cannot be spawned. Workers already
/// started are halted first.
pub fn run<const N: usize, R, F>(fabric: &Fabric<N>, edges: &EdgeSet, control: F) -> Result<R>
where
    F: FnOnce() -> R,
{
    thread::scope(|scope| {
        let _halt = HaltOnDrop(fabric);
        for slot in 0..N {
            let spawned = thread::Builder::new()
                .name(format!("worker-{slot}"))
                .spawn_scoped(scope, move || {
                    let mut worker = Worker::new(slot);
                    worker.run(fabric, edges, || spin_then_yield(SPIN_CHECK_INTERVAL));
                });
            if let Err(err) = spawned {
                log_event!(error, slot, %err, "failed to spawn worker");
                return Err(Fault::Io(err));
            }
        }
        log_event!(debug, workers = N, "worker pool online");
        Ok(control())
    })
}
