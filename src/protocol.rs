//! # Dispatch / Handshake Protocol
//!
//! The synchronisation contract between the control core and the worker
//! pool. Each worker core owns exactly one [`Slot`] of the shared
//! [`Fabric`]; ownership of a slot's fields passes back and forth through
//! two signals only: a generation counter (control → worker) and a
//! completion flag (worker → control). No lock, no compare-and-swap.
//!
//! ## Slot State Machine
//!
//! ```text
//!   ┌──────┐  stage + validity   ┌───────┐  generation += 1   ┌─────────┐
//!   │ Idle │ ──────────────────► │ Armed │ ─────────────────► │ Running │
//!   └──────┘                     └───────┘                    └─────────┘
//!      ▲                                                           │
//!      │  control reaps, clears done + validity                    │
//!      │                          ┌──────┐   hit, done = true      │
//!      └───────────────────────── │ Done │ ◄───────────────────────┘
//!                                 └──────┘
//! ```
//!
//! 1. The control core writes validity and candidate fields for every
//!    slot (unused slots are marked invalid).
//! 2. It raises every slot's generation counter by one with `Release`
//!    ordering, publishing step 1.
//! 3. A worker spins until its slot's generation equals its private
//!    `completed + 1` tally (`Acquire`), runs the intersection test unless
//!    the slot is invalid, writes the hit flag, raises the completion flag
//!    (`Release`) and bumps its tally.
//! 4. The control core spins until every completion flag is set
//!    (`Acquire`), reduces the results, then clears completion flags and
//!    validity before the next batch.
//!
//! A [`Batch`] mutably borrows the [`Dispatcher`] for as long as it is
//! live, so no slot can be armed a second time before the previous
//! batch has been observed complete and cleared. With one live generation
//! per slot the protocol is a barrier, not a queue.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::candidate::{Corners, Rect};
use crate::edges::EdgeSet;
use crate::intersect::intersects;
use crate::sync::{self, spin_until};

// ---------------------------------------------------------------------------
// Slot: one worker's window of shared memory
// ---------------------------------------------------------------------------

/// Where a slot stands in the handshake, as seen by the worker that
/// serves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPhase {
    /// Nothing staged for the worker's next generation.
    Idle,
    /// Candidate and validity written, generation not yet raised.
    Armed,
    /// Generation raised to the worker's expected value, result pending.
    Running,
    /// Result and completion flag published, not yet reaped.
    Done,
}

/// One Offload Queue slot, permanently bound to one worker core.
/// Cache-line aligned so neighbouring workers never share a line.
#[repr(C, align(64))]
pub struct Slot {
    /// Control → worker: this slot carries a candidate this generation.
    valid: AtomicBool,
    /// Control → worker: candidate bounding box.
    x_lo: AtomicU32,
    x_hi: AtomicU32,
    y_lo: AtomicU32,
    y_hi: AtomicU32,
    /// Worker → control: the candidate is crossed by an edge.
    hit: AtomicBool,
    /// Control → worker: release signal, only ever written by control.
    generation: AtomicU32,
    /// Worker → control: result written.
    done: AtomicBool,
}

impl Slot {
    /// An idle slot at generation 0.
    pub const fn new() -> Self {
        Self {
            valid: AtomicBool::new(false),
            x_lo: AtomicU32::new(0),
            x_hi: AtomicU32::new(0),
            y_lo: AtomicU32::new(0),
            y_hi: AtomicU32::new(0),
            hit: AtomicBool::new(false),
            generation: AtomicU32::new(0),
            done: AtomicBool::new(false),
        }
    }

    /// Control: write candidate fields. Published by the next generation bump.
    #[inline]
    pub fn stage(&self, corners: Corners) {
        // Ordering: Relaxed, the Release increment of `generation` publishes these.
        self.x_lo.store(corners.x_lo, Ordering::Relaxed);
        self.x_hi.store(corners.x_hi, Ordering::Relaxed);
        self.y_lo.store(corners.y_lo, Ordering::Relaxed);
        self.y_hi.store(corners.y_hi, Ordering::Relaxed);
    }

    /// Control: mark the staged candidate (in)valid for the coming batch.
    #[inline]
    fn set_valid(&self, valid: bool) {
        self.valid.store(valid, Ordering::Relaxed);
    }

    /// Control: raise the generation counter, handing the slot to its worker.
    #[inline]
    fn release(&self) -> u32 {
        // Ordering: Release, everything staged above becomes visible to
        // the worker that observes the new generation with Acquire.
        self.generation.fetch_add(1, Ordering::Release).wrapping_add(1)
    }

    /// Control: clear completion and validity after the batch is reaped.
    #[inline]
    fn retire(&self) {
        // Ordering: Relaxed, the worker does not touch either flag again
        // until the next Release increment of `generation`.
        self.done.store(false, Ordering::Relaxed);
        self.valid.store(false, Ordering::Relaxed);
    }

    /// Current generation counter.
    #[inline]
    pub fn generation(&self) -> u32 {
        // Ordering: Acquire, pairs with the control core's Release increment.
        self.generation.load(Ordering::Acquire)
    }

    /// True once the worker has published this generation's result.
    #[inline]
    pub fn is_done(&self) -> bool {
        // Ordering: Acquire, pairs with the worker's Release store.
        self.done.load(Ordering::Acquire)
    }

    /// True if the current batch carries a candidate in this slot.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Relaxed)
    }

    /// Hit flag of the last completed generation.
    ///
    /// Only meaningful after [`is_done`](Self::is_done) returned true.
    #[inline]
    pub fn hit(&self) -> bool {
        // Ordering: Relaxed, ordered by the Acquire load of `done`.
        self.hit.load(Ordering::Relaxed)
    }

    /// Phase of this slot for a worker expecting generation `expected`.
    pub fn phase(&self, expected: u32) -> SlotPhase {
        if self.is_done() {
            SlotPhase::Done
        } else if self.generation() == expected {
            SlotPhase::Running
        } else if self.is_valid() {
            SlotPhase::Armed
        } else {
            SlotPhase::Idle
        }
    }

    /// Worker: the inset rectangle to test, or `None` for an invalid slot.
    #[inline]
    fn candidate(&self) -> Option<Rect> {
        if !self.is_valid() {
            return None;
        }
        let corners = Corners {
            x_lo: self.x_lo.load(Ordering::Relaxed),
            x_hi: self.x_hi.load(Ordering::Relaxed),
            y_lo: self.y_lo.load(Ordering::Relaxed),
            y_hi: self.y_hi.load(Ordering::Relaxed),
        };
        Some(corners.inset())
    }

    /// Worker: publish the result and hand the slot back.
    #[inline]
    fn complete(&self, hit: bool) {
        self.hit.store(hit, Ordering::Relaxed);
        // Ordering: Release, publishes `hit` before control sees `done`.
        self.done.store(true, Ordering::Release);
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Fabric: the shared-memory region
// ---------------------------------------------------------------------------

/// The shared-memory region between the control core and `N` workers.
pub struct Fabric<const N: usize> {
    slots: [Slot; N],
    /// Hosted pools only: tells idle workers to leave their spin loop.
    halt: AtomicBool,
}

impl<const N: usize> Fabric<N> {
    /// A fabric with every slot idle at generation 0.
    pub const fn new() -> Self {
        Self {
            slots: [const { Slot::new() }; N],
            halt: AtomicBool::new(false),
        }
    }

    /// Number of slots (and workers).
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// The slot bound to worker `index`.
    #[inline]
    pub fn slot(&self, index: usize) -> &Slot {
        &self.slots[index]
    }

    /// All slots in worker order.
    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// True once every slot has raised its completion flag.
    #[inline]
    pub fn all_done(&self) -> bool {
        self.slots.iter().all(Slot::is_done)
    }

    /// Ask idle workers to exit. Workers finish an admitted generation
    /// before they look at this flag.
    #[inline]
    pub fn halt(&self) {
        self.halt.store(true, Ordering::Release);
    }

    /// True once [`halt`](Self::halt) has been called.
    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halt.load(Ordering::Acquire)
    }
}

impl<const N: usize> Default for Fabric<N> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Worker side
// ---------------------------------------------------------------------------

/// A worker core's private state: its slot and the number of generations
/// it has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Worker {
    slot: usize,
    completed: u32,
}

impl Worker {
    /// A fresh worker bound to `slot`, expecting generation 1.
    pub const fn new(slot: usize) -> Self {
        Self { slot, completed: 0 }
    }

    /// The slot this worker serves.
    #[inline]
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Generations completed so far.
    #[inline]
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// The generation this worker will execute next.
    #[inline]
    pub fn expected(&self) -> u32 {
        self.completed.wrapping_add(1)
    }

    /// Admission predicate: the slot's generation equals `completed + 1`.
    #[inline]
    pub fn is_admitted<const N: usize>(&self, fabric: &Fabric<N>) -> bool {
        fabric.slot(self.slot).generation() == self.expected()
    }

    /// Phase of this worker's slot from the worker's point of view.
    #[inline]
    pub fn phase<const N: usize>(&self, fabric: &Fabric<N>) -> SlotPhase {
        fabric.slot(self.slot).phase(self.expected())
    }

    /// Execute one generation if admitted. Returns whether it ran.
    pub fn step<const N: usize>(&mut self, fabric: &Fabric<N>, edges: &EdgeSet) -> bool {
        if !self.is_admitted(fabric) {
            return false;
        }
        self.execute(fabric, edges);
        true
    }

    /// Serve generations until the fabric is halted.
    ///
    /// Spins on the admission predicate between polls of an idle body.
    /// `idle` builds a fresh body for every wait, so a spin-then-yield
    /// budget starts over after each admission. On bare metal the fabric is
    /// never halted and this never returns.
    pub fn run<const N: usize, W, I>(&mut self, fabric: &Fabric<N>, edges: &EdgeSet, mut idle: W)
    where
        W: FnMut() -> I,
        I: FnMut(),
    {
        log_event!(trace, slot = self.slot, "worker online");
        loop {
            spin_until(|| self.is_admitted(fabric) || fabric.is_halted(), idle());
            if !self.step(fabric, edges) {
                break;
            }
        }
        log_event!(trace, slot = self.slot, completed = self.completed, "worker halted");
    }

    fn execute<const N: usize>(&mut self, fabric: &Fabric<N>, edges: &EdgeSet) {
        let slot = fabric.slot(self.slot);
        let hit = slot.candidate().is_some_and(|rect| intersects(&rect, edges));
        slot.complete(hit);
        self.completed = self.completed.wrapping_add(1);
    }
}

// ---------------------------------------------------------------------------
// Control side
// ---------------------------------------------------------------------------

/// Control-core half of the protocol. Tracks the generation it last issued.
#[derive(Debug, Default)]
pub struct Dispatcher {
    issued: u32,
}

impl Dispatcher {
    /// A dispatcher that has issued no generation yet.
    pub const fn new() -> Self {
        Self { issued: 0 }
    }

    /// The last generation raised on every slot.
    #[inline]
    pub fn issued(&self) -> u32 {
        self.issued
    }

    /// Arm a batch whose first `fill` slots hold staged candidates.
    ///
    /// Marks validity for every slot, then raises every generation
    /// counter. The returned [`Batch`] must be waited on; dropping it
    /// unfinished spins until the workers are done so the slots are never
    /// re-armed while still owned by a worker.
    pub fn arm<'a, const N: usize>(
        &'a mut self,
        fabric: &'a Fabric<N>,
        fill: usize,
    ) -> Batch<'a, N> {
        let fill = fill.min(N);
        for (index, slot) in fabric.slots().iter().enumerate() {
            slot.set_valid(index < fill);
        }
        for slot in fabric.slots() {
            slot.release();
        }
        self.issued = self.issued.wrapping_add(1);
        Batch {
            fabric,
            generation: self.issued,
            fill,
            complete: false,
            _dispatcher: self,
        }
    }
}

/// Result of one slot in a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotResult {
    /// Slot (and staging) index.
    pub slot: usize,
    /// Whether the candidate was crossed by an edge.
    pub hit: bool,
}

/// An in-flight (then completed) batch. Clears completion flags and
/// validity when dropped.
#[must_use = "an armed batch must be waited on and reaped"]
pub struct Batch<'a, const N: usize> {
    fabric: &'a Fabric<N>,
    generation: u32,
    fill: usize,
    complete: bool,
    _dispatcher: &'a mut Dispatcher,
}

impl<const N: usize> Batch<'_, N> {
    /// Generation this batch was released under.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Number of valid slots.
    #[inline]
    pub fn fill(&self) -> usize {
        self.fill
    }

    /// Poll the completion flags once.
    pub fn poll(&mut self) -> bool {
        if !self.complete {
            self.complete = self.fabric.all_done();
        }
        self.complete
    }

    /// Spin until every slot reports done, running `idle` between polls.
    pub fn wait<I: FnMut()>(&mut self, idle: I) {
        if !self.complete {
            spin_until(|| self.fabric.all_done(), idle);
            self.complete = true;
        }
    }

    /// Results of the valid slots. Empty until the batch is complete.
    pub fn results(&self) -> impl Iterator<Item = SlotResult> + '_ {
        let fill = if self.complete { self.fill } else { 0 };
        self.fabric.slots()[..fill]
            .iter()
            .enumerate()
            .map(|(slot, s)| SlotResult { slot, hit: s.hit() })
    }
}

impl<const N: usize> Drop for Batch<'_, N> {
    fn drop(&mut self) {
        self.wait(sync::relax);
        for slot in self.fabric.slots() {
            slot.retire();
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
