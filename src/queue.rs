//! # Offload Queue
//!
//! Single-producer staging buffer with one position per worker slot. The
//! control core appends candidates one at a time, writing each one's
//! bounding box straight into its slot of the shared [`Fabric`] (the
//! control core owns every slot between batches) and keeping the full
//! candidate, area included, in a private mirror for the reducer.

use crate::candidate::Candidate;
use crate::protocol::Fabric;

/// Fixed-capacity staging buffer, capacity = pool size `N`.
pub struct OffloadQueue<const N: usize> {
    staged: [Candidate; N],
    fill: usize,
}

impl<const N: usize> OffloadQueue<N> {
    /// An empty queue.
    pub const fn new() -> Self {
        const EMPTY: Candidate = Candidate {
            corners: crate::candidate::Corners { x_lo: 0, x_hi: 0, y_lo: 0, y_hi: 0 },
            area: 0,
        };
        Self { staged: [EMPTY; N], fill: 0 }
    }

    /// Number of staged candidates (the write cursor).
    #[inline]
    pub fn len(&self) -> usize {
        self.fill
    }

    /// True if nothing is staged.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fill == 0
    }

    /// True if the next append would exceed the pool size.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.fill >= N
    }

    /// Stage `candidate` into the next free slot.
    ///
    /// # Errors
    /// Hands the candidate back when the queue is full; the caller
    /// drains first.
    pub fn push(&mut self, fabric: &Fabric<N>, candidate: Candidate) -> Result<usize, Candidate> {
        if self.is_full() {
            return Err(candidate);
        }
        let index = self.fill;
        fabric.slot(index).stage(candidate.corners);
        self.staged[index] = candidate;
        self.fill += 1;
        Ok(index)
    }

    /// The staged candidates, in slot order.
    #[inline]
    pub fn staged(&self) -> &[Candidate] {
        &self.staged[..self.fill]
    }

    /// Reset the write cursor after a drain.
    #[inline]
    pub fn clear(&mut self) {
        self.fill = 0;
    }
}

impl<const N: usize> Default for OffloadQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
