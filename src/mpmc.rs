//! Multi-producer, multi-consumer flavor.
//!
//! Producers reserve a slot with a CAS on the write index, write into it, and
//! then commit through a separate counter so consumers never observe a slot
//! whose data write is still in flight. Commits land in reservation order:
//! each producer waits until the committed index reaches its own reservation
//! before advancing it.

use crossbeam_utils::CachePadded;

use crate::errors::{Empty, Full};
use crate::raw::{backoff, slot_of, RawRing};
use crate::sync::{AtomicUsize, Ordering};

/// Lock-free queue for any number of producers and consumers.
///
/// Same storage and pop protocol as [`SpmcQueue`](crate::SpmcQueue), plus a
/// committed-index counter that tracks the highest write every producer has
/// finished. Capacity `CAP` yields `CAP - 1` usable slots.
pub struct MpmcQueue<T, const CAP: usize> {
    ring: RawRing<T, CAP>,
    committed: CachePadded<AtomicUsize>,
}

impl<T, const CAP: usize> MpmcQueue<T, CAP> {
    /// Creates an empty queue. Panics if `CAP < 2`.
    pub fn new() -> Self {
        MpmcQueue {
            ring: RawRing::new(),
            committed: CachePadded::new(AtomicUsize::new(0)),
        }
    }

    /// Appends `value`; `Err(Full)` hands it back if no slot is free.
    ///
    /// Any number of threads may push concurrently. A push that loses a
    /// reservation race retries internally; only a genuinely full queue
    /// returns an error.
    pub fn push(&self, value: T) -> Result<(), Full<T>> {
        let ring = &self.ring;

        // Reserve a slot.
        let w = loop {
            let w = ring.write_index.load(Ordering::Relaxed);
            let r = ring.read_index.load(Ordering::Acquire);

            if slot_of::<CAP>(w.wrapping_add(1)) == slot_of::<CAP>(r) {
                return Err(Full(value));
            }

            if ring
                .write_index
                .compare_exchange_weak(
                    w,
                    w.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                )
                .is_ok()
            {
                break w;
            }
            core::hint::spin_loop();
        };

        // The reservation is ours; no consumer can reach the slot until the
        // commit below.
        unsafe { ring.slot_write(w, value) };

        // Commit in reservation order: wait for producers holding earlier
        // slots to land theirs first, then release-publish ours.
        let mut spin = 0;
        while self
            .committed
            .compare_exchange_weak(
                w,
                w.wrapping_add(1),
                Ordering::Release,
                Ordering::Relaxed,
            )
            .is_err()
        {
            spin = backoff(spin);
        }

        ring.record_push();
        Ok(())
    }

    /// Removes the oldest committed element; `Err(Empty)` if there is none.
    ///
    /// Bounded by the committed index, so a slot another producer has
    /// reserved but not yet written reads as empty, never as garbage.
    pub fn pop(&self) -> Result<T, Empty> {
        self.ring.pop_bounded(&self.committed)
    }

    /// Number of live elements. Exact under the `exact-len` feature,
    /// otherwise a snapshot estimate.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Whether the queue currently holds no elements.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Whether the queue currently holds `CAP - 1` elements.
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Total slot count; one slot is always kept free.
    pub const fn capacity(&self) -> usize {
        CAP
    }
}

impl<T, const CAP: usize> Default for MpmcQueue<T, CAP> {
    fn default() -> Self {
        Self::new()
    }
}
