//! Single-producer, multi-consumer flavor.
//!
//! The producer side needs no retry loop: nothing else ever moves the write
//! index, so one snapshot of each counter decides full-or-not and a single
//! release store publishes the slot. Exclusivity is enforced in the type
//! system through [`Producer`] rather than checked per push.

use crate::errors::{Empty, Full};
use crate::raw::{slot_of, RawRing};
use crate::sync::{AtomicBool, Ordering};

/// Lock-free queue for exactly one producer and any number of consumers.
///
/// Push through the exclusive handle returned by [`SpmcQueue::producer`];
/// pop from as many threads as you like through `&self`. Capacity `CAP`
/// yields `CAP - 1` usable slots.
pub struct SpmcQueue<T, const CAP: usize> {
    ring: RawRing<T, CAP>,
    producer_claimed: AtomicBool,
}

impl<T, const CAP: usize> SpmcQueue<T, CAP> {
    /// Creates an empty queue. Panics if `CAP < 2`.
    pub fn new() -> Self {
        SpmcQueue {
            ring: RawRing::new(),
            producer_claimed: AtomicBool::new(false),
        }
    }

    /// Claims the queue's one producer handle.
    ///
    /// # Panics
    ///
    /// Panics if a handle is already live. The claim is released when the
    /// handle is dropped.
    pub fn producer(&self) -> Producer<'_, T, CAP> {
        if self
            .producer_claimed
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            panic!("a producer handle is already live");
        }
        Producer { queue: self }
    }

    /// Removes the oldest element; `Err(Empty)` if there is none.
    ///
    /// Safe to call from any number of threads concurrently. Consumers race
    /// on a read-index CAS; the loser of a race retries against the next
    /// slot, so collectively the pops preserve push order exactly.
    pub fn pop(&self) -> Result<T, Empty> {
        self.ring.pop_bounded(&self.ring.write_index)
    }

    /// Number of live elements. Exact under the `exact-len` feature,
    /// otherwise a snapshot estimate that can be wrong while pushes and pops
    /// are in flight.
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

impl<T, const CAP: usize> Default for SpmcQueue<T, CAP> {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive push handle for an [`SpmcQueue`].
///
/// At most one handle is live at a time and `push` takes `&mut self`, so no
/// two threads can ever run the single-producer protocol concurrently.
pub struct Producer<'a, T, const CAP: usize> {
    queue: &'a SpmcQueue<T, CAP>,
}

impl<T, const CAP: usize> Producer<'_, T, CAP> {
    /// Appends `value`; `Err(Full)` hands it back if no slot is free.
    pub fn push(&mut self, value: T) -> Result<(), Full<T>> {
        let ring = &self.queue.ring;

        // One snapshot each is enough: the write index is ours alone, and a
        // stale read index only under-reports free space.
        let w = ring.write_index.load(Ordering::Relaxed);
        let r = ring.read_index.load(Ordering::Acquire);

        if slot_of::<CAP>(w.wrapping_add(1)) == slot_of::<CAP>(r) {
            return Err(Full(value));
        }

        // The acquire load above proved every consumer is done with this
        // slot, and the index bump below is what makes it reachable again.
        unsafe { ring.slot_write(w, value) };

        // Publish: a consumer that sees the new write index also sees the
        // slot contents.
        ring.write_index.store(w.wrapping_add(1), Ordering::Release);
        ring.record_push();
        Ok(())
    }
}

impl<T, const CAP: usize> Drop for Producer<'_, T, CAP> {
    fn drop(&mut self) {
        self.queue.producer_claimed.store(false, Ordering::Release);
    }
}
