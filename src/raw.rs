//! Shared base state: slot storage, the two monotonic indices, capacity
//! arithmetic, and the multi-consumer pop loop layered on top of them.
//!
//! Both queue flavors own a [`RawRing`]; they differ only in how the write
//! side advances and in which counter bounds the consumers.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;

use crossbeam_utils::CachePadded;

use crate::errors::Empty;
use crate::sync::{yield_now, AtomicUsize, Ordering};

#[cfg(not(loom))]
const SPIN_LIMIT: usize = 64;

/// Maps an unbounded (wrapping) counter to a physical slot in `[0, CAP)`.
#[inline]
pub(crate) fn slot_of<const CAP: usize>(count: usize) -> usize {
    count % CAP
}

/// Spin a bounded number of times, then start yielding to the scheduler.
#[cfg(not(loom))]
#[inline]
pub(crate) fn backoff(mut spin: usize) -> usize {
    if spin < SPIN_LIMIT {
        spin += 1;
        core::hint::spin_loop();
    } else {
        yield_now();
    }
    spin
}

// Pure spinning starves loom's cooperative scheduler, so always yield there.
#[cfg(loom)]
#[inline]
pub(crate) fn backoff(spin: usize) -> usize {
    yield_now();
    spin
}

struct Slot<T>(UnsafeCell<MaybeUninit<T>>);

impl<T> Slot<T> {
    fn new() -> Self {
        Slot(UnsafeCell::new(MaybeUninit::uninit()))
    }
}

unsafe impl<T: Send> Send for Slot<T> {}
unsafe impl<T: Send> Sync for Slot<T> {}

/// Circular buffer plus the two index counters every flavor shares.
///
/// Both counters grow without bound (wrapping at the width of `usize`) and are
/// only ever compared through [`slot_of`]. One slot is sacrificed so that
/// `slot_of(write + 1) == slot_of(read)` can mean "full" while
/// `slot_of(write) == slot_of(read)` means "empty".
pub(crate) struct RawRing<T, const CAP: usize> {
    buffer: Box<[Slot<T>; CAP]>,
    pub(crate) write_index: CachePadded<AtomicUsize>,
    pub(crate) read_index: CachePadded<AtomicUsize>,
    #[cfg(feature = "exact-len")]
    count: CachePadded<AtomicUsize>,
}

impl<T, const CAP: usize> RawRing<T, CAP> {
    pub(crate) fn new() -> Self {
        assert!(CAP >= 2, "capacity must be at least 2 (one slot is reserved)");

        let mut slots = Vec::with_capacity(CAP);
        for _ in 0..CAP {
            slots.push(Slot::new());
        }
        let buffer: Box<[Slot<T>; CAP]> = slots
            .into_boxed_slice()
            .try_into()
            .unwrap_or_else(|_| panic!("capacity mismatch"));

        RawRing {
            buffer,
            write_index: CachePadded::new(AtomicUsize::new(0)),
            read_index: CachePadded::new(AtomicUsize::new(0)),
            #[cfg(feature = "exact-len")]
            count: CachePadded::new(AtomicUsize::new(0)),
        }
    }

    /// Writes `value` into the slot for `count` without dropping the stale
    /// bytes already there (they were either moved out by a pop or never
    /// initialized).
    ///
    /// # Safety
    ///
    /// The caller must hold an exclusive claim on the slot: either the single
    /// producer publishing `slot_of(count)` before bumping `write_index`, or a
    /// multi-producer reservation obtained by winning the write-index CAS.
    pub(crate) unsafe fn slot_write(&self, count: usize, value: T) {
        (*self.buffer[slot_of::<CAP>(count)].0.get()).write(value);
    }

    /// Copies the slot for `count` out as a still-uninterpreted value.
    ///
    /// # Safety
    ///
    /// The caller may only `assume_init` the copy after proving (via the
    /// read-index CAS) that the slot held a live element for the whole read.
    unsafe fn slot_read(&self, count: usize) -> MaybeUninit<T> {
        core::ptr::read(self.buffer[slot_of::<CAP>(count)].0.get())
    }

    /// Number of live elements.
    ///
    /// Without the `exact-len` feature this is derived from one unpaired
    /// snapshot of each index and is only exact while no push or pop is in
    /// flight; see the comment in the body for the accepted inaccuracy.
    pub(crate) fn len(&self) -> usize {
        #[cfg(feature = "exact-len")]
        {
            self.count.load(Ordering::Relaxed)
        }
        #[cfg(not(feature = "exact-len"))]
        {
            let w = self.write_index.load(Ordering::Relaxed);
            let r = self.read_index.load(Ordering::Relaxed);

            // The two loads are not taken as a pair. If this thread stalls
            // between them while other threads push and pop, the read index
            // can appear to have passed the write snapshot, and the wrapped
            // difference below reports a nearly full queue that is in fact
            // nearly empty. Accepted: callers wanting an exact answer enable
            // the `exact-len` counter instead.
            if w >= r {
                w - r
            } else {
                CAP.wrapping_add(w).wrapping_sub(r)
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact full check: a single normalized comparison. A stale pair of
    /// indices can only make a push spuriously fail and retry, never corrupt.
    pub(crate) fn is_full(&self) -> bool {
        #[cfg(feature = "exact-len")]
        {
            self.count.load(Ordering::Relaxed) == CAP - 1
        }
        #[cfg(not(feature = "exact-len"))]
        {
            let w = self.write_index.load(Ordering::Relaxed);
            let r = self.read_index.load(Ordering::Relaxed);
            slot_of::<CAP>(w.wrapping_add(1)) == slot_of::<CAP>(r)
        }
    }

    #[inline]
    pub(crate) fn record_push(&self) {
        #[cfg(feature = "exact-len")]
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_pop(&self) {
        #[cfg(feature = "exact-len")]
        self.count.fetch_sub(1, Ordering::Relaxed);
    }

    /// Multi-consumer pop, bounded by `upper`: the write index for the
    /// single-producer flavor, the committed index for the multi-producer one
    /// (so a reserved-but-uncommitted slot is never handed out).
    pub(crate) fn pop_bounded(&self, upper: &AtomicUsize) -> Result<T, Empty> {
        loop {
            let limit = upper.load(Ordering::Acquire);
            let r = self.read_index.load(Ordering::Relaxed);

            // The two loads are not paired: other consumers can advance the
            // read index past our stale `limit` while we sit between them, so
            // the raw wrapping distance is the only trustworthy gauge. Zero
            // means empty; `CAP` or more means the snapshot is stale (a live
            // pair never strays that far, the queue holds at most `CAP - 1`).
            // Either way there is nothing claimable, and bounding the claim by
            // `limit` keeps every handed-out slot covered by the acquire load
            // above.
            let available = limit.wrapping_sub(r);
            if available == 0 || available >= CAP {
                return Err(Empty);
            }

            // Copy the candidate out before claiming it. The producer cannot
            // reuse this slot until the read index has moved past `r`, so the
            // copy races only with other consumers, and they never write.
            let candidate = unsafe { self.slot_read(r) };

            if self
                .read_index
                .compare_exchange_weak(
                    r,
                    r.wrapping_add(1),
                    Ordering::AcqRel,
                    Ordering::Relaxed,
                )
                .is_ok()
            {
                self.record_pop();
                // We won the claim, so no other consumer took slot `r` and the
                // producer cannot have overwritten it before our copy: the
                // bytes are the pushed value.
                return Ok(unsafe { candidate.assume_init() });
            }

            // Another consumer claimed this slot first. `candidate` is still a
            // `MaybeUninit`, so discarding it does not drop the winner's value.
            core::hint::spin_loop();
        }
    }
}

impl<T, const CAP: usize> Drop for RawRing<T, CAP> {
    fn drop(&mut self) {
        // `&mut self` means no push or pop is in flight, so every element in
        // [read_index, write_index) is live and owned by the queue.
        let mut pos = self.read_index.load(Ordering::Relaxed);
        let end = self.write_index.load(Ordering::Relaxed);
        while pos != end {
            let slot = &self.buffer[slot_of::<CAP>(pos)];
            unsafe { (*slot.0.get()).assume_init_drop() };
            pos = pos.wrapping_add(1);
        }
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn slot_of_wraps_the_counter() {
        assert_eq!(slot_of::<4>(0), 0);
        assert_eq!(slot_of::<4>(5), 1);
        assert_eq!(slot_of::<4>(usize::MAX), 3);
        assert_eq!(slot_of::<6>(usize::MAX), 3);
    }

    #[test]
    fn fresh_ring_is_empty_not_full() {
        let ring = RawRing::<u8, 4>::new();
        assert_eq!(ring.len(), 0);
        assert!(ring.is_empty());
        assert!(!ring.is_full());
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 2")]
    fn one_slot_ring_is_rejected() {
        let _ = RawRing::<u8, 1>::new();
    }
}
