//! Last-write-wins mailbox from the control thread to the audio thread.
//!
//! Two slots, each guarded by a busy flag. The writer fills whichever slot
//! it can claim (preferring the one not last written), then publishes that
//! slot's index. The reader claims the last-written slot, or the other one
//! if the writer is in the middle of it. Neither side ever waits on the
//! other for longer than one slot copy, and no history is kept.

use std::cell::UnsafeCell;
use std::hint;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[repr(align(64))]
struct Slot<T> {
    busy: AtomicBool,
    data: UnsafeCell<T>,
}

impl<T> Slot<T> {
    fn new(data: T) -> Self {
        Self {
            busy: AtomicBool::new(false),
            data: UnsafeCell::new(data),
        }
    }
}

/// Single-writer, single-reader mailbox holding only the latest value.
pub struct MessageChannel<T> {
    slots: [Slot<T>; 2],
    last_written: AtomicU8,
}

// SAFETY: slot data is only touched while that slot's busy flag is held
// (acquired with `swap(true, Acquire)`, released with `store(false, Release)`),
// so no two threads access the same `UnsafeCell` concurrently.
unsafe impl<T: Send> Sync for MessageChannel<T> {}

impl<T: Copy> MessageChannel<T> {
    pub fn new(initial: T) -> Self {
        Self {
            slots: [Slot::new(initial), Slot::new(initial)],
            last_written: AtomicU8::new(0),
        }
    }

    /// Claim a slot starting from `idx`, alternating until one is free.
    #[inline]
    fn claim(&self, mut idx: usize) -> usize {
        loop {
            if !self.slots[idx].busy.swap(true, Ordering::Acquire) {
                return idx;
            }
            idx = 1 - idx;
            hint::spin_loop();
        }
    }

    /// Read the most recently written value.
    #[inline]
    pub fn read(&self) -> T {
        let idx = self.claim(self.last_written.load(Ordering::Acquire) as usize);
        // SAFETY: busy flag for `idx` is held.
        let value = unsafe { *self.slots[idx].data.get() };
        self.slots[idx].busy.store(false, Ordering::Release);
        value
    }

    /// Replace the mailbox contents. Earlier unread values are lost.
    #[inline]
    pub fn write(&self, value: T) {
        let idx = self.claim(1 - self.last_written.load(Ordering::Relaxed) as usize);
        // SAFETY: busy flag for `idx` is held.
        unsafe { *self.slots[idx].data.get() = value };
        self.slots[idx].busy.store(false, Ordering::Release);
        self.last_written.store(idx as u8, Ordering::Release);
    }

    /// Seed both slots. Only call while no reader is active.
    pub fn initialize(&self, value: T) {
        self.write(value);
        self.write(value);
    }
}

impl<T: Copy + Default> Default for MessageChannel<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Does not claim a slot: formatting never competes with the reader.
impl<T> core::fmt::Debug for MessageChannel<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MessageChannel")
            .field("last_written", &self.last_written.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Track-time region posted by the control thread.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayRegion {
    pub t0: f64,
    pub t1: f64,
}

impl PlayRegion {
    pub const fn new(t0: f64, t1: f64) -> Self {
        Self { t0, t1 }
    }
}
