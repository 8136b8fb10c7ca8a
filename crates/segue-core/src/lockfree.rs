//! Lock-free primitives shared between the control and audio threads.

use atomic_float::AtomicF64;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Cache-line aligned atomic bool.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    #[inline]
    pub fn swap(&self, value: bool) -> bool {
        self.value.swap(value, Ordering::AcqRel)
    }
}

impl Clone for AtomicFlag {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Cache-line aligned atomic f64.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicDouble {
    value: AtomicF64,
}

impl AtomicDouble {
    pub fn new(value: f64) -> Self {
        Self {
            value: AtomicF64::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn get_relaxed(&self) -> f64 {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.value.store(value, Ordering::Release);
    }

    #[inline]
    pub fn set_relaxed(&self, value: f64) {
        self.value.store(value, Ordering::Relaxed);
    }

    #[inline]
    pub fn swap(&self, value: f64) -> f64 {
        self.value.swap(value, Ordering::AcqRel)
    }

    /// Add `delta`, returning the previous value.
    #[inline]
    pub fn fetch_add(&self, delta: f64) -> f64 {
        self.value.fetch_add(delta, Ordering::AcqRel)
    }
}

impl Clone for AtomicDouble {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicDouble {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Ring cursor: a slot index plus the number of samples already
/// accounted for inside that slot.
///
/// Each cursor has exactly one writer, so relaxed ordering is enough for
/// the fields themselves; slot contents carry the happens-before edge.
#[derive(Debug, Default)]
#[repr(align(64))]
pub(crate) struct Cursor {
    index: AtomicUsize,
    remainder: AtomicUsize,
}

impl Cursor {
    #[inline]
    pub(crate) fn load(&self) -> (usize, usize) {
        (
            self.index.load(Ordering::Relaxed),
            self.remainder.load(Ordering::Relaxed),
        )
    }

    #[inline]
    pub(crate) fn store(&self, index: usize, remainder: usize) {
        self.index.store(index, Ordering::Relaxed);
        self.remainder.store(remainder, Ordering::Relaxed);
    }
}
