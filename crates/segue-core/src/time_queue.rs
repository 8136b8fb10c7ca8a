//! Sample-to-track-time ring for "now playing" readout.
//!
//! The audio thread computes track time one slice ahead of what is audible.
//! The producer side records one time value per grain of samples sent
//! downstream; the consumer side, driven by samples actually rendered,
//! reads back the value for the grain currently leaving the speakers.
//!
//! One producer (the audio thread filling the output buffer) and one
//! consumer (whoever observes rendered output). Capacity must cover the
//! output buffer so the two cursors never lap; nothing here checks that.

use crate::lockfree::{AtomicDouble, Cursor};
use crate::policy::{PlaybackPolicy, PlaybackSlice};
use crate::schedule::Timeline;
use atomic_float::AtomicF64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Track-time bounds of one producer call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProducedSpan {
    pub start: f64,
    pub end: f64,
    /// Output frames in the slice, padding included.
    pub frames: usize,
}

/// Observer notified from the time queue.
///
/// Hooks run on the calling thread (`on_produce` on the audio thread) and
/// must not block. Registration order is call order.
pub trait PlaybackExtension: Send + Sync {
    fn on_produce(&self, _span: ProducedSpan) {}

    /// Called once per full grain the consumer moves past.
    fn on_consume(&self, _frames: usize, _rate: f64, _pause_frames: usize, _has_solo: bool) {}

    fn on_prime(&self, _start: f64) {}
}

/// Extra state the rendering side reports with each consume call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumeInfo {
    /// Frames of the consumed block that were paused silence.
    pub pause_frames: usize,
    pub has_solo: bool,
}

pub struct TimeQueue {
    slots: Box<[AtomicF64]>,
    grain: usize,
    head: Cursor,
    tail: Cursor,
    /// Producer's continuation point.
    last_time: AtomicDouble,
    /// Consumer accumulator for an unpopulated queue.
    linear_time: AtomicDouble,
    extensions: Vec<Arc<dyn PlaybackExtension>>,
}

impl TimeQueue {
    /// An unpopulated queue: the consumer falls back to linear time.
    pub fn new(grain: usize) -> Self {
        Self {
            slots: Box::new([]),
            grain: grain.max(1),
            head: Cursor::default(),
            tail: Cursor::default(),
            last_time: AtomicDouble::new(0.0),
            linear_time: AtomicDouble::new(0.0),
            extensions: Vec::new(),
        }
    }

    pub fn with_extensions(grain: usize, extensions: Vec<Arc<dyn PlaybackExtension>>) -> Self {
        Self {
            extensions,
            ..Self::new(grain)
        }
    }

    /// Reallocate for `frames` samples of output buffering. Not real-time safe.
    pub fn resize(&mut self, frames: usize) {
        let len = if frames == 0 {
            0
        } else {
            frames.div_ceil(self.grain) + 1
        };
        self.slots = (0..len).map(|_| AtomicF64::new(0.0)).collect();
        self.head.store(0, 0);
        self.tail.store(0, 0);
    }

    pub fn add_extension(&mut self, extension: Arc<dyn PlaybackExtension>) {
        self.extensions.push(extension);
    }

    #[inline]
    pub fn is_populated(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Slot count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn grain_size(&self) -> usize {
        self.grain
    }

    /// Where the next producer call continues from.
    #[inline]
    pub fn last_time(&self) -> f64 {
        self.last_time.get()
    }

    /// Move the producer's continuation point (seeking). Leaves already
    /// queued slots and the consumer cursor alone.
    #[inline]
    pub fn set_last_time(&self, time: f64) {
        self.last_time.set(time);
    }

    /// Reset both cursors to `time` at stream start.
    pub fn prime(&self, time: f64) {
        self.head.store(0, 0);
        self.tail.store(0, 0);
        if let Some(first) = self.slots.first() {
            first.store(time, Ordering::Release);
        }
        self.last_time.set(time);
        self.linear_time.set(time);
        for extension in &self.extensions {
            extension.on_prime(time);
        }
    }

    /// Record track times for a slice about to be sent downstream.
    ///
    /// Audio thread only.
    pub fn producer(&self, policy: &mut PlaybackPolicy, timeline: &Timeline, slice: PlaybackSlice) {
        if !self.is_populated() {
            // Record-only: nothing reads the queue.
            return;
        }

        let size = self.slots.len();
        let grain = self.grain;
        let (mut index, mut remainder) = self.tail.load();
        let start = self.last_time.get_relaxed();
        let mut time = start;
        let mut space = grain - remainder;

        let mut frames = slice.to_produce;
        while frames >= space {
            let step = policy
                .advanced_track_time(timeline, time, space)
                .or_clamped(timeline, time);
            time = step.resume();
            index = (index + 1) % size;
            self.slots[index].store(step.time, Ordering::Release);
            frames -= space;
            remainder = 0;
            space = grain;
        }

        // Last odd lot
        if frames > 0 {
            time = policy
                .advanced_track_time(timeline, time, frames)
                .or_clamped(timeline, time)
                .resume();
            remainder += frames;
            space = grain - remainder;
        }

        // Silent tail holds the time where production stopped.
        let mut silent = slice.silent_frames();
        while silent >= space {
            index = (index + 1) % size;
            self.slots[index].store(time, Ordering::Release);
            silent -= space;
            remainder = 0;
            space = grain;
        }

        self.last_time.set(time);
        self.tail.store(index, remainder + silent);

        let span = ProducedSpan {
            start,
            end: time,
            frames: slice.frames,
        };
        for extension in &self.extensions {
            extension.on_produce(span);
        }
    }

    /// Track time of the audio currently being rendered, after `frames`
    /// more samples.
    pub fn consumer(&self, frames: usize, rate: f64) -> f64 {
        self.consumer_with(frames, rate, ConsumeInfo::default())
    }

    pub fn consumer_with(&self, frames: usize, rate: f64, info: ConsumeInfo) -> f64 {
        if !self.is_populated() {
            let time = self.linear_time.get_relaxed() + frames as f64 / rate;
            self.linear_time.set(time);
            return time;
        }

        let size = self.slots.len();
        let grain = self.grain;
        let (mut index, mut remainder) = self.head.load();
        let mut frames = frames;
        let mut grains = 0;

        let space = grain - remainder;
        if frames >= space {
            remainder = 0;
            index = (index + 1) % size;
            frames -= space;
            grains = 1;
            if frames >= grain {
                let whole = frames / grain;
                index = (index + whole) % size;
                frames %= grain;
                grains += whole;
            }
        }
        self.head.store(index, remainder + frames);

        if !self.extensions.is_empty() {
            for _ in 0..grains {
                for extension in &self.extensions {
                    extension.on_consume(grain, rate, info.pause_frames, info.has_solo);
                }
            }
        }

        self.slots[index].load(Ordering::Acquire)
    }
}

impl core::fmt::Debug for TimeQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimeQueue")
            .field("capacity", &self.capacity())
            .field("grain", &self.grain)
            .field("head", &self.head.load())
            .field("tail", &self.tail.load())
            .field("extensions", &self.extensions.len())
            .finish()
    }
}
