//! State shared between the audio thread and everyone else.

use crate::config::DEFAULT_SAMPLE_RATE;
use crate::lockfree::{AtomicDouble, AtomicFlag};
use crate::message::{MessageChannel, PlayRegion};
use crate::time_queue::TimeQueue;

/// Lock-free cells crossing the audio-thread boundary.
///
/// Built once per session. The audio thread writes `time` and the time
/// queue producer; the control thread writes regions and seek requests;
/// the one claimed [`PlaybackReader`](super::PlaybackReader) drives the
/// time queue consumer.
#[derive(Debug)]
pub struct ScheduleShared {
    time: AtomicDouble,
    policy_valid: AtomicFlag,
    seek_offset: AtomicDouble,
    seek_pending: AtomicFlag,
    reader_claimed: AtomicFlag,
    regions: MessageChannel<PlayRegion>,
    time_queue: TimeQueue,
    rate: f64,
}

impl ScheduleShared {
    pub(crate) fn new(time_queue: TimeQueue, region: PlayRegion, rate: f64) -> Self {
        Self {
            time: AtomicDouble::new(region.t0),
            policy_valid: AtomicFlag::new(false),
            seek_offset: AtomicDouble::new(0.0),
            seek_pending: AtomicFlag::new(false),
            reader_claimed: AtomicFlag::new(false),
            regions: MessageChannel::new(region),
            time_queue,
            rate,
        }
    }

    /// Placeholder before the first session.
    pub(crate) fn idle(grain: usize) -> Self {
        Self::new(TimeQueue::new(grain), PlayRegion::default(), DEFAULT_SAMPLE_RATE)
    }

    #[inline]
    pub fn track_time(&self) -> f64 {
        self.time.get()
    }

    #[inline]
    pub(crate) fn set_track_time(&self, time: f64) {
        self.time.set(time);
    }

    #[inline]
    pub fn is_policy_valid(&self) -> bool {
        self.policy_valid.get()
    }

    #[inline]
    pub(crate) fn set_policy_valid(&self, valid: bool) {
        self.policy_valid.set(valid);
    }

    /// `false` when another reader already holds the consumer side.
    #[inline]
    pub(crate) fn claim_reader(&self) -> bool {
        !self.reader_claimed.swap(true)
    }

    #[inline]
    pub(crate) fn release_reader(&self) {
        self.reader_claimed.set(false);
    }

    #[inline]
    pub fn post_region(&self, region: PlayRegion) {
        self.regions.write(region);
    }

    #[inline]
    pub fn latest_region(&self) -> PlayRegion {
        self.regions.read()
    }

    /// Queue a relative jump; requests made before the audio thread picks
    /// them up add together.
    pub fn request_seek(&self, delta: f64) {
        self.seek_offset.fetch_add(delta);
        self.seek_pending.set(true);
    }

    /// Take the pending jump, if any.
    #[inline]
    pub(crate) fn take_seek(&self) -> Option<f64> {
        if self.seek_pending.swap(false) {
            Some(self.seek_offset.swap(0.0))
        } else {
            None
        }
    }

    #[inline]
    pub fn time_queue(&self) -> &TimeQueue {
        &self.time_queue
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}
