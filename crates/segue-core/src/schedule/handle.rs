//! Control-side handle to a running schedule.

use super::reader::PlaybackReader;
use super::shared::ScheduleShared;
use crate::message::PlayRegion;
use std::sync::Arc;

/// Cheap, cloneable view of a session for non-real-time threads.
///
/// Taken from `PlaybackSchedule::handle` after `init`. A handle stays tied
/// to the session it was taken from.
///
/// # Example
/// ```ignore
/// let handle = schedule.handle();
/// handle.post_region(0.0, pointer_time);
/// let mut reader = handle.reader().expect("no other reader");
/// let now = reader.now_playing(frames_rendered);
/// ```
#[derive(Clone, Debug)]
pub struct ScheduleHandle {
    shared: Arc<ScheduleShared>,
}

impl ScheduleHandle {
    pub(crate) fn new(shared: Arc<ScheduleShared>) -> Self {
        Self { shared }
    }

    /// Latest track time computed by the audio thread.
    ///
    /// Runs ahead of what is audible by the output buffer length; use
    /// a [`PlaybackReader`] for the audible position.
    #[inline]
    pub fn track_time(&self) -> f64 {
        self.shared.track_time()
    }

    /// Whether the session's policy is installed and not yet finalized.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.shared.is_policy_valid()
    }

    /// Post a new target region (scrub pointer, loop bounds).
    pub fn post_region(&self, t0: f64, t1: f64) {
        self.shared.post_region(PlayRegion::new(t0, t1));
    }

    pub fn latest_region(&self) -> PlayRegion {
        self.shared.latest_region()
    }

    /// Ask the audio thread to jump by `delta` seconds of track time.
    ///
    /// Applied on the next callback; ignored by policies that disallow
    /// seeking.
    pub fn request_seek(&self, delta: f64) {
        tracing::trace!(delta, "seek requested");
        self.shared.request_seek(delta);
    }

    /// Claim the session's audible-position readout. `None` while another
    /// reader is alive.
    pub fn reader(&self) -> Option<PlaybackReader> {
        PlaybackReader::claim(&self.shared)
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.shared.rate()
    }
}
