//! Readout of the audible position.

use super::shared::ScheduleShared;
use crate::time_queue::ConsumeInfo;
use std::sync::Arc;

/// The single consumer of a session's time queue.
///
/// Claimed through [`ScheduleHandle::reader`](super::ScheduleHandle::reader);
/// at most one exists per session at a time, and dropping it frees the
/// claim. Not `Clone`, and the readout methods take `&mut self`, so the
/// consumer cursor has exactly one driver.
#[derive(Debug)]
pub struct PlaybackReader {
    shared: Arc<ScheduleShared>,
}

impl PlaybackReader {
    pub(crate) fn claim(shared: &Arc<ScheduleShared>) -> Option<Self> {
        shared.claim_reader().then(|| Self {
            shared: Arc::clone(shared),
        })
    }

    /// Advance by `frames` rendered samples and return the track time now
    /// audible.
    pub fn now_playing(&mut self, frames: usize) -> f64 {
        self.now_playing_with(frames, ConsumeInfo::default())
    }

    pub fn now_playing_with(&mut self, frames: usize, info: ConsumeInfo) -> f64 {
        self.shared
            .time_queue()
            .consumer_with(frames, self.shared.rate(), info)
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.shared.rate()
    }
}

impl Drop for PlaybackReader {
    fn drop(&mut self) {
        self.shared.release_reader();
    }
}
