//! Session bounds and warped-time bookkeeping.

use super::shared::ScheduleShared;
use crate::config::ScheduleConfig;
use crate::warp::SharedWarp;
use std::sync::Arc;

/// A stretch of track time left out of a preview.
///
/// Audio after `start` is heard `length` seconds early, so the readout
/// jumps over the gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutPreviewGap {
    pub start: f64,
    pub length: f64,
}

impl CutPreviewGap {
    pub const fn new(start: f64, length: f64) -> Self {
        Self { start, length }
    }

    /// Shift a readout that lies past the gap.
    #[inline]
    pub fn skip(&self, time: f64) -> f64 {
        if self.length > 0.0 && time > self.start {
            time + self.length
        } else {
            time
        }
    }
}

/// The part of a schedule policies operate on.
///
/// Owned by the audio thread for the duration of a session; only
/// `track_time` is published to other threads, through [`ScheduleShared`].
pub struct Timeline {
    t0: f64,
    t1: f64,
    envelope: Option<SharedWarp>,
    /// Real seconds played so far in the current pass or lap.
    warped_time: f64,
    /// Real seconds needed for the whole of `[t0, t1]`.
    warped_length: f64,
    cut_preview_gap: Option<CutPreviewGap>,
    config: ScheduleConfig,
    shared: Arc<ScheduleShared>,
}

impl Timeline {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            t0: 0.0,
            t1: 0.0,
            envelope: None,
            warped_time: 0.0,
            warped_length: 0.0,
            cut_preview_gap: None,
            config,
            shared: Arc::new(ScheduleShared::idle(config.grain_size)),
        }
    }

    /// Adopt new bounds and restart warped-time accounting.
    pub(crate) fn reset(&mut self, t0: f64, t1: f64, envelope: Option<SharedWarp>) {
        self.t0 = t0;
        self.t1 = t1;
        self.envelope = envelope;
        self.warped_time = 0.0;
        self.warped_length = self.real_duration(t1);
        self.cut_preview_gap = None;
    }

    pub(crate) fn set_cut_preview_gap(&mut self, gap: Option<CutPreviewGap>) {
        self.cut_preview_gap = gap;
    }

    pub(crate) fn install(&mut self, shared: Arc<ScheduleShared>) {
        self.shared = shared;
    }

    #[inline]
    pub fn t0(&self) -> f64 {
        self.t0
    }

    #[inline]
    pub fn t1(&self) -> f64 {
        self.t1
    }

    #[inline]
    pub fn envelope(&self) -> Option<&SharedWarp> {
        self.envelope.as_ref()
    }

    #[inline]
    pub fn cut_preview_gap(&self) -> Option<&CutPreviewGap> {
        self.cut_preview_gap.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    #[inline]
    pub fn shared(&self) -> &Arc<ScheduleShared> {
        &self.shared
    }

    /// Backwards playback is encoded as `t1 < t0`.
    #[inline]
    pub fn reversed_time(&self) -> bool {
        self.t1 < self.t0
    }

    #[inline]
    pub fn track_time(&self) -> f64 {
        self.shared.track_time()
    }

    /// Publish a new track time. Audio thread only.
    #[inline]
    pub fn set_track_time(&self, time: f64) {
        self.shared.set_track_time(time);
    }

    /// Clamp into the session bounds, whichever way they run.
    pub fn clamp_track_time(&self, time: f64) -> f64 {
        if self.reversed_time() {
            self.t1.max(self.t0.min(time))
        } else {
            self.t0.max(self.t1.min(time))
        }
    }

    #[inline]
    pub fn limit_track_time(&self) -> f64 {
        self.clamp_track_time(self.track_time())
    }

    /// Whether `time` has reached or passed `t1` in the play direction.
    #[inline]
    pub fn overruns(&self, time: f64) -> bool {
        if self.reversed_time() {
            time <= self.t1
        } else {
            time >= self.t1
        }
    }

    /// Real seconds needed to play track time `t0..t1`.
    pub fn compute_warped_length(&self, t0: f64, t1: f64) -> f64 {
        match &self.envelope {
            Some(envelope) => envelope.integral_of_inverse(t0, t1),
            None => t1 - t0,
        }
    }

    /// Track time reached after `length` real seconds from `t0`.
    pub fn solve_warped_length(&self, t0: f64, length: f64) -> f64 {
        match &self.envelope {
            Some(envelope) => envelope.solve_integral_of_inverse(t0, length),
            None => t0 + length,
        }
    }

    /// Real seconds from the session start to `track_time`.
    pub fn real_duration(&self, track_time: f64) -> f64 {
        self.compute_warped_length(self.t0, track_time).abs()
    }

    #[inline]
    pub fn warped_time(&self) -> f64 {
        self.warped_time
    }

    #[inline]
    pub fn warped_length(&self) -> f64 {
        self.warped_length
    }

    /// May be negative once the padding grain has been played.
    #[inline]
    pub fn real_time_remaining(&self) -> f64 {
        self.warped_length - self.warped_time
    }

    #[inline]
    pub fn real_time_advance(&mut self, increment: f64) {
        self.warped_time += increment;
    }

    /// Re-sync warped time with a jump to `track_time`.
    pub fn real_time_init(&mut self, track_time: f64) {
        self.warped_time = self.real_duration(track_time);
    }

    #[inline]
    pub fn real_time_restart(&mut self) {
        self.warped_time = 0.0;
    }
}

impl core::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Timeline")
            .field("t0", &self.t0)
            .field("t1", &self.t1)
            .field("envelope", &self.envelope.is_some())
            .field("warped_time", &self.warped_time)
            .field("warped_length", &self.warped_length)
            .field("cut_preview_gap", &self.cut_preview_gap)
            .field("track_time", &self.track_time())
            .finish()
    }
}
