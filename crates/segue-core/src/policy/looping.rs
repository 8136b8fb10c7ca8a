//! Looped playback of `[t0, t1)`.

use super::default::{is_degenerate, real_duration, warp_step};
use super::{PlaybackSlice, TimeStep};
use crate::config::DEFAULT_SAMPLE_RATE;
use crate::mixer::PlaybackMixer;
use crate::schedule::Timeline;

/// Repeats the selection until stopped.
///
/// `remaining` counts output samples left in the current lap. Slices never
/// cross a lap boundary, so the producer sees the counter hit zero exactly
/// on the last sample of the lap and reports the wrap there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopingPolicy {
    pub(super) rate: f64,
    remaining: usize,
}

impl LoopingPolicy {
    pub const fn new() -> Self {
        Self {
            rate: DEFAULT_SAMPLE_RATE,
            remaining: 0,
        }
    }

    /// Samples left in the current lap.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub(super) fn initialize(&mut self, rate: f64) {
        self.rate = rate;
        self.remaining = 0;
    }

    /// Output samples the rest of the lap rounds to.
    fn lap_samples(&self, timeline: &Timeline) -> usize {
        (timeline.real_time_remaining().max(0.0) * self.rate).round() as usize
    }

    pub(super) fn get_playback_slice(&mut self, timeline: &mut Timeline, available: usize) -> PlaybackSlice {
        self.remaining = self.lap_samples(timeline);
        let frames = available.min(self.remaining);

        if frames == 0 && timeline.warped_time() == 0.0 {
            // A lap that rounds to nothing; pad instead of spinning.
            return PlaybackSlice::new(available, available, 0);
        }

        timeline.real_time_advance(frames as f64 / self.rate);
        PlaybackSlice::new(available, frames, frames)
    }

    pub(super) fn advanced_track_time(&mut self, timeline: &Timeline, time: f64, frames: usize) -> TimeStep {
        self.remaining -= self.remaining.min(frames);
        if self.remaining == 0 {
            return TimeStep::wrap(timeline.t1(), timeline.t0());
        }

        if is_degenerate(timeline) {
            return TimeStep::at(timeline.t0());
        }

        let real = real_duration(timeline, self.rate, frames);
        TimeStep::at(warp_step(timeline, time, real))
    }

    /// Restart every mixer at `t0` once the lap's real time is used up.
    pub(super) fn reposition_playback<M: PlaybackMixer>(
        &mut self,
        timeline: &mut Timeline,
        mixers: &mut [M],
        _produced: usize,
        available: usize,
    ) -> bool {
        // The lap is over once what is left rounds to no samples.
        if timeline.warped_time() > 0.0 && self.lap_samples(timeline) == 0 {
            let t0 = timeline.t0();
            for mixer in mixers.iter_mut() {
                mixer.reposition(t0, true);
            }
            timeline.real_time_restart();
            // Production resumes from the loop start as well.
            timeline.set_track_time(t0);
            timeline.shared().time_queue().set_last_time(t0);
        }
        available == 0
    }
}

impl Default for LoopingPolicy {
    fn default() -> Self {
        Self::new()
    }
}
