//! Single straight pass over the selection.
//!
//! The free functions here are the base rules the other policies fall
//! back to.

use super::{PlaybackSlice, TimeStep};
use crate::config::DEFAULT_SAMPLE_RATE;
use crate::schedule::Timeline;

/// Regions shorter than this are treated as a single point.
pub(crate) const DEGENERATE_REGION: f64 = 1e-9;

/// Plays `[t0, t1]` once, then pads with silence until the time queue
/// drains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultPolicy {
    pub(super) rate: f64,
}

impl DefaultPolicy {
    pub const fn new() -> Self {
        Self {
            rate: DEFAULT_SAMPLE_RATE,
        }
    }

    pub(super) fn get_playback_slice(&mut self, timeline: &mut Timeline, available: usize) -> PlaybackSlice {
        let remaining = timeline.real_time_remaining().max(0.0);
        let deltat = available as f64 / self.rate;

        if deltat <= remaining {
            timeline.real_time_advance(deltat);
            return PlaybackSlice::new(available, available, available);
        }

        // Past the end: pad one extra grain so the consumer side can still
        // land on the final slot.
        let grain = timeline.config().grain_size;
        let extra = ((grain + 1) as f64 / self.rate).min(deltat - remaining);
        let real_time = remaining + extra;
        let frames = (real_time * self.rate).round() as usize;
        let to_produce = (remaining * self.rate).round() as usize;
        timeline.real_time_advance(real_time);

        PlaybackSlice::new(available, frames, to_produce)
    }
}

impl Default for DefaultPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Straight-pass end condition: track time has reached `t1` (to the
/// nearest sample) and nothing is left downstream.
pub(super) fn pass_complete(timeline: &Timeline, rate: f64, output_frames: usize) -> bool {
    let mut diff = timeline.track_time() - timeline.t1();
    if timeline.reversed_time() {
        diff = -diff;
    }
    (diff * rate + 0.5).floor() >= 0.0 && output_frames == 0
}

pub(super) fn offset_track_time(timeline: &mut Timeline, delta: f64) -> f64 {
    let time = timeline.clamp_track_time(timeline.track_time() + delta);
    timeline.real_time_init(time);
    time
}

/// Real seconds covered by `frames`, signed by play direction.
#[inline]
pub(super) fn real_duration(timeline: &Timeline, rate: f64, frames: usize) -> f64 {
    let real = frames as f64 / rate;
    if timeline.reversed_time() {
        -real
    } else {
        real
    }
}

#[inline]
pub(super) fn is_degenerate(timeline: &Timeline) -> bool {
    (timeline.t0() - timeline.t1()).abs() < DEGENERATE_REGION
}

/// Warp-aware step with no end handling.
///
/// An infinite solution clamps to the matching end of the region; NaN
/// falls back to the unwarped step.
#[inline]
pub(super) fn warp_step(timeline: &Timeline, time: f64, real: f64) -> f64 {
    if timeline.envelope().is_none() {
        return time + real;
    }
    let solved = timeline.solve_warped_length(time, real);
    if solved.is_finite() {
        solved
    } else if solved.is_nan() {
        timeline.clamp_track_time(time + real)
    } else {
        timeline.clamp_track_time(solved)
    }
}

pub(super) fn advance(timeline: &Timeline, rate: f64, time: f64, frames: usize) -> TimeStep {
    if is_degenerate(timeline) {
        return TimeStep::at(timeline.t0());
    }

    let real = real_duration(timeline, rate, frames);
    let time = warp_step(timeline, time, real);
    if timeline.overruns(time) {
        TimeStep::end_of_pass(timeline.t1())
    } else {
        TimeStep::at(time)
    }
}
