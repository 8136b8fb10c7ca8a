//! Playback policies: the mode-specific half of the schedule.
//!
//! A policy is picked once per session at `PlaybackSchedule::init` and is
//! never swapped mid-session. Every decision that differs between straight,
//! looped and scrubbed playback lives here; the schedule only owns the
//! shared bookkeeping in [`Timeline`].

mod default;
mod looping;
mod scrubbing;

pub use default::DefaultPolicy;
pub use looping::LoopingPolicy;
pub use scrubbing::{
    ScrubbingOptions, ScrubbingPolicy, MAX_ALLOWED_SCRUB_SPEED, MIN_ALLOWED_SCRUB_SPEED,
    SCRUB_POLL_INTERVAL,
};

use crate::config::BufferTimes;
use crate::mixer::{PlaybackMixer, WarpOptions};
use crate::schedule::Timeline;
use std::time::Duration;

/// One real-time callback's worth of output, split into the part that
/// advances track time and the silent padding after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackSlice {
    /// Frames to send downstream, padding included.
    pub frames: usize,
    /// Leading frames that actually advance track time.
    pub to_produce: usize,
}

impl PlaybackSlice {
    /// Clips `frames` to `available` and `to_produce` to `frames`.
    #[inline]
    pub fn new(available: usize, frames: usize, to_produce: usize) -> Self {
        let frames = frames.min(available);
        Self {
            frames,
            to_produce: to_produce.min(frames),
        }
    }

    #[inline]
    pub fn silent_frames(&self) -> usize {
        self.frames - self.to_produce
    }
}

/// Result of integrating track time over some frames.
///
/// `time` is the value to report for the frames just covered; `next` is
/// where integration continues. They differ at lap boundaries
/// (`(t1, t0)`: report the end, resume from the start) and at the end of a
/// straight pass (`(t1, +inf)`: clamp, nothing left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStep {
    pub time: f64,
    pub next: f64,
}

impl TimeStep {
    #[inline]
    pub const fn at(time: f64) -> Self {
        Self { time, next: time }
    }

    #[inline]
    pub const fn end_of_pass(t1: f64) -> Self {
        Self {
            time: t1,
            next: f64::INFINITY,
        }
    }

    #[inline]
    pub const fn wrap(t1: f64, t0: f64) -> Self {
        Self { time: t1, next: t0 }
    }

    #[inline]
    pub fn is_end_of_pass(&self) -> bool {
        self.next == f64::INFINITY
    }

    /// Keep a finite step; otherwise hold at `from`, clamped into the
    /// session bounds.
    #[inline]
    pub fn or_clamped(self, timeline: &Timeline, from: f64) -> Self {
        if self.time.is_finite() {
            self
        } else {
            Self::at(timeline.clamp_track_time(from))
        }
    }

    /// Where the following step starts; the reported time when `next`
    /// is not finite.
    #[inline]
    pub fn resume(&self) -> f64 {
        if self.next.is_finite() {
            self.next
        } else {
            self.time
        }
    }
}

/// Scheduling strategy for one playback session.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackPolicy {
    /// One straight pass over `[t0, t1]`.
    Default(DefaultPolicy),
    /// Repeats `[t0, t1)` until stopped.
    Looping(LoopingPolicy),
    /// Rate driven continuously by user input.
    Scrubbing(ScrubbingPolicy),
}

impl Default for PlaybackPolicy {
    fn default() -> Self {
        Self::Default(DefaultPolicy::new())
    }
}

impl PlaybackPolicy {
    pub fn looping() -> Self {
        Self::Looping(LoopingPolicy::new())
    }

    pub fn scrubbing(options: ScrubbingOptions) -> Self {
        Self::Scrubbing(ScrubbingPolicy::new(options))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default(_) => "default",
            Self::Looping(_) => "looping",
            Self::Scrubbing(_) => "scrubbing",
        }
    }

    pub fn is_scrubbing(&self) -> bool {
        matches!(self, Self::Scrubbing(_))
    }

    pub fn rate(&self) -> f64 {
        match self {
            Self::Default(p) => p.rate,
            Self::Looping(p) => p.rate,
            Self::Scrubbing(p) => p.rate,
        }
    }

    /// Capture the playback sample rate.
    pub fn initialize(&mut self, timeline: &Timeline, rate: f64) {
        match self {
            Self::Default(p) => p.rate = rate,
            Self::Looping(p) => p.initialize(rate),
            Self::Scrubbing(p) => p.initialize(timeline, rate),
        }
    }

    pub fn finalize(&mut self, _timeline: &Timeline) {
        if let Self::Scrubbing(p) = self {
            p.finalize();
        }
    }

    /// Warp settings the external mixer must resample with.
    pub fn mixer_warp_options(&self, timeline: &Timeline) -> WarpOptions {
        match self {
            Self::Default(_) | Self::Looping(_) => {
                WarpOptions::from_envelope(timeline.envelope().cloned())
            }
            Self::Scrubbing(p) => p.mixer_warp_options(),
        }
    }

    /// Buffering hint for the external ring buffer.
    pub fn suggested_buffer_times(&self, timeline: &Timeline) -> BufferTimes {
        match self {
            Self::Default(_) | Self::Looping(_) => timeline.config().buffer_times,
            Self::Scrubbing(p) => p.suggested_buffer_times(timeline),
        }
    }

    /// Track time as shown to the user.
    pub fn normalize_track_time(&self, timeline: &Timeline) -> f64 {
        match self {
            Self::Default(_) | Self::Looping(_) => {
                let time = timeline.limit_track_time();
                match timeline.cut_preview_gap() {
                    Some(gap) => gap.skip(time),
                    None => time,
                }
            }
            Self::Scrubbing(_) => timeline.track_time(),
        }
    }

    pub fn allow_seek(&self, _timeline: &Timeline) -> bool {
        !self.is_scrubbing()
    }

    /// Whether the session has nothing left to play.
    ///
    /// `output_frames` is what is still buffered downstream.
    pub fn done(&self, timeline: &Timeline, output_frames: usize) -> bool {
        match self {
            Self::Default(p) => default::pass_complete(timeline, p.rate, output_frames),
            Self::Looping(_) => false,
            Self::Scrubbing(p) => p.done(timeline, output_frames),
        }
    }

    /// Jump by `delta` seconds of track time; returns the clamped target.
    pub fn offset_track_time(&mut self, timeline: &mut Timeline, delta: f64) -> f64 {
        default::offset_track_time(timeline, delta)
    }

    /// Advisory polling period for an external control loop.
    pub fn sleep_interval(&self, timeline: &Timeline) -> Duration {
        match self {
            Self::Default(_) | Self::Looping(_) => timeline.config().sleep_interval,
            Self::Scrubbing(_) => timeline.config().scrub_sleep_interval,
        }
    }

    /// Decide how much of `available` output frames to render next.
    pub fn get_playback_slice(&mut self, timeline: &mut Timeline, available: usize) -> PlaybackSlice {
        match self {
            Self::Default(p) => p.get_playback_slice(timeline, available),
            Self::Looping(p) => p.get_playback_slice(timeline, available),
            Self::Scrubbing(p) => p.get_playback_slice(timeline, available),
        }
    }

    /// Integrate track time across `frames` output frames starting at `time`.
    pub fn advanced_track_time(&mut self, timeline: &Timeline, time: f64, frames: usize) -> TimeStep {
        match self {
            Self::Default(p) => default::advance(timeline, p.rate, time, frames),
            Self::Looping(p) => p.advanced_track_time(timeline, time, frames),
            Self::Scrubbing(p) => p.advanced_track_time(timeline, time, frames),
        }
    }

    /// Give the policy a chance to move the mixers after a slice.
    ///
    /// `produced` is the slice just rendered; `available` is what is still
    /// free in the output buffer. Returns `true` when the fill pass should
    /// stop.
    pub fn reposition_playback<M: PlaybackMixer>(
        &mut self,
        timeline: &mut Timeline,
        mixers: &mut [M],
        produced: usize,
        available: usize,
    ) -> bool {
        match self {
            Self::Default(_) => true,
            Self::Looping(p) => p.reposition_playback(timeline, mixers, produced, available),
            Self::Scrubbing(_) => available == 0,
        }
    }
}
