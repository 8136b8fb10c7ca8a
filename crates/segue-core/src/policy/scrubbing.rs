//! Scrubbing: track time follows a continuously moving target.
//!
//! The control thread posts the pointer position as the `t1` of a
//! [`PlayRegion`](crate::message::PlayRegion). Playback proceeds in short
//! segments; each segment picks a speed that would reach the latest target
//! by the end of the segment. Keyboard scrubbing ignores the pointer and
//! moves at a fixed signed speed until it meets either end of the region.

use super::default::{pass_complete, real_duration};
use super::{PlaybackSlice, TimeStep};
use crate::config::{BufferTimes, DEFAULT_SAMPLE_RATE};
use crate::mixer::WarpOptions;
use crate::schedule::Timeline;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MIN_ALLOWED_SCRUB_SPEED: f64 = 0.01;
pub const MAX_ALLOWED_SCRUB_SPEED: f64 = 32.0;

/// How often the control thread is expected to post a new target.
pub const SCRUB_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Parameters captured when a scrub session starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubbingOptions {
    /// Segment length in seconds.
    pub delay: f64,
    /// Slower targets produce silence.
    pub min_speed: f64,
    pub max_speed: f64,
    pub initial_speed: f64,
    /// Play the region once at `initial_speed` instead of following a target.
    pub playing_at_speed: bool,
    /// Move at the signed `initial_speed` instead of following a target.
    pub keyboard_scrubbing: bool,
}

impl Default for ScrubbingOptions {
    fn default() -> Self {
        Self {
            delay: SCRUB_POLL_INTERVAL.as_secs_f64(),
            min_speed: 0.0,
            max_speed: 1.0,
            initial_speed: 1.0,
            playing_at_speed: false,
            keyboard_scrubbing: false,
        }
    }
}

impl ScrubbingOptions {
    pub fn at_speed(speed: f64) -> Self {
        Self {
            initial_speed: speed,
            max_speed: speed.max(1.0),
            playing_at_speed: true,
            ..Default::default()
        }
    }

    /// Scrub from the keyboard; a negative `speed` moves backwards.
    pub fn keyboard(speed: f64) -> Self {
        Self {
            initial_speed: speed,
            max_speed: speed.abs().max(1.0),
            keyboard_scrubbing: true,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let (min, max) = (self.min_speed, self.max_speed);
        if !(0.0..=max).contains(&min)
            || !(MIN_ALLOWED_SCRUB_SPEED..=MAX_ALLOWED_SCRUB_SPEED).contains(&max)
        {
            return Err(Error::InvalidScrubSpeed { min, max });
        }
        if self.playing_at_speed
            && !(MIN_ALLOWED_SCRUB_SPEED..=MAX_ALLOWED_SCRUB_SPEED).contains(&self.initial_speed)
        {
            return Err(Error::InvalidScrubSpeed {
                min: self.initial_speed,
                max: self.initial_speed,
            });
        }
        if self.keyboard_scrubbing {
            if self.playing_at_speed {
                return Err(Error::InvalidConfig(
                    "keyboard scrubbing cannot also play at speed".into(),
                ));
            }
            let speed = self.initial_speed.abs();
            if !(MIN_ALLOWED_SCRUB_SPEED..=MAX_ALLOWED_SCRUB_SPEED).contains(&speed) {
                return Err(Error::InvalidScrubSpeed {
                    min: self.initial_speed,
                    max: self.initial_speed,
                });
            }
        }
        if !(self.delay.is_finite() && self.delay > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "scrub delay must be positive (got {})",
                self.delay
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrubbingPolicy {
    options: ScrubbingOptions,
    pub(super) rate: f64,
    /// Samples left in the current segment.
    segment_remaining: usize,
    /// Track seconds per real second for the current segment; zero is silence.
    speed: f64,
}

impl ScrubbingPolicy {
    pub fn new(options: ScrubbingOptions) -> Self {
        Self {
            options,
            rate: DEFAULT_SAMPLE_RATE,
            segment_remaining: 0,
            speed: 0.0,
        }
    }

    pub fn options(&self) -> &ScrubbingOptions {
        &self.options
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub(super) fn initialize(&mut self, _timeline: &Timeline, rate: f64) {
        self.rate = rate;
        self.segment_remaining = 0;
        self.speed = if self.options.playing_at_speed {
            self.options.initial_speed
        } else {
            0.0
        };
    }

    pub(super) fn finalize(&mut self) {
        self.segment_remaining = 0;
        self.speed = 0.0;
    }

    pub(super) fn mixer_warp_options(&self) -> WarpOptions {
        WarpOptions::with_speed_range(self.options.min_speed, self.options.max_speed)
    }

    pub(super) fn suggested_buffer_times(&self, timeline: &Timeline) -> BufferTimes {
        let minimum = self.options.delay;
        BufferTimes {
            minimum,
            acceptable: minimum.max(2.0 * SCRUB_POLL_INTERVAL.as_secs_f64()),
            initial: timeline.config().buffer_times.initial,
        }
    }

    pub(super) fn done(&self, timeline: &Timeline, output_frames: usize) -> bool {
        self.options.playing_at_speed && pass_complete(timeline, self.rate, output_frames)
    }

    pub(super) fn get_playback_slice(&mut self, timeline: &mut Timeline, available: usize) -> PlaybackSlice {
        if self.options.playing_at_speed {
            let distance = (timeline.t1() - timeline.track_time()).abs();
            let left = (distance / self.speed.abs() * self.rate).round() as usize;
            return PlaybackSlice::new(available, available, left);
        }

        if self.segment_remaining == 0 {
            self.begin_segment(timeline);
        }
        let frames = available.min(self.segment_remaining);
        self.segment_remaining -= frames;
        let to_produce = if self.speed == 0.0 { 0 } else { frames };
        PlaybackSlice::new(available, frames, to_produce)
    }

    fn begin_segment(&mut self, timeline: &Timeline) {
        let delay = self.options.delay;
        self.segment_remaining = ((delay * self.rate).round() as usize).max(1);

        let target = if self.options.keyboard_scrubbing {
            timeline.clamp_track_time(timeline.track_time() + self.options.initial_speed * delay)
        } else {
            timeline.shared().latest_region().t1
        };
        let speed = (target - timeline.track_time()) / delay;
        let magnitude = speed.abs();
        self.speed = if magnitude < self.options.min_speed.max(MIN_ALLOWED_SCRUB_SPEED) {
            0.0
        } else {
            magnitude.min(self.options.max_speed).copysign(speed)
        };
    }

    pub(super) fn advanced_track_time(&mut self, timeline: &Timeline, time: f64, frames: usize) -> TimeStep {
        if self.options.playing_at_speed {
            let time = time + real_duration(timeline, self.rate, frames) * self.speed.abs();
            return if timeline.overruns(time) {
                TimeStep::end_of_pass(timeline.t1())
            } else {
                TimeStep::at(time)
            };
        }
        TimeStep::at(time + frames as f64 / self.rate * self.speed)
    }
}
