//! Playback schedule: session setup plus the real-time entry points.
//!
//! Control thread: [`PlaybackSchedule::init`] and
//! [`PlaybackSchedule::finalize`]. Everything else is called from the audio
//! thread and never blocks, allocates or logs.

mod handle;
mod options;
mod reader;
mod shared;
mod timeline;

pub use handle::ScheduleHandle;
pub use options::{looping_policy, scrubbing_policy, PolicyFactory, StreamOptions};
pub use reader::PlaybackReader;
pub use shared::ScheduleShared;
pub use timeline::{CutPreviewGap, Timeline};

use crate::config::{validate_rate, BufferTimes, ScheduleConfig};
use crate::message::PlayRegion;
use crate::mixer::{PlaybackMixer, WarpOptions};
use crate::policy::{PlaybackPolicy, PlaybackSlice, TimeStep};
use crate::recording::RecordingSchedule;
use crate::time_queue::TimeQueue;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Per-stream orchestrator: owns the policy and the timeline it drives.
#[derive(Debug)]
pub struct PlaybackSchedule {
    timeline: Timeline,
    policy: Option<PlaybackPolicy>,
    /// Answers whenever no valid policy is installed.
    fallback: PlaybackPolicy,
}

impl Default for PlaybackSchedule {
    fn default() -> Self {
        Self::new(ScheduleConfig::default())
    }
}

impl PlaybackSchedule {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            timeline: Timeline::new(config),
            policy: None,
            fallback: PlaybackPolicy::default(),
        }
    }

    /// Start a session over `[t0, t1]` (`t1 < t0` plays backwards).
    ///
    /// With a recording schedule the time warp is ignored and the bounds
    /// are shifted by pre-roll and latency. Builds fresh shared state;
    /// take a new [`handle`](Self::handle) afterwards.
    pub fn init(
        &mut self,
        t0: f64,
        t1: f64,
        options: &StreamOptions,
        recording: Option<&RecordingSchedule>,
    ) -> Result<()> {
        validate_rate(options.rate)?;
        if !(t0.is_finite() && t1.is_finite()) {
            return Err(Error::InvalidRegion { t0, t1 });
        }

        self.timeline.shared().set_policy_valid(false);
        self.policy = None;

        let (mut t0, mut t1) = (t0, t1);
        let envelope = match recording {
            Some(recording) => {
                t0 -= recording.pre_roll;
                t1 -= recording.latency_correction;
                None
            }
            None => options.envelope.clone(),
        };
        if !(t0.is_finite() && t1.is_finite()) {
            return Err(Error::InvalidRegion { t0, t1 });
        }
        if let Some(gap) = &options.cut_preview_gap {
            if !(gap.start.is_finite() && gap.length.is_finite() && gap.length >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "cut preview gap must be finite and non-negative (start {}, length {})",
                    gap.start, gap.length
                )));
            }
        }

        let mut policy = match options.policy_factory {
            Some(factory) => factory(options)?,
            None => PlaybackPolicy::default(),
        };
        if policy.is_scrubbing() {
            if recording.is_some() {
                return Err(Error::ScrubbingConflict("recording"));
            }
            if envelope.is_some() {
                return Err(Error::ScrubbingConflict("a time warp"));
            }
        }

        self.timeline.reset(t0, t1, envelope);
        self.timeline.set_cut_preview_gap(options.cut_preview_gap);
        policy.initialize(&self.timeline, options.rate);
        self.fallback.initialize(&self.timeline, options.rate);

        let mut time_queue = TimeQueue::with_extensions(
            self.timeline.config().grain_size,
            options.extensions.clone(),
        );
        if options.playback {
            let initial = policy.suggested_buffer_times(&self.timeline).initial;
            time_queue.resize((initial * options.rate).ceil() as usize);
        }
        time_queue.prime(t0);
        let slots = time_queue.capacity();

        let shared = ScheduleShared::new(time_queue, PlayRegion::new(t0, t1), options.rate);
        self.timeline.install(Arc::new(shared));

        debug!(
            t0,
            t1,
            rate = options.rate,
            policy = policy.name(),
            slots,
            warped_length = self.timeline.warped_length(),
            "playback schedule initialized"
        );

        self.policy = Some(policy);
        self.timeline.shared().set_policy_valid(true);
        Ok(())
    }

    /// End the session. Call after the audio thread has stopped.
    pub fn finalize(&mut self) {
        self.timeline.shared().set_policy_valid(false);
        if let Some(mut policy) = self.policy.take() {
            policy.finalize(&self.timeline);
            debug!(
                policy = policy.name(),
                track_time = self.timeline.track_time(),
                "playback schedule finalized"
            );
        }
    }

    pub fn handle(&self) -> ScheduleHandle {
        ScheduleHandle::new(Arc::clone(self.timeline.shared()))
    }

    /// The installed policy, or the fallback straight-pass policy when
    /// none is valid.
    pub fn policy(&self) -> &PlaybackPolicy {
        match &self.policy {
            Some(policy) if self.timeline.shared().is_policy_valid() => policy,
            _ => &self.fallback,
        }
    }

    pub fn policy_mut(&mut self) -> &mut PlaybackPolicy {
        self.parts().0
    }

    fn parts(&mut self) -> (&mut PlaybackPolicy, &mut Timeline) {
        let policy = match self.policy.as_mut() {
            Some(policy) if self.timeline.shared().is_policy_valid() => policy,
            _ => &mut self.fallback,
        };
        (policy, &mut self.timeline)
    }

    #[inline]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[inline]
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    #[inline]
    pub fn t0(&self) -> f64 {
        self.timeline.t0()
    }

    #[inline]
    pub fn t1(&self) -> f64 {
        self.timeline.t1()
    }

    #[inline]
    pub fn track_time(&self) -> f64 {
        self.timeline.track_time()
    }

    #[inline]
    pub fn clamp_track_time(&self, time: f64) -> f64 {
        self.timeline.clamp_track_time(time)
    }

    #[inline]
    pub fn compute_warped_length(&self, t0: f64, t1: f64) -> f64 {
        self.timeline.compute_warped_length(t0, t1)
    }

    #[inline]
    pub fn solve_warped_length(&self, t0: f64, length: f64) -> f64 {
        self.timeline.solve_warped_length(t0, length)
    }

    #[inline]
    pub fn real_duration(&self, track_time: f64) -> f64 {
        self.timeline.real_duration(track_time)
    }

    #[inline]
    pub fn real_time_remaining(&self) -> f64 {
        self.timeline.real_time_remaining()
    }

    #[inline]
    pub fn time_queue(&self) -> &TimeQueue {
        self.timeline.shared().time_queue()
    }

    pub fn mixer_warp_options(&self) -> WarpOptions {
        self.policy().mixer_warp_options(&self.timeline)
    }

    pub fn suggested_buffer_times(&self) -> BufferTimes {
        self.policy().suggested_buffer_times(&self.timeline)
    }

    pub fn normalize_track_time(&self) -> f64 {
        self.policy().normalize_track_time(&self.timeline)
    }

    pub fn allow_seek(&self) -> bool {
        self.policy().allow_seek(&self.timeline)
    }

    pub fn sleep_interval(&self) -> Duration {
        self.policy().sleep_interval(&self.timeline)
    }

    /// `output_frames` is what is still buffered downstream.
    pub fn done(&self, output_frames: usize) -> bool {
        self.policy().done(&self.timeline, output_frames)
    }

    pub fn get_playback_slice(&mut self, available: usize) -> PlaybackSlice {
        let (policy, timeline) = self.parts();
        policy.get_playback_slice(timeline, available)
    }

    pub fn advanced_track_time(&mut self, time: f64, frames: usize) -> TimeStep {
        let (policy, timeline) = self.parts();
        policy.advanced_track_time(timeline, time, frames)
    }

    /// Record a slice in the time queue and publish the track time it
    /// reaches.
    pub fn produce(&mut self, slice: PlaybackSlice) {
        let (policy, timeline) = self.parts();
        let timeline: &Timeline = timeline;
        let queue = timeline.shared().time_queue();
        if queue.is_populated() {
            queue.producer(policy, timeline, slice);
            timeline.set_track_time(queue.last_time());
        } else {
            let time = timeline.track_time();
            let step = policy
                .advanced_track_time(timeline, time, slice.to_produce)
                .or_clamped(timeline, time);
            timeline.set_track_time(step.resume());
        }
    }

    /// Jump by `delta` seconds; returns the clamped track time.
    pub fn offset_track_time(&mut self, delta: f64) -> f64 {
        let (policy, timeline) = self.parts();
        let time = policy.offset_track_time(timeline, delta);
        timeline.set_track_time(time);
        timeline.shared().time_queue().set_last_time(time);
        time
    }

    /// Apply a seek posted through [`ScheduleHandle::request_seek`].
    ///
    /// Returns the new track time, or `None` when nothing was pending or the
    /// policy disallows seeking.
    pub fn apply_pending_seek(&mut self) -> Option<f64> {
        let delta = self.timeline.shared().take_seek()?;
        if !self.allow_seek() {
            return None;
        }
        Some(self.offset_track_time(delta))
    }

    /// Returns `true` when the current fill pass should stop.
    pub fn reposition_playback<M: PlaybackMixer>(
        &mut self,
        mixers: &mut [M],
        produced: usize,
        available: usize,
    ) -> bool {
        let (policy, timeline) = self.parts();
        policy.reposition_playback(timeline, mixers, produced, available)
    }
}
