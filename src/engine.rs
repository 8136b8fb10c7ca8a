//! Transport that drives one playback schedule.

use crate::core::{
    BufferTimes, PlaybackMixer, PlaybackSchedule, PlaybackSlice, RecordingSchedule,
    ScheduleConfig, ScheduleHandle, StreamOptions,
};
use crate::Result;
use std::time::Duration;
use tracing::debug;

/// What one [`Transport::fill`] call wrote downstream.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FillReport {
    /// Frames written, padding included.
    pub frames: usize,
    /// Frames that advanced track time.
    pub produced: usize,
    /// Number of slices the fill was split into (lap boundaries split it).
    pub slices: usize,
    /// Track time jumped to by a seek applied at the start of the fill.
    pub seeked_to: Option<f64>,
}

impl FillReport {
    #[inline]
    pub fn silent_frames(&self) -> usize {
        self.frames - self.produced
    }
}

/// Owns a [`PlaybackSchedule`] and runs sessions on it.
///
/// `start`, `start_recording` and `stop` belong to the control thread.
/// [`fill`](Self::fill) is the real-time entry point: it never blocks,
/// allocates or logs.
///
/// # Example
///
/// ```ignore
/// use segue::prelude::*;
///
/// let mut transport = Transport::builder().build()?;
/// let handle = transport.start(0.0, 10.0, &StreamOptions::new(44100.0).looped())?;
///
/// // audio thread
/// let report = transport.fill(&mut mixers, 4410, |mixers, slice| {
///     render(mixers, slice.to_produce, slice.silent_frames());
/// });
///
/// // reader thread
/// let mut reader = handle.reader().expect("single reader");
/// let audible = reader.now_playing(4410);
/// ```
#[derive(Debug)]
pub struct Transport {
    schedule: PlaybackSchedule,
    handle: Option<ScheduleHandle>,
}

impl Transport {
    /// Create a new transport builder
    pub fn builder() -> crate::TransportBuilder {
        crate::TransportBuilder::default()
    }

    pub(crate) fn from_config(config: ScheduleConfig) -> Self {
        Self {
            schedule: PlaybackSchedule::new(config),
            handle: None,
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        self.schedule.timeline().config()
    }

    /// Start playing `[t0, t1]`. A running session is stopped first.
    pub fn start(&mut self, t0: f64, t1: f64, options: &StreamOptions) -> Result<ScheduleHandle> {
        self.start_session(t0, t1, options, None)
    }

    /// Start a session that also captures input, shifted by the recording's
    /// pre-roll and latency correction.
    pub fn start_recording(
        &mut self,
        t0: f64,
        t1: f64,
        options: &StreamOptions,
        recording: &RecordingSchedule,
    ) -> Result<ScheduleHandle> {
        self.start_session(t0, t1, options, Some(recording))
    }

    fn start_session(
        &mut self,
        t0: f64,
        t1: f64,
        options: &StreamOptions,
        recording: Option<&RecordingSchedule>,
    ) -> Result<ScheduleHandle> {
        if self.is_running() {
            debug!("restarting transport, stopping previous session");
            self.stop();
        }

        self.schedule.init(t0, t1, options, recording)?;
        let handle = self.schedule.handle();
        self.handle = Some(handle.clone());

        debug!(
            t0 = self.schedule.t0(),
            t1 = self.schedule.t1(),
            recording = recording.is_some(),
            "transport started"
        );
        Ok(handle)
    }

    /// Stop the running session. Call once the audio thread is idle.
    pub fn stop(&mut self) {
        if self.handle.take().is_some() {
            self.schedule.finalize();
            debug!(track_time = self.schedule.track_time(), "transport stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(ScheduleHandle::is_active)
    }

    /// Handle of the running session, if any.
    pub fn handle(&self) -> Option<&ScheduleHandle> {
        self.handle.as_ref()
    }

    pub fn schedule(&self) -> &PlaybackSchedule {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut PlaybackSchedule {
        &mut self.schedule
    }

    pub fn sleep_interval(&self) -> Duration {
        self.schedule.sleep_interval()
    }

    pub fn suggested_buffer_times(&self) -> BufferTimes {
        self.schedule.suggested_buffer_times()
    }

    /// Whether playback has finished once `output_frames` still buffered
    /// downstream have drained.
    pub fn is_done(&self, output_frames: usize) -> bool {
        self.schedule.done(output_frames)
    }

    /// Fill `available` frames of output.
    ///
    /// Applies a pending seek first, repositioning every mixer. Then splits
    /// the request into slices: `render` is called once per slice to pull
    /// `slice.to_produce` frames from the mixers and pad the rest with
    /// silence. Between slices the policy may reposition the mixers (a loop
    /// lap or a new scrub segment).
    pub fn fill<M, F>(&mut self, mixers: &mut [M], available: usize, mut render: F) -> FillReport
    where
        M: PlaybackMixer,
        F: FnMut(&mut [M], PlaybackSlice),
    {
        let mut report = FillReport::default();

        if let Some(time) = self.schedule.apply_pending_seek() {
            for mixer in mixers.iter_mut() {
                mixer.reposition(time, true);
            }
            report.seeked_to = Some(time);
        }

        let mut available = available;
        let mut stalled = false;
        loop {
            let slice = self.schedule.get_playback_slice(available);
            self.schedule.produce(slice);
            render(&mut *mixers, slice);

            report.frames += slice.frames;
            report.produced += slice.to_produce;
            report.slices += 1;
            available -= slice.frames;

            let finished = self
                .schedule
                .reposition_playback(mixers, slice.frames, available);
            // An empty slice may end a lap; two in a row means no progress.
            if finished || (slice.frames == 0 && stalled) {
                break;
            }
            stalled = slice.frames == 0;
        }
        report
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.stop();
    }
}
