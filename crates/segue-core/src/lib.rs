//! Real-time playback scheduling: schedule, policies, time queue.
//!
//! # Primary API
//!
//! - [`PlaybackSchedule`]: per-stream orchestrator, driven by the audio thread
//! - [`PlaybackPolicy`]: straight, looped and scrubbed playback rules
//! - [`TimeQueue`]: maps rendered samples back to track time
//! - [`ScheduleHandle`]: control-thread view of a running session
//! - [`PlaybackReader`]: the one audible-position readout per session
//! - [`MessageChannel`]: last-write-wins mailbox to the audio thread
//! - [`RecordingSchedule`]: pre-roll and latency arithmetic for overdubs
//!
//! # Example
//!
//! ```ignore
//! use segue_core::{PlaybackSchedule, StreamOptions};
//!
//! let mut schedule = PlaybackSchedule::default();
//! schedule.init(0.0, 10.0, &StreamOptions::new(48000.0).looped(), None)?;
//! let handle = schedule.handle();
//!
//! // audio thread, per callback
//! let slice = schedule.get_playback_slice(available);
//! schedule.produce(slice);
//! ```

pub mod config;
pub use config::{validate_rate, BufferTimes, ScheduleConfig, DEFAULT_GRAIN_SIZE, DEFAULT_SAMPLE_RATE};

pub mod error;
pub use error::{Error, Result};

pub(crate) mod lockfree;
pub use lockfree::{AtomicDouble, AtomicFlag};

mod message;
pub use message::{MessageChannel, PlayRegion};

mod mixer;
pub use mixer::{PlaybackMixer, WarpOptions};

pub mod policy;
pub use policy::{
    DefaultPolicy, LoopingPolicy, PlaybackPolicy, PlaybackSlice, ScrubbingOptions,
    ScrubbingPolicy, TimeStep,
};

mod recording;
pub use recording::RecordingSchedule;

mod schedule;
pub use schedule::{
    looping_policy, scrubbing_policy, CutPreviewGap, PlaybackReader, PlaybackSchedule,
    PolicyFactory, ScheduleHandle, ScheduleShared, StreamOptions, Timeline,
};

mod time_queue;
pub use time_queue::{ConsumeInfo, PlaybackExtension, ProducedSpan, TimeQueue};

mod warp;
pub use warp::{ConstantWarp, SharedWarp, TimeWarp};
