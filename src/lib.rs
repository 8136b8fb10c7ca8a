//! # Segue - Real-time Playback Scheduling
//!
//! Decides, callback by callback, which stretch of the timeline to render
//! next, and maps rendered samples back to the track time the listener hears.
//!
//! ## Architecture
//!
//! Segue is an umbrella crate that coordinates:
//! - **segue-core** - Schedule kernel (PlaybackSchedule, policies, TimeQueue, RecordingSchedule)
//! - **segue-warp** - Speed envelopes for time-warped playback
//!
//! ## Quick Start
//!
//! ```ignore
//! use segue::prelude::*;
//!
//! let mut transport = Transport::builder().build()?;
//!
//! // Control thread: loop bars 4..8 at 48kHz
//! let handle = transport.start(8.0, 16.0, &StreamOptions::new(48000.0).looped())?;
//!
//! // Audio thread, per callback
//! transport.fill(&mut mixers, frames, |mixers, slice| render(mixers, slice));
//!
//! // Reader thread: what is audible now
//! let mut reader = handle.reader().expect("single reader");
//! let now = reader.now_playing(frames);
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Core schedule plus speed envelopes
//! - `warp` - Speed envelopes (`SpeedEnvelope`)

/// Re-export of segue-core for direct access
pub use segue_core as core;

// Core types
pub use segue_core::{
    // Lock-free primitives
    AtomicDouble,
    AtomicFlag,

    // Configuration
    BufferTimes,
    ConsumeInfo,
    CutPreviewGap,
    // Policies
    DefaultPolicy,
    LoopingPolicy,
    // Messaging
    MessageChannel,
    PlayRegion,
    PlaybackExtension,
    PlaybackReader,
    // Mixer contract
    PlaybackMixer,
    PlaybackPolicy,
    // Schedule
    PlaybackSchedule,
    PlaybackSlice,
    ProducedSpan,
    RecordingSchedule,
    ScheduleConfig,
    ScheduleHandle,
    ScrubbingOptions,
    ScrubbingPolicy,
    StreamOptions,
    // Time queue
    TimeQueue,
    TimeStep,
    // Time warps
    TimeWarp,
    Timeline,
    WarpOptions,
};

// Speed envelopes
#[cfg(feature = "warp")]
pub use segue_warp as warp;

#[cfg(feature = "warp")]
pub use segue_warp::{Interpolation, SpeedEnvelope, SpeedPoint};

mod builder;
mod engine;
mod error;

pub use builder::TransportBuilder;
pub use engine::{FillReport, Transport};
pub use error::{Error, Result};

/// Convenience prelude for common imports
pub mod prelude {
    // Main transport
    pub use crate::{FillReport, Transport, TransportBuilder};

    // Session setup
    pub use crate::core::{RecordingSchedule, ScrubbingOptions, StreamOptions};

    // Real-time contract
    pub use crate::core::{PlaybackMixer, PlaybackReader, PlaybackSlice, ScheduleHandle};

    // Time warps
    pub use crate::core::{ConstantWarp, SharedWarp, TimeWarp};

    #[cfg(feature = "warp")]
    pub use crate::warp::{Interpolation, SpeedEnvelope};

    pub use std::time::Duration;
}
