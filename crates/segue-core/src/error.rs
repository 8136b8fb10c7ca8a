//! Error types for segue-core.

use thiserror::Error;

/// Error type for session setup.
///
/// Nothing on the audio-thread path returns these; they surface at
/// session start (`PlaybackSchedule::init`) and configuration time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid sample rate: {0}. Must be between 1000 and 384000 Hz")]
    InvalidSampleRate(f64),

    #[error("Invalid play region: t0={t0}, t1={t1}")]
    InvalidRegion { t0: f64, t1: f64 },

    #[error("Invalid scrub speed range: min={min}, max={max}")]
    InvalidScrubSpeed { min: f64, max: f64 },

    #[error("Scrubbing policy requested without scrubbing options")]
    MissingScrubbingOptions,

    #[error("Scrubbing is not compatible with {0}")]
    ScrubbingConflict(&'static str),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
