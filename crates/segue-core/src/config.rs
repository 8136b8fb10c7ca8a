//! Schedule configuration.
//!
//! Grain size and buffering durations are tuning parameters, not
//! invariants; everything here can be overridden per transport.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Samples represented by one time-queue slot.
pub const DEFAULT_GRAIN_SIZE: usize = 2000;

/// Sample rate used before a session supplies one.
pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Buffering durations (seconds) suggested to the external ring buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferTimes {
    /// Falling below this risks underrun.
    pub minimum: f64,
    pub acceptable: f64,
    /// Primed before the stream starts; also sizes the time queue.
    pub initial: f64,
}

impl Default for BufferTimes {
    fn default() -> Self {
        Self {
            minimum: 4.0,
            acceptable: 4.0,
            initial: 10.0,
        }
    }
}

/// Configuration for a playback schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub grain_size: usize,
    pub buffer_times: BufferTimes,
    pub sleep_interval: Duration,
    pub scrub_sleep_interval: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            grain_size: DEFAULT_GRAIN_SIZE,
            buffer_times: BufferTimes::default(),
            sleep_interval: Duration::from_millis(10),
            scrub_sleep_interval: Duration::from_millis(5),
        }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.grain_size == 0 {
            return Err(Error::InvalidConfig("grain_size must be non-zero".into()));
        }

        let BufferTimes {
            minimum,
            acceptable,
            initial,
        } = self.buffer_times;
        if !(minimum > 0.0 && acceptable >= minimum && initial >= acceptable) {
            return Err(Error::InvalidConfig(format!(
                "buffer times must satisfy 0 < minimum <= acceptable <= initial (got {minimum}, {acceptable}, {initial})"
            )));
        }

        if self.sleep_interval.is_zero() || self.scrub_sleep_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "sleep intervals must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Validate a session sample rate.
pub fn validate_rate(rate: f64) -> Result<()> {
    if !(1000.0..=384000.0).contains(&rate) {
        return Err(Error::InvalidSampleRate(rate));
    }
    Ok(())
}
