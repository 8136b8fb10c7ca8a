//! Builder for configuring and constructing a `Transport`.

use crate::core::{BufferTimes, ScheduleConfig};
use crate::{Result, Transport};
use std::time::Duration;

/// All settings default to [`ScheduleConfig::default`]. The sample rate is
/// not a transport setting: each session supplies its own through
/// `StreamOptions`.
///
/// # Example
///
/// ```ignore
/// use segue::prelude::*;
///
/// let mut transport = Transport::builder()
///     .grain_size(1024)
///     .scrub_sleep_interval(Duration::from_millis(2))
///     .build()?;
///
/// let handle = transport.start(0.0, 30.0, &StreamOptions::new(48000.0).looped())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransportBuilder {
    config: ScheduleConfig,
}

impl TransportBuilder {
    /// Replace every setting at once, e.g. with a deserialized config.
    pub fn config(mut self, config: ScheduleConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: 2000
    pub fn grain_size(mut self, samples: usize) -> Self {
        self.config.grain_size = samples;
        self
    }

    /// Default: 4s minimum, 4s acceptable, 10s initial
    pub fn buffer_times(mut self, buffer_times: BufferTimes) -> Self {
        self.config.buffer_times = buffer_times;
        self
    }

    /// Default: 10ms
    pub fn sleep_interval(mut self, interval: Duration) -> Self {
        self.config.sleep_interval = interval;
        self
    }

    /// Default: 5ms
    pub fn scrub_sleep_interval(mut self, interval: Duration) -> Self {
        self.config.scrub_sleep_interval = interval;
        self
    }

    pub fn build(self) -> Result<Transport> {
        self.config.validate()?;
        Ok(Transport::from_config(self.config))
    }
}
