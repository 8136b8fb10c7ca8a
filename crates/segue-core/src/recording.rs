//! Pre-roll and latency bookkeeping for overdub recording.

use serde::{Deserialize, Serialize};

/// Timing corrections a recording session feeds into the schedule.
///
/// All values are seconds. `position` counts captured time from the start
/// of the stream, including pre-roll and latency that must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordingSchedule {
    /// Played before the punch-in point; subtracted from `t0`.
    pub pre_roll: f64,
    /// Round-trip input latency; subtracted from `t1`.
    pub latency_correction: f64,
    /// Length of the take to keep.
    pub duration: f64,
    pub position: f64,
}

impl RecordingSchedule {
    pub fn new(pre_roll: f64, latency_correction: f64, duration: f64) -> Self {
        Self {
            pre_roll,
            latency_correction,
            duration,
            position: 0.0,
        }
    }

    /// Net shift applied to captured audio. Usually negative.
    #[inline]
    pub fn total_correction(&self) -> f64 {
        self.latency_correction - self.pre_roll
    }

    /// Captured time that lands inside the take.
    #[inline]
    pub fn consumed(&self) -> f64 {
        (self.position + self.total_correction()).max(0.0)
    }

    /// Time still to capture before the take is complete.
    #[inline]
    pub fn to_consume(&self) -> f64 {
        self.duration - self.consumed()
    }

    /// Captured time still to throw away (pre-roll and latency).
    #[inline]
    pub fn to_discard(&self) -> f64 {
        (-(self.position + self.total_correction())).max(0.0)
    }

    /// Account for `seconds` of newly captured input.
    #[inline]
    pub fn advance(&mut self, seconds: f64) {
        self.position += seconds;
    }
}
