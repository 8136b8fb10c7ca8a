//! Mixer-facing contract.
//!
//! The resampling mixer itself lives outside this crate. Policies only
//! describe how it must warp ([`WarpOptions`]) and tell it when to jump
//! ([`PlaybackMixer::reposition`]).

use crate::warp::SharedWarp;

/// How an external mixer must resample for the current policy.
#[derive(Clone, Default)]
pub struct WarpOptions {
    /// Time warp to follow, if any.
    pub envelope: Option<SharedWarp>,
    /// Speed bounds for variable-rate (scrub) playback; zero when unused.
    pub min_speed: f64,
    pub max_speed: f64,
}

impl WarpOptions {
    pub fn from_envelope(envelope: Option<SharedWarp>) -> Self {
        Self {
            envelope,
            min_speed: 0.0,
            max_speed: 0.0,
        }
    }

    pub fn with_speed_range(min_speed: f64, max_speed: f64) -> Self {
        Self {
            envelope: None,
            min_speed,
            max_speed,
        }
    }
}

impl core::fmt::Debug for WarpOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WarpOptions")
            .field("envelope", &self.envelope.is_some())
            .field("min_speed", &self.min_speed)
            .field("max_speed", &self.max_speed)
            .finish()
    }
}

/// An external mixer the schedule can force to restart.
pub trait PlaybackMixer {
    /// Continue fetching from `time` on the next process call.
    /// `skipping` also resets resampler state.
    fn reposition(&mut self, time: f64, skipping: bool);
}

impl<M: PlaybackMixer + ?Sized> PlaybackMixer for Box<M> {
    fn reposition(&mut self, time: f64, skipping: bool) {
        (**self).reposition(time, skipping)
    }
}
