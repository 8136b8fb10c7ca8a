//! Speed envelopes for segue playback schedules.
//!
//! A [`SpeedEnvelope`] maps track time to relative playback speed and
//! implements [`segue_core::TimeWarp`], so it can be handed to a session as
//! its time warp:
//!
//! ```ignore
//! use segue_core::StreamOptions;
//! use segue_warp::{Interpolation, SpeedEnvelope};
//! use std::sync::Arc;
//!
//! let envelope = SpeedEnvelope::from_points([(0.0, 1.0), (8.0, 0.5)])?
//!     .with_interpolation(Interpolation::Exponential);
//! let options = StreamOptions::new(48000.0).envelope(Arc::new(envelope));
//! ```
//!
//! Integrals are closed-form per piece, so solving for track time is exact
//! up to floating-point rounding.

mod envelope;
pub mod error;

pub use envelope::{Interpolation, SpeedEnvelope, SpeedPoint};
pub use error::{Error, Result};
