//! Per-session stream options.

use crate::config::DEFAULT_SAMPLE_RATE;
use crate::policy::{PlaybackPolicy, ScrubbingOptions};
use crate::time_queue::PlaybackExtension;
use crate::warp::SharedWarp;
use crate::{Error, Result};
use std::sync::Arc;

use super::timeline::CutPreviewGap;

/// Builds the policy for a session from its options.
pub type PolicyFactory = fn(&StreamOptions) -> Result<PlaybackPolicy>;

/// Options supplied when a play or record session starts.
#[derive(Clone)]
pub struct StreamOptions {
    pub rate: f64,
    /// Time warp for playback; ignored while recording.
    pub envelope: Option<SharedWarp>,
    /// Absent means a single straight pass.
    pub policy_factory: Option<PolicyFactory>,
    pub scrubbing_options: Option<ScrubbingOptions>,
    /// Skipped over in the readout when previewing a cut.
    pub cut_preview_gap: Option<CutPreviewGap>,
    /// `false` for record-only sessions: the time queue stays unpopulated.
    pub playback: bool,
    pub extensions: Vec<Arc<dyn PlaybackExtension>>,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl StreamOptions {
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            envelope: None,
            policy_factory: None,
            scrubbing_options: None,
            cut_preview_gap: None,
            playback: true,
            extensions: Vec::new(),
        }
    }

    pub fn envelope(mut self, envelope: SharedWarp) -> Self {
        self.envelope = Some(envelope);
        self
    }

    pub fn looped(mut self) -> Self {
        self.policy_factory = Some(looping_policy);
        self
    }

    pub fn scrubbing(mut self, options: ScrubbingOptions) -> Self {
        self.scrubbing_options = Some(options);
        self.policy_factory = Some(scrubbing_policy);
        self
    }

    /// Preview with `length` seconds after `start` cut out.
    pub fn cut_preview(mut self, start: f64, length: f64) -> Self {
        self.cut_preview_gap = Some(CutPreviewGap::new(start, length));
        self
    }

    pub fn record_only(mut self) -> Self {
        self.playback = false;
        self
    }

    pub fn extension(mut self, extension: Arc<dyn PlaybackExtension>) -> Self {
        self.extensions.push(extension);
        self
    }
}

impl core::fmt::Debug for StreamOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StreamOptions")
            .field("rate", &self.rate)
            .field("envelope", &self.envelope.is_some())
            .field("policy_factory", &self.policy_factory.is_some())
            .field("scrubbing_options", &self.scrubbing_options)
            .field("cut_preview_gap", &self.cut_preview_gap)
            .field("playback", &self.playback)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

pub fn looping_policy(_options: &StreamOptions) -> Result<PlaybackPolicy> {
    Ok(PlaybackPolicy::looping())
}

pub fn scrubbing_policy(options: &StreamOptions) -> Result<PlaybackPolicy> {
    let scrubbing = options
        .scrubbing_options
        .ok_or(Error::MissingScrubbingOptions)?;
    scrubbing.validate()?;
    Ok(PlaybackPolicy::scrubbing(scrubbing))
}
