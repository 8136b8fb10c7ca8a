//! Error types for segue-warp.

use thiserror::Error;

/// Error type for envelope editing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid speed: {0}. Must be finite and greater than zero")]
    InvalidSpeed(f64),

    #[error("Invalid envelope time: {0}")]
    InvalidTime(f64),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
