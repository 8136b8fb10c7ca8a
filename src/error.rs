//! Centralized error type for the segue umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] segue_core::Error),

    #[cfg(feature = "warp")]
    #[error("Warp: {0}")]
    Warp(#[from] segue_warp::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
