//! Time-warp contract consumed by the schedule.

use std::sync::Arc;

/// A curve mapping track position to relative playback speed.
///
/// Only the numeric contract is used here: the schedule never edits the
/// curve. `integral_of_inverse(a, b)` is the wall-clock time needed to play
/// track time `a..b`; `solve_integral_of_inverse(a, area)` inverts it for `b`.
/// Both must accept `b < a` / negative `area` (reverse playback).
pub trait TimeWarp: Send + Sync {
    /// Relative speed at track time `t`.
    fn value_at(&self, t: f64) -> f64;

    fn integral_of_inverse(&self, t0: f64, t1: f64) -> f64;

    fn solve_integral_of_inverse(&self, t0: f64, area: f64) -> f64;
}

/// Shared time-warp reference held by a schedule for one session.
pub type SharedWarp = Arc<dyn TimeWarp>;

/// Identity-speed warp scaled by a constant factor.
///
/// Handy as a baseline and in tests; `ConstantWarp(1.0)` behaves exactly
/// like having no envelope at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantWarp(pub f64);

impl TimeWarp for ConstantWarp {
    fn value_at(&self, _t: f64) -> f64 {
        self.0
    }

    fn integral_of_inverse(&self, t0: f64, t1: f64) -> f64 {
        (t1 - t0) / self.0
    }

    fn solve_integral_of_inverse(&self, t0: f64, area: f64) -> f64 {
        t0 + area * self.0
    }
}
