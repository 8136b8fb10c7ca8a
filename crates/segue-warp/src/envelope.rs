//! Piecewise speed curve with closed-form integrals.

use crate::{Error, Result};
use segue_core::TimeWarp;
use serde::{Deserialize, Serialize};

/// Slopes below this are treated as flat.
const FLAT: f64 = 1e-12;

/// Interpolation between adjacent points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    /// Speed changes linearly with track time.
    #[default]
    Linear,
    /// Speed changes by a constant ratio per second of track time.
    Exponential,
}

/// A point on the speed curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedPoint {
    /// Track time in seconds.
    pub time: f64,
    /// Relative playback speed; 1.0 is normal.
    pub speed: f64,
}

impl SpeedPoint {
    pub const fn new(time: f64, speed: f64) -> Self {
        Self { time, speed }
    }
}

/// Playback speed as a function of track time.
///
/// Constant before the first point and after the last; with no points the
/// speed is `default_speed` everywhere. Two points at the same time make a
/// step.
///
/// # Example
/// ```ignore
/// let mut envelope = SpeedEnvelope::new(1.0)?;
/// envelope.add_point(0.0, 1.0)?;
/// envelope.add_point(4.0, 2.0)?; // ramp up to double speed
///
/// // Real seconds needed to play track time 0..4
/// let real = envelope.integral_of_inverse(0.0, 4.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedEnvelope {
    points: Vec<SpeedPoint>,
    default_speed: f64,
    interpolation: Interpolation,
}

fn check_speed(speed: f64) -> Result<()> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidSpeed(speed))
    }
}

impl SpeedEnvelope {
    pub fn new(default_speed: f64) -> Result<Self> {
        check_speed(default_speed)?;
        Ok(Self {
            points: Vec::new(),
            default_speed,
            interpolation: Interpolation::Linear,
        })
    }

    /// Build from `(time, speed)` pairs in any order.
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        let mut envelope = Self::new(1.0)?;
        for (time, speed) in points {
            envelope.add_point(time, speed)?;
        }
        Ok(envelope)
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }

    pub fn default_speed(&self) -> f64 {
        self.default_speed
    }

    pub fn set_default_speed(&mut self, speed: f64) -> Result<()> {
        check_speed(speed)?;
        self.default_speed = speed;
        Ok(())
    }

    /// Insert a point, after any existing points at the same time.
    pub fn add_point(&mut self, time: f64, speed: f64) -> Result<()> {
        if !time.is_finite() {
            return Err(Error::InvalidTime(time));
        }
        check_speed(speed)?;
        let index = self.points.partition_point(|p| p.time <= time);
        self.points.insert(index, SpeedPoint::new(time, speed));
        Ok(())
    }

    /// Remove the first point at exactly `time`.
    pub fn remove_point_at(&mut self, time: f64) -> Option<SpeedPoint> {
        let index = self.points.iter().position(|p| p.time == time)?;
        Some(self.points.remove(index))
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[SpeedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Piece containing `t`. Forward lookups take `[lo, hi)`, backward
    /// lookups `(lo, hi]`.
    fn piece_index(&self, t: f64, forward: bool) -> usize {
        if forward {
            self.points.partition_point(|p| p.time <= t)
        } else {
            self.points.partition_point(|p| p.time < t)
        }
    }

    fn span(&self, index: usize) -> Span {
        let n = self.points.len();
        if n == 0 {
            return Span::constant(f64::NEG_INFINITY, f64::INFINITY, self.default_speed);
        }
        if index == 0 {
            let first = self.points[0];
            return Span::constant(f64::NEG_INFINITY, first.time, first.speed);
        }
        if index >= n {
            let last = self.points[n - 1];
            return Span::constant(last.time, f64::INFINITY, last.speed);
        }

        let a = self.points[index - 1];
        let b = self.points[index];
        let width = b.time - a.time;
        let piece = match self.interpolation {
            Interpolation::Linear => {
                let slope = (b.speed - a.speed) / width;
                if slope.abs() < FLAT {
                    Piece::Constant(a.speed)
                } else {
                    Piece::Linear {
                        x0: a.time,
                        v0: a.speed,
                        slope,
                    }
                }
            }
            Interpolation::Exponential => {
                let rate = (b.speed / a.speed).ln() / width;
                if rate.abs() < FLAT {
                    Piece::Constant(a.speed)
                } else {
                    Piece::Exponential {
                        x0: a.time,
                        v0: a.speed,
                        rate,
                    }
                }
            }
        };
        Span {
            lo: a.time,
            hi: b.time,
            piece,
        }
    }

    pub fn value_at(&self, t: f64) -> f64 {
        self.span(self.piece_index(t, true)).piece.value(t)
    }

    /// Real seconds needed to play track time `t0..t1`; negative when
    /// `t1 < t0`.
    pub fn integral_of_inverse(&self, t0: f64, t1: f64) -> f64 {
        if t1 == t0 {
            return 0.0;
        }
        if t1 < t0 {
            return -self.integral_of_inverse(t1, t0);
        }

        let mut total = 0.0;
        let mut x = t0;
        loop {
            let span = self.span(self.piece_index(x, true));
            let y = t1.min(span.hi);
            total += span.piece.integral(x, y);
            if y >= t1 {
                return total;
            }
            x = y;
        }
    }

    /// Track time reached after `area` real seconds from `t0`; walks
    /// backwards for negative `area`.
    pub fn solve_integral_of_inverse(&self, t0: f64, area: f64) -> f64 {
        if area == 0.0 {
            return t0;
        }

        let mut x = t0;
        if area > 0.0 {
            let mut left = area;
            loop {
                let span = self.span(self.piece_index(x, true));
                if span.hi == f64::INFINITY {
                    return span.piece.solve(x, left);
                }
                let full = span.piece.integral(x, span.hi);
                if full >= left {
                    return span.piece.solve(x, left).min(span.hi);
                }
                left -= full;
                x = span.hi;
            }
        } else {
            let mut left = -area;
            loop {
                let span = self.span(self.piece_index(x, false));
                if span.lo == f64::NEG_INFINITY {
                    return span.piece.solve(x, -left);
                }
                let full = span.piece.integral(span.lo, x);
                if full >= left {
                    return span.piece.solve(x, -left).max(span.lo);
                }
                left -= full;
                x = span.lo;
            }
        }
    }
}

impl TimeWarp for SpeedEnvelope {
    fn value_at(&self, t: f64) -> f64 {
        SpeedEnvelope::value_at(self, t)
    }

    fn integral_of_inverse(&self, t0: f64, t1: f64) -> f64 {
        SpeedEnvelope::integral_of_inverse(self, t0, t1)
    }

    fn solve_integral_of_inverse(&self, t0: f64, area: f64) -> f64 {
        SpeedEnvelope::solve_integral_of_inverse(self, t0, area)
    }
}

#[derive(Debug, Clone, Copy)]
struct Span {
    lo: f64,
    hi: f64,
    piece: Piece,
}

impl Span {
    fn constant(lo: f64, hi: f64, speed: f64) -> Self {
        Self {
            lo,
            hi,
            piece: Piece::Constant(speed),
        }
    }
}

/// Speed law on one piece, anchored at `x0` where the speed is `v0`.
#[derive(Debug, Clone, Copy)]
enum Piece {
    Constant(f64),
    /// v(t) = v0 + slope (t - x0)
    Linear { x0: f64, v0: f64, slope: f64 },
    /// v(t) = v0 exp(rate (t - x0))
    Exponential { x0: f64, v0: f64, rate: f64 },
}

impl Piece {
    fn value(&self, t: f64) -> f64 {
        match *self {
            Piece::Constant(v) => v,
            Piece::Linear { x0, v0, slope } => v0 + slope * (t - x0),
            Piece::Exponential { x0, v0, rate } => v0 * (rate * (t - x0)).exp(),
        }
    }

    /// Signed integral of 1/v over `x..y`.
    fn integral(&self, x: f64, y: f64) -> f64 {
        match *self {
            Piece::Constant(v) => (y - x) / v,
            Piece::Linear { slope, .. } => (self.value(y).ln() - self.value(x).ln()) / slope,
            Piece::Exponential { x0, v0, rate } => {
                ((-rate * (x - x0)).exp() - (-rate * (y - x0)).exp()) / (v0 * rate)
            }
        }
    }

    /// `y` such that `integral(x, y) == area`.
    fn solve(&self, x: f64, area: f64) -> f64 {
        match *self {
            Piece::Constant(v) => x + area * v,
            Piece::Linear { x0, v0, slope } => {
                x0 + (self.value(x) * (slope * area).exp() - v0) / slope
            }
            Piece::Exponential { x0, v0, rate } => {
                x0 - ((-rate * (x - x0)).exp() - area * v0 * rate).ln() / rate
            }
        }
    }
}
