//! Core types for density curves and x-axis windows

use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed x-axis window `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Window used when neither the caller nor the data say anything useful
    pub const UNIT: Bounds = Bounds { min: 0.0, max: 1.0 };

    /// Largest distance from zero a repaired window may reach
    pub const MAX_HALF_SPAN: f64 = f64::MAX / 4.0;

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn center(&self) -> f64 {
        self.min / 2.0 + self.max / 2.0
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Both endpoints finite, `max > min` and a finite width
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.max > self.min
            && self.width().is_finite()
    }

    /// Largest absolute endpoint movement between two windows
    pub fn max_shift(&self, other: &Bounds) -> f64 {
        (self.min - other.min).abs().max((self.max - other.max).abs())
    }

    /// Repair a bad caller guess into a usable window
    ///
    /// Swapped endpoints are reordered and a zero-width window is widened
    /// around its value. A non-finite endpoint, or a window too wide for its
    /// width to be representable, discards the guess in favour of `fallback`
    /// (typically the data extent). Without a usable fallback a non-finite
    /// guess becomes [`Bounds::UNIT`] and an over-wide one is clipped to
    /// [`Bounds::MAX_HALF_SPAN`] either side of zero.
    pub fn sanitized(self, fallback: Option<(f64, f64)>) -> Bounds {
        if self.is_valid() {
            return self;
        }
        if self.min.is_finite() && self.max.is_finite() {
            let lo = self.min.min(self.max);
            let hi = self.min.max(self.max);
            if hi == lo {
                let half = (lo.abs() * 0.1).max(0.5);
                return Bounds::new((lo - half).max(f64::MIN), (lo + half).min(f64::MAX));
            }
            if (hi - lo).is_finite() {
                return Bounds::new(lo, hi);
            }
            return match Self::from_fallback(fallback) {
                Some(bounds) => bounds,
                None => Bounds::new(
                    lo.max(-Self::MAX_HALF_SPAN),
                    hi.min(Self::MAX_HALF_SPAN),
                ),
            };
        }
        Self::from_fallback(fallback).unwrap_or(Self::UNIT)
    }

    fn from_fallback(fallback: Option<(f64, f64)>) -> Option<Bounds> {
        match fallback {
            Some((lo, hi)) if lo.is_finite() && hi.is_finite() => {
                Some(Bounds::new(lo, hi).sanitized(None))
            }
            _ => None,
        }
    }

    /// `points` evenly spaced x positions from `min` to `max` inclusive
    ///
    /// One point yields the centre; zero points yield an empty grid.
    pub fn grid(&self, points: usize) -> Vec<f64> {
        match points {
            0 => Vec::new(),
            1 => vec![self.center()],
            _ => {
                let step = self.width() / (points - 1) as f64;
                (0..points)
                    .map(|i| {
                        if i == points - 1 {
                            self.max
                        } else {
                            self.min + i as f64 * step
                        }
                    })
                    .collect()
            }
        }
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}]", self.min, self.max)
    }
}

/// One sample of a density curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: f64,
    pub y: f64,
}

/// Density evaluated on a uniform grid
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DensityCurve {
    points: Vec<DensityPoint>,
}

impl DensityCurve {
    pub fn new(points: Vec<DensityPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[DensityPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Highest point of the curve (first one on ties)
    pub fn peak(&self) -> Option<DensityPoint> {
        self.points
            .iter()
            .copied()
            .fold(None, |best: Option<DensityPoint>, p| match best {
                Some(b) if b.y >= p.y => Some(b),
                _ => Some(p),
            })
    }

    /// Trapezoidal area under the curve
    pub fn area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].x - w[0].x) * (w[0].y + w[1].y) / 2.0)
            .sum()
    }

    pub fn into_points(self) -> Vec<DensityPoint> {
        self.points
    }
}
