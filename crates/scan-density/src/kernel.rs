//! Gaussian kernel density estimation
//!
//! The estimate at `x` is `1 / (n h) * sum(phi((x - x_i) / h))` with `phi`
//! the standard normal density and `h` the bandwidth. Every output is
//! non-negative and an empty sample evaluates to zero everywhere.

use scan_core::utils::{finite_values, iqr_sorted, sorted, std_dev};
use scan_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::types::{Bounds, DensityCurve, DensityPoint};

/// 1 / sqrt(2 * pi)
const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Fraction of the window width used as bandwidth when a rule cannot
/// produce one (single sample, zero spread)
pub const FALLBACK_BANDWIDTH_FRACTION: f64 = 0.05;

/// Bandwidth selection rule
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bandwidth {
    /// `0.9 * min(sd, IQR / 1.34) * n^(-1/5)`
    #[default]
    Silverman,
    /// `1.06 * sd * n^(-1/5)`
    Scott,
    /// Caller-chosen bandwidth
    Fixed(f64),
}

impl Bandwidth {
    /// Bandwidth for a finite sample, or `None` if the rule degenerates
    pub fn estimate(&self, samples: &[f64]) -> Option<f64> {
        let h = match *self {
            Bandwidth::Fixed(h) => h,
            Bandwidth::Silverman | Bandwidth::Scott if samples.len() < 2 => return None,
            Bandwidth::Silverman => {
                let sd = std_dev(samples);
                let iqr = iqr_sorted(&sorted(samples)) / 1.34;
                let spread = if iqr > 0.0 { sd.min(iqr) } else { sd };
                0.9 * spread * (samples.len() as f64).powf(-0.2)
            }
            Bandwidth::Scott => 1.06 * std_dev(samples) * (samples.len() as f64).powf(-0.2),
        };
        (h.is_finite() && h > 0.0).then_some(h)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Silverman => "silverman",
            Self::Scott => "scott",
            Self::Fixed(_) => "fixed",
        }
    }
}

/// Gaussian kernel density estimator over a fixed sample
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fit to the finite values of `data`
    ///
    /// If `rule` degenerates, the bandwidth falls back to
    /// [`FALLBACK_BANDWIDTH_FRACTION`] of `window_width` (or `1.0` if that is
    /// unusable too).
    pub fn fit(data: &[f64], rule: Bandwidth, window_width: f64) -> Self {
        let samples = finite_values(data);
        let bandwidth = rule.estimate(&samples).unwrap_or_else(|| {
            let fallback = window_width * FALLBACK_BANDWIDTH_FRACTION;
            if fallback.is_finite() && fallback > 0.0 {
                fallback
            } else {
                1.0
            }
        });
        trace!(n = samples.len(), bandwidth, rule = rule.name(), "fitted kde");

        Self { samples, bandwidth }
    }

    /// Fit with an explicit bandwidth
    pub fn with_bandwidth(data: &[f64], bandwidth: f64) -> Result<Self> {
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return Err(Error::out_of_range("bandwidth", bandwidth, "finite and > 0"));
        }
        Ok(Self {
            samples: finite_values(data),
            bandwidth,
        })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Finite samples the estimate is built from
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Density at `x`
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let h = self.bandwidth;
        let sum: f64 = self
            .samples
            .iter()
            .map(|&xi| {
                let u = (x - xi) / h;
                (-0.5 * u * u).exp()
            })
            .sum();
        sum * INV_SQRT_2PI / (self.samples.len() as f64 * h)
    }

    /// Density on `resolution` evenly spaced points across `bounds`
    pub fn evaluate_grid(&self, bounds: &Bounds, resolution: usize) -> DensityCurve {
        DensityCurve::new(
            bounds
                .grid(resolution)
                .into_iter()
                .map(|x| DensityPoint {
                    x,
                    y: self.evaluate(x),
                })
                .collect(),
        )
    }
}
