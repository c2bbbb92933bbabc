//! Dynamic-bounds KDE: density curve on a self-selected x-axis window
//!
//! The window is chosen by [`BoundsSelector`], the curve evaluated on it,
//! then the selector is run once more seeded with its own answer. If either
//! endpoint moves by more than `diff_threshold` the curve is re-evaluated on
//! the second window. There is at most one such extra pass, and it searches
//! no further than the limit around the caller's guess, so the final window
//! always lies within `max_range_multiple` guess widths of the guess.

use scan_core::utils::extent;
use scan_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::bounds::{BoundsSelector, DEFAULT_MAX_RANGE_MULTIPLE, DEFAULT_SUPPORT_THRESHOLD};
use crate::kernel::{Bandwidth, GaussianKde};
use crate::types::{Bounds, DensityCurve};

/// Default number of grid points in the returned series
pub const DEFAULT_RESOLUTION: usize = 200;

/// Default endpoint movement that triggers the refinement pass
pub const DEFAULT_DIFF_THRESHOLD: f64 = 0.1;

/// Parameters for the dynamic-bounds KDE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdeConfig {
    /// Points in the returned series
    pub resolution: usize,
    /// Absolute endpoint movement above which bounds are refined
    pub diff_threshold: f64,
    pub bandwidth: Bandwidth,
    /// Fraction of the peak density that counts as support
    pub support_threshold: f64,
    /// Cap on window growth, in multiples of the guess width
    pub max_range_multiple: f64,
}

impl Default for KdeConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            diff_threshold: DEFAULT_DIFF_THRESHOLD,
            bandwidth: Bandwidth::Silverman,
            support_threshold: DEFAULT_SUPPORT_THRESHOLD,
            max_range_multiple: DEFAULT_MAX_RANGE_MULTIPLE,
        }
    }
}

impl KdeConfig {
    /// Reject values the builder setters would otherwise silently clamp
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(Error::InvalidParameter("resolution must be > 0".into()));
        }
        if !self.diff_threshold.is_finite() || self.diff_threshold < 0.0 {
            return Err(Error::out_of_range(
                "diff_threshold",
                self.diff_threshold,
                "finite and >= 0",
            ));
        }
        if !(self.support_threshold > 0.0 && self.support_threshold < 1.0) {
            return Err(Error::out_of_range(
                "support_threshold",
                self.support_threshold,
                "in (0, 1)",
            ));
        }
        if !(self.max_range_multiple >= 1.0 && self.max_range_multiple.is_finite()) {
            return Err(Error::out_of_range(
                "max_range_multiple",
                self.max_range_multiple,
                "finite and >= 1",
            ));
        }
        if let Bandwidth::Fixed(h) = self.bandwidth {
            if !(h.is_finite() && h > 0.0) {
                return Err(Error::out_of_range("bandwidth", h, "finite and > 0"));
            }
        }
        Ok(())
    }
}

/// Output of the dynamic-bounds KDE
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicKdeResult {
    /// Window the series was evaluated on
    pub bounds: Bounds,
    /// `resolution` points across `bounds`
    pub series: DensityCurve,
    /// Whether the second bounds pass was used
    pub refined: bool,
    /// Kernel bandwidth that produced the series
    pub bandwidth: f64,
}

/// Dynamic-bounds KDE engine
#[derive(Debug, Clone, Default)]
pub struct DynamicKde {
    config: KdeConfig,
}

impl DynamicKde {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a config, rejecting out-of-range values
    pub fn from_config(config: KdeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &KdeConfig {
        &self.config
    }

    /// Sets the number of grid points. Zero yields an empty series.
    pub fn resolution(mut self, resolution: usize) -> Self {
        self.config.resolution = resolution;
        self
    }

    /// Sets the refinement threshold; negative or NaN becomes 0.
    pub fn diff_threshold(mut self, threshold: f64) -> Self {
        self.config.diff_threshold = threshold.max(0.0);
        self
    }

    pub fn bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.config.bandwidth = bandwidth;
        self
    }

    pub fn support_threshold(mut self, threshold: f64) -> Self {
        self.config.support_threshold = threshold.clamp(1e-6, 0.5);
        self
    }

    pub fn max_range_multiple(mut self, multiple: f64) -> Self {
        self.config.max_range_multiple = multiple.clamp(1.0, 100.0);
        self
    }

    /// Bounds heuristic configured from this engine's settings
    pub fn selector(&self) -> BoundsSelector {
        BoundsSelector::new()
            .support_threshold(self.config.support_threshold)
            .max_range_multiple(self.config.max_range_multiple)
    }

    /// Estimate a density curve for `data`, seeded with a rough window guess
    ///
    /// Never fails: empty or entirely non-finite data yields the (repaired)
    /// guess and an all-zero series.
    #[instrument(skip(self, data), fields(n = data.len(), resolution = self.config.resolution))]
    pub fn estimate(&self, data: &[f64], initial_min: f64, initial_max: f64) -> DynamicKdeResult {
        let resolution = self.config.resolution;
        let guess = Bounds::new(initial_min, initial_max).sanitized(extent(data));
        let kde = GaussianKde::fit(data, self.config.bandwidth, guess.width());
        let selector = self.selector();

        let limit = selector.limit(&guess);
        let first = selector.select_within(&kde, guess, limit, resolution);
        let second = selector.select_within(&kde, first, limit, resolution);
        let shift = first.max_shift(&second);

        let (bounds, refined) = if shift > self.config.diff_threshold {
            debug!(%first, %second, shift, "bounds not converged, refining once");
            (second, true)
        } else {
            (first, false)
        };
        let series = kde.evaluate_grid(&bounds, resolution);

        debug!(%bounds, bandwidth = kde.bandwidth(), refined, "density curve ready");
        DynamicKdeResult {
            bounds,
            series,
            refined,
            bandwidth: kde.bandwidth(),
        }
    }
}

/// Dynamic-bounds KDE with default bandwidth and selector settings
///
/// # Examples
///
/// ```rust
/// use scan_density::build_dynamic_kde;
///
/// let ceiling_heights = [2.41, 2.43, 2.50, 2.52, 2.55, 2.60, 2.74, 3.05];
/// let result = build_dynamic_kde(&ceiling_heights, 0.0, 6.0, 100, 0.1);
///
/// assert_eq!(result.series.len(), 100);
/// assert!(result.bounds.min < result.bounds.max);
/// assert!(result.series.ys().iter().all(|&y| y >= 0.0));
/// ```
pub fn build_dynamic_kde(
    data: &[f64],
    initial_min: f64,
    initial_max: f64,
    resolution: usize,
    diff_threshold: f64,
) -> DynamicKdeResult {
    DynamicKde::new()
        .resolution(resolution)
        .diff_threshold(diff_threshold)
        .estimate(data, initial_min, initial_max)
}
