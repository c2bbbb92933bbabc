//! Data-driven x-axis window selection
//!
//! Given a rough caller guess (say, a plausible physical range for a room
//! dimension), the selector widens or tightens it toward where the fitted
//! density actually has support:
//!
//! 1. The search window is the union of the guess and the data extent,
//!    clipped to `max_range_multiple` guess widths centred on the guess
//!    (or to an explicit cap, see [`BoundsSelector::select_within`]).
//! 2. The density is evaluated on a grid across the search window.
//! 3. The result spans the grid points whose density reaches
//!    `support_threshold` of the peak, padded by one grid step and clipped
//!    to the search window.
//!
//! The result always satisfies `min < max` and never leaves the clipped
//! search window.

use scan_core::utils::extent;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::kernel::{Bandwidth, GaussianKde};
use crate::types::Bounds;

/// Default fraction of the peak density that counts as support
pub const DEFAULT_SUPPORT_THRESHOLD: f64 = 0.01;

/// Default cap on the search window, in multiples of the guess width
pub const DEFAULT_MAX_RANGE_MULTIPLE: f64 = 3.0;

/// Fewest grid points the search is evaluated on
pub const MIN_SEARCH_POINTS: usize = 64;

/// Support-threshold bounds heuristic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsSelector {
    support_threshold: f64,
    max_range_multiple: f64,
}

impl Default for BoundsSelector {
    fn default() -> Self {
        Self {
            support_threshold: DEFAULT_SUPPORT_THRESHOLD,
            max_range_multiple: DEFAULT_MAX_RANGE_MULTIPLE,
        }
    }
}

impl BoundsSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the support threshold (1e-6 to 0.5 of the peak).
    ///
    /// Lower values keep more of the tails in the window.
    pub fn support_threshold(mut self, threshold: f64) -> Self {
        self.support_threshold = threshold.clamp(1e-6, 0.5);
        self
    }

    /// Sets how far the window may grow beyond the guess (1.0 to 100.0).
    pub fn max_range_multiple(mut self, multiple: f64) -> Self {
        self.max_range_multiple = multiple.clamp(1.0, 100.0);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.support_threshold
    }

    pub fn range_multiple(&self) -> f64 {
        self.max_range_multiple
    }

    /// Largest window [`BoundsSelector::select`] may return for `guess`
    ///
    /// Endpoints saturate at the largest finite `f64`.
    pub fn limit(&self, guess: &Bounds) -> Bounds {
        let half = guess.width() / 2.0 * self.max_range_multiple;
        let center = guess.center();
        Bounds::new((center - half).max(f64::MIN), (center + half).min(f64::MAX))
    }

    /// Choose a window for `kde`, seeded with `initial`
    ///
    /// With no samples the (sanitised) guess is returned unchanged.
    pub fn select(&self, kde: &GaussianKde, initial: Bounds, resolution: usize) -> Bounds {
        let guess = initial.sanitized(extent(kde.samples()));
        self.select_within(kde, guess, self.limit(&guess), resolution)
    }

    /// Like [`BoundsSelector::select`], but the search never leaves `cap`
    ///
    /// Used to keep a refinement pass inside the limit of the original
    /// guess. A `cap` that does not overlap `initial` is ignored in favour
    /// of the limit around `initial`.
    pub fn select_within(
        &self,
        kde: &GaussianKde,
        initial: Bounds,
        cap: Bounds,
        resolution: usize,
    ) -> Bounds {
        let data_extent = extent(kde.samples());
        let guess = initial.sanitized(data_extent);
        let Some((lo, hi)) = data_extent else {
            debug!(%guess, "no finite samples, keeping guess");
            return guess;
        };

        let limit = if cap.min < guess.max && cap.max > guess.min {
            cap
        } else {
            self.limit(&guess)
        };
        let search = Bounds::new(
            guess.min.min(lo).max(limit.min),
            guess.max.max(hi).min(limit.max),
        )
        .sanitized(None);

        let points = resolution.max(MIN_SEARCH_POINTS);
        let xs = search.grid(points);
        let ys: Vec<f64> = xs.iter().map(|&x| kde.evaluate(x)).collect();
        let peak = ys.iter().copied().fold(0.0, f64::max);
        if peak <= 0.0 {
            debug!(%search, "density vanishes on search window");
            return search;
        }

        let cutoff = peak * self.support_threshold;
        let (Some(first), Some(last)) = (
            ys.iter().position(|&y| y >= cutoff),
            ys.iter().rposition(|&y| y >= cutoff),
        ) else {
            return search;
        };

        let step = search.width() / (points - 1) as f64;
        let bounds = Bounds::new(
            (xs[first] - step).max(search.min),
            (xs[last] + step).min(search.max),
        );
        trace!(%guess, %search, %bounds, peak, "selected bounds");
        bounds
    }
}

/// One-shot bounds selection with a Silverman-bandwidth Gaussian KDE
///
/// Convenience form of [`BoundsSelector::select`] for callers that have
/// only the raw data and a guess.
pub fn select_bounds(
    data: &[f64],
    initial_min: f64,
    initial_max: f64,
    resolution: usize,
) -> Bounds {
    let guess = Bounds::new(initial_min, initial_max).sanitized(extent(data));
    let kde = GaussianKde::fit(data, Bandwidth::Silverman, guess.width());
    BoundsSelector::default().select(&kde, guess, resolution)
}
