//! Fixed-range histogram binner
//!
//! Counts a measurement series into the buckets of a [`BinLayout`] in a
//! single pass. Non-finite values are dropped without being counted
//! anywhere, so one corrupt measurement never invalidates a chart.

use scan_core::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::layout::BinLayout;
use crate::types::{Bucket, Histogram};

/// Parameters for a fixed-range histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinnerConfig {
    /// Width of every main bin
    pub bin_size: f64,
    /// Inclusive lower edge of the first main bin
    pub min: f64,
    /// Values at or above this land in overflow
    pub max: f64,
    /// Digits after the decimal point in bucket labels
    #[serde(default)]
    pub decimal_places: usize,
    /// Drop the underflow bucket (and its count) from the result
    #[serde(default)]
    pub hide_underflow: bool,
}

impl Default for BinnerConfig {
    fn default() -> Self {
        Self {
            bin_size: 1.0,
            min: 0.0,
            max: 10.0,
            decimal_places: 0,
            hide_underflow: false,
        }
    }
}

impl BinnerConfig {
    /// Create a config with default label formatting
    pub fn new(bin_size: f64, min: f64, max: f64) -> Self {
        Self {
            bin_size,
            min,
            max,
            ..Self::default()
        }
    }

    /// Set label precision
    pub fn decimal_places(mut self, decimal_places: usize) -> Self {
        self.decimal_places = decimal_places;
        self
    }

    /// Hide or show the underflow bucket
    pub fn hide_underflow(mut self, hide: bool) -> Self {
        self.hide_underflow = hide;
        self
    }

    /// Validate into a reusable binner
    pub fn build(&self) -> Result<FixedRangeBinner> {
        FixedRangeBinner::new(self)
    }
}

/// Validated, reusable fixed-range binner
///
/// Labels are rendered once at construction, so binning many series with the
/// same geometry only pays for the counting pass.
#[derive(Debug, Clone)]
pub struct FixedRangeBinner {
    layout: BinLayout,
    labels: Vec<String>,
    hide_underflow: bool,
}

impl FixedRangeBinner {
    /// Validate `config`, failing fast on any bad parameter
    pub fn new(config: &BinnerConfig) -> Result<Self> {
        let layout = BinLayout::new(config.bin_size, config.min, config.max).map_err(|e| {
            debug!(error = %e, "rejected histogram config");
            e
        })?;
        let labels = (0..layout.total_buckets())
            .map(|i| layout.label(i, config.decimal_places))
            .collect();

        Ok(Self {
            layout,
            labels,
            hide_underflow: config.hide_underflow,
        })
    }

    pub fn layout(&self) -> &BinLayout {
        &self.layout
    }

    /// Count `data` into buckets
    #[instrument(skip(self, data), fields(n = data.len(), main_bins = self.layout.main_bins()))]
    pub fn bin(&self, data: &[f64]) -> Histogram {
        let mut counts = vec![0u64; self.layout.total_buckets()];
        let mut dropped = 0usize;

        for &value in data {
            match self.layout.bucket_for(value) {
                Some(idx) => counts[idx] += 1,
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            debug!(dropped, "ignored non-finite values");
        }

        let skip = usize::from(self.hide_underflow);
        let buckets = self
            .labels
            .iter()
            .zip(counts)
            .skip(skip)
            .map(|(label, count)| Bucket {
                label: label.clone(),
                count,
            })
            .collect();

        Histogram::new(buckets, self.layout, self.hide_underflow)
    }
}

/// Bin `data` into a fixed-range histogram in one call
///
/// Equivalent to building a [`FixedRangeBinner`] and calling
/// [`FixedRangeBinner::bin`]. Fails on an invalid configuration and never
/// returns a partial histogram.
///
/// # Examples
///
/// ```rust
/// use scan_histogram::bin;
///
/// let data = [0.5, 2.0, 2.5, 9.9, 10.0, -1.0, f64::NAN];
/// let hist = bin(&data, 5.0, 0.0, 10.0, 0, false).unwrap();
///
/// assert_eq!(hist.labels(), vec!["< 0", "0-5", "5-10", ">= 10"]);
/// assert_eq!(hist.counts(), vec![1, 3, 1, 1]);
/// ```
pub fn bin(
    data: &[f64],
    bin_size: f64,
    min: f64,
    max: f64,
    decimal_places: usize,
    hide_underflow: bool,
) -> Result<Histogram> {
    let config = BinnerConfig {
        bin_size,
        min,
        max,
        decimal_places,
        hide_underflow,
    };
    Ok(config.build()?.bin(data))
}
