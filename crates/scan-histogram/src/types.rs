//! Core types for histogram representation

use std::fmt;

use serde::Serialize;

use crate::layout::{bin_center, BinLayout};

/// A single labelled bucket of a histogram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Human-readable range, e.g. `"< 0"`, `"0-5"` or `">= 20"`
    pub label: String,
    /// Number of values routed to this bucket
    pub count: u64,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.count)
    }
}

/// Histogram produced by the fixed-range binner
///
/// Holds `main_bins + 2` buckets, or `main_bins + 1` when the underflow
/// bucket was hidden. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    buckets: Vec<Bucket>,
    layout: BinLayout,
    underflow_hidden: bool,
}

impl Histogram {
    pub(crate) fn new(buckets: Vec<Bucket>, layout: BinLayout, underflow_hidden: bool) -> Self {
        Self {
            buckets,
            layout,
            underflow_hidden,
        }
    }

    /// Get the buckets
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Get the number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if the histogram has no buckets
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Geometry the histogram was built with
    pub fn layout(&self) -> &BinLayout {
        &self.layout
    }

    /// Whether the underflow bucket was dropped from the result
    pub fn underflow_hidden(&self) -> bool {
        self.underflow_hidden
    }

    /// Get labels as a vector
    pub fn labels(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.label.as_str()).collect()
    }

    /// Get counts as a vector
    pub fn counts(&self) -> Vec<u64> {
        self.buckets.iter().map(|b| b.count).collect()
    }

    /// Sum of all returned counts
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Get the maximum count in any bucket
    pub fn max_count(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Bucket centres, aligned with [`Histogram::buckets`]
    pub fn centers(&self) -> Vec<f64> {
        let total = self.buckets.len();
        (0..total)
            .map(|i| {
                bin_center(
                    i,
                    self.layout.min(),
                    self.layout.max(),
                    self.layout.bin_size(),
                    self.underflow_hidden,
                    total,
                )
            })
            .collect()
    }

    /// Split into the `(labels, counts)` pair chart builders consume
    pub fn into_parts(self) -> (Vec<String>, Vec<u64>) {
        self.buckets
            .into_iter()
            .map(|b| (b.label, b.count))
            .unzip()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Histogram({} buckets, n={}, range=[{}, {}), bin_size={})",
            self.len(),
            self.total(),
            self.layout.min(),
            self.layout.max(),
            self.layout.bin_size()
        )
    }
}
