//! Numeric reduction layer for room-scan analytics reports
//!
//! Turns raw per-artifact measurement arrays and detection tallies into
//! small, exact datasets a chart builder can render:
//!
//! - [`histogram`]: fixed-range binning with underflow/overflow buckets
//! - [`density`]: Gaussian KDE on a self-selected, bounded x-axis window
//! - [`apportion`]: largest-remainder redistribution of confidence tallies
//!
//! All three are pure, synchronous functions over in-memory slices with no
//! shared state, so a report build may run one per chart or category on as
//! many threads as it likes.
//!
//! # Example
//!
//! ```rust
//! use scan_reduce::prelude::*;
//!
//! let durations = [42.0, 65.0, 71.5, 130.0, f64::NAN];
//! let histogram = bin(&durations, 30.0, 0.0, 120.0, 0, true).unwrap();
//! assert_eq!(histogram.total(), 4);
//!
//! let curve = build_dynamic_kde(&durations, 0.0, 180.0, 64, 0.1);
//! assert_eq!(curve.series.len(), 64);
//!
//! let counts = apportion(RawTally::new(2, 1, 0), 2);
//! assert_eq!(counts.total(), 2);
//! ```

pub mod config;

pub use scan_apportion as apportion;
pub use scan_core::utils;
pub use scan_density as density;
pub use scan_histogram as histogram;

pub use config::ReductionConfig;
pub use scan_core::{Error, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::ReductionConfig;
    pub use crate::{Error, Result};

    pub use scan_histogram::{bin, bin_center, BinnerConfig, FixedRangeBinner, Histogram};

    pub use scan_density::{
        build_dynamic_kde, Bandwidth, Bounds, DensityCurve, DynamicKde, DynamicKdeResult,
    };

    pub use scan_apportion::{
        apportion, apportion_all, Apportioned, CategoryTally, ConfidenceLevel, DeficitPolicy,
        RawTally, TallyAccumulator,
    };
}
