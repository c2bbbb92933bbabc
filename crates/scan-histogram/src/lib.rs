//! Fixed-range histogram binning for measurement series
//!
//! Turns a raw measurement array (durations, areas, lengths, lighting values)
//! into a small labelled bucket set a chart builder can render directly.
//! The range is fixed by the caller rather than derived from the data, with
//! explicit sentinel buckets for values below `min` and at or above `max`.
//!
//! # Key Features
//!
//! - **Fixed geometry**: `ceil((max - min) / bin_size)` main bins plus underflow/overflow
//! - **Fail-fast validation**: bad bin size, non-finite or empty range, and
//!   pathological bin counts are distinct errors
//! - **Lenient data**: NaN and infinities are silently dropped
//! - **Bin centres**: [`bin_center`] maps a returned bucket index back to an x position
//!
//! # Examples
//!
//! ```rust
//! use scan_histogram::{bin_center, BinnerConfig};
//!
//! let durations = vec![12.0, 47.5, 63.0, 65.2, 130.0, -1.0];
//! let binner = BinnerConfig::new(30.0, 0.0, 120.0)
//!     .hide_underflow(true)
//!     .build()
//!     .unwrap();
//! let histogram = binner.bin(&durations);
//!
//! assert_eq!(histogram.labels(), vec!["0-30", "30-60", "60-90", "90-120", ">= 120"]);
//! assert_eq!(histogram.counts(), vec![1, 1, 2, 0, 1]);
//!
//! let x = bin_center(0, 0.0, 120.0, 30.0, true, histogram.len());
//! assert_eq!(x, 15.0);
//! ```

pub mod binner;
pub mod layout;
pub mod types;

pub use binner::{bin, BinnerConfig, FixedRangeBinner};
pub use layout::{bin_center, BinLayout, MAX_MAIN_BINS};
pub use types::{Bucket, Histogram};

pub use scan_core::{Error, Result};
