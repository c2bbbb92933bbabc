//! Largest-remainder apportionment of confidence detections
//!
//! A category (door, window, sofa...) can be detected several times per
//! artifact at different confidence levels, so raw tallies count detections
//! rather than artifacts. Stacked-bar charts need the opposite: out of the
//! known number of artifacts containing the category, how many are best
//! represented at each level, summing exactly to that number.
//!
//! This crate applies the Hare-Niemeyer largest-remainder method to each
//! category's `(high, medium, low)` tally.
//!
//! # Examples
//!
//! ```rust
//! use scan_apportion::{apportion_all, ConfidenceLevel, DeficitPolicy, TallyAccumulator};
//!
//! let mut acc = TallyAccumulator::new();
//! acc.record_artifact(
//!     "scan-01",
//!     [("door", ConfidenceLevel::High), ("door", ConfidenceLevel::Low)],
//! );
//! acc.record_artifact("scan-02", [("door", ConfidenceLevel::Medium)]);
//!
//! let counts = apportion_all(&acc.finish(), DeficitPolicy::Exact);
//! assert_eq!(counts["door"].total(), 2);
//! ```

pub mod accumulator;
pub mod apportion;
pub mod types;

pub use accumulator::{apportion_all, CategoryTally, TallyAccumulator};
pub use apportion::{apportion, apportion_with, ApportionConfig, DeficitPolicy};
pub use types::{Apportioned, ConfidenceLevel, RawTally};

pub use scan_core::{Error, Result};
