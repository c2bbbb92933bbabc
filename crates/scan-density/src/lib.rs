//! Kernel density curves with a self-selected x-axis window
//!
//! Density charts for room measurements (areas, wall lengths, lighting
//! values) need an x-axis window that fits the data, but callers only know a
//! plausible physical range. This crate fits a Gaussian KDE and picks the
//! window from where the density actually has support, refining it at most
//! once.
//!
//! # Key Features
//!
//! - **Gaussian kernel** with Silverman, Scott or fixed bandwidth
//! - **Bounded window search**: never grows beyond a fixed multiple of the guess
//! - **One-step refinement**: a second selection pass, never a fixed-point loop
//! - **Total**: empty or non-finite input yields a zero series, not an error
//!
//! # Examples
//!
//! ```rust
//! use scan_density::{Bandwidth, DynamicKde};
//!
//! let room_areas = vec![11.5, 12.0, 14.2, 15.8, 16.1, 18.4, 22.0, 35.5];
//! let engine = DynamicKde::new()
//!     .resolution(128)
//!     .bandwidth(Bandwidth::Scott);
//! let result = engine.estimate(&room_areas, 0.0, 60.0);
//!
//! assert_eq!(result.series.len(), 128);
//! // Never wider than three guess widths around the guess.
//! assert!(result.bounds.min >= -60.0 && result.bounds.max <= 120.0);
//! ```

pub mod bounds;
pub mod dynamic;
pub mod kernel;
pub mod types;

pub use bounds::{select_bounds, BoundsSelector};
pub use dynamic::{build_dynamic_kde, DynamicKde, DynamicKdeResult, KdeConfig};
pub use kernel::{Bandwidth, GaussianKde};
pub use types::{Bounds, DensityCurve, DensityPoint};

pub use scan_core::{Error, Result};
