//! Core error type and shared helpers for the scan-reduce crates
//!
//! Every reduction unit in this workspace is a pure function over an
//! in-memory measurement slice. This crate holds what they share: the
//! [`Error`] type that configuration failures are reported through, and the
//! small set of descriptive statistics the units build on.
//!
//! # Example
//!
//! ```rust
//! use scan_core::utils::{finite_values, std_dev};
//!
//! let raw = vec![3.1, f64::NAN, 2.9, 3.4, f64::INFINITY];
//! let clean = finite_values(&raw);
//! assert_eq!(clean.len(), 3);
//! assert!(std_dev(&clean) > 0.0);
//! ```

pub mod error;
pub mod utils;

pub use error::{Error, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
