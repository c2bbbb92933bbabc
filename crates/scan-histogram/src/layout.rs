//! Bucket layout: validation, value routing, labels and bin centres
//!
//! A layout over `[min, max)` with bin size `b` has `N = ceil((max - min) / b)`
//! main bins plus two sentinels:
//!
//! | index   | range                                   |
//! |---------|-----------------------------------------|
//! | `0`     | `value < min` (underflow)               |
//! | `1..=N` | `[min + (i - 1) * b, min + i * b)`      |
//! | `N + 1` | `value >= max` (overflow)               |

use num_traits::ToPrimitive;
use scan_core::{Error, Result};
use serde::Serialize;

/// Hard ceiling on the number of main bins a layout may allocate
pub const MAX_MAIN_BINS: usize = 50_000;

/// Validated geometry of a fixed-range histogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinLayout {
    min: f64,
    max: f64,
    bin_size: f64,
    main_bins: usize,
}

impl BinLayout {
    /// Validate the configuration and compute the main bin count
    ///
    /// Fails fast, in this order, on: a non-finite or non-positive
    /// `bin_size`, a non-finite `min` or `max`, `max <= min`, and a main bin
    /// count above [`MAX_MAIN_BINS`].
    pub fn new(bin_size: f64, min: f64, max: f64) -> Result<Self> {
        if !bin_size.is_finite() || bin_size <= 0.0 {
            return Err(Error::InvalidBinSize(bin_size));
        }
        if !min.is_finite() {
            return Err(Error::non_finite("min", min));
        }
        if !max.is_finite() {
            return Err(Error::non_finite("max", max));
        }
        if max <= min {
            return Err(Error::EmptyRange { min, max });
        }

        let requested = ((max - min) / bin_size).ceil();
        let too_many = Error::TooManyBins {
            requested,
            limit: MAX_MAIN_BINS,
        };
        if !requested.is_finite() || requested > MAX_MAIN_BINS as f64 {
            return Err(too_many);
        }
        // A range that underflows to zero bins still gets one.
        let main_bins = requested.to_usize().ok_or(too_many)?.max(1);

        Ok(Self {
            min,
            max,
            bin_size,
            main_bins,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }

    /// Number of main (non-sentinel) bins
    pub fn main_bins(&self) -> usize {
        self.main_bins
    }

    /// Number of buckets including both sentinels
    pub fn total_buckets(&self) -> usize {
        self.main_bins + 2
    }

    /// Index of the overflow bucket
    pub fn overflow_index(&self) -> usize {
        self.main_bins + 1
    }

    /// Route a single value to its bucket index
    ///
    /// Returns `None` for NaN and infinities; those are never counted.
    #[inline]
    pub fn bucket_for(&self, value: f64) -> Option<usize> {
        if !value.is_finite() {
            return None;
        }
        if value < self.min {
            return Some(0);
        }
        if value >= self.max {
            return Some(self.overflow_index());
        }
        // Rounding can push a value just below max onto index N.
        let offset = ((value - self.min) / self.bin_size)
            .floor()
            .to_usize()
            .unwrap_or(0);
        Some((offset + 1).min(self.main_bins))
    }

    /// Left edge of main bin `i` (1-based)
    pub fn bin_start(&self, i: usize) -> f64 {
        self.min + (i - 1) as f64 * self.bin_size
    }

    /// Right edge of main bin `i` (1-based)
    pub fn bin_end(&self, i: usize) -> f64 {
        self.min + i as f64 * self.bin_size
    }

    /// Label for a bucket, with every endpoint printed to `decimal_places`
    pub fn label(&self, bucket: usize, decimal_places: usize) -> String {
        if bucket == 0 {
            format!("< {:.*}", decimal_places, self.min)
        } else if bucket >= self.overflow_index() {
            format!(">= {:.*}", decimal_places, self.max)
        } else {
            format!(
                "{:.*}-{:.*}",
                decimal_places,
                self.bin_start(bucket),
                decimal_places,
                self.bin_end(bucket)
            )
        }
    }

    /// Representative x position of a bucket; see [`bin_center`]
    pub fn center(&self, bucket: usize) -> f64 {
        bin_center(
            bucket,
            self.min,
            self.max,
            self.bin_size,
            false,
            self.total_buckets(),
        )
    }
}

/// Representative x position for a bucket of a returned histogram
///
/// `index` and `total_buckets` refer to the buckets as returned, so when the
/// underflow bucket was hidden both are shifted back by one before the
/// bucket kind is decided. Underflow maps to `min - bin_size / 2`, overflow
/// (and any index past it) to `max + bin_size / 2`, and main bin `i` to the
/// midpoint of `[min + (i - 1) * bin_size, min + i * bin_size)`.
pub fn bin_center(
    index: usize,
    min: f64,
    max: f64,
    bin_size: f64,
    hide_underflow: bool,
    total_buckets: usize,
) -> f64 {
    let shift = usize::from(hide_underflow);
    let true_index = index + shift;
    let true_total = total_buckets + shift;
    let half = bin_size / 2.0;

    if true_index == 0 {
        min - half
    } else if true_index + 1 >= true_total {
        max + half
    } else {
        min + (true_index - 1) as f64 * bin_size + half
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_layout_counts_partial_last_bin() {
        let layout = BinLayout::new(3.0, 0.0, 10.0).unwrap();
        assert_eq!(layout.main_bins(), 4);
        assert_eq!(layout.total_buckets(), 6);
        assert_eq!(layout.overflow_index(), 5);
    }

    #[test]
    fn test_layout_rejects_bad_config() {
        assert!(matches!(
            BinLayout::new(0.0, 0.0, 10.0),
            Err(Error::InvalidBinSize(_))
        ));
        assert!(matches!(
            BinLayout::new(-1.0, 0.0, 10.0),
            Err(Error::InvalidBinSize(_))
        ));
        assert!(matches!(
            BinLayout::new(f64::NAN, 0.0, 10.0),
            Err(Error::InvalidBinSize(_))
        ));
        assert!(matches!(
            BinLayout::new(1.0, f64::NEG_INFINITY, 10.0),
            Err(Error::NonFiniteBound { name: "min", .. })
        ));
        assert!(matches!(
            BinLayout::new(1.0, 0.0, f64::NAN),
            Err(Error::NonFiniteBound { name: "max", .. })
        ));
        assert!(matches!(
            BinLayout::new(1.0, 10.0, 0.0),
            Err(Error::EmptyRange { .. })
        ));
        assert!(matches!(
            BinLayout::new(1.0, 5.0, 5.0),
            Err(Error::EmptyRange { .. })
        ));
        assert!(matches!(
            BinLayout::new(1e-9, 0.0, 10.0),
            Err(Error::TooManyBins { limit: MAX_MAIN_BINS, .. })
        ));
        assert!(matches!(
            BinLayout::new(f64::MIN_POSITIVE, -1e300, 1e300),
            Err(Error::TooManyBins { .. })
        ));
    }

    #[test]
    fn test_layout_accepts_ceiling_exactly() {
        let layout = BinLayout::new(1.0, 0.0, MAX_MAIN_BINS as f64).unwrap();
        assert_eq!(layout.main_bins(), MAX_MAIN_BINS);
        assert!(BinLayout::new(1.0, 0.0, MAX_MAIN_BINS as f64 + 1.0).is_err());
    }

    #[test]
    fn test_bucket_for_boundaries() {
        let layout = BinLayout::new(2.0, 0.0, 10.0).unwrap();
        assert_eq!(layout.bucket_for(-0.001), Some(0));
        assert_eq!(layout.bucket_for(0.0), Some(1));
        assert_eq!(layout.bucket_for(1.999), Some(1));
        assert_eq!(layout.bucket_for(2.0), Some(2));
        assert_eq!(layout.bucket_for(9.999), Some(5));
        assert_eq!(layout.bucket_for(10.0), Some(6));
        assert_eq!(layout.bucket_for(1e12), Some(6));
        assert_eq!(layout.bucket_for(f64::NAN), None);
        assert_eq!(layout.bucket_for(f64::INFINITY), None);
        assert_eq!(layout.bucket_for(f64::NEG_INFINITY), None);
    }

    #[test]
    fn test_bucket_for_value_just_below_max() {
        let layout = BinLayout::new(0.1, 0.0, 0.3).unwrap();
        let below = f64::from_bits(0.3_f64.to_bits() - 1);
        assert_eq!(layout.bucket_for(below), Some(layout.main_bins()));
    }

    #[test]
    fn test_labels() {
        let layout = BinLayout::new(2.5, 0.0, 10.0).unwrap();
        assert_eq!(layout.label(0, 1), "< 0.0");
        assert_eq!(layout.label(1, 1), "0.0-2.5");
        assert_eq!(layout.label(4, 1), "7.5-10.0");
        assert_eq!(layout.label(5, 1), ">= 10.0");

        let layout = BinLayout::new(5.0, 0.0, 20.0).unwrap();
        assert_eq!(layout.label(0, 0), "< 0");
        assert_eq!(layout.label(2, 0), "5-10");
        assert_eq!(layout.label(5, 0), ">= 20");
    }

    #[test]
    fn test_bin_center_sentinels_and_main_bins() {
        let (min, max, size) = (0.0, 10.0, 2.0);
        let total = 7;
        assert_relative_eq!(bin_center(0, min, max, size, false, total), -1.0);
        assert_relative_eq!(bin_center(1, min, max, size, false, total), 1.0);
        assert_relative_eq!(bin_center(5, min, max, size, false, total), 9.0);
        assert_relative_eq!(bin_center(6, min, max, size, false, total), 11.0);
    }

    #[test]
    fn test_bin_center_with_hidden_underflow() {
        let (min, max, size) = (0.0, 10.0, 2.0);
        // Returned histogram has 6 buckets: main bins 1..=5 then overflow.
        let total = 6;
        assert_relative_eq!(bin_center(0, min, max, size, true, total), 1.0);
        assert_relative_eq!(bin_center(4, min, max, size, true, total), 9.0);
        assert_relative_eq!(bin_center(5, min, max, size, true, total), 11.0);
    }

    #[test]
    fn test_layout_center_matches_free_function() {
        let layout = BinLayout::new(0.5, 1.0, 3.0).unwrap();
        for i in 0..layout.total_buckets() {
            assert_eq!(
                layout.center(i),
                bin_center(i, 1.0, 3.0, 0.5, false, layout.total_buckets())
            );
        }
    }
}
