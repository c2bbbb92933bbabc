//! Largest-remainder (Hare-Niemeyer) apportionment
//!
//! Redistributes a raw detection tally over the known number of artifacts
//! containing a category:
//!
//! 1. `scale = artifact_count / total_detections`
//! 2. each level gets `floor(raw * scale)`
//! 3. the remaining `deficit` units go one each to the levels with the
//!    largest fractional remainder, ties broken in `(high, medium, low)`
//!    order by a stable sort
//!
//! The result sums to `artifact_count` whenever there is anything to
//! apportion.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Apportioned, RawTally};

/// What to do when the floored parts already exceed the artifact count
///
/// Mathematically the floors can never overshoot, but floating-point
/// scaling can round a part up onto the next integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeficitPolicy {
    /// Take units back from the smallest-remainder levels until the sum is exact
    #[default]
    Exact,
    /// Keep the floored parts as they are
    Lenient,
}

/// Apportionment settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApportionConfig {
    pub deficit_policy: DeficitPolicy,
}

impl ApportionConfig {
    pub fn apportion(&self, raw: RawTally, artifact_count: u64) -> Apportioned {
        apportion_with(raw, artifact_count, self.deficit_policy)
    }
}

/// Apportion with the default [`DeficitPolicy::Exact`]
///
/// # Examples
///
/// ```rust
/// use scan_apportion::{apportion, RawTally};
///
/// // Three detections over two artifacts: scale 2/3 gives (1.33, 0.67, 0),
/// // floors (1, 0, 0), and the spare unit goes to the larger remainder.
/// let counts = apportion(RawTally::new(2, 1, 0), 2);
/// assert_eq!((counts.high, counts.medium, counts.low), (1, 1, 0));
/// ```
pub fn apportion(raw: RawTally, artifact_count: u64) -> Apportioned {
    apportion_with(raw, artifact_count, DeficitPolicy::default())
}

/// Apportion `raw` detections over `artifact_count` artifacts
///
/// Returns all zeros when there are no detections. Never panics.
pub fn apportion_with(raw: RawTally, artifact_count: u64, policy: DeficitPolicy) -> Apportioned {
    let total = raw.total();
    if total == 0 {
        return Apportioned::ZERO;
    }

    let scale = artifact_count as f64 / total as f64;
    let scaled = raw.as_array().map(|r| r as f64 * scale);
    let floors = scaled.map(f64::floor);
    let remainders = [
        scaled[0] - floors[0],
        scaled[1] - floors[1],
        scaled[2] - floors[2],
    ];
    // Float casts saturate at u64::MAX, which i128 holds with room to sum.
    let parts = floors.map(|f| i128::from(f as u64));

    settle(parts, remainders, i128::from(artifact_count), policy)
}

/// Distribute `target - sum(parts)` units according to `remainders`
///
/// `parts` and `target` must lie in `0..=u64::MAX`.
pub(crate) fn settle(
    mut parts: [i128; 3],
    remainders: [f64; 3],
    target: i128,
    policy: DeficitPolicy,
) -> Apportioned {
    let deficit = target - parts.iter().sum::<i128>();

    if deficit > 0 {
        // A level with neither a part nor a remainder had no detections.
        let mut ranking: Vec<usize> = rank_by_remainder(&remainders, true)
            .into_iter()
            .filter(|&idx| parts[idx] > 0 || remainders[idx] > 0.0)
            .collect();
        if ranking.is_empty() {
            ranking = vec![0, 1, 2];
        }
        // Only float error can make deficit exceed the level count; spread
        // whole rounds evenly, then hand out the rest by rank.
        let levels = ranking.len() as i128;
        let (rounds, rest) = (deficit / levels, deficit % levels);
        for (rank, &idx) in ranking.iter().enumerate() {
            parts[idx] += rounds + i128::from((rank as i128) < rest);
        }
    } else if deficit < 0 {
        debug!(%deficit, ?policy, "floored parts exceed artifact count");
        if policy == DeficitPolicy::Exact {
            let ranking = rank_by_remainder(&remainders, false);
            let mut excess = -deficit;
            while excess > 0 {
                let holders: Vec<usize> =
                    ranking.iter().copied().filter(|&idx| parts[idx] > 0).collect();
                if holders.is_empty() {
                    break;
                }
                // Take whole rounds from every holder, then single units by rank.
                let smallest = holders.iter().map(|&idx| parts[idx]).min().unwrap_or(0);
                let rounds = (excess / holders.len() as i128).min(smallest);
                if rounds > 0 {
                    for &idx in &holders {
                        parts[idx] -= rounds;
                    }
                    excess -= rounds * holders.len() as i128;
                } else {
                    for &idx in &holders {
                        if excess > 0 {
                            parts[idx] -= 1;
                            excess -= 1;
                        }
                    }
                }
            }
        }
    }

    Apportioned::from_array(parts.map(|p| u64::try_from(p.max(0)).unwrap_or(u64::MAX)))
}

/// Level indices ordered by remainder
///
/// `slice::sort_by_key` is stable, so equal remainders keep the fixed
/// `(high, medium, low)` order in both directions.
fn rank_by_remainder(remainders: &[f64; 3], descending: bool) -> [usize; 3] {
    let mut ranking = [0, 1, 2];
    if descending {
        ranking.sort_by_key(|&i| Reverse(OrderedFloat(remainders[i])));
    } else {
        ranking.sort_by_key(|&i| OrderedFloat(remainders[i]));
    }
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(a: Apportioned) -> (u64, u64, u64) {
        a.into()
    }

    #[test]
    fn test_worked_example() {
        assert_eq!(tuple(apportion(RawTally::new(2, 1, 0), 2)), (1, 1, 0));
    }

    #[test]
    fn test_nothing_to_apportion() {
        assert_eq!(apportion(RawTally::new(0, 0, 0), 5), Apportioned::ZERO);
        assert_eq!(apportion(RawTally::new(0, 0, 0), 0), Apportioned::ZERO);
    }

    #[test]
    fn test_more_detections_than_artifacts() {
        let counts = apportion(RawTally::new(10, 5, 3), 1);
        assert_eq!(counts.total(), 1);
        assert_eq!(tuple(counts), (1, 0, 0));
    }

    #[test]
    fn test_zero_artifacts() {
        assert_eq!(apportion(RawTally::new(4, 2, 1), 0), Apportioned::ZERO);
    }

    #[test]
    fn test_exact_scale_has_no_remainders() {
        assert_eq!(tuple(apportion(RawTally::new(4, 2, 2), 4)), (2, 1, 1));
        assert_eq!(tuple(apportion(RawTally::new(3, 0, 1), 4)), (3, 0, 1));
    }

    #[test]
    fn test_tie_break_order() {
        // Equal remainders everywhere: high first, then medium.
        assert_eq!(tuple(apportion(RawTally::new(1, 1, 1), 2)), (1, 1, 0));
        assert_eq!(tuple(apportion(RawTally::new(1, 1, 1), 1)), (1, 0, 0));
        // Medium and low tie, high has no remainder.
        assert_eq!(tuple(apportion(RawTally::new(0, 1, 1), 1)), (0, 1, 0));

        for _ in 0..10 {
            assert_eq!(tuple(apportion(RawTally::new(1, 1, 1), 2)), (1, 1, 0));
        }
    }

    #[test]
    fn test_rank_is_stable() {
        assert_eq!(rank_by_remainder(&[0.5, 0.5, 0.5], true), [0, 1, 2]);
        assert_eq!(rank_by_remainder(&[0.5, 0.5, 0.5], false), [0, 1, 2]);
        assert_eq!(rank_by_remainder(&[0.1, 0.7, 0.7], true), [1, 2, 0]);
        assert_eq!(rank_by_remainder(&[0.1, 0.0, 0.5], false), [1, 0, 2]);
    }

    #[test]
    fn test_negative_deficit_exact() {
        let settled = settle([2, 1, 1], [0.1, 0.0, 0.5], 3, DeficitPolicy::Exact);
        assert_eq!(tuple(settled), (2, 0, 1));

        // Smallest remainder is already zero: skip it and keep taking.
        let settled = settle([1, 0, 3], [0.2, 0.0, 0.9], 2, DeficitPolicy::Exact);
        assert_eq!(tuple(settled), (0, 0, 2));
    }

    #[test]
    fn test_negative_deficit_lenient() {
        let settled = settle([2, 1, 1], [0.1, 0.0, 0.5], 3, DeficitPolicy::Lenient);
        assert_eq!(tuple(settled), (2, 1, 1));
    }

    #[test]
    fn test_oversized_deficit_cycles() {
        let settled = settle([0, 0, 0], [0.9, 0.5, 0.1], 4, DeficitPolicy::Exact);
        assert_eq!(tuple(settled), (2, 1, 1));
    }

    #[test]
    fn test_huge_artifact_count_sums_exactly() {
        let counts = apportion(RawTally::new(1, 1, 0), u64::MAX);
        assert_eq!(counts.total(), u64::MAX);
        assert_eq!(counts.low, 0);
        assert!(counts.high.abs_diff(counts.medium) <= 1);

        let counts = apportion(RawTally::new(u64::MAX, u64::MAX, 1), u64::MAX);
        assert_eq!(counts.total(), u64::MAX);

        let counts = apportion(RawTally::new(3, 3, 1), 1 << 62);
        assert_eq!(counts.total(), 1 << 62);

        let counts = apportion_with(RawTally::new(5, 0, 2), u64::MAX, DeficitPolicy::Lenient);
        assert_eq!(counts.medium, 0);
        assert!(counts.high > counts.low);
    }

    #[test]
    fn test_large_deficit_skips_levels_without_detections() {
        let settled = settle([0, 0, 0], [0.6, 0.0, 0.2], 1_001, DeficitPolicy::Exact);
        assert_eq!(tuple(settled), (501, 0, 500));
    }

    #[test]
    fn test_large_float_deficits_settle_exactly() {
        let settled = settle([0, 0, 0], [0.9, 0.5, 0.1], 3_000_001, DeficitPolicy::Exact);
        assert_eq!(tuple(settled), (1_000_001, 1_000_000, 1_000_000));

        let settled = settle([5_000, 1, 7_000], [0.3, 0.2, 0.1], 2_000, DeficitPolicy::Exact);
        assert_eq!(settled.total(), 2_000);
        assert_eq!(settled.medium, 0);
    }

    #[test]
    fn test_config_apportion() {
        let config = ApportionConfig::default();
        assert_eq!(config.deficit_policy, DeficitPolicy::Exact);
        assert_eq!(tuple(config.apportion(RawTally::new(2, 1, 0), 2)), (1, 1, 0));
    }
}
