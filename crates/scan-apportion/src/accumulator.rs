//! Per-category detection accumulation across artifacts
//!
//! Apportionment is a reduction: it needs the complete raw tally and the
//! number of distinct artifacts for a category, so every artifact must be
//! recorded before [`TallyAccumulator::finish`] hands out the tallies.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::apportion::{apportion_with, DeficitPolicy};
use crate::types::{Apportioned, ConfidenceLevel, RawTally};

/// Complete tally for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryTally {
    /// Detections per confidence level
    pub raw: RawTally,
    /// Distinct artifacts containing at least one detection
    pub artifact_count: u64,
}

impl CategoryTally {
    pub fn apportion(&self, policy: DeficitPolicy) -> Apportioned {
        apportion_with(self.raw, self.artifact_count, policy)
    }
}

#[derive(Debug, Clone, Default)]
struct CategoryState {
    raw: RawTally,
    artifacts: BTreeSet<String>,
}

/// Collects detections from every artifact of a report
#[derive(Debug, Clone, Default)]
pub struct TallyAccumulator {
    categories: BTreeMap<String, CategoryState>,
}

impl TallyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one detection of `category` at `level` in `artifact_id`
    pub fn record(&mut self, artifact_id: &str, category: &str, level: ConfidenceLevel) {
        let state = self.categories.entry(category.to_owned()).or_default();
        state.raw.add(level);
        if !state.artifacts.contains(artifact_id) {
            state.artifacts.insert(artifact_id.to_owned());
        }
    }

    /// Record every detection of a single artifact
    pub fn record_artifact<I, S>(&mut self, artifact_id: &str, detections: I)
    where
        I: IntoIterator<Item = (S, ConfidenceLevel)>,
        S: AsRef<str>,
    {
        for (category, level) in detections {
            self.record(artifact_id, category.as_ref(), level);
        }
    }

    /// Categories seen so far, in sorted order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Close the accumulation pass
    pub fn finish(self) -> BTreeMap<String, CategoryTally> {
        self.categories
            .into_iter()
            .map(|(category, state)| {
                let tally = CategoryTally {
                    raw: state.raw,
                    artifact_count: state.artifacts.len() as u64,
                };
                (category, tally)
            })
            .collect()
    }
}

/// Apportion every category of a finished accumulation
///
/// Categories are independent; with the `parallel` feature they are
/// processed on the rayon pool.
#[instrument(skip(tallies), fields(categories = tallies.len()))]
pub fn apportion_all(
    tallies: &BTreeMap<String, CategoryTally>,
    policy: DeficitPolicy,
) -> BTreeMap<String, Apportioned> {
    #[cfg(feature = "parallel")]
    let result: BTreeMap<String, Apportioned> = {
        use rayon::prelude::*;
        tallies
            .par_iter()
            .map(|(category, tally)| (category.clone(), tally.apportion(policy)))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let result: BTreeMap<String, Apportioned> = tallies
        .iter()
        .map(|(category, tally)| (category.clone(), tally.apportion(policy)))
        .collect();

    debug!(categories = result.len(), "apportioned confidence tallies");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConfidenceLevel::*;

    #[test]
    fn test_accumulates_distinct_artifacts() {
        let mut acc = TallyAccumulator::new();
        acc.record_artifact("scan-1", [("door", High), ("door", Medium), ("window", Low)]);
        acc.record_artifact("scan-2", [("door", High)]);
        acc.record("scan-3", "window", High);

        assert_eq!(acc.categories().collect::<Vec<_>>(), vec!["door", "window"]);

        let tallies = acc.finish();
        assert_eq!(
            tallies["door"],
            CategoryTally {
                raw: RawTally::new(2, 1, 0),
                artifact_count: 2,
            }
        );
        assert_eq!(
            tallies["window"],
            CategoryTally {
                raw: RawTally::new(1, 0, 1),
                artifact_count: 2,
            }
        );
    }

    #[test]
    fn test_apportion_all_sums_to_artifact_counts() {
        let mut acc = TallyAccumulator::new();
        acc.record_artifact("a", [("wall", High), ("wall", High), ("wall", Low)]);
        acc.record_artifact("b", [("wall", Medium), ("sofa", Low)]);
        acc.record_artifact("c", [("wall", High), ("sofa", Low), ("sofa", Medium)]);

        let tallies = acc.finish();
        let result = apportion_all(&tallies, DeficitPolicy::Exact);

        assert_eq!(result.len(), 2);
        for (category, counts) in &result {
            assert_eq!(counts.total(), tallies[category].artifact_count, "{category}");
        }
        // wall: raw (3, 1, 1) over 3 artifacts -> (1.8, 0.6, 0.6)
        assert_eq!(result["wall"], Apportioned { high: 2, medium: 1, low: 0 });
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = TallyAccumulator::new();
        assert!(acc.is_empty());
        assert!(apportion_all(&acc.finish(), DeficitPolicy::Exact).is_empty());
    }
}
