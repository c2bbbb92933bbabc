//! Confidence levels and per-level count tuples

use std::fmt;
use std::str::FromStr;

use scan_core::Error;
use serde::{Deserialize, Serialize};

/// Detection confidence bucket, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// All levels in fixed `(high, medium, low)` order
    pub const ALL: [ConfidenceLevel; 3] = [Self::High, Self::Medium, Self::Low];

    /// Position in [`ConfidenceLevel::ALL`]
    pub fn index(self) -> usize {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(Error::InvalidInput(format!(
                "unknown confidence level '{other}'"
            ))),
        }
    }
}

/// Raw detection counts per confidence level
///
/// One artifact may contribute several detections, so the total can exceed
/// the number of artifacts that contain the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawTally {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl RawTally {
    pub fn new(high: u64, medium: u64, low: u64) -> Self {
        Self { high, medium, low }
    }

    /// Sum of all detections (saturating)
    pub fn total(&self) -> u64 {
        self.high.saturating_add(self.medium).saturating_add(self.low)
    }

    pub fn get(&self, level: ConfidenceLevel) -> u64 {
        self.as_array()[level.index()]
    }

    /// Count one more detection at `level`
    pub fn add(&mut self, level: ConfidenceLevel) {
        let slot = match level {
            ConfidenceLevel::High => &mut self.high,
            ConfidenceLevel::Medium => &mut self.medium,
            ConfidenceLevel::Low => &mut self.low,
        };
        *slot = slot.saturating_add(1);
    }

    /// Counts in `(high, medium, low)` order
    pub fn as_array(&self) -> [u64; 3] {
        [self.high, self.medium, self.low]
    }
}

impl From<(u64, u64, u64)> for RawTally {
    fn from((high, medium, low): (u64, u64, u64)) -> Self {
        Self::new(high, medium, low)
    }
}

/// Whole-number artifact counts per confidence level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Apportioned {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl Apportioned {
    pub const ZERO: Apportioned = Apportioned {
        high: 0,
        medium: 0,
        low: 0,
    };

    /// Sum of all levels, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.high.saturating_add(self.medium).saturating_add(self.low)
    }

    pub fn get(&self, level: ConfidenceLevel) -> u64 {
        match level {
            ConfidenceLevel::High => self.high,
            ConfidenceLevel::Medium => self.medium,
            ConfidenceLevel::Low => self.low,
        }
    }

    pub(crate) fn from_array([high, medium, low]: [u64; 3]) -> Self {
        Self { high, medium, low }
    }
}

impl From<Apportioned> for (u64, u64, u64) {
    fn from(a: Apportioned) -> Self {
        (a.high, a.medium, a.low)
    }
}

impl fmt::Display for Apportioned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(high={}, medium={}, low={})", self.high, self.medium, self.low)
    }
}
