//! Aggregated configuration for a report build
//!
//! One JSON document configures every reduction unit: the density engine,
//! the apportionment policy, and named histogram presets for each
//! measurement the report charts.

use std::collections::BTreeMap;
use std::path::Path;

use scan_apportion::ApportionConfig;
use scan_core::{Error, Result};
use scan_density::{DynamicKde, KdeConfig};
use scan_histogram::{BinnerConfig, FixedRangeBinner};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Settings for all reduction units
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionConfig {
    pub kde: KdeConfig,
    pub apportion: ApportionConfig,
    /// Histogram geometry keyed by measurement name
    pub histograms: BTreeMap<String, BinnerConfig>,
}

impl ReductionConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading reduction config");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check every section, naming the histogram preset that fails
    pub fn validate(&self) -> Result<()> {
        self.kde.validate()?;
        for (name, preset) in &self.histograms {
            preset.build().map_err(|e| {
                Error::InvalidParameter(format!("histogram preset '{name}': {e}"))
            })?;
        }
        Ok(())
    }

    /// Density engine configured from the `kde` section
    pub fn density_engine(&self) -> Result<DynamicKde> {
        DynamicKde::from_config(self.kde.clone())
    }

    /// Binner for a named histogram preset
    pub fn binner(&self, name: &str) -> Result<FixedRangeBinner> {
        self.histograms
            .get(name)
            .ok_or_else(|| Error::InvalidParameter(format!("no histogram preset named '{name}'")))?
            .build()
    }
}
