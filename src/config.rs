// Miner configuration
//
// Thresholds and the support-counting strategy, loadable from TOML:
//
//     min_support = 0.05
//     min_confidence = 0.6
//     support_counting = "index"

use crate::error::{check_threshold, MiningError, Result};
use crate::mining::SupportCounting;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for an Apriori mining run
///
/// # Example
/// ```
/// use apriori_miner::config::MinerConfig;
///
/// let config = MinerConfig::from_toml_str("min_support = 0.25").unwrap();
/// assert_eq!(config.min_support, 0.25);
/// assert_eq!(config.min_confidence, 0.5); // default
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MinerConfig {
    /// Minimum fraction of transactions an itemset must appear in
    ///
    /// Default: 0.1
    pub min_support: f64,

    /// Minimum confidence a rule must reach
    ///
    /// Default: 0.5
    pub min_confidence: f64,

    /// `scan` (default) or `index`; both give identical results
    pub support_counting: SupportCounting,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            min_support: 0.1,
            min_confidence: 0.5,
            support_counting: SupportCounting::Scan,
        }
    }
}

impl MinerConfig {
    /// Few, strong itemsets and rules
    pub fn strict() -> Self {
        Self {
            min_support: 0.2,
            min_confidence: 0.8,
            ..Self::default()
        }
    }

    /// Many weak itemsets and rules; pairs well with index counting
    pub fn permissive() -> Self {
        Self {
            min_support: 0.01,
            min_confidence: 0.1,
            support_counting: SupportCounting::Index,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_threshold("min_support", self.min_support)?;
        check_threshold("min_confidence", self.min_confidence)?;
        Ok(())
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: MinerConfig =
            toml::from_str(text).map_err(|e| MiningError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| MiningError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| MiningError::Config(e.to_string()))
    }
}
