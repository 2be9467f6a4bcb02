//! Run configuration for VaR reports.

use crate::{ConfidenceLevel, Result, VarError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a VaR report.
///
/// ```toml
/// confidence_levels = [0.95, 0.99]
/// expected_shortfall = true
/// columns = ["strategy_a", "strategy_b"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Confidence levels to report, in order (default: 0.95 and 0.99)
    #[serde(default = "default_confidence_levels")]
    pub confidence_levels: Vec<f64>,

    /// Report expected shortfall next to VaR (default: true)
    #[serde(default = "default_true")]
    pub expected_shortfall: bool,

    /// Columns to evaluate; every numeric column when unset
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

fn default_confidence_levels() -> Vec<f64> {
    vec![ConfidenceLevel::P95.value(), ConfidenceLevel::P99.value()]
}

const fn default_true() -> bool {
    true
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            confidence_levels: default_confidence_levels(),
            expected_shortfall: true,
            columns: None,
        }
    }
}

impl RiskConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`VarError::Config`] for malformed TOML and
    /// [`VarError::InvalidConfidenceLevel`] for a level outside `(0, 1)`.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| VarError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded risk config");
        Self::from_toml_str(&content)
    }

    /// Check that at least one level is configured and every level lies in `(0, 1)`.
    pub fn validate(&self) -> Result<()> {
        if self.confidence_levels.is_empty() {
            return Err(VarError::Config(
                "at least one confidence level is required".to_string(),
            ));
        }
        if self.columns.as_ref().is_some_and(Vec::is_empty) {
            return Err(VarError::Config(
                "column list must not be empty when given".to_string(),
            ));
        }
        for &level in &self.confidence_levels {
            ConfidenceLevel::new(level)?;
        }
        Ok(())
    }

    /// The configured levels as validated [`ConfidenceLevel`]s.
    pub fn levels(&self) -> Result<Vec<ConfidenceLevel>> {
        self.confidence_levels
            .iter()
            .map(|&level| ConfidenceLevel::new(level))
            .collect()
    }
}
