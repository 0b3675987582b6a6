//! Configuration for the extraction and reconciliation pipeline.
//!
//! All detection and matching thresholds live here. The defaults were chosen
//! empirically against a small invoice corpus; treat them as tunable, not
//! validated constants.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{KonteraError, Result};

/// Main configuration for the kontera pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KonteraConfig {
    /// Supplier detection configuration.
    pub detection: DetectionConfig,

    /// Cost-bearer matching configuration.
    pub matching: MatchingConfig,

    /// Reconciliation configuration.
    pub reconciliation: ReconciliationConfig,
}

/// Supplier detection scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Weight of the identification-pattern score.
    pub pattern_weight: f64,

    /// Weight of the stored-signature similarity score.
    pub signature_weight: f64,

    /// Minimum combined score to accept a supplier.
    pub confidence_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            pattern_weight: 0.7,
            signature_weight: 0.3,
            confidence_threshold: 0.25,
        }
    }
}

/// Cost-bearer name matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum similarity ratio (0.0 - 1.0) to accept a registry candidate.
    pub acceptance_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self { acceptance_threshold: 0.85 }
    }
}

/// Financial reconciliation and confidence scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Tolerance for amount comparisons, in currency units.
    pub epsilon: Decimal,

    /// Confidence weight of the line-sum check.
    pub line_sum_weight: f64,

    /// Confidence weight of the matched-sum check.
    pub matched_sum_weight: f64,

    /// Confidence weight of the match-rate check.
    pub match_rate_weight: f64,

    /// Minimum share of matched lines for the match-rate check to pass.
    pub match_rate_floor: f64,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            epsilon: Decimal::new(1, 2), // 0.01
            line_sum_weight: 0.3,
            matched_sum_weight: 0.3,
            match_rate_weight: 0.4,
            match_rate_floor: 0.8,
        }
    }
}

impl KonteraConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| KonteraError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that thresholds and weights are usable. Invalid configuration
    /// fails fast at startup, never per document.
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f64| -> Result<()> {
            if !(0.0..=1.0).contains(&value) {
                return Err(KonteraError::Config(format!("{} must be in [0, 1], got {}", name, value)));
            }
            Ok(())
        };

        unit("detection.pattern_weight", self.detection.pattern_weight)?;
        unit("detection.signature_weight", self.detection.signature_weight)?;
        unit("detection.confidence_threshold", self.detection.confidence_threshold)?;
        unit("matching.acceptance_threshold", self.matching.acceptance_threshold)?;
        unit("reconciliation.line_sum_weight", self.reconciliation.line_sum_weight)?;
        unit("reconciliation.matched_sum_weight", self.reconciliation.matched_sum_weight)?;
        unit("reconciliation.match_rate_weight", self.reconciliation.match_rate_weight)?;
        unit("reconciliation.match_rate_floor", self.reconciliation.match_rate_floor)?;

        if self.reconciliation.epsilon < Decimal::ZERO {
            return Err(KonteraError::Config("reconciliation.epsilon must be non-negative".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(KonteraConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_thresholds() {
        let config = KonteraConfig::default();
        assert_eq!(config.detection.pattern_weight, 0.7);
        assert_eq!(config.detection.signature_weight, 0.3);
        assert_eq!(config.detection.confidence_threshold, 0.25);
        assert_eq!(config.matching.acceptance_threshold, 0.85);
        assert_eq!(config.reconciliation.match_rate_floor, 0.8);
        assert_eq!(config.reconciliation.epsilon, Decimal::new(1, 2));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let mut config = KonteraConfig::default();
        config.matching.acceptance_threshold = 1.5;
        assert!(matches!(config.validate(), Err(KonteraError::Config(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: KonteraConfig =
            serde_json::from_str(r#"{"matching": {"acceptance_threshold": 0.7}}"#).unwrap();
        assert_eq!(config.matching.acceptance_threshold, 0.7);
        assert_eq!(config.detection.confidence_threshold, 0.25);
    }
}
