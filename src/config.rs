//! Tunable tables for the validation and ranked engines.
//!
//! Defaults reproduce the shipped constants exactly. A JSON file can override
//! any subset; missing fields fall back to the defaults.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::stages::StageType;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub validation: ValidationConfig,
    pub ranked: RankedConfig,
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validation.weights.validate()?;
        let r = &self.ranked;
        if (r.accuracy_share + r.efficiency_share - 1.0).abs() > 1e-6 {
            return Err(ConfigError::Invalid(format!(
                "ranked accuracy/efficiency shares must sum to 1, got {}",
                r.accuracy_share + r.efficiency_share
            )));
        }
        if r.difficulty_weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(ConfigError::Invalid(
                "difficulty weights must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------
//  Validation
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubScoreWeights {
    pub speed: f64,
    pub pattern: f64,
    pub consistency: f64,
    pub attention: f64,
}

impl Default for SubScoreWeights {
    fn default() -> Self {
        Self {
            speed: 0.25,
            pattern: 0.30,
            consistency: 0.20,
            attention: 0.25,
        }
    }
}

impl SubScoreWeights {
    fn validate(&self) -> Result<(), ConfigError> {
        let parts = [self.speed, self.pattern, self.consistency, self.attention];
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Invalid(
                "validation weights must be non-negative".to_string(),
            ));
        }
        let sum: f64 = parts.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::Invalid(format!(
                "validation weights must sum to 1, got {sum}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Fastest plausible response per stage type, in ms.
    pub min_latency_ms: HashMap<StageType, u64>,
    /// Used for stage types missing from `min_latency_ms`.
    pub default_min_latency_ms: u64,
    pub weights: SubScoreWeights,
    /// `overall_score` must reach this for a session to be valid.
    pub validity_threshold: f64,
    /// Fraction of too-fast responses that raises a warning.
    pub speed_warning_rate: f64,
    /// Fraction of too-fast responses that raises a critical flag.
    pub speed_critical_rate: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let min_latency_ms = HashMap::from([
            (StageType::Intro, 0),
            (StageType::Matrix, 3000),
            (StageType::Scenario, 2000),
            (StageType::Bart, 200),
            (StageType::Personality, 1000),
            (StageType::Debug, 1000),
            (StageType::Outro, 0),
        ]);
        Self {
            min_latency_ms,
            default_min_latency_ms: 500,
            weights: SubScoreWeights::default(),
            validity_threshold: 60.0,
            speed_warning_rate: 0.2,
            speed_critical_rate: 0.5,
        }
    }
}

impl ValidationConfig {
    pub fn min_latency_for(&self, stage_type: StageType) -> u64 {
        self.min_latency_ms
            .get(&stage_type)
            .copied()
            .unwrap_or(self.default_min_latency_ms)
    }
}

// ---------------------------------------------------------------------
//  Ranked
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankedConfig {
    /// Expected response time per stage type, in ms.
    pub expected_time_ms: HashMap<StageType, u64>,
    pub default_expected_time_ms: u64,
    /// Weight for difficulty 1..=10 (index 0 is difficulty 1).
    pub difficulty_weights: [f64; 10],
    pub accuracy_share: f64,
    pub efficiency_share: f64,
}

impl Default for RankedConfig {
    fn default() -> Self {
        let expected_time_ms = HashMap::from([
            (StageType::Intro, 5000),
            (StageType::Matrix, 30000),
            (StageType::Scenario, 15000),
            (StageType::Bart, 20000),
            (StageType::Personality, 5000),
            (StageType::Debug, 15000),
            (StageType::Outro, 5000),
        ]);
        Self {
            expected_time_ms,
            default_expected_time_ms: 30000,
            difficulty_weights: [0.5, 0.7, 0.85, 1.0, 1.15, 1.3, 1.5, 1.65, 1.8, 2.0],
            accuracy_share: 0.7,
            efficiency_share: 0.3,
        }
    }
}

impl RankedConfig {
    pub fn expected_time_for(&self, stage_type: Option<StageType>) -> u64 {
        stage_type
            .and_then(|t| self.expected_time_ms.get(&t).copied())
            .unwrap_or(self.default_expected_time_ms)
    }

    /// Weight for `difficulty`, clamped into 1..=10.
    pub fn difficulty_weight(&self, difficulty: u8) -> f64 {
        let idx = usize::from(difficulty.clamp(1, 10)) - 1;
        self.difficulty_weights[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json(
            r#"{"validation": {"validity_threshold": 70.0, "min_latency_ms": {"matrix": 4000}}}"#,
        )
        .unwrap();
        assert_eq!(cfg.validation.validity_threshold, 70.0);
        assert_eq!(cfg.validation.min_latency_for(StageType::Matrix), 4000);
        // a replaced map drops the other entries; they fall back to the default
        assert_eq!(cfg.validation.min_latency_for(StageType::Bart), 500);
        assert_eq!(cfg.ranked, RankedConfig::default());
    }

    #[test]
    fn weights_must_sum_to_one() {
        let err = EngineConfig::from_json(r#"{"validation": {"weights": {"speed": 0.9}}}"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn difficulty_weight_clamps() {
        let cfg = RankedConfig::default();
        assert_eq!(cfg.difficulty_weight(0), 0.5);
        assert_eq!(cfg.difficulty_weight(4), 1.0);
        assert_eq!(cfg.difficulty_weight(12), 2.0);
    }
}
