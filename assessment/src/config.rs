//! Configuration for the assessment engine.
//!
//! Every default reproduces the standard scoring rules; a config file only
//! needs to name the values it changes.

use serde::{Deserialize, Serialize};

use typology::{
    HealthThresholds, DEFAULT_FORCED_CHOICE_PENALTY, DEFAULT_MAX_RANK, DEFAULT_RANK_WEIGHTS,
};

use crate::types::{AssessmentError, Result, Stage};

/// Configuration for an assessment engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
    /// Stage 1 and 2 scoring
    pub scoring: ScoringConfig,
    /// Stage 2 question selection
    pub selection: SelectionConfig,
    /// Stage 3 aggregation
    pub instincts: InstinctConfig,
    /// Stage 4 scoring
    pub health: HealthThresholds,
    /// Progress weights
    pub progress: ProgressConfig,
}

impl AssessmentConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject configurations that would break the engine's invariants.
    pub fn validate(&self) -> Result<()> {
        let weights = &self.scoring.rank_weights;
        if weights.windows(2).any(|w| w[0] < w[1]) {
            return Err(AssessmentError::ConfigError(format!(
                "rank weights must not increase with rank: {:?}",
                weights
            )));
        }
        if self.scoring.forced_choice_penalty < 0.0 {
            return Err(AssessmentError::ConfigError(
                "forced choice penalty must be non-negative".to_string(),
            ));
        }

        let selection = &self.selection;
        for (name, value) in [
            ("candidate_types", selection.candidate_types),
            ("questions_per_pair", selection.questions_per_pair),
            ("focus_types", selection.focus_types),
            ("questions_per_focus_type", selection.questions_per_focus_type),
        ] {
            if value == 0 {
                return Err(AssessmentError::ConfigError(format!(
                    "selection.{} must be positive",
                    name
                )));
            }
        }
        if selection.candidate_types > 9 {
            return Err(AssessmentError::ConfigError(format!(
                "candidate_types must be 1-9, got {}",
                selection.candidate_types
            )));
        }
        if selection.focus_types > selection.candidate_types {
            return Err(AssessmentError::ConfigError(
                "focus_types cannot exceed candidate_types".to_string(),
            ));
        }

        if self.instincts.max_rank == 0 {
            return Err(AssessmentError::ConfigError(
                "instinct max_rank must be positive".to_string(),
            ));
        }

        let health = &self.health;
        if health.rating_half_range <= 0.0 {
            return Err(AssessmentError::ConfigError(
                "rating_half_range must be positive".to_string(),
            ));
        }
        if health.unhealthy_threshold > health.healthy_threshold {
            return Err(AssessmentError::ConfigError(format!(
                "unhealthy threshold {} is above healthy threshold {}",
                health.unhealthy_threshold, health.healthy_threshold
            )));
        }

        for stage in Stage::all() {
            let weight = self.progress.weight(stage);
            if !weight.is_finite() || weight < 0.0 {
                return Err(AssessmentError::ConfigError(format!(
                    "progress weight for {} must be a non-negative number, got {}",
                    stage, weight
                )));
            }
        }
        let total = self.progress.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(AssessmentError::ConfigError(format!(
                "progress weights must sum to 1.0, got {}",
                total
            )));
        }

        Ok(())
    }
}

/// Scenario and forced-choice scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Multiplier for rank 1, 2 and 3 responses
    pub rank_weights: [f64; 3],
    /// Fraction of the untaken option's strength subtracted from its type
    pub forced_choice_penalty: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rank_weights: DEFAULT_RANK_WEIGHTS,
            forced_choice_penalty: DEFAULT_FORCED_CHOICE_PENALTY,
        }
    }
}

/// Forced-choice selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// How many top types are paired against each other
    pub candidate_types: usize,
    /// Items taken per candidate pair
    pub questions_per_pair: usize,
    /// How many of the top types get extra items
    pub focus_types: usize,
    /// Extra items per focus type, against any other type
    pub questions_per_focus_type: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            candidate_types: 4,
            questions_per_pair: 2,
            focus_types: 2,
            questions_per_focus_type: 2,
        }
    }
}

/// Instinct aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstinctConfig {
    /// Lowest rank; points = max_rank + 1 - rank
    pub max_rank: u8,
}

impl Default for InstinctConfig {
    fn default() -> Self {
        Self {
            max_rank: DEFAULT_MAX_RANK,
        }
    }
}

/// Share of overall progress each question stage accounts for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub scenarios: f64,
    pub forced_choice: f64,
    pub instincts: f64,
    pub health: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            scenarios: 0.35,
            forced_choice: 0.30,
            instincts: 0.25,
            health: 0.10,
        }
    }
}

impl ProgressConfig {
    /// Weight of one stage; intro and results weigh nothing.
    pub fn weight(&self, stage: Stage) -> f64 {
        match stage {
            Stage::Scenarios => self.scenarios,
            Stage::ForcedChoice => self.forced_choice,
            Stage::Instincts => self.instincts,
            Stage::Health => self.health,
            Stage::Intro | Stage::Results => 0.0,
        }
    }

    /// Sum of all stage weights.
    pub fn total(&self) -> f64 {
        self.scenarios + self.forced_choice + self.instincts + self.health
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AssessmentConfig::default();
        assert_eq!(config.scoring.rank_weights, [1.0, 0.5, 0.0]);
        assert_eq!(config.scoring.forced_choice_penalty, 0.5);
        assert_eq!(config.selection.candidate_types, 4);
        assert_eq!(config.health.healthy_threshold, 30.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = AssessmentConfig::default();
        config.selection.questions_per_pair = 3;
        let yaml = config.to_yaml().unwrap();
        let parsed = AssessmentConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "health:\n  healthy_threshold: 40.0\n";
        let config = AssessmentConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.health.healthy_threshold, 40.0);
        assert_eq!(config.health.unhealthy_threshold, -30.0);
        assert_eq!(config.progress, ProgressConfig::default());
    }

    #[test]
    fn test_rejects_bad_progress_weights() {
        let yaml = "progress:\n  scenarios: 0.5\n";
        let err = AssessmentConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, AssessmentError::ConfigError(_)));
    }

    #[test]
    fn test_rejects_increasing_rank_weights() {
        let mut config = AssessmentConfig::default();
        config.scoring.rank_weights = [0.0, 0.5, 1.0];
        assert!(config.validate().is_err());
    }
}
