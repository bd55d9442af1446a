//! Static content pools.
//!
//! Each pool module defines its item type, the standard items and the pure
//! scoring helper for one answer. [`ContentPools`] bundles the four pools an
//! assessment session draws from.

pub mod forced_choice;
pub mod health;
pub mod instincts;
pub mod scenarios;

pub use forced_choice::{
    score_forced_choice, standard_forced_choice_pairs, ForcedChoiceAnswer, ForcedChoiceOption,
    ForcedChoicePair, DEFAULT_FORCED_CHOICE_PENALTY,
};
pub use health::{
    assess_health, interpretation, questions_for, standard_health_questions, HealthAssessment,
    HealthDirection, HealthLevel, HealthQuestion, HealthThresholds,
};
pub use instincts::{
    aggregate_rankings, rank_points, standard_instinct_sets, InstinctParagraph,
    InstinctParagraphSet, InstinctRanking, InstinctStack, DEFAULT_MAX_RANK,
};
pub use scenarios::{
    rank_weight, score_ranking, standard_scenarios, RankingAnswer, ScenarioPhase,
    ScenarioQuestion, ScenarioResponse, DEFAULT_RANK_WEIGHTS,
};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::fingerprint::fingerprint_pools;
use crate::types::{TypeNumber, TypologyError};

/// Trait for supplying assessment content.
pub trait ContentSource: Send + Sync {
    /// Stage 1 scenarios, in presentation order
    fn scenarios(&self) -> Vec<ScenarioQuestion>;

    /// Stage 2 pool the selector draws from
    fn forced_choice_pairs(&self) -> Vec<ForcedChoicePair>;

    /// Stage 3 paragraph sets, in presentation order
    fn instinct_sets(&self) -> Vec<InstinctParagraphSet>;

    /// Stage 4 pool, partitioned by target type
    fn health_questions(&self) -> Vec<HealthQuestion>;
}

/// The built-in content.
pub struct StandardContent;

impl ContentSource for StandardContent {
    fn scenarios(&self) -> Vec<ScenarioQuestion> {
        standard_scenarios()
    }

    fn forced_choice_pairs(&self) -> Vec<ForcedChoicePair> {
        standard_forced_choice_pairs()
    }

    fn instinct_sets(&self) -> Vec<InstinctParagraphSet> {
        standard_instinct_sets()
    }

    fn health_questions(&self) -> Vec<HealthQuestion> {
        standard_health_questions()
    }
}

/// The four pools loaded for an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPools {
    pub scenarios: Vec<ScenarioQuestion>,
    pub forced_choice: Vec<ForcedChoicePair>,
    pub instinct_sets: Vec<InstinctParagraphSet>,
    pub health: Vec<HealthQuestion>,
}

impl ContentPools {
    /// Load pools from a content source.
    pub fn from_source(source: &dyn ContentSource) -> Self {
        Self {
            scenarios: source.scenarios(),
            forced_choice: source.forced_choice_pairs(),
            instinct_sets: source.instinct_sets(),
            health: source.health_questions(),
        }
    }

    /// The built-in pools.
    pub fn standard() -> Self {
        Self::from_source(&StandardContent)
    }

    /// SHA-256 over the canonical JSON of all pools.
    pub fn fingerprint(&self) -> String {
        fingerprint_pools(self)
    }

    /// Health items for one type.
    pub fn health_for(&self, type_number: TypeNumber) -> Vec<HealthQuestion> {
        questions_for(&self.health, type_number)
    }

    /// Check structural rules every pool must satisfy.
    ///
    /// The engine tolerates sparse content at runtime; this is for content
    /// authors who want to catch mistakes before shipping a pool.
    pub fn validate(&self) -> Result<(), TypologyError> {
        let invalid =
            |msg: String| -> Result<(), TypologyError> { Err(TypologyError::InvalidContent(msg)) };

        let mut ids = HashSet::new();
        let all_ids = self
            .scenarios
            .iter()
            .map(|s| &s.id)
            .chain(self.forced_choice.iter().map(|p| &p.id))
            .chain(self.instinct_sets.iter().map(|s| &s.id))
            .chain(self.health.iter().map(|q| &q.id));
        for id in all_ids {
            if !ids.insert(id.as_str()) {
                return invalid(format!("duplicate id {}", id));
            }
        }

        for scenario in &self.scenarios {
            if scenario.responses.len() != 3 {
                return invalid(format!(
                    "scenario {} has {} responses, expected 3",
                    scenario.id,
                    scenario.responses.len()
                ));
            }
            let response_ids: HashSet<_> = scenario.responses.iter().map(|r| &r.id).collect();
            if response_ids.len() != scenario.responses.len() {
                return invalid(format!("scenario {} repeats a response id", scenario.id));
            }
        }

        for item in &self.forced_choice {
            if item.type_a == item.type_b {
                return invalid(format!("forced choice {} pits a type against itself", item.id));
            }
            for strength in [item.option_a.strength, item.option_b.strength] {
                if !(0.0..=1.0).contains(&strength) {
                    return invalid(format!(
                        "forced choice {} has strength {} outside [0, 1]",
                        item.id, strength
                    ));
                }
            }
        }

        for set in &self.instinct_sets {
            if !set.is_complete() {
                return invalid(format!(
                    "instinct set {} must hold exactly one paragraph per instinct",
                    set.id
                ));
            }
        }

        for type_number in TypeNumber::ALL {
            let items = self.health_for(type_number);
            let fixation = items
                .iter()
                .filter(|q| q.direction == HealthDirection::Fixation)
                .count();
            if items.len() != 4 || fixation != 2 {
                return invalid(format!(
                    "type {} needs 2 fixation and 2 growth health items, found {} and {}",
                    type_number,
                    fixation,
                    items.len() - fixation
                ));
            }
        }

        Ok(())
    }
}

impl Default for ContentPools {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_content_is_valid() {
        let pools = ContentPools::standard();
        assert!(pools.validate().is_ok());
        assert_eq!(pools.scenarios.len(), 8);
        assert_eq!(pools.instinct_sets.len(), 5);
    }

    #[test]
    fn test_validate_rejects_incomplete_instinct_set() {
        let mut pools = ContentPools::standard();
        pools.instinct_sets[0].paragraphs.pop();
        let err = pools.validate().unwrap_err();
        assert!(matches!(err, TypologyError::InvalidContent(_)));
    }

    #[test]
    fn test_validate_rejects_missing_health_items() {
        let mut pools = ContentPools::standard();
        pools.health.retain(|q| q.target_type.get() != 4);
        assert!(pools.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut pools = ContentPools::standard();
        let duplicate = pools.forced_choice[0].clone();
        pools.forced_choice.push(duplicate);
        assert!(pools.validate().is_err());
    }
}
