//! Core types for the assessment engine.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use typology::{
    Center, ForcedChoiceAnswer, ForcedChoicePair, HealthDirection, HealthLevel, HealthQuestion,
    InstinctParagraphSet, InstinctRanking, InstinctStack, RankingAnswer, ScenarioQuestion,
    TypeNumber, TypologyError,
};

/// Session stages, in the only order a session may pass through them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Created, not yet started
    #[default]
    Intro,
    /// Stage 1: ranked scenarios
    Scenarios,
    /// Stage 2: dynamically selected forced-choice pairs
    ForcedChoice,
    /// Stage 3: instinct paragraph rankings
    Instincts,
    /// Stage 4: health ratings for the primary type
    Health,
    /// Finished; the result report is available
    Results,
}

impl Stage {
    /// Position in the stage order (intro = 0, results = 5).
    pub fn number(&self) -> u8 {
        match self {
            Self::Intro => 0,
            Self::Scenarios => 1,
            Self::ForcedChoice => 2,
            Self::Instincts => 3,
            Self::Health => 4,
            Self::Results => 5,
        }
    }

    /// The stage that follows this one. Results is terminal.
    pub fn next(&self) -> Self {
        match self {
            Self::Intro => Self::Scenarios,
            Self::Scenarios => Self::ForcedChoice,
            Self::ForcedChoice => Self::Instincts,
            Self::Instincts => Self::Health,
            Self::Health | Self::Results => Self::Results,
        }
    }

    /// True for the four question stages.
    pub fn is_question_stage(&self) -> bool {
        !matches!(self, Self::Intro | Self::Results)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Scenarios => "scenarios",
            Self::ForcedChoice => "forced-choice",
            Self::Instincts => "instincts",
            Self::Health => "health",
            Self::Results => "results",
        }
    }

    /// Display name for progress indicators.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Intro => "Introduction",
            Self::Scenarios => "Scenarios",
            Self::ForcedChoice => "Either/Or",
            Self::Instincts => "Instincts",
            Self::Health => "Growth & Stress",
            Self::Results => "Results",
        }
    }

    /// All stages in order.
    pub fn all() -> [Stage; 6] {
        [
            Self::Intro,
            Self::Scenarios,
            Self::ForcedChoice,
            Self::Instincts,
            Self::Health,
            Self::Results,
        ]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scenario ranking as recorded in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ScenarioAnswerRecord {
    pub question_id: String,
    pub ranking: RankingAnswer,
}

/// A forced choice as recorded in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ForcedChoiceRecord {
    pub question_id: String,
    pub choice: ForcedChoiceAnswer,
}

/// An instinct set ranking. Kept verbatim until the stage ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct InstinctRankingRecord {
    pub set_id: String,
    pub ranking: InstinctRanking,
}

/// A health rating as recorded in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct HealthAnswerRecord {
    pub question_id: String,
    pub direction: HealthDirection,
    /// 1 (disagree) to 5 (agree); not validated
    pub rating: u8,
}

/// What kind of question is being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    Scenario,
    ForcedChoice,
    InstinctSet,
    Health,
}

/// The content of the question being asked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "kebab-case", tag = "kind", content = "content")]
pub enum Question {
    Scenario(ScenarioQuestion),
    ForcedChoice(ForcedChoicePair),
    InstinctSet(InstinctParagraphSet),
    Health(HealthQuestion),
}

impl Question {
    /// Id of the underlying item.
    pub fn id(&self) -> &str {
        match self {
            Self::Scenario(q) => &q.id,
            Self::ForcedChoice(q) => &q.id,
            Self::InstinctSet(q) => &q.id,
            Self::Health(q) => &q.id,
        }
    }

    /// Kind of the underlying item.
    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::Scenario(_) => QuestionKind::Scenario,
            Self::ForcedChoice(_) => QuestionKind::ForcedChoice,
            Self::InstinctSet(_) => QuestionKind::InstinctSet,
            Self::Health(_) => QuestionKind::Health,
        }
    }
}

/// Read-only view of the next question in the active stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct CurrentQuestion {
    pub kind: QuestionKind,
    pub question: Question,
    /// Zero-based position within the stage
    pub index: usize,
    /// Number of questions in the stage
    pub total: usize,
}

/// Progress projection for progress bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Progress {
    pub stage: Stage,
    /// 0 (intro) to 5 (results)
    pub stage_number: u8,
    /// Number of question stages (always 4)
    pub total_stages: u8,
    /// Fraction of the current stage answered (0.0 - 1.0)
    pub stage_progress: f64,
    /// Weighted fraction of the whole session answered (0.0 - 1.0)
    pub overall_progress: f64,
    pub stage_name: String,
}

/// One type's line in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct TypeScoreEntry {
    pub type_number: TypeNumber,
    /// Raw accumulated score from stages 1 and 2
    pub score: f64,
    /// Normalized integer percentage; all nine sum to 100
    pub percentage: u32,
}

/// Share of the distribution falling in one center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct CenterShare {
    pub center: Center,
    pub percentage: u32,
}

/// Health outcome for the type fixed at the instincts → health boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct HealthSummary {
    pub assessed_type: TypeNumber,
    pub level: HealthLevel,
    /// Overall score in [-100, 100]
    pub score: f64,
    pub fixation_score: f64,
    pub growth_score: f64,
    pub interpretation: String,
}

/// Final result of a completed session. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ResultReport {
    pub session_id: String,
    /// Fingerprint of the content pools the session ran against
    pub content_version: String,
    #[cfg_attr(feature = "typescript", ts(type = "string"))]
    pub completed_at: DateTime<Utc>,
    pub primary_type: TypeNumber,
    /// The primary type's percentage
    pub confidence: u32,
    /// Three highest types, strongest first
    pub top_types: Vec<TypeScoreEntry>,
    /// All nine types, strongest first
    pub all_type_scores: Vec<TypeScoreEntry>,
    pub wing: TypeNumber,
    /// e.g. "8w9"
    pub wing_code: String,
    pub center_shares: Vec<CenterShare>,
    pub dominant_center: Center,
    pub instinct_stack: InstinctStack,
    pub health: HealthSummary,
    pub questions_answered: usize,
}

impl ResultReport {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a report previously produced by [`ResultReport::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Percentage for one type.
    pub fn percentage_of(&self, type_number: TypeNumber) -> u32 {
        self.all_type_scores
            .iter()
            .find(|e| e.type_number == type_number)
            .map(|e| e.percentage)
            .unwrap_or(0)
    }
}

/// Assessment errors.
///
/// The public `answer_*` operations never surface these; they are returned
/// by the strict `try_*` variants and by configuration and simulation code.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    /// Operation called in a stage that does not accept it
    #[error("Wrong stage: expected {expected}, session is in {actual}")]
    WrongStage { expected: Stage, actual: Stage },

    /// Question id not in the active stage's list
    #[error("Unknown question '{id}' in stage {stage}")]
    UnknownQuestion { stage: Stage, id: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Content pool error
    #[error("Content error: {0}")]
    ContentError(#[from] TypologyError),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// YAML configuration parse error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Simulation failed
    #[error("Simulation error: {0}")]
    SimulationError(String),
}

pub type Result<T> = std::result::Result<T, AssessmentError>;
