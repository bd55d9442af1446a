//! Staged nine-type personality assessment engine.
//!
//! A session runs through four question stages, each building on the last:
//!
//! - **Scenarios**: rank responses to everyday situations; builds the first
//!   type score vector
//! - **Forced choice**: either/or items picked for the leading types
//! - **Instincts**: rank paragraph sets to order sp, so and sx
//! - **Health**: rate growth and fixation items for the primary type
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     AssessmentEngine                         │
//! │                                                              │
//! │  intro ─▶ scenarios ─▶ forced-choice ─▶ instincts ─▶ health  │
//! │                 │            ▲                          │    │
//! │                 └─ selector ─┘                          ▼    │
//! │                                               synthesis ─▶ results
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every transition takes a `&SessionState` and returns a new one. Nothing is
//! shared between sessions, so any number can run in parallel.
//!
//! # Example
//!
//! ```
//! use assessment::{create_initial_session, current_question, start_session, Stage};
//!
//! let state = start_session(&create_initial_session());
//! assert_eq!(state.stage, Stage::Scenarios);
//! assert!(current_question(&state).is_some());
//! ```

use std::sync::OnceLock;

use typology::{ForcedChoiceAnswer, InstinctRanking, RankingAnswer};

pub mod config;
pub mod progress;
pub mod selector;
pub mod session;
pub mod simulation;
pub mod synthesis;
pub mod types;

// Re-export main types
pub use config::{
    AssessmentConfig, InstinctConfig, ProgressConfig, ScoringConfig, SelectionConfig,
};
pub use session::{AssessmentEngine, SessionState};
pub use simulation::{
    parse_respondent, run_session, simulate_batch, standard_respondents, BatchSummary,
    CenterBiasedRespondent, Respondent, SessionOutcome, TypeAlignedRespondent,
};
pub use synthesis::{check_report_invariants, synthesize};
pub use types::*;

/// Engine with default configuration over the standard content.
pub fn default_engine() -> &'static AssessmentEngine {
    static ENGINE: OnceLock<AssessmentEngine> = OnceLock::new();
    ENGINE.get_or_init(AssessmentEngine::default)
}

/// Fresh session at the intro stage.
pub fn create_initial_session() -> SessionState {
    default_engine().create_initial_session()
}

/// Move from intro to scenarios.
pub fn start_session(state: &SessionState) -> SessionState {
    default_engine().start_session(state)
}

/// Next question in the active stage, if any.
pub fn current_question(state: &SessionState) -> Option<CurrentQuestion> {
    progress::current_question(state)
}

pub fn answer_scenario(
    state: &SessionState,
    question_id: &str,
    answer: &RankingAnswer,
) -> SessionState {
    default_engine().answer_scenario(state, question_id, answer)
}

pub fn answer_forced_choice(
    state: &SessionState,
    question_id: &str,
    answer: ForcedChoiceAnswer,
) -> SessionState {
    default_engine().answer_forced_choice(state, question_id, answer)
}

pub fn answer_instinct_set(
    state: &SessionState,
    set_id: &str,
    ranking: &InstinctRanking,
) -> SessionState {
    default_engine().answer_instinct_set(state, set_id, ranking)
}

pub fn answer_health(state: &SessionState, question_id: &str, rating: u8) -> SessionState {
    default_engine().answer_health(state, question_id, rating)
}

/// Progress with the default stage weights.
pub fn progress(state: &SessionState) -> Progress {
    default_engine().progress(state)
}
