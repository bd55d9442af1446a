//! The session state machine.
//!
//! A session moves strictly forward through
//! intro → scenarios → forced-choice → instincts → health → results.
//! Every transition takes the prior state by reference and returns a new
//! state value, so a session can be snapshotted, replayed or run alongside
//! any number of others without coordination.
//!
//! Two stage boundaries do extra work:
//!
//! - scenarios → forced-choice runs the selector over the stage 1 scores to
//!   build the forced-choice list
//! - health → results runs the synthesizer
//!
//! A stage whose list is empty is exhausted on entry and the session moves
//! straight on to the next stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use typology::{
    score_forced_choice, score_ranking, ContentPools, ForcedChoiceAnswer, ForcedChoicePair,
    HealthQuestion, InstinctParagraphSet, InstinctRanking, RankingAnswer, ScenarioQuestion,
    TypeNumber, TypeScores,
};

use crate::config::AssessmentConfig;
use crate::progress;
use crate::selector::select_forced_choice;
use crate::synthesis::synthesize;
use crate::types::{
    AssessmentError, CurrentQuestion, ForcedChoiceRecord, HealthAnswerRecord,
    InstinctRankingRecord, Progress, Result, ResultReport, ScenarioAnswerRecord, Stage,
};

/// Complete state of one assessment session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Unique session identifier
    pub session_id: String,
    /// Fingerprint of the content pools this session was created from
    pub content_version: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub stage: Stage,

    // Stage 1
    pub scenario_questions: Vec<ScenarioQuestion>,
    pub scenario_index: usize,
    pub scenario_answers: Vec<ScenarioAnswerRecord>,

    // Stage 2; empty until the selector runs
    pub forced_choice_questions: Vec<ForcedChoicePair>,
    pub forced_choice_index: usize,
    pub forced_choice_answers: Vec<ForcedChoiceRecord>,

    // Stage 3; rankings are append-only and scored at synthesis
    pub instinct_sets: Vec<InstinctParagraphSet>,
    pub instinct_index: usize,
    pub instinct_rankings: Vec<InstinctRankingRecord>,

    // Stage 4; loaded for the type fixed at the instincts → health boundary
    pub health_type: Option<TypeNumber>,
    pub health_questions: Vec<HealthQuestion>,
    pub health_index: usize,
    pub health_answers: Vec<HealthAnswerRecord>,

    /// Running type scores from stages 1 and 2
    pub type_scores: TypeScores,
    /// Set once the session reaches results
    pub result: Option<ResultReport>,
}

impl SessionState {
    /// Number of answers recorded across all stages.
    pub fn questions_answered(&self) -> usize {
        self.scenario_answers.len()
            + self.forced_choice_answers.len()
            + self.instinct_rankings.len()
            + self.health_answers.len()
    }

    /// (cursor, list length) for a question stage; `None` for intro/results.
    pub fn stage_cursor(&self) -> Option<(usize, usize)> {
        match self.stage {
            Stage::Scenarios => Some((self.scenario_index, self.scenario_questions.len())),
            Stage::ForcedChoice => Some((
                self.forced_choice_index,
                self.forced_choice_questions.len(),
            )),
            Stage::Instincts => Some((self.instinct_index, self.instinct_sets.len())),
            Stage::Health => Some((self.health_index, self.health_questions.len())),
            Stage::Intro | Stage::Results => None,
        }
    }

    /// True when the active question stage has no questions left.
    pub fn is_stage_exhausted(&self) -> bool {
        matches!(self.stage_cursor(), Some((index, total)) if index >= total)
    }

    /// True once the result report has been produced.
    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Results
    }

    fn ensure_stage(&self, expected: Stage) -> Result<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(AssessmentError::WrongStage {
                expected,
                actual: self.stage,
            })
        }
    }

    fn unknown(&self, id: &str) -> AssessmentError {
        AssessmentError::UnknownQuestion {
            stage: self.stage,
            id: id.to_string(),
        }
    }
}

/// Drives sessions through the stages using one configuration and one set of
/// content pools.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    config: AssessmentConfig,
    pools: ContentPools,
    content_version: String,
}

impl Default for AssessmentEngine {
    fn default() -> Self {
        Self::from_parts(AssessmentConfig::default(), ContentPools::standard())
    }
}

impl AssessmentEngine {
    /// Create an engine with default configuration and the standard content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    pub fn with_config(config: AssessmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, ContentPools::standard()))
    }

    /// Create with custom configuration and content.
    ///
    /// Content is not validated here: the engine tolerates sparse pools.
    /// Call [`ContentPools::validate`] first if strict content is required.
    pub fn with_content(config: AssessmentConfig, pools: ContentPools) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, pools))
    }

    fn from_parts(config: AssessmentConfig, pools: ContentPools) -> Self {
        let content_version = pools.fingerprint();
        Self {
            config,
            pools,
            content_version,
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Content pools.
    pub fn pools(&self) -> &ContentPools {
        &self.pools
    }

    /// Fingerprint of the content pools.
    pub fn content_version(&self) -> &str {
        &self.content_version
    }

    /// Next question in the active stage, if any.
    pub fn current_question(&self, state: &SessionState) -> Option<CurrentQuestion> {
        progress::current_question(state)
    }

    /// Progress using this engine's stage weights.
    pub fn progress(&self, state: &SessionState) -> Progress {
        progress::progress(state, &self.config.progress)
    }

    /// Create a fresh session at the intro stage with the scenario and
    /// instinct pools preloaded.
    pub fn create_initial_session(&self) -> SessionState {
        let session_id = uuid::Uuid::new_v4().to_string();
        debug!(session_id = %session_id, "Creating assessment session");

        SessionState {
            session_id,
            content_version: self.content_version.clone(),
            started_at: Utc::now(),
            completed_at: None,
            stage: Stage::Intro,
            scenario_questions: self.pools.scenarios.clone(),
            scenario_index: 0,
            scenario_answers: Vec::new(),
            forced_choice_questions: Vec::new(),
            forced_choice_index: 0,
            forced_choice_answers: Vec::new(),
            instinct_sets: self.pools.instinct_sets.clone(),
            instinct_index: 0,
            instinct_rankings: Vec::new(),
            health_type: None,
            health_questions: Vec::new(),
            health_index: 0,
            health_answers: Vec::new(),
            type_scores: TypeScores::new(),
            result: None,
        }
    }

    /// Move a session from intro to scenarios. Any other stage is returned
    /// unchanged.
    pub fn start_session(&self, state: &SessionState) -> SessionState {
        self.try_start_session(state)
            .unwrap_or_else(|_| state.clone())
    }

    /// Strict form of [`start_session`](Self::start_session).
    pub fn try_start_session(&self, state: &SessionState) -> Result<SessionState> {
        state.ensure_stage(Stage::Intro)?;
        info!(session_id = %state.session_id, "Assessment session started");
        Ok(self.settle(self.advance(state.clone())))
    }

    /// Apply a scenario ranking.
    ///
    /// Unknown ids and calls outside the scenarios stage leave the state
    /// unchanged.
    pub fn answer_scenario(
        &self,
        state: &SessionState,
        question_id: &str,
        answer: &RankingAnswer,
    ) -> SessionState {
        self.try_answer_scenario(state, question_id, answer)
            .unwrap_or_else(|_| state.clone())
    }

    /// Strict form of [`answer_scenario`](Self::answer_scenario).
    pub fn try_answer_scenario(
        &self,
        state: &SessionState,
        question_id: &str,
        answer: &RankingAnswer,
    ) -> Result<SessionState> {
        state.ensure_stage(Stage::Scenarios)?;
        let question = state
            .scenario_questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| state.unknown(question_id))?;

        let contribution = score_ranking(question, answer, &self.config.scoring.rank_weights);

        let mut next = state.clone();
        next.type_scores.merge(&contribution);
        next.scenario_answers.push(ScenarioAnswerRecord {
            question_id: question_id.to_string(),
            ranking: answer.clone(),
        });
        next.scenario_index += 1;

        debug!(
            session_id = %next.session_id,
            question_id,
            index = next.scenario_index,
            "Scenario answered"
        );

        Ok(self.settle(next))
    }

    /// Apply a forced choice.
    ///
    /// Unknown ids and calls outside the forced-choice stage leave the state
    /// unchanged.
    pub fn answer_forced_choice(
        &self,
        state: &SessionState,
        question_id: &str,
        answer: ForcedChoiceAnswer,
    ) -> SessionState {
        self.try_answer_forced_choice(state, question_id, answer)
            .unwrap_or_else(|_| state.clone())
    }

    /// Strict form of [`answer_forced_choice`](Self::answer_forced_choice).
    pub fn try_answer_forced_choice(
        &self,
        state: &SessionState,
        question_id: &str,
        answer: ForcedChoiceAnswer,
    ) -> Result<SessionState> {
        state.ensure_stage(Stage::ForcedChoice)?;
        let pair = state
            .forced_choice_questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| state.unknown(question_id))?;

        let contribution =
            score_forced_choice(pair, answer, self.config.scoring.forced_choice_penalty);

        let mut next = state.clone();
        next.type_scores.merge(&contribution);
        next.forced_choice_answers.push(ForcedChoiceRecord {
            question_id: question_id.to_string(),
            choice: answer,
        });
        next.forced_choice_index += 1;

        debug!(
            session_id = %next.session_id,
            question_id,
            choice = ?answer,
            "Forced choice answered"
        );

        Ok(self.settle(next))
    }

    /// Record an instinct set ranking. Rankings are only scored once the
    /// session reaches results.
    pub fn answer_instinct_set(
        &self,
        state: &SessionState,
        set_id: &str,
        ranking: &InstinctRanking,
    ) -> SessionState {
        self.try_answer_instinct_set(state, set_id, ranking)
            .unwrap_or_else(|_| state.clone())
    }

    /// Strict form of [`answer_instinct_set`](Self::answer_instinct_set).
    pub fn try_answer_instinct_set(
        &self,
        state: &SessionState,
        set_id: &str,
        ranking: &InstinctRanking,
    ) -> Result<SessionState> {
        state.ensure_stage(Stage::Instincts)?;
        if !state.instinct_sets.iter().any(|s| s.id == set_id) {
            return Err(state.unknown(set_id));
        }

        let mut next = state.clone();
        next.instinct_rankings.push(InstinctRankingRecord {
            set_id: set_id.to_string(),
            ranking: ranking.clone(),
        });
        next.instinct_index += 1;

        debug!(session_id = %next.session_id, set_id, "Instinct set ranked");

        Ok(self.settle(next))
    }

    /// Record a 1-5 health rating. Ratings are not range-checked.
    pub fn answer_health(
        &self,
        state: &SessionState,
        question_id: &str,
        rating: u8,
    ) -> SessionState {
        self.try_answer_health(state, question_id, rating)
            .unwrap_or_else(|_| state.clone())
    }

    /// Strict form of [`answer_health`](Self::answer_health).
    pub fn try_answer_health(
        &self,
        state: &SessionState,
        question_id: &str,
        rating: u8,
    ) -> Result<SessionState> {
        state.ensure_stage(Stage::Health)?;
        let question = state
            .health_questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| state.unknown(question_id))?;

        let mut next = state.clone();
        next.health_answers.push(HealthAnswerRecord {
            question_id: question_id.to_string(),
            direction: question.direction,
            rating,
        });
        next.health_index += 1;

        debug!(session_id = %next.session_id, question_id, rating, "Health item rated");

        Ok(self.settle(next))
    }

    /// Advance through every stage that has nothing left to ask.
    fn settle(&self, mut state: SessionState) -> SessionState {
        while state.is_stage_exhausted() {
            state = self.advance(state);
        }
        state
    }

    /// Move to the next stage, doing the boundary work that stage needs.
    fn advance(&self, mut state: SessionState) -> SessionState {
        let from = state.stage;
        let to = from.next();

        match to {
            Stage::ForcedChoice => {
                state.forced_choice_questions = select_forced_choice(
                    &state.type_scores,
                    &self.pools.forced_choice,
                    &self.config.selection,
                );
                state.forced_choice_index = 0;
                if state.forced_choice_questions.is_empty() {
                    warn!(
                        session_id = %state.session_id,
                        "No forced-choice questions matched the leading types"
                    );
                }
                info!(
                    session_id = %state.session_id,
                    questions = state.forced_choice_questions.len(),
                    "Forced-choice stage built"
                );
            }
            Stage::Health => {
                let health_type = state.type_scores.top();
                state.health_type = Some(health_type);
                state.health_questions = self.pools.health_for(health_type);
                state.health_index = 0;
                if state.health_questions.is_empty() {
                    warn!(
                        session_id = %state.session_id,
                        health_type = health_type.get(),
                        "No health questions for type"
                    );
                }
                info!(
                    session_id = %state.session_id,
                    health_type = health_type.get(),
                    "Primary type fixed for health stage"
                );
            }
            Stage::Results if from != Stage::Results => {
                state.stage = Stage::Results;
                let report = synthesize(&state, &self.config);
                state.completed_at = Some(report.completed_at);
                state.result = Some(report);
            }
            _ => {}
        }

        state.stage = to;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typology::{HealthDirection, InstinctType, ScenarioPhase};

    fn rank_first(question: &ScenarioQuestion, first: usize) -> RankingAnswer {
        let mut answer = RankingAnswer::new();
        let mut rank = 2;
        for (i, response) in question.responses.iter().enumerate() {
            if i == first {
                answer.insert(response.id.clone(), 1);
            } else {
                answer.insert(response.id.clone(), rank);
                rank += 1;
            }
        }
        answer
    }

    fn complete_scenarios(engine: &AssessmentEngine, mut state: SessionState) -> SessionState {
        for question in state.scenario_questions.clone() {
            state = engine.answer_scenario(&state, &question.id, &rank_first(&question, 0));
        }
        state
    }

    #[test]
    fn test_initial_session() {
        let engine = AssessmentEngine::new();
        let state = engine.create_initial_session();
        assert_eq!(state.stage, Stage::Intro);
        assert_eq!(state.scenario_questions.len(), 8);
        assert_eq!(state.instinct_sets.len(), 5);
        assert!(state.forced_choice_questions.is_empty());
        assert!(state.health_questions.is_empty());
        assert!(state.result.is_none());
        assert_eq!(state.content_version, engine.content_version());
    }

    #[test]
    fn test_start_only_from_intro() {
        let engine = AssessmentEngine::new();
        let state = engine.start_session(&engine.create_initial_session());
        assert_eq!(state.stage, Stage::Scenarios);

        let again = engine.start_session(&state);
        assert_eq!(again, state);
        assert!(matches!(
            engine.try_start_session(&state),
            Err(AssessmentError::WrongStage { .. })
        ));
    }

    #[test]
    fn test_unknown_id_is_silent_noop() {
        let engine = AssessmentEngine::new();
        let state = engine.start_session(&engine.create_initial_session());

        let next = engine.answer_scenario(&state, "no-such-scenario", &RankingAnswer::new());
        assert_eq!(next, state);

        let err = engine
            .try_answer_scenario(&state, "no-such-scenario", &RankingAnswer::new())
            .unwrap_err();
        assert!(matches!(err, AssessmentError::UnknownQuestion { .. }));
    }

    #[test]
    fn test_wrong_stage_answers_are_ignored() {
        let engine = AssessmentEngine::new();
        let state = engine.start_session(&engine.create_initial_session());
        let set_id = state.instinct_sets[0].id.clone();

        let next = engine.answer_instinct_set(&state, &set_id, &InstinctRanking::new());
        assert_eq!(next, state);
        assert_eq!(engine.answer_health(&state, "health-1-play", 5), state);
    }

    #[test]
    fn test_transitions_do_not_mutate_prior_state() {
        let engine = AssessmentEngine::new();
        let state = engine.start_session(&engine.create_initial_session());
        let snapshot = state.clone();
        let question = state.scenario_questions[0].clone();

        let next = engine.answer_scenario(&state, &question.id, &rank_first(&question, 0));
        assert_eq!(state, snapshot);
        assert_eq!(next.scenario_index, 1);
        assert!(next.type_scores.total() > 0.0);
    }

    #[test]
    fn test_scenarios_complete_into_forced_choice() {
        let engine = AssessmentEngine::new();
        let started = engine.start_session(&engine.create_initial_session());
        let state = complete_scenarios(&engine, started);

        assert_eq!(state.stage, Stage::ForcedChoice);
        assert_eq!(state.scenario_answers.len(), 8);
        assert!(!state.forced_choice_questions.is_empty());
        assert_eq!(state.forced_choice_index, 0);
        assert!(state
            .scenario_questions
            .iter()
            .take(5)
            .all(|q| q.phase == ScenarioPhase::CenterIdentification));
    }

    #[test]
    fn test_empty_forced_choice_pool_skips_to_instincts() {
        let mut pools = ContentPools::standard();
        pools.forced_choice.clear();
        let engine = AssessmentEngine::with_content(AssessmentConfig::default(), pools).unwrap();

        let started = engine.start_session(&engine.create_initial_session());
        let state = complete_scenarios(&engine, started);
        assert_eq!(state.stage, Stage::Instincts);
        assert!(state.forced_choice_questions.is_empty());
    }

    #[test]
    fn test_instincts_fix_health_type_from_current_scores() {
        let engine = AssessmentEngine::new();
        let mut state =
            complete_scenarios(&engine, engine.start_session(&engine.create_initial_session()));
        for pair in state.forced_choice_questions.clone() {
            state = engine.answer_forced_choice(&state, &pair.id, ForcedChoiceAnswer::A);
        }
        assert_eq!(state.stage, Stage::Instincts);

        let ranking: InstinctRanking = [
            (InstinctType::Sp, 1),
            (InstinctType::So, 2),
            (InstinctType::Sx, 3),
        ]
        .into_iter()
        .collect();
        let scores_before = state.type_scores;
        for set in state.instinct_sets.clone() {
            state = engine.answer_instinct_set(&state, &set.id, &ranking);
        }

        assert_eq!(state.stage, Stage::Health);
        assert_eq!(state.type_scores, scores_before);
        assert_eq!(state.instinct_rankings.len(), 5);
        let health_type = state.health_type.unwrap();
        assert_eq!(health_type, scores_before.top());
        assert_eq!(state.health_questions.len(), 4);
        assert!(state
            .health_questions
            .iter()
            .all(|q| q.target_type == health_type));
    }

    #[test]
    fn test_health_completes_into_results() {
        let engine = AssessmentEngine::new();
        let mut state =
            complete_scenarios(&engine, engine.start_session(&engine.create_initial_session()));
        for pair in state.forced_choice_questions.clone() {
            state = engine.answer_forced_choice(&state, &pair.id, ForcedChoiceAnswer::B);
        }
        for set in state.instinct_sets.clone() {
            state = engine.answer_instinct_set(&state, &set.id, &InstinctRanking::new());
        }
        for question in state.health_questions.clone() {
            let rating = match question.direction {
                HealthDirection::Fixation => 5,
                HealthDirection::Growth => 1,
            };
            state = engine.answer_health(&state, &question.id, rating);
        }

        assert_eq!(state.stage, Stage::Results);
        assert!(state.completed_at.is_some());
        let report = state.result.as_ref().unwrap();
        assert_eq!(report.health.score, -100.0);
        assert_eq!(report.questions_answered, state.questions_answered());
        assert_eq!(report.session_id, state.session_id);
    }

    #[test]
    fn test_empty_content_runs_straight_to_results() {
        let pools = ContentPools {
            scenarios: Vec::new(),
            forced_choice: Vec::new(),
            instinct_sets: Vec::new(),
            health: Vec::new(),
        };
        let engine = AssessmentEngine::with_content(AssessmentConfig::default(), pools).unwrap();
        let state = engine.start_session(&engine.create_initial_session());

        assert_eq!(state.stage, Stage::Results);
        let report = state.result.unwrap();
        assert_eq!(report.questions_answered, 0);
        assert_eq!(report.primary_type.get(), 1);
    }
}
