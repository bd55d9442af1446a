//! Read-only projections over a session: the question to ask next and how
//! far along the session is.

use crate::config::ProgressConfig;
use crate::session::SessionState;
use crate::types::{CurrentQuestion, Progress, Question, Stage};

/// Number of question stages.
pub const QUESTION_STAGES: u8 = 4;

/// The next question in the active stage.
///
/// `None` outside the question stages and once the active list is
/// exhausted.
pub fn current_question(state: &SessionState) -> Option<CurrentQuestion> {
    let (index, total) = state.stage_cursor()?;

    let question = match state.stage {
        Stage::Scenarios => Question::Scenario(state.scenario_questions.get(index)?.clone()),
        Stage::ForcedChoice => {
            Question::ForcedChoice(state.forced_choice_questions.get(index)?.clone())
        }
        Stage::Instincts => Question::InstinctSet(state.instinct_sets.get(index)?.clone()),
        Stage::Health => Question::Health(state.health_questions.get(index)?.clone()),
        Stage::Intro | Stage::Results => return None,
    };

    Some(CurrentQuestion {
        kind: question.kind(),
        question,
        index,
        total,
    })
}

/// Weighted progress through the session.
///
/// Overall progress is the sum of the weights of every finished stage plus
/// the current stage's weight scaled by its cursor position.
pub fn progress(state: &SessionState, weights: &ProgressConfig) -> Progress {
    let stage = state.stage;

    let stage_progress = if stage.is_question_stage() {
        match state.stage_cursor() {
            Some((_, 0)) | None => 0.0,
            Some((index, total)) => (index as f64 / total as f64).min(1.0),
        }
    } else if stage == Stage::Results {
        1.0
    } else {
        0.0
    };

    let completed: f64 = Stage::all()
        .iter()
        .filter(|s| **s < stage)
        .map(|s| weights.weight(*s))
        .sum();
    let overall = completed + weights.weight(stage) * stage_progress;

    Progress {
        stage,
        stage_number: stage.number(),
        total_stages: QUESTION_STAGES,
        stage_progress,
        overall_progress: overall.clamp(0.0, 1.0),
        stage_name: stage.display_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssessmentConfig;
    use crate::session::AssessmentEngine;
    use typology::{ContentPools, RankingAnswer};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_intro_has_no_question() {
        let engine = AssessmentEngine::new();
        let state = engine.create_initial_session();
        assert!(current_question(&state).is_none());

        let p = progress(&state, &ProgressConfig::default());
        assert_eq!(p.stage_number, 0);
        assert_eq!(p.total_stages, 4);
        assert_eq!(p.overall_progress, 0.0);
        assert_eq!(p.stage_name, "Introduction");
    }

    #[test]
    fn test_first_scenario_is_current() {
        let engine = AssessmentEngine::new();
        let state = engine.start_session(&engine.create_initial_session());
        let current = current_question(&state).unwrap();

        assert_eq!(current.index, 0);
        assert_eq!(current.total, 8);
        assert_eq!(current.question.id(), state.scenario_questions[0].id);
    }

    #[test]
    fn test_progress_scales_within_stage() {
        let engine = AssessmentEngine::new();
        let mut state = engine.start_session(&engine.create_initial_session());
        for question in state.scenario_questions.clone().iter().take(4) {
            state = engine.answer_scenario(&state, &question.id, &RankingAnswer::new());
        }

        let p = progress(&state, &ProgressConfig::default());
        assert_eq!(p.stage, Stage::Scenarios);
        assert!(approx(p.stage_progress, 0.5));
        assert!(approx(p.overall_progress, 0.175));
    }

    #[test]
    fn test_progress_accumulates_finished_stages() {
        let engine = AssessmentEngine::new();
        let mut state = engine.start_session(&engine.create_initial_session());
        for question in state.scenario_questions.clone() {
            state = engine.answer_scenario(&state, &question.id, &RankingAnswer::new());
        }
        assert_eq!(state.stage, Stage::ForcedChoice);

        let p = progress(&state, &ProgressConfig::default());
        assert_eq!(p.stage_number, 2);
        assert!(approx(p.stage_progress, 0.0));
        assert!(approx(p.overall_progress, 0.35));
    }

    #[test]
    fn test_results_stage_is_complete() {
        let mut pools = ContentPools::standard();
        pools.scenarios.clear();
        pools.forced_choice.clear();
        pools.instinct_sets.clear();
        pools.health.clear();
        let engine = AssessmentEngine::with_content(AssessmentConfig::default(), pools).unwrap();
        let state = engine.start_session(&engine.create_initial_session());
        assert_eq!(state.stage, Stage::Results);
        assert!(current_question(&state).is_none());

        let p = progress(&state, &ProgressConfig::default());
        assert_eq!(p.stage_number, 5);
        assert!(approx(p.stage_progress, 1.0));
        assert!(approx(p.overall_progress, 1.0));
    }
}
