//! Scripted respondents and batch simulation.
//!
//! A [`Respondent`] answers every kind of question deterministically, which
//! makes it possible to drive whole sessions without a UI. Sessions share no
//! state, so a batch runs each one on the blocking pool and only joins the
//! finished reports.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use typology::{
    Center, ForcedChoiceAnswer, ForcedChoicePair, HealthDirection, HealthLevel, HealthQuestion,
    InstinctParagraphSet, InstinctRanking, InstinctType, RankingAnswer, ScenarioQuestion,
    ScenarioResponse, TypeNumber,
};

use crate::progress::current_question;
use crate::session::AssessmentEngine;
use crate::synthesis::check_report_invariants;
use crate::types::{AssessmentError, Question, Result, ResultReport};

/// Something that can answer every question the engine asks.
pub trait Respondent: Send + Sync {
    /// Label used in logs and batch summaries.
    fn name(&self) -> String;

    /// Rank a scenario's responses, 1 = most like me.
    fn rank_scenario(&self, question: &ScenarioQuestion) -> RankingAnswer;

    /// Pick one side of a forced-choice pair.
    fn choose(&self, pair: &ForcedChoicePair) -> ForcedChoiceAnswer;

    /// Rank a paragraph set's instincts, 1 = most like me.
    fn rank_instincts(&self, set: &InstinctParagraphSet) -> InstinctRanking;

    /// Rate a health item from 1 (disagree) to 5 (agree).
    fn rate_health(&self, question: &HealthQuestion) -> u8;
}

/// Rank responses by a preference score, highest first. Equal preferences
/// keep content order.
fn rank_by<F>(responses: &[ScenarioResponse], preference: F) -> RankingAnswer
where
    F: Fn(&ScenarioResponse) -> f64,
{
    let mut scored: Vec<(&ScenarioResponse, f64)> =
        responses.iter().map(|r| (r, preference(r))).collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (response, _))| (response.id.clone(), (i + 1) as u8))
        .collect()
}

fn rank_instinct_order(order: &[InstinctType; 3]) -> InstinctRanking {
    order
        .iter()
        .enumerate()
        .map(|(i, instinct)| (*instinct, (i + 1) as u8))
        .collect()
}

/// Rating that expresses a health level through a question's direction.
fn rating_for(level: HealthLevel, direction: HealthDirection) -> u8 {
    match (level, direction) {
        (HealthLevel::Healthy, HealthDirection::Fixation) => 1,
        (HealthLevel::Healthy, HealthDirection::Growth) => 5,
        (HealthLevel::Unhealthy, HealthDirection::Fixation) => 5,
        (HealthLevel::Unhealthy, HealthDirection::Growth) => 1,
        (HealthLevel::Average, _) => 3,
    }
}

/// Answers as someone strongly identified with one center.
///
/// Scenario responses tagged with the center come first, other responses are
/// ordered by how much weight they give the center's types. Forced choices
/// side with the center's type whenever one is involved.
#[derive(Debug, Clone)]
pub struct CenterBiasedRespondent {
    pub center: Center,
    pub instincts: [InstinctType; 3],
    pub health: HealthLevel,
}

impl CenterBiasedRespondent {
    pub fn new(center: Center) -> Self {
        Self {
            center,
            instincts: InstinctType::ALL,
            health: HealthLevel::Average,
        }
    }

    pub fn with_instincts(mut self, instincts: [InstinctType; 3]) -> Self {
        self.instincts = instincts;
        self
    }

    pub fn with_health(mut self, health: HealthLevel) -> Self {
        self.health = health;
        self
    }

    fn affinity(&self, response: &ScenarioResponse) -> f64 {
        let tagged = if response.center == Some(self.center) {
            100.0
        } else {
            0.0
        };
        let weight: f64 = response
            .type_weights
            .iter()
            .filter(|(t, _)| self.center.contains(**t))
            .map(|(_, w)| w)
            .sum();
        tagged + weight
    }
}

impl Respondent for CenterBiasedRespondent {
    fn name(&self) -> String {
        format!("center:{}", self.center.as_str())
    }

    fn rank_scenario(&self, question: &ScenarioQuestion) -> RankingAnswer {
        rank_by(&question.responses, |r| self.affinity(r))
    }

    fn choose(&self, pair: &ForcedChoicePair) -> ForcedChoiceAnswer {
        if !self.center.contains(pair.type_a) && self.center.contains(pair.type_b) {
            ForcedChoiceAnswer::B
        } else {
            ForcedChoiceAnswer::A
        }
    }

    fn rank_instincts(&self, _set: &InstinctParagraphSet) -> InstinctRanking {
        rank_instinct_order(&self.instincts)
    }

    fn rate_health(&self, question: &HealthQuestion) -> u8 {
        rating_for(self.health, question.direction)
    }
}

/// Answers as a clear-cut example of one type.
///
/// Scenario responses are ordered by the weight they give the type, then its
/// wings. Forced choices take the type's side, or a wing's side when the type
/// is not involved.
#[derive(Debug, Clone)]
pub struct TypeAlignedRespondent {
    pub type_number: TypeNumber,
    pub instincts: [InstinctType; 3],
    pub health: HealthLevel,
}

impl TypeAlignedRespondent {
    pub fn new(type_number: TypeNumber) -> Self {
        Self {
            type_number,
            instincts: InstinctType::ALL,
            health: HealthLevel::Average,
        }
    }

    pub fn with_instincts(mut self, instincts: [InstinctType; 3]) -> Self {
        self.instincts = instincts;
        self
    }

    pub fn with_health(mut self, health: HealthLevel) -> Self {
        self.health = health;
        self
    }

    fn affinity(&self, response: &ScenarioResponse) -> f64 {
        response
            .type_weights
            .iter()
            .map(|(t, w)| {
                if *t == self.type_number {
                    w * 10.0
                } else if self.type_number.is_wing(*t) {
                    *w
                } else {
                    0.0
                }
            })
            .sum()
    }
}

impl Respondent for TypeAlignedRespondent {
    fn name(&self) -> String {
        format!("type:{}", self.type_number)
    }

    fn rank_scenario(&self, question: &ScenarioQuestion) -> RankingAnswer {
        rank_by(&question.responses, |r| self.affinity(r))
    }

    fn choose(&self, pair: &ForcedChoicePair) -> ForcedChoiceAnswer {
        pair.option_for(self.type_number)
            .or_else(|| {
                self.type_number
                    .wings()
                    .iter()
                    .find_map(|wing| pair.option_for(*wing))
            })
            .unwrap_or(ForcedChoiceAnswer::A)
    }

    fn rank_instincts(&self, _set: &InstinctParagraphSet) -> InstinctRanking {
        rank_instinct_order(&self.instincts)
    }

    fn rate_health(&self, question: &HealthQuestion) -> u8 {
        rating_for(self.health, question.direction)
    }
}

/// Build a respondent from a short description: `gut`, `heart`, `head` or
/// `type:N`.
pub fn parse_respondent(description: &str) -> Result<Arc<dyn Respondent>> {
    let description = description.trim().to_lowercase();
    let respondent: Arc<dyn Respondent> = match description.as_str() {
        "gut" => Arc::new(CenterBiasedRespondent::new(Center::Gut)),
        "heart" => Arc::new(CenterBiasedRespondent::new(Center::Heart)),
        "head" => Arc::new(CenterBiasedRespondent::new(Center::Head)),
        other => {
            let number = other
                .strip_prefix("type:")
                .and_then(|n| n.parse::<u8>().ok())
                .ok_or_else(|| {
                    AssessmentError::SimulationError(format!("unknown respondent '{}'", other))
                })?;
            Arc::new(TypeAlignedRespondent::new(TypeNumber::new(number)?))
        }
    };
    Ok(respondent)
}

/// One respondent for each center and each type.
pub fn standard_respondents() -> Vec<Arc<dyn Respondent>> {
    let mut respondents: Vec<Arc<dyn Respondent>> = Center::ALL
        .iter()
        .map(|c| Arc::new(CenterBiasedRespondent::new(*c)) as Arc<dyn Respondent>)
        .collect();
    respondents.extend(
        TypeNumber::ALL
            .iter()
            .map(|t| Arc::new(TypeAlignedRespondent::new(*t)) as Arc<dyn Respondent>),
    );
    respondents
}

/// Drive one session from intro to results.
pub fn run_session(engine: &AssessmentEngine, respondent: &dyn Respondent) -> Result<ResultReport> {
    let mut state = engine.try_start_session(&engine.create_initial_session())?;

    while let Some(current) = current_question(&state) {
        state = match &current.question {
            Question::Scenario(q) => {
                engine.try_answer_scenario(&state, &q.id, &respondent.rank_scenario(q))?
            }
            Question::ForcedChoice(q) => {
                engine.try_answer_forced_choice(&state, &q.id, respondent.choose(q))?
            }
            Question::InstinctSet(q) => {
                engine.try_answer_instinct_set(&state, &q.id, &respondent.rank_instincts(q))?
            }
            Question::Health(q) => {
                engine.try_answer_health(&state, &q.id, respondent.rate_health(q))?
            }
        };
    }

    let stage = state.stage;
    let report = state.result.ok_or_else(|| {
        AssessmentError::SimulationError(format!("session stopped in stage {}", stage))
    })?;

    debug!(
        respondent = %respondent.name(),
        primary_type = report.primary_type.get(),
        wing = %report.wing_code,
        "Simulated session complete"
    );

    Ok(report)
}

/// Outcome of one simulated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub respondent: String,
    pub primary_type: TypeNumber,
    pub wing_code: String,
    pub confidence: u32,
    pub instinct_stack: String,
    pub health: HealthLevel,
}

/// Aggregate over a batch of simulated sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub sessions: usize,
    pub primary_type_counts: BTreeMap<TypeNumber, usize>,
    pub mean_confidence: f64,
    /// Report invariant violations, prefixed with the respondent's name
    pub invariant_violations: Vec<String>,
    /// Per-session outcomes in respondent order
    pub outcomes: Vec<SessionOutcome>,
}

impl BatchSummary {
    fn from_reports(reports: Vec<(String, ResultReport)>) -> Self {
        let mut summary = Self {
            sessions: reports.len(),
            ..Self::default()
        };

        let mut confidence_total = 0.0;
        for (respondent, report) in reports {
            *summary
                .primary_type_counts
                .entry(report.primary_type)
                .or_insert(0) += 1;
            confidence_total += f64::from(report.confidence);

            for violation in check_report_invariants(&report) {
                summary
                    .invariant_violations
                    .push(format!("{}: {}", respondent, violation));
            }

            summary.outcomes.push(SessionOutcome {
                respondent,
                primary_type: report.primary_type,
                wing_code: report.wing_code.clone(),
                confidence: report.confidence,
                instinct_stack: report.instinct_stack.stack_code(),
                health: report.health.level,
            });
        }

        if summary.sessions > 0 {
            summary.mean_confidence = confidence_total / summary.sessions as f64;
        }
        summary
    }

    /// True when no report broke an invariant.
    pub fn is_clean(&self) -> bool {
        self.invariant_violations.is_empty()
    }
}

/// Run one session per respondent on the blocking pool and summarize them.
pub async fn simulate_batch(
    engine: Arc<AssessmentEngine>,
    respondents: Vec<Arc<dyn Respondent>>,
) -> Result<BatchSummary> {
    info!(sessions = respondents.len(), "Starting simulated batch");

    let handles: Vec<_> = respondents
        .into_iter()
        .map(|respondent| {
            let engine = Arc::clone(&engine);
            tokio::task::spawn_blocking(move || -> Result<(String, ResultReport)> {
                let report = run_session(&engine, respondent.as_ref())?;
                Ok((respondent.name(), report))
            })
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = handle.await.map_err(|e| {
            AssessmentError::SimulationError(format!("session task failed: {}", e))
        })??;
        reports.push(outcome);
    }

    let summary = BatchSummary::from_reports(reports);
    if summary.is_clean() {
        info!(
            sessions = summary.sessions,
            mean_confidence = summary.mean_confidence,
            "Simulated batch complete"
        );
    } else {
        warn!(
            sessions = summary.sessions,
            violations = summary.invariant_violations.len(),
            "Simulated batch produced invariant violations"
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use typology::standard_scenarios;

    fn t(n: u8) -> TypeNumber {
        TypeNumber::new(n).unwrap()
    }

    #[test]
    fn test_center_respondent_ranks_own_center_first() {
        let respondent = CenterBiasedRespondent::new(Center::Head);
        for question in standard_scenarios().iter().take(5) {
            let ranking = respondent.rank_scenario(question);
            let first = ranking.iter().find(|(_, rank)| **rank == 1).unwrap().0;
            let response = question.response(first).unwrap();
            assert_eq!(response.center, Some(Center::Head));
        }
    }

    #[test]
    fn test_center_respondent_sides_with_center() {
        let respondent = CenterBiasedRespondent::new(Center::Gut);
        let pairs = typology::standard_forced_choice_pairs();
        let pair = pairs.iter().find(|p| p.matches_pair(t(3), t(8))).unwrap();
        let choice = respondent.choose(pair);
        assert_eq!(Some(choice), pair.option_for(t(8)));
    }

    #[test]
    fn test_type_respondent_falls_back_to_wing() {
        let respondent = TypeAlignedRespondent::new(t(7));
        let pairs = typology::standard_forced_choice_pairs();
        let pair = pairs.iter().find(|p| p.matches_pair(t(6), t(9))).unwrap();
        // 7 is not involved, its wing 6 is
        assert_eq!(Some(respondent.choose(pair)), pair.option_for(t(6)));
    }

    #[test]
    fn test_parse_respondent() {
        assert_eq!(parse_respondent("gut").unwrap().name(), "center:gut");
        assert_eq!(parse_respondent("Type:4").unwrap().name(), "type:4");
        assert!(parse_respondent("type:0").is_err());
        assert!(parse_respondent("stomach").is_err());
    }

    #[test]
    fn test_run_session_reaches_results() {
        let engine = AssessmentEngine::new();
        let respondent = CenterBiasedRespondent::new(Center::Gut)
            .with_instincts([InstinctType::Sx, InstinctType::Sp, InstinctType::So])
            .with_health(HealthLevel::Healthy);

        let report = run_session(&engine, &respondent).unwrap();
        assert!(check_report_invariants(&report).is_empty());
        assert_eq!(report.instinct_stack.stack_code(), "sx/sp/so");
        assert_eq!(report.health.level, HealthLevel::Healthy);
        assert_eq!(report.content_version, engine.content_version());
    }

    #[tokio::test]
    async fn test_simulate_batch() {
        let engine = Arc::new(AssessmentEngine::new());
        let respondents = standard_respondents();
        let count = respondents.len();

        let summary = simulate_batch(engine, respondents).await.unwrap();
        assert_eq!(summary.sessions, count);
        assert_eq!(summary.outcomes.len(), count);
        assert_eq!(summary.primary_type_counts.values().sum::<usize>(), count);
        assert!(summary.is_clean(), "{:?}", summary.invariant_violations);
        assert!(summary.mean_confidence > 100.0 / 9.0);
    }
}
