//! Stage 1 content: ranked multiple-response scenarios.
//!
//! The first five scenarios separate the three centers (each response speaks
//! for one center and weights that center's three types). The last three
//! differentiate types across centers using the classic triads, so their
//! responses carry no center tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::types::{Center, TypeNumber, TypeScores};

/// Weight applied to a response's raw type weights, by rank (1st, 2nd, 3rd).
pub const DEFAULT_RANK_WEIGHTS: [f64; 3] = [1.0, 0.5, 0.0];

/// A respondent's ranking of one scenario: response id → rank (1 = most like me).
pub type RankingAnswer = BTreeMap<String, u8>;

/// Which part of stage 1 a scenario belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ScenarioPhase {
    /// Separates gut, heart and head
    CenterIdentification,
    /// Separates types across centers
    CenterDifferentiation,
}

/// One rankable response to a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ScenarioResponse {
    /// Unique identifier within the scenario
    pub id: String,
    /// The response text shown to the respondent
    pub text: String,
    /// Raw weight per type this response speaks for
    pub type_weights: BTreeMap<TypeNumber, f64>,
    /// Center this response represents, if any
    pub center: Option<Center>,
}

/// A situation with three responses to be ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ScenarioQuestion {
    /// Unique identifier
    pub id: String,
    /// Stage 1 phase
    pub phase: ScenarioPhase,
    /// Situation description
    pub situation: String,
    /// Exactly three responses
    pub responses: Vec<ScenarioResponse>,
}

impl ScenarioQuestion {
    /// Find a response by id.
    pub fn response(&self, id: &str) -> Option<&ScenarioResponse> {
        self.responses.iter().find(|r| r.id == id)
    }
}

/// Weight for a rank; ranks outside the table weigh nothing.
pub fn rank_weight(rank: u8, rank_weights: &[f64; 3]) -> f64 {
    match rank {
        1..=3 => rank_weights[(rank - 1) as usize],
        _ => 0.0,
    }
}

/// Contribution of one ranked scenario to the type score vector.
///
/// Every ranked response adds `raw weight × rank weight` to each type it
/// lists. Responses missing from the answer contribute nothing, as do answer
/// keys that name no response.
pub fn score_ranking(
    question: &ScenarioQuestion,
    answer: &RankingAnswer,
    rank_weights: &[f64; 3],
) -> TypeScores {
    let mut contribution = TypeScores::new();

    for response in &question.responses {
        let Some(rank) = answer.get(&response.id) else {
            continue;
        };
        let multiplier = rank_weight(*rank, rank_weights);
        for (type_number, weight) in &response.type_weights {
            contribution.add(*type_number, weight * multiplier);
        }
    }

    contribution
}

fn response(
    id: &str,
    text: &str,
    weights: &[(u8, f64)],
    center: Option<Center>,
) -> ScenarioResponse {
    ScenarioResponse {
        id: id.to_string(),
        text: text.to_string(),
        type_weights: weights
            .iter()
            .map(|(t, w)| (TypeNumber::known(*t), *w))
            .collect(),
        center,
    }
}

fn scenario(
    id: &str,
    phase: ScenarioPhase,
    situation: &str,
    responses: Vec<ScenarioResponse>,
) -> ScenarioQuestion {
    ScenarioQuestion {
        id: id.to_string(),
        phase,
        situation: situation.to_string(),
        responses,
    }
}

/// The standard eight stage-1 scenarios: five center-identification
/// scenarios followed by three center-differentiation scenarios.
pub fn standard_scenarios() -> Vec<ScenarioQuestion> {
    use ScenarioPhase::{CenterDifferentiation, CenterIdentification};

    vec![
        scenario(
            "scenario-conflict",
            CenterIdentification,
            "A colleague publicly takes credit for work you did. In the moment, what is closest to your first reaction?",
            vec![
                response(
                    "scenario-conflict-gut",
                    "A surge of heat in my body. I want to set the record straight right away, or I go still and let it sit like a stone.",
                    &[(8, 3.0), (1, 2.0), (9, 1.0)],
                    Some(Center::Gut),
                ),
                response(
                    "scenario-conflict-heart",
                    "I feel hurt and wonder how the others in the room now see me. My standing matters here.",
                    &[(2, 2.0), (3, 3.0), (4, 2.0)],
                    Some(Center::Heart),
                ),
                response(
                    "scenario-conflict-head",
                    "I step back and analyse: why did they do it, what are the risks, and what is my best move?",
                    &[(5, 3.0), (6, 2.0), (7, 2.0)],
                    Some(Center::Head),
                ),
            ],
        ),
        scenario(
            "scenario-decision",
            CenterIdentification,
            "You have to make an important decision with incomplete information. How do you usually get there?",
            vec![
                response(
                    "scenario-decision-head",
                    "I research, compare options and think through scenarios until I feel prepared.",
                    &[(5, 3.0), (6, 3.0), (7, 1.0)],
                    Some(Center::Head),
                ),
                response(
                    "scenario-decision-gut",
                    "I go with my gut. I know what is right or wrong even if I cannot explain it.",
                    &[(8, 2.0), (1, 3.0), (9, 2.0)],
                    Some(Center::Gut),
                ),
                response(
                    "scenario-decision-heart",
                    "I consider how the choice will affect the people involved and how it reflects on who I am.",
                    &[(2, 3.0), (3, 1.0), (4, 3.0)],
                    Some(Center::Heart),
                ),
            ],
        ),
        scenario(
            "scenario-pressure",
            CenterIdentification,
            "When pressure builds at work for several weeks, what tends to take over?",
            vec![
                response(
                    "scenario-pressure-heart",
                    "Worry about how I am coming across, and a push to keep people's approval or admiration.",
                    &[(2, 2.0), (3, 3.0), (4, 1.0)],
                    Some(Center::Heart),
                ),
                response(
                    "scenario-pressure-head",
                    "Anxiety and overthinking. My mind races through what could go wrong.",
                    &[(5, 2.0), (6, 3.0), (7, 2.0)],
                    Some(Center::Head),
                ),
                response(
                    "scenario-pressure-gut",
                    "Irritation or anger, sometimes held in and sometimes released. I want to control what I can.",
                    &[(8, 3.0), (1, 3.0), (9, 1.0)],
                    Some(Center::Gut),
                ),
            ],
        ),
        scenario(
            "scenario-newgroup",
            CenterIdentification,
            "You join a new group where you know nobody. What do you pay attention to first?",
            vec![
                response(
                    "scenario-newgroup-gut",
                    "Who holds power here, where I stand, and whether I can just be myself without being pushed around.",
                    &[(8, 3.0), (9, 2.0), (1, 1.0)],
                    Some(Center::Gut),
                ),
                response(
                    "scenario-newgroup-head",
                    "How this group works, whether it is safe, and what possibilities it opens up.",
                    &[(5, 2.0), (6, 2.0), (7, 3.0)],
                    Some(Center::Head),
                ),
                response(
                    "scenario-newgroup-heart",
                    "How people respond to me, who I connect with, and what impression I am making.",
                    &[(2, 3.0), (3, 2.0), (4, 2.0)],
                    Some(Center::Heart),
                ),
            ],
        ),
        scenario(
            "scenario-criticism",
            CenterIdentification,
            "Someone close to you criticises a choice you made. What is hardest about it?",
            vec![
                response(
                    "scenario-criticism-head",
                    "The doubt it plants. I start questioning whether I understood the situation at all.",
                    &[(5, 2.0), (6, 3.0), (7, 1.0)],
                    Some(Center::Head),
                ),
                response(
                    "scenario-criticism-heart",
                    "The feeling that they see me differently now, or that I let them down.",
                    &[(2, 2.0), (3, 2.0), (4, 3.0)],
                    Some(Center::Heart),
                ),
                response(
                    "scenario-criticism-gut",
                    "The sense of being judged or controlled. I either push back or go quiet to keep the peace.",
                    &[(8, 2.0), (1, 2.0), (9, 3.0)],
                    Some(Center::Gut),
                ),
            ],
        ),
        scenario(
            "scenario-needs",
            CenterDifferentiation,
            "When you want something from other people, how do you usually go about getting it?",
            vec![
                response(
                    "scenario-needs-assertive",
                    "I ask for it directly or just go after it. I expect to be the one who makes it happen.",
                    &[(3, 2.0), (7, 2.0), (8, 2.0)],
                    None,
                ),
                response(
                    "scenario-needs-withdrawn",
                    "I step back into my own space and wait. I often need time alone before I know what I want.",
                    &[(4, 2.0), (5, 2.0), (9, 2.0)],
                    None,
                ),
                response(
                    "scenario-needs-compliant",
                    "I try to earn it by doing what is expected and meeting my responsibilities.",
                    &[(1, 2.0), (2, 2.0), (6, 2.0)],
                    None,
                ),
            ],
        ),
        scenario(
            "scenario-setback",
            CenterDifferentiation,
            "A project you care about falls apart. How do you typically respond?",
            vec![
                response(
                    "scenario-setback-positive",
                    "I look for the bright side and focus on what still works. Dwelling on it does not help anyone.",
                    &[(2, 2.0), (7, 2.0), (9, 2.0)],
                    None,
                ),
                response(
                    "scenario-setback-competency",
                    "I set my feelings aside, figure out what went wrong and fix it properly next time.",
                    &[(1, 2.0), (3, 2.0), (5, 2.0)],
                    None,
                ),
                response(
                    "scenario-setback-reactive",
                    "I feel it strongly and need others to know how I feel before I can move on.",
                    &[(4, 2.0), (6, 2.0), (8, 2.0)],
                    None,
                ),
            ],
        ),
        scenario(
            "scenario-longing",
            CenterDifferentiation,
            "Which of these feels most like an old, familiar ache?",
            vec![
                response(
                    "scenario-longing-attachment",
                    "Holding on to people and roles that keep me steady, even when they no longer fit.",
                    &[(3, 2.0), (6, 2.0), (9, 2.0)],
                    None,
                ),
                response(
                    "scenario-longing-frustration",
                    "A sense that nothing is ever quite what I wanted. Something is always missing or not right.",
                    &[(1, 2.0), (4, 2.0), (7, 2.0)],
                    None,
                ),
                response(
                    "scenario-longing-rejection",
                    "Expecting not to be wanted as I am, so I protect myself before anyone else can.",
                    &[(2, 2.0), (5, 2.0), (8, 2.0)],
                    None,
                ),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(n: u8) -> TypeNumber {
        TypeNumber::new(n).unwrap()
    }

    fn sample_question() -> ScenarioQuestion {
        scenario(
            "sample",
            ScenarioPhase::CenterIdentification,
            "sample situation",
            vec![
                response("a", "gut", &[(8, 3.0), (1, 2.0), (9, 1.0)], Some(Center::Gut)),
                response("b", "heart", &[(2, 2.0), (3, 3.0), (4, 2.0)], Some(Center::Heart)),
                response("c", "head", &[(5, 3.0), (6, 2.0), (7, 2.0)], Some(Center::Head)),
            ],
        )
    }

    #[test]
    fn test_ranking_contribution() {
        let question = sample_question();
        let answer: RankingAnswer = [("a", 1), ("b", 2), ("c", 3)]
            .into_iter()
            .map(|(id, rank)| (id.to_string(), rank))
            .collect();

        let scores = score_ranking(&question, &answer, &DEFAULT_RANK_WEIGHTS);

        assert_eq!(scores.get(t(8)), 3.0);
        assert_eq!(scores.get(t(1)), 2.0);
        assert_eq!(scores.get(t(9)), 1.0);
        assert_eq!(scores.get(t(2)), 1.0);
        assert_eq!(scores.get(t(3)), 1.5);
        assert_eq!(scores.get(t(4)), 1.0);
        for head in [5, 6, 7] {
            assert_eq!(scores.get(t(head)), 0.0);
        }
    }

    #[test]
    fn test_unranked_responses_contribute_nothing() {
        let question = sample_question();
        let mut answer = RankingAnswer::new();
        answer.insert("b".to_string(), 1);
        answer.insert("not-a-response".to_string(), 1);

        let scores = score_ranking(&question, &answer, &DEFAULT_RANK_WEIGHTS);

        assert_eq!(scores.get(t(3)), 3.0);
        assert_eq!(scores.get(t(8)), 0.0);
        assert_eq!(scores.total(), 7.0);
    }

    #[test]
    fn test_rank_weight_out_of_range() {
        assert_eq!(rank_weight(0, &DEFAULT_RANK_WEIGHTS), 0.0);
        assert_eq!(rank_weight(4, &DEFAULT_RANK_WEIGHTS), 0.0);
        assert_eq!(rank_weight(2, &DEFAULT_RANK_WEIGHTS), 0.5);
    }

    #[test]
    fn test_standard_scenarios_layout() {
        let scenarios = standard_scenarios();
        assert_eq!(scenarios.len(), 8);

        let identification = scenarios
            .iter()
            .take_while(|s| s.phase == ScenarioPhase::CenterIdentification)
            .count();
        assert_eq!(identification, 5);

        for scenario in &scenarios[..5] {
            let mut centers: Vec<_> = scenario.responses.iter().filter_map(|r| r.center).collect();
            centers.sort();
            assert_eq!(centers, vec![Center::Gut, Center::Heart, Center::Head]);
            for response in &scenario.responses {
                let center = response.center.unwrap();
                assert!(response.type_weights.keys().all(|t| center.contains(*t)));
            }
        }
    }

    #[test]
    fn test_differentiation_triads_cover_every_type() {
        for scenario in &standard_scenarios()[5..] {
            let mut covered: Vec<_> = scenario
                .responses
                .iter()
                .flat_map(|r| r.type_weights.keys().copied())
                .collect();
            covered.sort();
            assert_eq!(covered, TypeNumber::ALL.to_vec(), "{}", scenario.id);
        }
    }
}
