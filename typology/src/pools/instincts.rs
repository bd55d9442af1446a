//! Stage 3 content: ipsative paragraph sets for the three instincts.
//!
//! Rankings are not scored one by one. The engine keeps every ranking and
//! aggregates them once the last set is answered, see [`aggregate_rankings`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::types::{InstinctScores, InstinctType};

/// Lowest rank a paragraph can receive within a set.
pub const DEFAULT_MAX_RANK: u8 = 3;

/// A ranking of one paragraph set: instinct → rank (1 = most like me).
pub type InstinctRanking = BTreeMap<InstinctType, u8>;

/// A paragraph describing one instinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct InstinctParagraph {
    /// Instinct this paragraph describes
    pub instinct: InstinctType,
    /// Paragraph text
    pub text: String,
}

/// Three paragraphs, one per instinct, framed by a shared context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct InstinctParagraphSet {
    /// Unique identifier
    pub id: String,
    /// Context label ("Free time", "Relationships", ...)
    pub context: String,
    /// Exactly three paragraphs covering sp, so and sx
    pub paragraphs: Vec<InstinctParagraph>,
}

impl InstinctParagraphSet {
    /// True when the set holds one paragraph for each instinct.
    pub fn is_complete(&self) -> bool {
        self.paragraphs.len() == InstinctType::ALL.len()
            && InstinctType::ALL
                .iter()
                .all(|i| self.paragraphs.iter().filter(|p| p.instinct == *i).count() == 1)
    }
}

/// Points for a rank: 1st → 3, 2nd → 2, 3rd → 1 with the default max rank.
pub fn rank_points(rank: u8, max_rank: u8) -> f64 {
    f64::from(max_rank) + 1.0 - f64::from(rank)
}

/// Sum the points of every collected ranking per instinct.
pub fn aggregate_rankings(rankings: &[InstinctRanking], max_rank: u8) -> InstinctScores {
    let mut scores = InstinctScores::default();
    for ranking in rankings {
        for (instinct, rank) in ranking {
            scores.add(*instinct, rank_points(*rank, max_rank));
        }
    }
    scores
}

/// The ordered instinct stack derived from aggregated scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct InstinctStack {
    /// All three instincts, strongest first
    pub order: [InstinctType; 3],
    /// Raw aggregated scores
    pub scores: InstinctScores,
    /// (first − second) / total, 0 when nothing was ranked
    pub dominant_strength: f64,
}

impl InstinctStack {
    /// Order instincts by descending score. Dominant strength is reported
    /// but never changes the order.
    pub fn from_scores(scores: InstinctScores) -> Self {
        let order = scores.ranked();
        let total = scores.total();
        let dominant_strength = if total > 0.0 {
            (scores.get(order[0]) - scores.get(order[1])) / total
        } else {
            0.0
        };

        Self {
            order,
            scores,
            dominant_strength,
        }
    }

    /// The strongest instinct.
    pub fn dominant(&self) -> InstinctType {
        self.order[0]
    }

    /// Stack code such as "sp/sx/so".
    pub fn stack_code(&self) -> String {
        self.order
            .iter()
            .map(|i| i.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn set(id: &str, context: &str, sp: &str, so: &str, sx: &str) -> InstinctParagraphSet {
    InstinctParagraphSet {
        id: id.to_string(),
        context: context.to_string(),
        paragraphs: vec![
            InstinctParagraph {
                instinct: InstinctType::Sp,
                text: sp.to_string(),
            },
            InstinctParagraph {
                instinct: InstinctType::So,
                text: so.to_string(),
            },
            InstinctParagraph {
                instinct: InstinctType::Sx,
                text: sx.to_string(),
            },
        ],
    }
}

/// The five standard paragraph sets.
pub fn standard_instinct_sets() -> Vec<InstinctParagraphSet> {
    vec![
        set(
            "instinct-free-time",
            "Free time",
            "A free weekend means getting my home in order, resting properly, cooking something good and making sure the week ahead is covered.",
            "A free weekend means seeing friends, showing up at a gathering, or catching up on what is going on in my circles.",
            "A free weekend means chasing something that really lights me up, or spending deep, absorbing time with one special person.",
        ),
        set(
            "instinct-relationships",
            "Relationships",
            "In relationships I value reliability and practical care. Someone who makes life feel secure and comfortable matters most to me.",
            "In relationships I value shared values and belonging. I want us to be part of something larger, with friends and community around us.",
            "In relationships I value intensity and chemistry. I want a merged, electric connection where we truly see each other.",
        ),
        set(
            "instinct-work",
            "Work",
            "At work I pay attention to stability, workload and resources. I want to know my position is safe and sustainable.",
            "At work I pay attention to the team, the hierarchy and my reputation. I notice who is aligned with whom.",
            "At work I pay attention to what excites me and to the few people I click with. Without passion I lose interest quickly.",
        ),
        set(
            "instinct-stress",
            "Under stress",
            "Under stress I worry about money, health or running out of something I need, and I start stocking up or cutting back.",
            "Under stress I worry about being left out, losing standing, or letting the group down.",
            "Under stress I worry about losing a key connection or feeling flat and uninspired, and I look for something intense to feel alive.",
        ),
        set(
            "instinct-priorities",
            "Priorities",
            "What matters most is having enough: enough time, energy, comfort and security to take care of myself and those who depend on me.",
            "What matters most is contributing to my community and having a recognised place within it.",
            "What matters most is passion: the people and pursuits that make me feel fully awake and attracted.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking(sp: u8, so: u8, sx: u8) -> InstinctRanking {
        [
            (InstinctType::Sp, sp),
            (InstinctType::So, so),
            (InstinctType::Sx, sx),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_rank_points() {
        assert_eq!(rank_points(1, DEFAULT_MAX_RANK), 3.0);
        assert_eq!(rank_points(2, DEFAULT_MAX_RANK), 2.0);
        assert_eq!(rank_points(3, DEFAULT_MAX_RANK), 1.0);
    }

    #[test]
    fn test_aggregate_and_stack() {
        let rankings = vec![
            ranking(1, 3, 2),
            ranking(1, 2, 3),
            ranking(2, 3, 1),
            ranking(1, 3, 2),
            ranking(2, 3, 1),
        ];
        let scores = aggregate_rankings(&rankings, DEFAULT_MAX_RANK);
        assert_eq!(scores.sp, 13.0);
        assert_eq!(scores.so, 6.0);
        assert_eq!(scores.sx, 11.0);

        let stack = InstinctStack::from_scores(scores);
        assert_eq!(
            stack.order,
            [InstinctType::Sp, InstinctType::Sx, InstinctType::So]
        );
        assert_eq!(stack.stack_code(), "sp/sx/so");
        assert_eq!(stack.dominant(), InstinctType::Sp);
        assert!((stack.dominant_strength - 2.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_rankings_yield_canonical_stack() {
        let stack = InstinctStack::from_scores(aggregate_rankings(&[], DEFAULT_MAX_RANK));
        assert_eq!(stack.order, InstinctType::ALL);
        assert_eq!(stack.dominant(), InstinctType::Sp);
        assert_eq!(stack.dominant_strength, 0.0);
    }

    #[test]
    fn test_standard_sets_are_complete() {
        let sets = standard_instinct_sets();
        assert_eq!(sets.len(), 5);
        assert!(sets.iter().all(InstinctParagraphSet::is_complete));
    }
}
