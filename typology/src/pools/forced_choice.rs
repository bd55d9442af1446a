//! Stage 2 content: binary forced-choice items over confusable type pairs.
//!
//! Ten pairs that are commonly mistaken for each other each get at least two
//! items. Which items a respondent sees is decided at runtime from their
//! stage 1 scores; this module only holds the pool and the scoring rule.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::types::{TypeNumber, TypeScores};

/// Fraction of the untaken option's strength subtracted from its type.
pub const DEFAULT_FORCED_CHOICE_PENALTY: f64 = 0.5;

/// One side of a forced-choice item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ForcedChoiceOption {
    /// Statement shown to the respondent
    pub text: String,
    /// How strongly the statement indicates its type (0.0-1.0)
    pub strength: f64,
}

/// A two-option item distinguishing `type_a` from `type_b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ForcedChoicePair {
    /// Unique identifier
    pub id: String,
    /// Type indicated by option A
    pub type_a: TypeNumber,
    /// Type indicated by option B
    pub type_b: TypeNumber,
    /// Option speaking for `type_a`
    pub option_a: ForcedChoiceOption,
    /// Option speaking for `type_b`
    pub option_b: ForcedChoiceOption,
    /// What the item contrasts (motivation, fear, ...)
    pub dimension: String,
}

/// Which option the respondent picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum ForcedChoiceAnswer {
    A,
    B,
}

impl ForcedChoicePair {
    /// True when this item covers the unordered pair {x, y}.
    pub fn matches_pair(&self, x: TypeNumber, y: TypeNumber) -> bool {
        (self.type_a == x && self.type_b == y) || (self.type_a == y && self.type_b == x)
    }

    /// True when either side targets `type_number`.
    pub fn involves(&self, type_number: TypeNumber) -> bool {
        self.type_a == type_number || self.type_b == type_number
    }

    /// The answer that favours `type_number`, if this item targets it.
    pub fn option_for(&self, type_number: TypeNumber) -> Option<ForcedChoiceAnswer> {
        if self.type_a == type_number {
            Some(ForcedChoiceAnswer::A)
        } else if self.type_b == type_number {
            Some(ForcedChoiceAnswer::B)
        } else {
            None
        }
    }
}

/// Contribution of one forced choice to the type score vector.
///
/// The chosen type gains its option's strength; the other type loses
/// `penalty ×` its own option's strength.
pub fn score_forced_choice(
    pair: &ForcedChoicePair,
    answer: ForcedChoiceAnswer,
    penalty: f64,
) -> TypeScores {
    let mut contribution = TypeScores::new();
    match answer {
        ForcedChoiceAnswer::A => {
            contribution.add(pair.type_a, pair.option_a.strength);
            contribution.add(pair.type_b, -penalty * pair.option_b.strength);
        }
        ForcedChoiceAnswer::B => {
            contribution.add(pair.type_b, pair.option_b.strength);
            contribution.add(pair.type_a, -penalty * pair.option_a.strength);
        }
    }
    contribution
}

fn pair(
    id: &str,
    (type_a, text_a, strength_a): (u8, &str, f64),
    (type_b, text_b, strength_b): (u8, &str, f64),
    dimension: &str,
) -> ForcedChoicePair {
    ForcedChoicePair {
        id: id.to_string(),
        type_a: TypeNumber::known(type_a),
        type_b: TypeNumber::known(type_b),
        option_a: ForcedChoiceOption {
            text: text_a.to_string(),
            strength: strength_a,
        },
        option_b: ForcedChoiceOption {
            text: text_b.to_string(),
            strength: strength_b,
        },
        dimension: dimension.to_string(),
    }
}

/// The standard forced-choice pool.
pub fn standard_forced_choice_pairs() -> Vec<ForcedChoicePair> {
    vec![
        // 1 vs 3
        pair(
            "fc-1-3-motivation",
            (1, "I work hard because things should be done correctly.", 0.9),
            (3, "I work hard because I want to succeed and be recognised for it.", 0.9),
            "motivation",
        ),
        pair(
            "fc-1-3-shortcut",
            (1, "Cutting corners bothers me even when nobody would notice.", 0.8),
            (3, "I will cut a corner if it gets a good result faster.", 0.8),
            "standards",
        ),
        // 1 vs 6
        pair(
            "fc-1-6-rules",
            (1, "I follow rules because I believe they are right.", 0.8),
            (6, "I follow rules because they keep things safe and predictable.", 0.8),
            "motivation",
        ),
        pair(
            "fc-1-6-inner-voice",
            (1, "My inner voice tells me what I should have done better.", 0.9),
            (6, "My inner voice asks what could go wrong next.", 0.9),
            "inner_critic",
        ),
        pair(
            "fc-1-6-authority",
            (1, "I trust my own sense of right over what authorities say.", 0.7),
            (6, "I look for someone or something reliable I can trust.", 0.7),
            "authority",
        ),
        // 2 vs 6
        pair(
            "fc-2-6-helping",
            (2, "I help others because I want to be close to them and needed.", 0.9),
            (6, "I help others because it builds mutual loyalty and support.", 0.8),
            "motivation",
        ),
        pair(
            "fc-2-6-fear",
            (2, "I fear being unwanted or unloved.", 0.9),
            (6, "I fear being without support or guidance.", 0.9),
            "core_fear",
        ),
        // 2 vs 9
        pair(
            "fc-2-9-accommodation",
            (2, "I go along with others so they will appreciate me.", 0.8),
            (9, "I go along with others so there is no conflict.", 0.8),
            "accommodation",
        ),
        pair(
            "fc-2-9-attention",
            (2, "I notice what others need and move towards them.", 0.9),
            (9, "I blend in with what others want and lose track of my own wishes.", 0.9),
            "attention",
        ),
        // 3 vs 7
        pair(
            "fc-3-7-busy",
            (3, "I stay busy because I have goals to achieve.", 0.8),
            (7, "I stay busy because there is so much I want to experience.", 0.8),
            "motivation",
        ),
        pair(
            "fc-3-7-avoid",
            (3, "I avoid failure and looking incompetent.", 0.9),
            (7, "I avoid boredom and feeling trapped in pain.", 0.9),
            "core_fear",
        ),
        // 3 vs 8
        pair(
            "fc-3-8-drive",
            (3, "I push forward to be successful and admired.", 0.9),
            (8, "I push forward to stay in control and not be controlled.", 0.9),
            "motivation",
        ),
        pair(
            "fc-3-8-image",
            (3, "I adjust how I come across depending on the audience.", 0.8),
            (8, "I come across the same way no matter who is watching.", 0.8),
            "self_presentation",
        ),
        pair(
            "fc-3-8-conflict",
            (3, "I avoid open conflict when it might hurt my reputation.", 0.7),
            (8, "I would rather face conflict head-on than let something slide.", 0.9),
            "conflict",
        ),
        // 4 vs 5
        pair(
            "fc-4-5-withdraw",
            (4, "I withdraw to feel my emotions more deeply.", 0.9),
            (5, "I withdraw to think and conserve my energy.", 0.9),
            "withdrawal",
        ),
        pair(
            "fc-4-5-identity",
            (4, "Being seen as unique and authentic matters to me.", 0.8),
            (5, "Being seen as competent and knowledgeable matters to me.", 0.8),
            "identity",
        ),
        // 5 vs 9
        pair(
            "fc-5-9-detachment",
            (5, "I detach to observe and understand.", 0.8),
            (9, "I detach to stay calm and undisturbed.", 0.8),
            "detachment",
        ),
        pair(
            "fc-5-9-demands",
            (5, "Demands on my time and energy feel like they drain me.", 0.9),
            (9, "Demands on me feel like they disturb my inner peace.", 0.9),
            "boundaries",
        ),
        pair(
            "fc-5-9-focus",
            (5, "I can lose myself in a subject for hours.", 0.7),
            (9, "I can lose myself in comfortable routines for hours.", 0.7),
            "attention",
        ),
        // 6 vs 9
        pair(
            "fc-6-9-worry",
            (6, "I anticipate problems and prepare for them.", 0.9),
            (9, "I hope problems will resolve themselves if I wait.", 0.9),
            "coping",
        ),
        pair(
            "fc-6-9-decisions",
            (6, "I doubt my decisions and seek reassurance.", 0.8),
            (9, "I postpone decisions so I do not upset anyone.", 0.8),
            "decisions",
        ),
        // 8 vs 9
        pair(
            "fc-8-9-anger",
            (8, "When I am angry, people know it immediately.", 0.9),
            (9, "When I am angry, I push it down and often do not notice it myself.", 0.9),
            "anger",
        ),
        pair(
            "fc-8-9-space",
            (8, "I claim my space and defend it.", 0.8),
            (9, "I make room for others and take whatever space is left.", 0.8),
            "presence",
        ),
        pair(
            "fc-8-9-pressure",
            (8, "Under pressure I take charge.", 0.8),
            (9, "Under pressure I go along and stay steady.", 0.7),
            "stress",
        ),
    ]
}
