//! Stage 4 content: health (adjustment) rating items.
//!
//! Every type has four items: two describing its fixation and two describing
//! its growth direction. Only the primary type's items are asked, and they are
//! scored together once the last rating is in.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::types::TypeNumber;

/// Whether agreeing with an item signals strain or growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum HealthDirection {
    /// Agreement indicates the type's habitual fixation
    Fixation,
    /// Agreement indicates movement towards growth
    Growth,
}

/// Banded health outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum HealthLevel {
    Healthy,
    Average,
    Unhealthy,
}

impl HealthLevel {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Average => "average",
            Self::Unhealthy => "unhealthy",
        }
    }
}

/// A 1-5 agreement item targeting one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct HealthQuestion {
    /// Unique identifier
    pub id: String,
    /// Statement to rate
    pub text: String,
    /// Type this item belongs to
    pub target_type: TypeNumber,
    /// Fixation or growth
    pub direction: HealthDirection,
    /// Aspect being rated (e.g. "resentment", "serenity")
    pub aspect: String,
}

/// Numeric bands and rating scale used by [`assess_health`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthThresholds {
    /// Midpoint of the rating scale; also the default for an empty direction
    pub neutral_rating: f64,
    /// Distance from the midpoint to either end of the scale
    pub rating_half_range: f64,
    /// Overall score above this is healthy
    pub healthy_threshold: f64,
    /// Overall score below this is unhealthy
    pub unhealthy_threshold: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            neutral_rating: 3.0,
            rating_half_range: 2.0,
            healthy_threshold: 30.0,
            unhealthy_threshold: -30.0,
        }
    }
}

/// Scored health for one type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct HealthAssessment {
    pub level: HealthLevel,
    /// Overall score in [-100, 100]
    pub score: f64,
    /// +100 when fixation items are fully rejected, -100 when fully endorsed
    pub fixation_score: f64,
    /// +100 when growth items are fully endorsed, -100 when fully rejected
    pub growth_score: f64,
}

fn average_or(ratings: &[f64], default: f64) -> f64 {
    if ratings.is_empty() {
        default
    } else {
        ratings.iter().sum::<f64>() / ratings.len() as f64
    }
}

/// Score a set of (direction, rating) answers.
///
/// Each direction is averaged on its own (a direction with no answers counts
/// as neutral). Endorsing fixation items lowers the score, endorsing growth
/// items raises it, and the overall score is the mean of the two.
pub fn assess_health<I>(answers: I, thresholds: &HealthThresholds) -> HealthAssessment
where
    I: IntoIterator<Item = (HealthDirection, u8)>,
{
    let mut fixation = Vec::new();
    let mut growth = Vec::new();
    for (direction, rating) in answers {
        match direction {
            HealthDirection::Fixation => fixation.push(f64::from(rating)),
            HealthDirection::Growth => growth.push(f64::from(rating)),
        }
    }

    let neutral = thresholds.neutral_rating;
    let half_range = thresholds.rating_half_range;
    let fixation_avg = average_or(&fixation, neutral);
    let growth_avg = average_or(&growth, neutral);

    // Ratings are not range-checked, so every score is held to [-100, 100]
    let fixation_score = (((fixation_avg - neutral) / half_range) * -100.0).clamp(-100.0, 100.0);
    let growth_score = (((growth_avg - neutral) / half_range) * 100.0).clamp(-100.0, 100.0);
    let score = (fixation_score + growth_score) / 2.0;

    let level = if score > thresholds.healthy_threshold {
        HealthLevel::Healthy
    } else if score < thresholds.unhealthy_threshold {
        HealthLevel::Unhealthy
    } else {
        HealthLevel::Average
    };

    HealthAssessment {
        level,
        score,
        fixation_score,
        growth_score,
    }
}

/// The items targeting one type, in pool order.
pub fn questions_for(pool: &[HealthQuestion], type_number: TypeNumber) -> Vec<HealthQuestion> {
    pool.iter()
        .filter(|q| q.target_type == type_number)
        .cloned()
        .collect()
}

/// Fixation and growth vocabulary per type, used for interpretations.
fn type_themes(type_number: TypeNumber) -> (&'static str, &'static str) {
    match type_number.get() {
        1 => ("resentful perfectionism", "serenity and acceptance"),
        2 => ("flattery and self-neglect", "humility and honest care"),
        3 => ("image management", "authenticity"),
        4 => ("envy and melancholy", "equanimity and creative grounding"),
        5 => ("withdrawal and avarice of energy", "engaged generosity"),
        6 => ("anxious doubt", "courage and inner trust"),
        7 => ("restless escapism", "sobriety and presence"),
        8 => ("domination and lust for control", "protective magnanimity"),
        _ => ("self-forgetting inertia", "engaged right action"),
    }
}

/// Human-readable interpretation of a health level for one type.
pub fn interpretation(type_number: TypeNumber, level: HealthLevel) -> String {
    let (fixation, growth) = type_themes(type_number);
    match level {
        HealthLevel::Healthy => format!(
            "Your answers point to a well-resourced Type {}: {} is clearly present, and the pull of {} seems to have little grip on you right now.",
            type_number, growth, fixation
        ),
        HealthLevel::Average => format!(
            "Your answers show a typical mix for Type {}: moments of {} alongside familiar habits of {}.",
            type_number, growth, fixation
        ),
        HealthLevel::Unhealthy => format!(
            "Your answers suggest Type {} under strain: patterns of {} are strong at the moment, and {} feels out of reach. Gentle attention here may help.",
            type_number, fixation, growth
        ),
    }
}

fn item(
    id: &str,
    target: u8,
    direction: HealthDirection,
    aspect: &str,
    text: &str,
) -> HealthQuestion {
    HealthQuestion {
        id: id.to_string(),
        text: text.to_string(),
        target_type: TypeNumber::known(target),
        direction,
        aspect: aspect.to_string(),
    }
}

/// The standard health pool: four items for each of the nine types.
pub fn standard_health_questions() -> Vec<HealthQuestion> {
    use HealthDirection::{Fixation, Growth};

    vec![
        item(
            "health-1-resentment",
            1,
            Fixation,
            "resentment",
            "I often feel irritated when others do not meet my standards.",
        ),
        item(
            "health-1-criticism",
            1,
            Fixation,
            "self_criticism",
            "My inner critic rarely gives me a break.",
        ),
        item(
            "health-1-serenity",
            1,
            Growth,
            "serenity",
            "I can accept things as they are without needing to fix them.",
        ),
        item(
            "health-1-play",
            1,
            Growth,
            "spontaneity",
            "I make time for fun even when there is still work to do.",
        ),
        item(
            "health-2-pride",
            2,
            Fixation,
            "pride",
            "I feel unappreciated when people do not notice how much I do for them.",
        ),
        item(
            "health-2-selfneglect",
            2,
            Fixation,
            "self_neglect",
            "I find it hard to admit my own needs.",
        ),
        item(
            "health-2-humility",
            2,
            Growth,
            "humility",
            "I help without expecting anything in return.",
        ),
        item(
            "health-2-receive",
            2,
            Growth,
            "receiving",
            "I can ask for help and accept it comfortably.",
        ),
        item(
            "health-3-image",
            3,
            Fixation,
            "image",
            "I adjust myself to whatever will impress the people around me.",
        ),
        item(
            "health-3-worth",
            3,
            Fixation,
            "worth",
            "I feel worthless when I am not achieving something.",
        ),
        item(
            "health-3-authentic",
            3,
            Growth,
            "authenticity",
            "I show people who I really am, even when it is not impressive.",
        ),
        item(
            "health-3-rest",
            3,
            Growth,
            "being",
            "I can value myself on days when I accomplish nothing.",
        ),
        item(
            "health-4-envy",
            4,
            Fixation,
            "envy",
            "I often feel that others have something essential that I lack.",
        ),
        item(
            "health-4-withdraw",
            4,
            Fixation,
            "melancholy",
            "I get lost in painful feelings for long stretches of time.",
        ),
        item(
            "health-4-equanimity",
            4,
            Growth,
            "equanimity",
            "I can feel deeply without being swept away by it.",
        ),
        item(
            "health-4-action",
            4,
            Growth,
            "discipline",
            "I turn my feelings into steady, practical action.",
        ),
        item(
            "health-5-avarice",
            5,
            Fixation,
            "avarice",
            "I guard my time and energy as if they could run out at any moment.",
        ),
        item(
            "health-5-detach",
            5,
            Fixation,
            "detachment",
            "I observe life from a distance rather than taking part in it.",
        ),
        item(
            "health-5-engage",
            5,
            Growth,
            "engagement",
            "I share what I know and what I feel with the people around me.",
        ),
        item(
            "health-5-confidence",
            5,
            Growth,
            "confidence",
            "I act on what I know without waiting to know everything.",
        ),
        item(
            "health-6-doubt",
            6,
            Fixation,
            "doubt",
            "I second-guess myself and the people I rely on.",
        ),
        item(
            "health-6-worst",
            6,
            Fixation,
            "catastrophising",
            "My mind jumps to the worst possible outcome.",
        ),
        item(
            "health-6-courage",
            6,
            Growth,
            "courage",
            "I trust my own judgement and act on it even when I am afraid.",
        ),
        item(
            "health-6-calm",
            6,
            Growth,
            "inner_trust",
            "I feel a basic sense of safety inside myself.",
        ),
        item(
            "health-7-escape",
            7,
            Fixation,
            "escapism",
            "I keep myself busy so I do not have to feel painful things.",
        ),
        item(
            "health-7-scatter",
            7,
            Fixation,
            "scattering",
            "I start far more things than I finish.",
        ),
        item(
            "health-7-presence",
            7,
            Growth,
            "presence",
            "I can stay with one experience fully, even a difficult one.",
        ),
        item("health-7-depth", 7, Growth, "sobriety", "I feel satisfied with what I already have."),
        item("health-8-control", 8, Fixation, "control", "I need to be in control to feel safe."),
        item(
            "health-8-armour",
            8,
            Fixation,
            "invulnerability",
            "I rarely let anyone see me vulnerable.",
        ),
        item(
            "health-8-protect",
            8,
            Growth,
            "magnanimity",
            "I use my strength to protect and empower others.",
        ),
        item(
            "health-8-soft",
            8,
            Growth,
            "tenderness",
            "I can show tenderness without feeling weak.",
        ),
        item(
            "health-9-numb",
            9,
            Fixation,
            "self_forgetting",
            "I lose track of what I want by going along with others.",
        ),
        item(
            "health-9-inertia",
            9,
            Fixation,
            "inertia",
            "I put off important things until they can no longer be avoided.",
        ),
        item(
            "health-9-voice",
            9,
            Growth,
            "self_assertion",
            "I speak up for my own priorities, even if it causes friction.",
        ),
        item(
            "health-9-action",
            9,
            Growth,
            "right_action",
            "I take clear action on what matters most to me.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use HealthDirection::{Fixation, Growth};

    fn t(n: u8) -> TypeNumber {
        TypeNumber::new(n).unwrap()
    }

    #[test]
    fn test_strained_answers_are_unhealthy() {
        let health = assess_health(
            [(Fixation, 5), (Fixation, 5), (Growth, 1), (Growth, 1)],
            &HealthThresholds::default(),
        );
        assert_eq!(health.fixation_score, -100.0);
        assert_eq!(health.growth_score, -100.0);
        assert_eq!(health.score, -100.0);
        assert_eq!(health.level, HealthLevel::Unhealthy);
    }

    #[test]
    fn test_growth_answers_are_healthy() {
        let health = assess_health(
            [(Fixation, 1), (Fixation, 2), (Growth, 5), (Growth, 4)],
            &HealthThresholds::default(),
        );
        assert_eq!(health.fixation_score, 75.0);
        assert_eq!(health.growth_score, 75.0);
        assert_eq!(health.level, HealthLevel::Healthy);
    }

    #[test]
    fn test_missing_direction_defaults_to_neutral() {
        let health = assess_health([(Growth, 5)], &HealthThresholds::default());
        assert_eq!(health.fixation_score, 0.0);
        assert_eq!(health.growth_score, 100.0);
        assert_eq!(health.score, 50.0);
        assert_eq!(health.level, HealthLevel::Healthy);

        let empty = assess_health(Vec::new(), &HealthThresholds::default());
        assert_eq!(empty.score, 0.0);
        assert_eq!(empty.level, HealthLevel::Average);
    }

    #[test]
    fn test_threshold_boundaries_are_average() {
        // fixation avg 3 → 0, growth avg 3.6 → 30, overall 15
        let health = assess_health(
            [(Fixation, 3), (Growth, 4), (Growth, 4), (Growth, 3), (Growth, 4), (Growth, 3)],
            &HealthThresholds::default(),
        );
        assert_eq!(health.level, HealthLevel::Average);
    }

    #[test]
    fn test_out_of_range_ratings_are_clamped() {
        // fixation avg 0 → 150, growth avg 255 → 12600 before clamping
        let health = assess_health([(Fixation, 0), (Growth, 255)], &HealthThresholds::default());
        assert_eq!(health.fixation_score, 100.0);
        assert_eq!(health.growth_score, 100.0);
        assert_eq!(health.score, 100.0);
        assert_eq!(health.level, HealthLevel::Healthy);

        let health = assess_health([(Fixation, 255), (Growth, 0)], &HealthThresholds::default());
        assert_eq!(health.fixation_score, -100.0);
        assert_eq!(health.growth_score, -100.0);
        assert_eq!(health.score, -100.0);
        assert_eq!(health.level, HealthLevel::Unhealthy);
    }

    #[test]
    fn test_pool_has_two_of_each_direction_per_type() {
        let pool = standard_health_questions();
        assert_eq!(pool.len(), 36);
        for type_number in TypeNumber::ALL {
            let items = questions_for(&pool, type_number);
            assert_eq!(items.len(), 4);
            assert_eq!(items.iter().filter(|q| q.direction == Fixation).count(), 2);
            assert_eq!(items.iter().filter(|q| q.direction == Growth).count(), 2);
        }
    }

    #[test]
    fn test_interpretation_mentions_type() {
        let text = interpretation(t(6), HealthLevel::Unhealthy);
        assert!(text.contains("Type 6"));
        assert!(text.contains("anxious doubt"));
    }
}
