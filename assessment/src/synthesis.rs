//! Result synthesis.
//!
//! Turns a finished session into a [`ResultReport`]. The type distribution
//! comes only from stages 1 and 2; stage 3 feeds the instinct stack and
//! stage 4 the health summary.

use chrono::Utc;
use tracing::info;

use typology::{
    aggregate_rankings, assess_health, interpretation, Center, InstinctRanking, InstinctStack,
    InstinctType, TypeNumber, TypeScores,
};

use crate::config::AssessmentConfig;
use crate::session::SessionState;
use crate::types::{CenterShare, HealthSummary, ResultReport, TypeScoreEntry};

/// Normalize raw scores into integer percentages that sum to exactly 100.
///
/// Every score is shifted by `1 - min` so all values are positive, scaled to
/// a share of the shifted total and rounded. Whatever rounding drift remains
/// is added to the top-ranked type only. Entries are returned strongest
/// first, ties in ascending type order.
pub fn normalize_percentages(scores: &TypeScores) -> Vec<TypeScoreEntry> {
    let shift = -scores.min() + 1.0;
    let shifted_total: f64 = scores.iter().map(|(_, s)| s + shift).sum();

    let mut entries: Vec<TypeScoreEntry> = scores
        .ranked()
        .into_iter()
        .map(|(type_number, score)| TypeScoreEntry {
            type_number,
            score,
            percentage: ((score + shift) / shifted_total * 100.0).round() as u32,
        })
        .collect();

    let rounded_sum: i64 = entries.iter().map(|e| i64::from(e.percentage)).sum();
    let residual = 100 - rounded_sum;
    if let Some(top) = entries.first_mut() {
        top.percentage = (i64::from(top.percentage) + residual).max(0) as u32;
    }

    entries
}

/// The stronger of the primary type's two neighbours by raw score.
///
/// On a tie the neighbour with the lower type number wins.
pub fn determine_wing(primary: TypeNumber, scores: &TypeScores) -> TypeNumber {
    let [a, b] = primary.wings();
    let (first, second) = if a < b { (a, b) } else { (b, a) };
    if scores.get(second) > scores.get(first) {
        second
    } else {
        first
    }
}

/// Rank the instincts from the collected set rankings.
pub fn build_instinct_stack(rankings: &[InstinctRanking], max_rank: u8) -> InstinctStack {
    InstinctStack::from_scores(aggregate_rankings(rankings, max_rank))
}

/// Sum of percentages per center, in canonical center order.
pub fn center_shares(entries: &[TypeScoreEntry]) -> Vec<CenterShare> {
    Center::ALL
        .iter()
        .map(|center| CenterShare {
            center: *center,
            percentage: entries
                .iter()
                .filter(|e| center.contains(e.type_number))
                .map(|e| e.percentage)
                .sum(),
        })
        .collect()
}

/// Score the recorded health answers for the type fixed at the health
/// boundary.
pub fn summarize_health(state: &SessionState, config: &AssessmentConfig) -> HealthSummary {
    let assessed_type = state
        .health_type
        .unwrap_or_else(|| state.type_scores.top());
    let health = assess_health(
        state
            .health_answers
            .iter()
            .map(|a| (a.direction, a.rating)),
        &config.health,
    );

    HealthSummary {
        assessed_type,
        level: health.level,
        score: health.score,
        fixation_score: health.fixation_score,
        growth_score: health.growth_score,
        interpretation: interpretation(assessed_type, health.level),
    }
}

/// Build the final report for a session.
pub fn synthesize(state: &SessionState, config: &AssessmentConfig) -> ResultReport {
    let scores = &state.type_scores;
    let primary_type = scores.top();

    let all_type_scores = normalize_percentages(scores);
    let confidence = all_type_scores.first().map(|e| e.percentage).unwrap_or(0);
    let top_types = all_type_scores.iter().take(3).cloned().collect();

    let wing = determine_wing(primary_type, scores);
    let shares = center_shares(&all_type_scores);
    let dominant_center = shares
        .iter()
        .fold(None::<&CenterShare>, |best, share| match best {
            Some(b) if b.percentage >= share.percentage => Some(b),
            _ => Some(share),
        })
        .map(|s| s.center)
        .unwrap_or(Center::Gut);

    let rankings: Vec<InstinctRanking> = state
        .instinct_rankings
        .iter()
        .map(|r| r.ranking.clone())
        .collect();
    let instinct_stack = build_instinct_stack(&rankings, config.instincts.max_rank);

    let health = summarize_health(state, config);

    let report = ResultReport {
        session_id: state.session_id.clone(),
        content_version: state.content_version.clone(),
        completed_at: Utc::now(),
        primary_type,
        confidence,
        top_types,
        all_type_scores,
        wing,
        wing_code: format!("{}w{}", primary_type, wing),
        center_shares: shares,
        dominant_center,
        instinct_stack,
        health,
        questions_answered: state.questions_answered(),
    };

    info!(
        session_id = %report.session_id,
        primary_type = report.primary_type.get(),
        confidence = report.confidence,
        wing = %report.wing_code,
        instincts = %report.instinct_stack.stack_code(),
        dominant_instinct = report.instinct_stack.dominant().as_str(),
        health = report.health.level.as_str(),
        "Assessment result synthesized"
    );

    report
}

/// Check a report against the invariants every result must satisfy.
///
/// Returns a description of each violation; an empty list means the report
/// is sound.
pub fn check_report_invariants(report: &ResultReport) -> Vec<String> {
    let mut violations = Vec::new();

    if report.all_type_scores.len() != 9 {
        violations.push(format!(
            "expected 9 type scores, found {}",
            report.all_type_scores.len()
        ));
    }

    let sum: u32 = report.all_type_scores.iter().map(|e| e.percentage).sum();
    if sum != 100 {
        violations.push(format!("percentages sum to {}", sum));
    }

    let mut seen: Vec<InstinctType> = report.instinct_stack.order.to_vec();
    seen.sort();
    seen.dedup();
    if seen.len() != 3 {
        violations.push(format!(
            "instinct stack {} is not a permutation",
            report.instinct_stack.stack_code()
        ));
    }

    if !report.primary_type.is_wing(report.wing) {
        violations.push(format!(
            "wing {} is not adjacent to type {}",
            report.wing, report.primary_type
        ));
    }

    if report.confidence != report.percentage_of(report.primary_type) {
        violations.push("confidence differs from primary type percentage".to_string());
    }

    if !(-100.0..=100.0).contains(&report.health.score) {
        violations.push(format!("health score {} out of range", report.health.score));
    }

    violations
}
