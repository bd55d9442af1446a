//! Stage 2 question selection.
//!
//! The forced-choice stage has no fixed question list. Once stage 1 is done
//! the selector looks at the leading types and pulls items that pit them
//! against each other, then tops up the two strongest types with items
//! against anyone. Sparse pools simply produce a shorter list.

use std::collections::HashSet;

use tracing::debug;

use typology::{ForcedChoicePair, TypeNumber, TypeScores};

use crate::config::SelectionConfig;

/// Build the forced-choice list for a session from its stage 1 scores.
///
/// Candidates are the top `candidate_types` types (ties by ascending type
/// number). Each unordered candidate pair gets up to `questions_per_pair`
/// items matching it in either order; then each of the first `focus_types`
/// candidates gets up to `questions_per_focus_type` further items involving
/// it. An item is never selected twice.
pub fn select_forced_choice(
    scores: &TypeScores,
    pool: &[ForcedChoicePair],
    config: &SelectionConfig,
) -> Vec<ForcedChoicePair> {
    let candidates = scores.top_n(config.candidate_types);
    let mut selection = Selection::new(pool);

    for (i, first) in candidates.iter().enumerate() {
        for second in &candidates[i + 1..] {
            selection.take(config.questions_per_pair, |p| p.matches_pair(*first, *second));
        }
    }

    for focus in candidates.iter().take(config.focus_types) {
        selection.take(config.questions_per_focus_type, |p| p.involves(*focus));
    }

    debug!(
        candidates = ?candidates.iter().map(|t| t.get()).collect::<Vec<_>>(),
        selected = selection.picked.len(),
        pairs = ?covered_pairs(&selection.picked)
            .iter()
            .map(|(a, b)| format!("{}-{}", a, b))
            .collect::<Vec<_>>(),
        "Forced-choice questions selected"
    );

    selection.picked
}

/// Pairs covered by a selection, for diagnostics.
pub fn covered_pairs(selection: &[ForcedChoicePair]) -> Vec<(TypeNumber, TypeNumber)> {
    let mut pairs: Vec<_> = selection
        .iter()
        .map(|p| (p.type_a.min(p.type_b), p.type_a.max(p.type_b)))
        .collect();
    pairs.sort();
    pairs.dedup();
    pairs
}

struct Selection<'a> {
    pool: &'a [ForcedChoicePair],
    used: HashSet<&'a str>,
    picked: Vec<ForcedChoicePair>,
}

impl<'a> Selection<'a> {
    fn new(pool: &'a [ForcedChoicePair]) -> Self {
        Self {
            pool,
            used: HashSet::new(),
            picked: Vec::new(),
        }
    }

    /// Take up to `limit` unused items matching `predicate`, in pool order.
    fn take<F>(&mut self, limit: usize, predicate: F)
    where
        F: Fn(&ForcedChoicePair) -> bool,
    {
        let mut taken = 0;
        for item in self.pool {
            if taken >= limit {
                break;
            }
            if self.used.contains(item.id.as_str()) || !predicate(item) {
                continue;
            }
            self.used.insert(item.id.as_str());
            self.picked.push(item.clone());
            taken += 1;
        }
    }
}
