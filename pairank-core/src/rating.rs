/// Sequential bounded-ELO rating over the full comparison history.
///
/// Every call recomputes from scratch; no rating state survives between calls.
/// Scores are clamped into [0, 1] after each update, so the trajectory (and the
/// final numbers) depend on clamping step by step rather than at the end.
use std::collections::HashMap;

use crate::constants::{
    INITIAL_QUALITY_SCORE, LEARNING_RATE, MAX_QUALITY_SCORE, MIN_QUALITY_SCORE, SCORE_SCALE,
};
use crate::types::{Comparison, IdMap, Item, ItemId};

/// Probability that an item scored `winner_score` beats one scored `loser_score`.
pub fn expected_win(winner_score: f64, loser_score: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((loser_score - winner_score) / SCORE_SCALE))
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(MIN_QUALITY_SCORE, MAX_QUALITY_SCORE)
}

pub struct RatingEngine {
    id_map: IdMap,
    scores: Vec<f64>,
}

impl RatingEngine {
    /// Every item starts at the initial quality score.
    pub fn new(items: &[Item]) -> Self {
        let id_map = IdMap::from_items(items);
        let scores = vec![INITIAL_QUALITY_SCORE; id_map.len()];
        RatingEngine { id_map, scores }
    }

    /// Apply one outcome. Returns `false` (and changes nothing) when the
    /// comparison references an unknown item or pits an item against itself.
    pub fn apply(&mut self, comparison: &Comparison) -> bool {
        let Some((winner, loser)) = self.id_map.resolve(comparison) else {
            tracing::warn!(
                winner_id = comparison.winner_id,
                loser_id = comparison.loser_id,
                "comparison skipped by rating engine"
            );
            return false;
        };

        let expected = expected_win(self.scores[winner], self.scores[loser]);
        self.scores[winner] = clamp_score(self.scores[winner] + LEARNING_RATE * (1.0 - expected));
        self.scores[loser] = clamp_score(self.scores[loser] + LEARNING_RATE * (0.0 - expected));
        true
    }

    pub fn score(&self, id: ItemId) -> Option<f64> {
        self.id_map.to_idx(id).map(|idx| self.scores[idx])
    }

    /// Current scores for every item.
    pub fn scores(&self) -> HashMap<ItemId, f64> {
        (0..self.id_map.len())
            .map(|idx| (self.id_map.to_id(idx), self.scores[idx]))
            .collect()
    }
}

/// Recompute quality scores for `items` from the full history.
///
/// Comparisons are applied in ascending `recorded_at` order; entries with equal
/// timestamps keep their recording order.
pub fn compute_ratings(items: &[Item], comparisons: &[Comparison]) -> HashMap<ItemId, f64> {
    let mut ordered: Vec<&Comparison> = comparisons.iter().collect();
    ordered.sort_by_key(|comparison| comparison.recorded_at);

    let mut engine = RatingEngine::new(items);
    let applied = ordered.into_iter().filter(|comparison| engine.apply(comparison)).count();
    tracing::debug!(items = items.len(), comparisons = comparisons.len(), applied, "ratings recomputed");

    engine.scores()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn abc() -> Vec<Item> {
        vec![Item::new(1, "A"), Item::new(2, "B"), Item::new(3, "C")]
    }

    #[test]
    fn test_expected_win_equal_scores() {
        assert!((expected_win(0.5, 0.5) - 0.5).abs() < 1e-12);
        assert!(expected_win(0.8, 0.2) > 0.99);
        assert!(expected_win(0.2, 0.8) < 0.01);
    }

    #[test]
    fn test_no_comparisons_neutral_scores() {
        let scores = compute_ratings(&abc(), &[]);
        assert_eq!(scores.len(), 3);
        assert!(scores.values().all(|&s| s == INITIAL_QUALITY_SCORE));
    }

    #[test]
    fn test_first_update_from_neutral() {
        let scores = compute_ratings(&abc(), &[Comparison::new(1, 2, at(0))]);
        assert!((scores[&1] - 0.525).abs() < 1e-12);
        assert!((scores[&2] - 0.475).abs() < 1e-12);
        assert_eq!(scores[&3], 0.5);
    }

    #[test]
    fn test_transitive_triangle() {
        let comparisons = vec![
            Comparison::new(1, 2, at(0)),
            Comparison::new(2, 3, at(1)),
            Comparison::new(1, 3, at(2)),
        ];
        let scores = compute_ratings(&abc(), &comparisons);
        assert!(scores[&1] > scores[&3]);
        assert!(scores[&1] > scores[&2]);
        assert!(scores[&2] > scores[&3]);
    }

    #[test]
    fn test_processing_follows_timestamps_not_slice_order() {
        let in_order = vec![
            Comparison::new(1, 2, at(0)),
            Comparison::new(2, 3, at(1)),
            Comparison::new(3, 1, at(2)),
        ];
        let mut shuffled = in_order.clone();
        shuffled.reverse();
        assert_eq!(compute_ratings(&abc(), &in_order), compute_ratings(&abc(), &shuffled));
    }

    #[test]
    fn test_deterministic_and_idempotent() {
        let comparisons: Vec<Comparison> = (0..40)
            .map(|i| {
                let winner = (i % 3) + 1;
                let loser = ((i + 1) % 3) + 1;
                Comparison::new(winner, loser, at(i))
            })
            .collect();
        let first = compute_ratings(&abc(), &comparisons);
        let second = compute_ratings(&abc(), &comparisons);
        for id in 1..=3 {
            assert_eq!(first[&id].to_bits(), second[&id].to_bits());
        }
    }

    #[test]
    fn test_scores_stay_bounded_after_every_step() {
        let items = abc();
        let mut engine = RatingEngine::new(&items);
        for step in 0..300 {
            let comparison = if step % 7 == 0 {
                Comparison::new(3, 2, at(step))
            } else {
                Comparison::new(1, 2, at(step))
            };
            assert!(engine.apply(&comparison));
            for (_, score) in engine.scores() {
                assert!((0.0..=1.0).contains(&score), "score {score} out of range at step {step}");
            }
        }
        // The repeated loser hits the floor and stays there.
        assert_eq!(engine.score(2), Some(0.0));
    }

    #[test]
    fn test_clamp_is_applied_per_step() {
        // Loser at the floor keeps losing: it must stay at exactly 0 rather than
        // going negative and recovering later.
        let items = vec![Item::new(1, "A"), Item::new(2, "B")];
        let mut comparisons: Vec<Comparison> = (0..30).map(|i| Comparison::new(1, 2, at(i))).collect();
        comparisons.push(Comparison::new(2, 1, at(30)));

        let mut engine = RatingEngine::new(&items);
        for comparison in &comparisons[..30] {
            engine.apply(comparison);
        }
        assert_eq!(engine.score(2), Some(0.0));

        let scores = compute_ratings(&items, &comparisons);
        let gain = scores[&2];
        assert!(gain > 0.0 && gain <= LEARNING_RATE);
    }

    #[test]
    fn test_invalid_entries_ignored() {
        let comparisons = vec![
            Comparison::new(1, 1, at(0)),
            Comparison::new(1, 77, at(1)),
        ];
        let scores = compute_ratings(&abc(), &comparisons);
        assert!(scores.values().all(|&s| s == INITIAL_QUALITY_SCORE));
    }
}
