/// Next-pair selection for a comparison session.
///
/// Candidates are every uncovered pair. Coverage comes first: a pair is ranked by
/// the comparison count of its busier member, fewest first. Within the same
/// count, pairs with the closest win ratios come first since their outcome is
/// the least predictable. The final pick is a uniform draw from the best fifth.
use rand::Rng;

use crate::constants::CANDIDATE_POOL_DIVISOR;
use crate::stats::HistoryStats;
use crate::types::{Comparison, Item, ItemId, PairResult};

/// An uncovered pair with its selection score. `first < second`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    pub first: ItemId,
    pub second: ItemId,
    pub score: f64,
}

/// Selection score of a pair: `-max(count_a, count_b) - |ratio_a - ratio_b|`.
///
/// The coverage term is integral and the closeness term lies in [0, 1], so a
/// descending sort groups by comparison count before closeness breaks ties.
pub fn selection_score(count_a: usize, count_b: usize, ratio_a: f64, ratio_b: f64) -> f64 {
    let coverage_priority = -(count_a.max(count_b) as i64);
    let closeness = (ratio_a - ratio_b).abs();
    coverage_priority as f64 - closeness
}

/// Size of the pool the random draw is taken from: the top ⌈n/5⌉, at least one.
pub fn candidate_pool_size(num_candidates: usize) -> usize {
    num_candidates.div_ceil(CANDIDATE_POOL_DIVISOR).max(1)
}

/// Score every uncovered pair, best first.
///
/// Equal scores are ordered by descending `(first, second)` so the order is
/// fully determined by the history.
pub fn score_candidates(stats: &HistoryStats) -> Vec<ScoredPair> {
    let items = stats.items();
    let remaining = stats.total_pairs().saturating_sub(stats.covered_pairs());
    let mut candidates = Vec::with_capacity(remaining);

    for (i, a) in items.iter().enumerate() {
        let count_a = stats.comparison_count(a.id);
        let ratio_a = stats.win_ratio(a.id);
        for b in &items[i + 1..] {
            if stats.is_covered(a.id, b.id) {
                continue;
            }
            candidates.push(ScoredPair {
                first: a.id,
                second: b.id,
                score: selection_score(count_a, stats.comparison_count(b.id), ratio_a, stats.win_ratio(b.id)),
            });
        }
    }

    candidates.sort_by(|x, y| {
        y.score
            .total_cmp(&x.score)
            .then_with(|| (y.first, y.second).cmp(&(x.first, x.second)))
    });
    candidates
}

/// Pick the next pair to present from a snapshot of items and comparisons.
///
/// `rng` drives the draw from the candidate pool. Production callers pass a
/// freshly seeded source per call; tests pass a seeded one.
pub fn select_pair(items: &[Item], comparisons: &[Comparison], rng: &mut impl Rng) -> PairResult {
    let stats = HistoryStats::from_history(items, comparisons);
    select_from_stats(&stats, rng)
}

/// Same as [`select_pair`], over precomputed stats.
pub fn select_from_stats(stats: &HistoryStats, rng: &mut impl Rng) -> PairResult {
    if stats.num_items() < 2 {
        return PairResult::NeedMoreItems;
    }

    let covered = stats.covered_pairs();
    let total = stats.total_pairs();
    if covered >= total {
        tracing::debug!(covered, total, "every pair has been compared");
        return PairResult::Finished;
    }

    let candidates = score_candidates(stats);
    if candidates.is_empty() {
        tracing::error!(covered, total, "no candidate pair despite incomplete coverage");
        return PairResult::NoValidPair { remaining: total - covered };
    }

    let pool = candidate_pool_size(candidates.len()).min(candidates.len());
    let chosen = candidates[rng.random_range(0..pool)];

    match (stats.item(chosen.first), stats.item(chosen.second)) {
        (Some(a), Some(b)) => {
            tracing::debug!(
                first = chosen.first,
                second = chosen.second,
                score = chosen.score,
                pool,
                candidates = candidates.len(),
                "selected pair"
            );
            PairResult::Pair(a.clone(), b.clone())
        }
        _ => {
            tracing::error!(first = chosen.first, second = chosen.second, "candidate references unknown item");
            PairResult::NoValidPair { remaining: total - covered }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rand::{rngs::StdRng, SeedableRng};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn items(n: i64) -> Vec<Item> {
        (1..=n).map(|id| Item::new(id, format!("img{id}.png"))).collect()
    }

    #[test]
    fn test_selection_score_coverage_before_closeness() {
        let fresh = selection_score(0, 0, 0.5, 0.5);
        let seen_once_close = selection_score(1, 1, 0.5, 0.5);
        let seen_once_far = selection_score(1, 0, 1.0, 0.5);
        assert!(fresh > seen_once_close);
        assert!(seen_once_close > seen_once_far);
        assert_eq!(selection_score(2, 1, 0.25, 0.75), -2.5);
    }

    #[test]
    fn test_candidate_pool_size() {
        assert_eq!(candidate_pool_size(0), 1);
        assert_eq!(candidate_pool_size(1), 1);
        assert_eq!(candidate_pool_size(5), 1);
        assert_eq!(candidate_pool_size(6), 2);
        assert_eq!(candidate_pool_size(11), 3);
    }

    #[test]
    fn test_two_items_no_comparisons() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = select_pair(&items(2), &[], &mut rng);
        assert_eq!(result, PairResult::Pair(Item::new(1, "img1.png"), Item::new(2, "img2.png")));
    }

    #[test]
    fn test_need_more_items() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_pair(&[], &[], &mut rng), PairResult::NeedMoreItems);
        assert_eq!(select_pair(&items(1), &[], &mut rng), PairResult::NeedMoreItems);
    }

    #[test]
    fn test_finished_after_full_triangle() {
        let comparisons = vec![
            Comparison::new(1, 2, at(0)),
            Comparison::new(2, 3, at(1)),
            Comparison::new(1, 3, at(2)),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(select_pair(&items(3), &comparisons, &mut rng), PairResult::Finished);
    }

    #[test]
    fn test_duplicates_do_not_fake_coverage() {
        // Three comparisons, but only one distinct pair out of three.
        let comparisons = vec![
            Comparison::new(1, 2, at(0)),
            Comparison::new(2, 1, at(1)),
            Comparison::new(1, 2, at(2)),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        match select_pair(&items(3), &comparisons, &mut rng) {
            PairResult::Pair(a, b) => assert_ne!((a.id, b.id), (1, 2)),
            other => panic!("expected a pair, got {other:?}"),
        }
    }

    #[test]
    fn test_draw_stays_within_pool() {
        // After 1 beats 2 only (3, 4) is uncompared on both sides; pool size is 1.
        let comparisons = vec![Comparison::new(1, 2, at(0))];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            match select_pair(&items(4), &comparisons, &mut rng) {
                PairResult::Pair(a, b) => assert_eq!((a.id, b.id), (3, 4)),
                other => panic!("expected a pair, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_score_candidates_order() {
        let comparisons = vec![Comparison::new(1, 2, at(0))];
        let stats = HistoryStats::from_history(&items(4), &comparisons);
        let candidates = score_candidates(&stats);
        assert_eq!(candidates.len(), 5);
        assert_eq!((candidates[0].first, candidates[0].second), (3, 4));
        assert_eq!(candidates[0].score, 0.0);
        for pair in &candidates[1..] {
            assert_eq!(pair.score, -1.5);
        }
        // Ties ordered by descending ids.
        assert_eq!((candidates[1].first, candidates[1].second), (2, 4));
    }

    #[test]
    fn test_same_seed_same_pair() {
        let all = items(12);
        let comparisons = vec![Comparison::new(4, 9, at(0)), Comparison::new(2, 11, at(1))];
        let first = select_pair(&all, &comparisons, &mut StdRng::seed_from_u64(99));
        let second = select_pair(&all, &comparisons, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }

    #[test]
    fn test_session_covers_every_pair_exactly_once() {
        let all = items(6);
        let mut comparisons: Vec<Comparison> = Vec::new();
        let mut rng = StdRng::seed_from_u64(2024);

        loop {
            match select_pair(&all, &comparisons, &mut rng) {
                PairResult::Pair(a, b) => {
                    let pair = (a.id, b.id);
                    assert!(a.id < b.id);
                    assert!(
                        comparisons.iter().all(|c| c.pair() != pair),
                        "pair {pair:?} offered twice"
                    );
                    let step = comparisons.len() as i64;
                    comparisons.push(Comparison::new(b.id, a.id, at(step)));
                }
                PairResult::Finished => break,
                other => panic!("unexpected result {other:?}"),
            }
            assert!(comparisons.len() <= 15);
        }
        assert_eq!(comparisons.len(), 15);
    }

    #[test]
    fn test_least_compared_items_come_first() {
        // Items 1..3 have all been compared with each other; 4 and 5 are fresh.
        let comparisons = vec![
            Comparison::new(1, 2, at(0)),
            Comparison::new(2, 3, at(1)),
            Comparison::new(1, 3, at(2)),
        ];
        let stats = HistoryStats::from_history(&items(5), &comparisons);
        let candidates = score_candidates(&stats);
        assert_eq!(candidates.len(), 7);
        assert_eq!((candidates[0].first, candidates[0].second), (4, 5));
        // Item 2 sits at a 0.5 win ratio, same as the fresh items.
        assert_eq!((candidates[1].first, candidates[1].second), (2, 5));
        assert_eq!(candidates[1].score, -2.0);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            match select_pair(&items(5), &comparisons, &mut rng) {
                PairResult::Pair(a, b) => assert!([(4, 5), (2, 5)].contains(&(a.id, b.id))),
                other => panic!("expected a pair, got {other:?}"),
            }
        }
    }
}
