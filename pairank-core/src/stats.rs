/// Per-item win/loss bookkeeping and the covered-pair set, derived from a snapshot.
///
/// Comparisons naming an unknown item, or the same item twice, are skipped with a
/// warning so they influence neither counts, coverage nor ratings.
use std::collections::{HashMap, HashSet};

use crate::constants::NEUTRAL_WIN_RATIO;
use crate::types::{total_pairs, Comparison, IdMap, Item, ItemId, Pair, Progress};

pub struct HistoryStats {
    /// Known items, sorted by ID ascending. Index order is canonical pair order.
    items: Vec<Item>,
    id_map: IdMap,
    wins: Vec<usize>,
    losses: Vec<usize>,
    /// Canonical `(smaller, larger)` ID pairs with at least one comparison.
    covered: HashSet<Pair>,
    num_comparisons: usize,
}

impl HistoryStats {
    pub fn from_history(items: &[Item], comparisons: &[Comparison]) -> Self {
        let mut sorted: Vec<Item> = items.to_vec();
        sorted.sort_by_key(|item| item.id);
        sorted.dedup_by_key(|item| item.id);

        let id_map = IdMap::from_items(&sorted);
        let num_items = id_map.len();
        let mut wins = vec![0; num_items];
        let mut losses = vec![0; num_items];
        let mut covered = HashSet::new();
        let mut num_comparisons = 0;

        for comparison in comparisons {
            let Some((winner, loser)) = id_map.resolve(comparison) else {
                tracing::warn!(
                    winner_id = comparison.winner_id,
                    loser_id = comparison.loser_id,
                    "skipping comparison that references an unknown or identical item"
                );
                continue;
            };
            wins[winner] += 1;
            losses[loser] += 1;
            covered.insert(comparison.pair());
            num_comparisons += 1;
        }

        HistoryStats {
            items: sorted,
            id_map,
            wins,
            losses,
            covered,
            num_comparisons,
        }
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    /// Items sorted by ID ascending.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.id_map.to_idx(id).map(|idx| &self.items[idx])
    }

    pub fn comparison_count(&self, id: ItemId) -> usize {
        self.id_map
            .to_idx(id)
            .map_or(0, |idx| self.wins[idx] + self.losses[idx])
    }

    /// wins / (wins + losses), or the neutral ratio for an uncompared item.
    pub fn win_ratio(&self, id: ItemId) -> f64 {
        let Some(idx) = self.id_map.to_idx(id) else {
            return NEUTRAL_WIN_RATIO;
        };
        let total = self.wins[idx] + self.losses[idx];
        if total == 0 {
            NEUTRAL_WIN_RATIO
        } else {
            self.wins[idx] as f64 / total as f64
        }
    }

    pub fn comparison_counts(&self) -> HashMap<ItemId, usize> {
        self.items
            .iter()
            .map(|item| (item.id, self.comparison_count(item.id)))
            .collect()
    }

    pub fn is_covered(&self, a: ItemId, b: ItemId) -> bool {
        self.covered.contains(&crate::types::canonical_pair(a, b))
    }

    pub fn covered_pairs(&self) -> usize {
        self.covered.len()
    }

    pub fn total_pairs(&self) -> usize {
        total_pairs(self.num_items())
    }

    /// Comparisons that passed validation and count towards stats.
    pub fn num_comparisons(&self) -> usize {
        self.num_comparisons
    }

    pub fn progress(&self) -> Progress {
        Progress {
            items: self.num_items(),
            comparisons: self.num_comparisons,
            covered_pairs: self.covered_pairs(),
            total_pairs: self.total_pairs(),
        }
    }
}
