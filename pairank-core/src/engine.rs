/// Comparison session orchestrator.
///
/// Ties a [`ComparisonStore`] to the pure selector, rating engine and report
/// builder. Holds no rating state of its own: every read takes a fresh snapshot
/// and recomputes from it, so a new comparison is visible to the next call.
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::RankError;
use crate::pairing::select_from_stats;
use crate::ranking::build_report;
use crate::rating::compute_ratings;
use crate::stats::HistoryStats;
use crate::store::{normalize_label, ComparisonStore};
use crate::types::{Comparison, Item, ItemId, PairResult, Progress, RankedItem, Snapshot};

pub struct SessionService<S> {
    store: S,
    /// Fixed seed for the pair draw. `None` = fresh entropy on every call.
    seed: Option<u64>,
}

impl<S: ComparisonStore> SessionService<S> {
    pub fn new(store: S) -> Self {
        SessionService { store, seed: None }
    }

    /// Reseed every draw from `seed` instead of system entropy.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Register labels as items, skipping labels that are already known.
    /// Returns only the items created by this call.
    ///
    /// Every label is checked before the first insert, so a blank label
    /// rejects the whole batch and nothing is stored.
    pub fn register_items<I, L>(&self, labels: I) -> Result<Vec<Item>, RankError>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let labels: Vec<L> = labels.into_iter().collect();
        for label in &labels {
            normalize_label(label.as_ref())?;
        }

        let mut created = Vec::new();
        for label in labels {
            match self.store.insert_item(label.as_ref())? {
                Some(item) => {
                    tracing::debug!(id = item.id, label = %item.label, "item registered");
                    created.push(item);
                }
                None => tracing::debug!(label = label.as_ref(), "item already known"),
            }
        }
        Ok(created)
    }

    /// Next pair to present, drawn with this service's randomness source.
    pub fn next_pair(&self) -> Result<PairResult, RankError> {
        match self.seed {
            Some(seed) => self.next_pair_with(&mut StdRng::seed_from_u64(seed)),
            None => self.next_pair_with(&mut rand::rng()),
        }
    }

    /// Next pair to present, drawn with the caller's randomness source.
    pub fn next_pair_with(&self, rng: &mut impl Rng) -> Result<PairResult, RankError> {
        let snapshot = self.store.snapshot()?;
        let stats = HistoryStats::from_history(&snapshot.items, &snapshot.comparisons);
        Ok(select_from_stats(&stats, rng))
    }

    /// Record that `winner_id` beat `loser_id` now.
    pub fn record(&self, winner_id: ItemId, loser_id: ItemId) -> Result<Comparison, RankError> {
        self.record_at(winner_id, loser_id, Utc::now())
    }

    /// Record an outcome with an explicit timestamp.
    pub fn record_at(
        &self,
        winner_id: ItemId,
        loser_id: ItemId,
        recorded_at: DateTime<Utc>,
    ) -> Result<Comparison, RankError> {
        let comparison = Comparison::new(winner_id, loser_id, recorded_at);
        if let Err(err) = self.store.append_comparison(comparison) {
            tracing::warn!(winner_id, loser_id, error = %err, "comparison rejected");
            return Err(err);
        }
        tracing::debug!(winner_id, loser_id, "comparison recorded");
        Ok(comparison)
    }

    /// Full ranking report recomputed from the current history.
    pub fn rankings(&self) -> Result<Vec<RankedItem>, RankError> {
        let snapshot = self.store.snapshot()?;
        let stats = HistoryStats::from_history(&snapshot.items, &snapshot.comparisons);
        let scores = compute_ratings(stats.items(), &snapshot.comparisons);
        Ok(build_report(stats.items(), &scores, &stats.comparison_counts()))
    }

    pub fn progress(&self) -> Result<Progress, RankError> {
        let snapshot = self.store.snapshot()?;
        Ok(HistoryStats::from_history(&snapshot.items, &snapshot.comparisons).progress())
    }

    /// Items and comparisons as currently stored.
    pub fn history(&self) -> Result<Snapshot, RankError> {
        self.store.snapshot()
    }

    /// Forget every comparison, keeping the items.
    pub fn reset(&self) -> Result<usize, RankError> {
        let removed = self.store.clear_comparisons()?;
        tracing::info!(removed, "comparison history cleared");
        Ok(removed)
    }
}
