use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::RankError;

/// Caller-visible item identifier.
pub type ItemId = i64;

/// An unordered pair of item IDs in canonical `(smaller, larger)` order.
pub type Pair = (ItemId, ItemId);

/// A unit being ranked. `label` is a display name, opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: ItemId,
    pub label: String,
}

impl Item {
    pub fn new(id: ItemId, label: impl Into<String>) -> Self {
        Item { id, label: label.into() }
    }
}

/// One recorded outcome: `winner_id` beat `loser_id` at `recorded_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comparison {
    pub winner_id: ItemId,
    pub loser_id: ItemId,
    pub recorded_at: DateTime<Utc>,
}

impl Comparison {
    pub fn new(winner_id: ItemId, loser_id: ItemId, recorded_at: DateTime<Utc>) -> Self {
        Comparison { winner_id, loser_id, recorded_at }
    }

    /// The compared pair with direction dropped.
    pub fn pair(&self) -> Pair {
        canonical_pair(self.winner_id, self.loser_id)
    }
}

/// Normalize two IDs into `(min, max)` order.
pub fn canonical_pair(a: ItemId, b: ItemId) -> Pair {
    if a <= b { (a, b) } else { (b, a) }
}

/// Number of unordered pairs of distinct items among `num_items`.
pub fn total_pairs(num_items: usize) -> usize {
    num_items * num_items.saturating_sub(1) / 2
}

/// Outcome of asking for the next pair to compare.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PairResult {
    /// Fewer than two items exist.
    NeedMoreItems,
    /// Every unordered pair has at least one recorded comparison.
    Finished,
    /// A freshly chosen pair, smaller ID first.
    Pair(Item, Item),
    /// No candidate despite `remaining` uncovered pairs. Invariant violation.
    NoValidPair { remaining: usize },
}

impl PairResult {
    /// `Ok(Some(..))` for a pair, `Ok(None)` once coverage is complete,
    /// and the matching error for the two failure outcomes.
    pub fn into_pair(self) -> Result<Option<(Item, Item)>, RankError> {
        match self {
            PairResult::Pair(a, b) => Ok(Some((a, b))),
            PairResult::Finished => Ok(None),
            PairResult::NeedMoreItems => Err(RankError::InsufficientItems),
            PairResult::NoValidPair { remaining } => Err(RankError::NoValidPair { remaining }),
        }
    }
}

/// A row of the ranking report.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedItem {
    pub id: ItemId,
    pub label: String,
    /// Rating engine output, in [0, 1].
    pub quality_score: f64,
    /// Comparisons this item took part in, as winner or loser.
    pub comparison_count: usize,
}

/// Immutable view of the store: every item and every comparison in recording order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub items: Vec<Item>,
    pub comparisons: Vec<Comparison>,
}

impl Snapshot {
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.items.iter().any(|item| item.label == label)
    }

    /// ID for the next inserted item: one past the largest known ID, starting at 1.
    pub fn next_item_id(&self) -> ItemId {
        self.items.iter().map(|item| item.id).max().map_or(1, |max| max + 1)
    }
}

/// How far the session is from full pair coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    pub items: usize,
    pub comparisons: usize,
    pub covered_pairs: usize,
    pub total_pairs: usize,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.items >= 2 && self.covered_pairs >= self.total_pairs
    }
}

/// Maps between caller-provided IDs and internal 0..N indices.
///
/// A repeated ID keeps its first position; later copies are ignored.
pub(crate) struct IdMap {
    ids: Vec<ItemId>,
    id_to_idx: HashMap<ItemId, usize>,
}

impl IdMap {
    pub fn from_items(items: &[Item]) -> Self {
        let mut ids = Vec::with_capacity(items.len());
        let mut id_to_idx = HashMap::with_capacity(items.len());
        for item in items {
            if id_to_idx.contains_key(&item.id) {
                tracing::warn!(id = item.id, "duplicate item id in snapshot, keeping first");
                continue;
            }
            id_to_idx.insert(item.id, ids.len());
            ids.push(item.id);
        }
        IdMap { ids, id_to_idx }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn to_idx(&self, id: ItemId) -> Option<usize> {
        self.id_to_idx.get(&id).copied()
    }

    pub fn to_id(&self, idx: usize) -> ItemId {
        self.ids[idx]
    }

    /// Indices of a comparison's winner and loser, or `None` when the entry
    /// references an unknown item or compares an item with itself.
    pub fn resolve(&self, comparison: &Comparison) -> Option<(usize, usize)> {
        if comparison.winner_id == comparison.loser_id {
            return None;
        }
        Some((self.to_idx(comparison.winner_id)?, self.to_idx(comparison.loser_id)?))
    }
}
