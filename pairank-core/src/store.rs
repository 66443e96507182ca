/// The comparison store seam.
///
/// Items are insert-only and comparisons append-only. A store must hand out
/// consistent snapshots and validate + append each comparison atomically, so a
/// selection pass never observes a half-written entry. Nothing is reserved when
/// a pair is offered: two viewers may be shown the same pair, and both outcomes
/// are stored.
use std::sync::RwLock;

use crate::error::RankError;
use crate::types::{Comparison, Item, ItemId, Snapshot};

pub trait ComparisonStore {
    /// Every item and every comparison in recording order.
    fn snapshot(&self) -> Result<Snapshot, RankError>;

    /// Insert an item with the given label. Returns `None` if the label is
    /// already known; items are created once, when first observed.
    fn insert_item(&self, label: &str) -> Result<Option<Item>, RankError>;

    /// Validate `comparison` against the known items and append it.
    fn append_comparison(&self, comparison: Comparison) -> Result<(), RankError>;

    /// Drop every comparison, keeping the items. Returns how many were removed.
    fn clear_comparisons(&self) -> Result<usize, RankError>;
}

/// Check a submitted outcome before it reaches the history.
pub fn validate_comparison(items: &[Item], winner_id: ItemId, loser_id: ItemId) -> Result<(), RankError> {
    if winner_id == loser_id {
        return Err(RankError::SelfComparison { id: winner_id });
    }
    for id in [winner_id, loser_id] {
        if !items.iter().any(|item| item.id == id) {
            return Err(RankError::UnknownItem { id });
        }
    }
    Ok(())
}

/// Trimmed label, or an error if nothing is left.
pub fn normalize_label(label: &str) -> Result<&str, RankError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        Err(RankError::EmptyLabel)
    } else {
        Ok(trimmed)
    }
}

/// Apply an item insert to a snapshot in place. Shared by store backends.
pub fn insert_into(snapshot: &mut Snapshot, label: &str) -> Result<Option<Item>, RankError> {
    let label = normalize_label(label)?;
    if snapshot.contains_label(label) {
        return Ok(None);
    }
    let item = Item::new(snapshot.next_item_id(), label);
    snapshot.items.push(item.clone());
    Ok(Some(item))
}

/// Validate and apply a comparison append to a snapshot in place.
pub fn append_into(snapshot: &mut Snapshot, comparison: Comparison) -> Result<(), RankError> {
    validate_comparison(&snapshot.items, comparison.winner_id, comparison.loser_id)?;
    snapshot.comparisons.push(comparison);
    Ok(())
}

/// Process-local store behind a single lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Snapshot>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ComparisonStore for InMemoryStore {
    fn snapshot(&self) -> Result<Snapshot, RankError> {
        let guard = self.inner.read().map_err(|_| RankError::LockPoisoned)?;
        Ok(guard.clone())
    }

    fn insert_item(&self, label: &str) -> Result<Option<Item>, RankError> {
        let mut guard = self.inner.write().map_err(|_| RankError::LockPoisoned)?;
        insert_into(&mut guard, label)
    }

    fn append_comparison(&self, comparison: Comparison) -> Result<(), RankError> {
        let mut guard = self.inner.write().map_err(|_| RankError::LockPoisoned)?;
        append_into(&mut guard, comparison)
    }

    fn clear_comparisons(&self) -> Result<usize, RankError> {
        let mut guard = self.inner.write().map_err(|_| RankError::LockPoisoned)?;
        let removed = guard.comparisons.len();
        guard.comparisons.clear();
        Ok(removed)
    }
}
