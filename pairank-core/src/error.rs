/// Error taxonomy for selection, submission and store access.
///
/// Every variant is recoverable by the caller. Coverage being complete is not
/// an error: it is reported through `PairResult::Finished`.
use thiserror::Error;

use crate::types::ItemId;

#[derive(Debug, Error)]
pub enum RankError {
    /// Fewer than two items are known, so no pair exists.
    #[error("not enough items")]
    InsufficientItems,

    /// Coverage accounting says pairs remain, but none could be scored.
    /// Points at a bug in the covered-pair bookkeeping.
    #[error("no valid pair available ({remaining} pairs reported uncovered)")]
    NoValidPair { remaining: usize },

    /// A submitted comparison references an item the store does not know.
    #[error("unknown item id {id}")]
    UnknownItem { id: ItemId },

    /// A submitted comparison names the same item as winner and loser.
    #[error("item {id} cannot be compared with itself")]
    SelfComparison { id: ItemId },

    #[error("item label must not be blank")]
    EmptyLabel,

    /// A writer panicked while holding the store lock.
    #[error("comparison store lock poisoned")]
    LockPoisoned,

    /// Failure reported by a storage backend.
    #[error("comparison store failure: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RankError {
    /// Wrap a backend error (I/O, decoding, ...) as a store failure.
    pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        RankError::Store(Box::new(err))
    }

    /// True for errors caused by bad caller input rather than store or logic failures.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            RankError::UnknownItem { .. } | RankError::SelfComparison { .. } | RankError::EmptyLabel
        )
    }
}
