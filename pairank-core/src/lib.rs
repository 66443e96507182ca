/// pairank-core: pair selection and rating for pairwise human comparisons.
///
/// Snapshot in → next pair or ranked list out. No IO, no HTTP, no filesystem.
/// Bring your own store by implementing [`ComparisonStore`]; an in-process
/// [`InMemoryStore`] is included.
///
/// Items are identified by caller-provided `i64` IDs. The crate maps them to
/// array indices internally.
///
/// # Quick start
///
/// ```rust
/// use pairank_core::{InMemoryStore, PairResult, SessionService};
///
/// let session = SessionService::new(InMemoryStore::new());
/// session.register_items(["sunset.jpg", "harbor.jpg", "forest.jpg"]).unwrap();
///
/// while let PairResult::Pair(left, right) = session.next_pair().unwrap() {
///     // Ask a human; here the left item always wins.
///     session.record(left.id, right.id).unwrap();
/// }
///
/// for row in session.rankings().unwrap() {
///     println!("{}: {:.3} ({} comparisons)", row.label, row.quality_score, row.comparison_count);
/// }
/// ```

pub mod constants;
pub mod engine;
pub mod error;
pub mod pairing;
pub mod ranking;
pub mod rating;
pub mod stats;
pub mod store;
pub mod types;

// Re-export primary public API at crate root.
pub use engine::SessionService;
pub use error::RankError;
pub use pairing::{candidate_pool_size, score_candidates, select_pair, selection_score, ScoredPair};
pub use ranking::{build_report, rank_items};
pub use rating::{compute_ratings, expected_win, RatingEngine};
pub use stats::HistoryStats;
pub use store::{validate_comparison, ComparisonStore, InMemoryStore};
pub use types::{
    canonical_pair, total_pairs, Comparison, Item, ItemId, Pair, PairResult, Progress, RankedItem,
    Snapshot,
};
