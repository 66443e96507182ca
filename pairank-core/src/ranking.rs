/// Ranking report: quality scores joined with item identity, best first.
///
/// Pure function over a snapshot. Items are never filtered out.
use std::collections::HashMap;

use crate::constants::INITIAL_QUALITY_SCORE;
use crate::rating::compute_ratings;
use crate::stats::HistoryStats;
use crate::types::{Comparison, Item, ItemId, RankedItem};

/// Join scores and comparison counts with `items`, sorted by quality score
/// descending. Equal scores are ordered by ascending item ID.
///
/// Items missing from `scores` get the initial quality score; items missing
/// from `comparison_counts` get zero.
pub fn build_report(
    items: &[Item],
    scores: &HashMap<ItemId, f64>,
    comparison_counts: &HashMap<ItemId, usize>,
) -> Vec<RankedItem> {
    let mut report: Vec<RankedItem> = items
        .iter()
        .map(|item| RankedItem {
            id: item.id,
            label: item.label.clone(),
            quality_score: scores.get(&item.id).copied().unwrap_or(INITIAL_QUALITY_SCORE),
            comparison_count: comparison_counts.get(&item.id).copied().unwrap_or(0),
        })
        .collect();

    report.sort_by(|a, b| {
        b.quality_score
            .total_cmp(&a.quality_score)
            .then_with(|| a.id.cmp(&b.id))
    });
    report
}

/// Rate the full history and build the report in one step.
pub fn rank_items(items: &[Item], comparisons: &[Comparison]) -> Vec<RankedItem> {
    let stats = HistoryStats::from_history(items, comparisons);
    let scores = compute_ratings(stats.items(), comparisons);
    build_report(stats.items(), &scores, &stats.comparison_counts())
}
