/// Output formatting: terminal tables and JSON.
use pairank_core::{Item, PairResult, Progress, RankedItem, Snapshot};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize)]
struct JsonRankedItem<'a> {
    rank: usize,
    id: i64,
    label: &'a str,
    quality_score: f64,
    comparison_count: usize,
}

#[derive(Serialize)]
struct JsonHistoryEntry<'a> {
    recorded_at: String,
    winner_id: i64,
    winner: &'a str,
    loser_id: i64,
    loser: &'a str,
}

fn item_json(item: &Item) -> Value {
    json!({ "id": item.id, "label": item.label })
}

/// Wire shape of a next-pair answer.
pub fn pair_json(result: &PairResult) -> Value {
    match result {
        PairResult::Pair(a, b) => json!({
            "status": "success",
            "item1": item_json(a),
            "item2": item_json(b),
        }),
        PairResult::Finished => json!({ "status": "finished" }),
        PairResult::NeedMoreItems => json!({ "error": "not enough items" }),
        PairResult::NoValidPair { .. } => json!({ "error": "no valid pair available" }),
    }
}

pub fn print_pair(result: &PairResult, as_json: bool) {
    if as_json {
        println!("{}", pair_json(result));
        return;
    }
    match result {
        PairResult::Pair(a, b) => {
            println!("[{}] {}", a.id, a.label);
            println!("[{}] {}", b.id, b.label);
        }
        PairResult::Finished => println!("All pairs have been compared."),
        PairResult::NeedMoreItems => println!("Not enough items: add at least two."),
        PairResult::NoValidPair { remaining } => {
            println!("No valid pair available ({remaining} pairs reported uncovered).")
        }
    }
}

pub fn print_progress(progress: &Progress) {
    println!(
        "{} items, {} comparisons, {}/{} pairs covered",
        progress.items, progress.comparisons, progress.covered_pairs, progress.total_pairs,
    );
}

pub fn rankings_json(rankings: &[RankedItem]) -> Value {
    let rows: Vec<JsonRankedItem> = rankings
        .iter()
        .enumerate()
        .map(|(i, r)| JsonRankedItem {
            rank: i + 1,
            id: r.id,
            label: &r.label,
            quality_score: r.quality_score,
            comparison_count: r.comparison_count,
        })
        .collect();
    json!(rows)
}

/// Column width for labels, in characters, at least as wide as "Item".
fn label_width(rankings: &[RankedItem]) -> usize {
    rankings
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(4)
        .max(4)
}

/// Print rankings as a formatted terminal table.
pub fn print_rankings(rankings: &[RankedItem], as_json: bool) {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&rankings_json(rankings)).unwrap_or_default());
        return;
    }

    let name_width = label_width(rankings);

    println!(" # | {:<name_width$} |   Score | Comparisons", "Item");
    println!("---|-{}-|---------|------------", "-".repeat(name_width));
    for (i, r) in rankings.iter().enumerate() {
        println!(
            "{:>2} | {:<name_width$} | {:>7.4} | {:>11}",
            i + 1,
            r.label,
            r.quality_score,
            r.comparison_count,
        );
    }
    println!("\n{} items ranked", rankings.len());
}

pub fn history_json(snapshot: &Snapshot) -> Value {
    let label = |id| snapshot.item(id).map_or("?", |item| item.label.as_str());
    let rows: Vec<JsonHistoryEntry> = snapshot
        .comparisons
        .iter()
        .map(|c| JsonHistoryEntry {
            recorded_at: c.recorded_at.to_rfc3339(),
            winner_id: c.winner_id,
            winner: label(c.winner_id),
            loser_id: c.loser_id,
            loser: label(c.loser_id),
        })
        .collect();
    json!(rows)
}

/// Print the comparison history in recording order.
pub fn print_history(snapshot: &Snapshot, as_json: bool) {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&history_json(snapshot)).unwrap_or_default());
        return;
    }
    if snapshot.comparisons.is_empty() {
        println!("No comparisons recorded.");
        return;
    }
    for c in &snapshot.comparisons {
        let winner = snapshot.item(c.winner_id).map_or("?", |item| item.label.as_str());
        let loser = snapshot.item(c.loser_id).map_or("?", |item| item.label.as_str());
        println!("{}  {} > {}", c.recorded_at.format("%Y-%m-%d %H:%M:%S"), winner, loser);
    }
}
