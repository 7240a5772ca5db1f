// src/memory/search/merger.rs

//! Pure ranking and tie-break logic for cross-collection merge. Kept free of
//! async and collaborators so it can be tested exhaustively on its own.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::memory::types::RankedResult;

/// Total order over candidates: descending weighted score, then more recent
/// timestamp first (missing timestamps last), then ascending record id.
fn rank_ordering(a: &RankedResult, b: &RankedResult) -> Ordering {
    b.weighted_score
        .total_cmp(&a.weighted_score)
        .then_with(|| b.timestamp.cmp(&a.timestamp))
        .then_with(|| a.record_id.cmp(&b.record_id))
}

/// Merges candidates from any number of collections into one ranked list of
/// at most `limit` results, and counts how many of the *surviving* results
/// came from each collection.
pub fn merge(
    mut candidates: Vec<RankedResult>,
    limit: usize,
) -> (Vec<RankedResult>, HashMap<String, usize>) {
    candidates.sort_by(rank_ordering);
    candidates.truncate(limit);

    let mut collection_stats: HashMap<String, usize> = HashMap::new();
    for result in &candidates {
        *collection_stats
            .entry(result.source_collection.clone())
            .or_default() += 1;
    }

    (candidates, collection_stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn result(
        id: &str,
        collection: &str,
        weighted: f32,
        timestamp: Option<DateTime<Utc>>,
    ) -> RankedResult {
        RankedResult {
            record_id: id.to_string(),
            source_collection: collection.to_string(),
            raw_score: weighted,
            weighted_score: weighted,
            timestamp,
            payload: serde_json::json!({}),
        }
    }

    fn at(secs: i64) -> Option<DateTime<Utc>> {
        Some(Utc.timestamp_opt(secs, 0).unwrap())
    }

    #[test]
    fn orders_by_weighted_score_descending() {
        let (merged, _) = merge(
            vec![
                result("a", "episodic", 0.3, None),
                result("b", "semantic", 0.9, None),
                result("c", "episodic", 0.6, None),
            ],
            10,
        );
        let ids: Vec<_> = merged.iter().map(|r| r.record_id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn equal_scores_break_ties_by_recency_then_id() {
        let (merged, _) = merge(
            vec![
                result("z", "episodic", 0.5, at(100)),
                result("m", "semantic", 0.5, at(200)),
                result("a", "episodic", 0.5, at(100)),
                result("q", "semantic", 0.5, None),
            ],
            10,
        );
        let ids: Vec<_> = merged.iter().map(|r| r.record_id.as_str()).collect();
        // Most recent first; equal timestamps fall back to id order; missing
        // timestamps sort last.
        assert_eq!(ids, ["m", "a", "z", "q"]);
    }

    #[test]
    fn output_never_exceeds_limit() {
        let candidates: Vec<_> = (0..20)
            .map(|i| result(&format!("r{i:02}"), "episodic", i as f32, None))
            .collect();
        let (merged, _) = merge(candidates, 5);
        assert_eq!(merged.len(), 5);
        assert_eq!(merged[0].record_id, "r19");
    }

    #[test]
    fn idempotent_on_already_sorted_input() {
        let candidates = vec![
            result("a", "episodic", 0.9, at(10)),
            result("b", "semantic", 0.5, at(20)),
            result("c", "episodic", 0.1, None),
        ];
        let (first, stats_first) = merge(candidates, 10);
        let (second, stats_second) = merge(first.clone(), 10);
        let first_ids: Vec<_> = first.iter().map(|r| r.record_id.clone()).collect();
        let second_ids: Vec<_> = second.iter().map(|r| r.record_id.clone()).collect();
        assert_eq!(first_ids, second_ids);
        assert_eq!(stats_first, stats_second);
    }

    #[test]
    fn stats_count_only_surviving_results() {
        let (merged, stats) = merge(
            vec![
                result("a", "episodic", 0.9, None),
                result("b", "episodic", 0.8, None),
                result("c", "semantic", 0.7, None),
                result("d", "semantic", 0.1, None),
            ],
            3,
        );
        assert_eq!(merged.len(), 3);
        assert_eq!(stats.get("episodic"), Some(&2));
        // "d" was cut by the limit, so semantic reports 1, not 2.
        assert_eq!(stats.get("semantic"), Some(&1));
    }

    #[test]
    fn ordering_is_stable_across_repeated_runs() {
        let candidates = vec![
            result("b", "semantic", 0.5, at(50)),
            result("a", "episodic", 0.5, at(50)),
        ];
        for _ in 0..3 {
            let (merged, _) = merge(candidates.clone(), 10);
            let ids: Vec<_> = merged.iter().map(|r| r.record_id.as_str()).collect();
            assert_eq!(ids, ["a", "b"]);
        }
    }
}
