//! Deterministic top-k selection over node scores

use std::cmp::Ordering;
use itertools::Itertools;
use crate::centrality::ScoreMap;
use crate::graph::NodeId;

/// Highest-scoring entries, best first; equal scores by ascending node id
///
/// Asking for more entries than the map holds returns all of them.
pub fn top_k(scores: &ScoreMap, k: usize) -> Vec<(NodeId, f64)> {
    scores
        .iter()
        .map(|(&id, &score)| (id, score))
        .sorted_unstable_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        })
        .take(k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(entries: &[(NodeId, f64)]) -> ScoreMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn sorted_descending() {
        let map = scores(&[(1, 0.1), (2, 0.9), (3, 0.5)]);
        assert_eq!(top_k(&map, 2), vec![(2, 0.9), (3, 0.5)]);
    }

    #[test]
    fn k_beyond_size_returns_all_with_id_tie_break() {
        let map = scores(&[(9, 0.5), (4, 0.5), (7, 1.0), (1, 0.5)]);
        assert_eq!(
            top_k(&map, 10),
            vec![(7, 1.0), (1, 0.5), (4, 0.5), (9, 0.5)]
        );
    }

    #[test]
    fn empty_map() {
        assert!(top_k(&ScoreMap::new(), 3).is_empty());
    }
}
