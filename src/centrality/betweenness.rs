//! Betweenness centrality via Brandes' algorithm, exact or source-sampled
//!
//! For each source a BFS counts shortest paths, then dependencies are
//! accumulated in reverse BFS order. With a sample of `k < n` sources the
//! accumulated sums are extrapolated by `n / k`.
//!
//! An undirected graph sees every unordered pair from both ends, so the raw
//! score is half the accumulated sum. Scores are normalized by the pair count
//! `2 / ((n - 1)(n - 2))`; graphs with two nodes or fewer score 0 everywhere.
//!
//! Sources are processed in fixed-size chunks on the rayon pool. Each chunk
//! sums its sources in sample order and the per-chunk partials are combined in
//! chunk order once every worker is done, so the floating-point result does not
//! depend on the number of threads.

use std::collections::VecDeque;
use rand::RngCore;
use rayon::prelude::*;
use crate::centrality::sampling::{sample_indices, SplitMix64};
use crate::centrality::ScoreMap;
use crate::config::SafetyLimits;
use crate::error::{AnalysisError, Result};
use crate::graph::CompressedGraph;

/// Upper bound on the number of partial accumulators kept alive at the join
const MAX_PARTIALS: usize = 32;

/// Lower bound on sources per chunk
const MIN_CHUNK: usize = 16;

const UNSEEN: u32 = u32::MAX;

/// Reusable per-worker BFS state
struct BrandesWorkspace {
    sigma: Vec<f64>,
    dist: Vec<u32>,
    delta: Vec<f64>,
    order: Vec<u32>,
    queue: VecDeque<u32>,
}

impl BrandesWorkspace {
    fn new(n: usize) -> Self {
        Self {
            sigma: vec![0.0; n],
            dist: vec![UNSEEN; n],
            delta: vec![0.0; n],
            order: Vec::with_capacity(n),
            queue: VecDeque::with_capacity(n),
        }
    }

    /// Add the dependencies of one source to `acc`
    fn accumulate(&mut self, graph: &CompressedGraph, source: usize, acc: &mut [f64]) {
        self.sigma[source] = 1.0;
        self.dist[source] = 0;
        self.queue.push_back(source as u32);

        // Shortest-path counting
        while let Some(v) = self.queue.pop_front() {
            self.order.push(v);
            let next = self.dist[v as usize] + 1;
            for &w in graph.neighbor_indices(v as usize) {
                let wi = w as usize;
                if self.dist[wi] == UNSEEN {
                    self.dist[wi] = next;
                    self.queue.push_back(w);
                }
                if self.dist[wi] == next {
                    self.sigma[wi] += self.sigma[v as usize];
                }
            }
        }

        // Dependency accumulation, farthest nodes first
        for &w in self.order.iter().rev() {
            let wi = w as usize;
            let coeff = (1.0 + self.delta[wi]) / self.sigma[wi];
            for &v in graph.neighbor_indices(wi) {
                let vi = v as usize;
                if self.dist[vi] != UNSEEN && self.dist[vi] + 1 == self.dist[wi] {
                    self.delta[vi] += self.sigma[vi] * coeff;
                }
            }
            if wi != source {
                acc[wi] += self.delta[wi];
            }
        }

        // Reset only what this source touched
        for &v in &self.order {
            let vi = v as usize;
            self.sigma[vi] = 0.0;
            self.dist[vi] = UNSEEN;
            self.delta[vi] = 0.0;
        }
        self.order.clear();
    }
}

/// Sum of single-source dependencies over the given sources
fn accumulate_sources(graph: &CompressedGraph, sources: &[usize]) -> Vec<f64> {
    let n = graph.node_count();
    let chunk_size = sources.len().div_ceil(MAX_PARTIALS).max(MIN_CHUNK);

    log::debug!(
        "Accumulating {} sources in chunks of {}",
        sources.len(),
        chunk_size
    );

    let partials: Vec<Vec<f64>> = sources
        .par_chunks(chunk_size)
        .map(|chunk| {
            let mut workspace = BrandesWorkspace::new(n);
            let mut acc = vec![0.0; n];
            for &source in chunk {
                workspace.accumulate(graph, source, &mut acc);
            }
            acc
        })
        .collect();

    let mut total = vec![0.0; n];
    for partial in partials {
        for (t, p) in total.iter_mut().zip(partial) {
            *t += p;
        }
    }
    total
}

/// Pick the betweenness sources: every node when `k >= n`, else a seeded sample
pub fn sample_sources<R: RngCore + ?Sized>(graph: &CompressedGraph, k: usize, rng: &mut R) -> Vec<usize> {
    sample_indices(rng, graph.node_count(), k)
}

/// Approximate betweenness centrality from `sample_size` seeded sources
///
/// With `sample_size >= n` this is exact Brandes betweenness and the seed is
/// ignored. Otherwise a seed is required and selects the sample through
/// [`SplitMix64`].
pub fn betweenness_centrality(
    graph: &CompressedGraph,
    sample_size: usize,
    seed: Option<u64>,
    limits: &SafetyLimits,
) -> Result<ScoreMap> {
    let n = graph.node_count();
    if sample_size < n && seed.is_none() {
        return Err(AnalysisError::InvalidParameter(format!(
            "a seed is required when sampling {} of {} nodes",
            sample_size, n
        )));
    }

    let mut rng = SplitMix64::new(seed.unwrap_or_default());
    betweenness_centrality_with_rng(graph, sample_size, &mut rng, limits)
}

/// Approximate betweenness centrality drawing sources from a caller-supplied generator
pub fn betweenness_centrality_with_rng<R: RngCore + ?Sized>(
    graph: &CompressedGraph,
    sample_size: usize,
    rng: &mut R,
    limits: &SafetyLimits,
) -> Result<ScoreMap> {
    let n = graph.node_count();
    if n == 0 {
        return Err(AnalysisError::EmptyGraph);
    }
    if sample_size == 0 {
        return Err(AnalysisError::InvalidParameter(
            "sample size must be at least 1".to_string(),
        ));
    }
    limits.check("betweenness sampling", n, graph.edge_count())?;

    if n <= 2 {
        return Ok(graph.node_ids().iter().map(|&id| (id, 0.0)).collect());
    }

    let sources = sample_sources(graph, sample_size, rng);
    let k = sources.len();
    log::info!(
        "Computing {} betweenness from {} of {} sources",
        if k < n { "approximate" } else { "exact" },
        k,
        n
    );

    let acc = accumulate_sources(graph, &sources);

    // Halve for undirected pairs, extrapolate the sample, normalize by pair count
    let mut scale = 0.5;
    if k < n {
        scale *= n as f64 / k as f64;
    }
    scale *= 2.0 / ((n - 1) as f64 * (n - 2) as f64);

    Ok(acc
        .into_iter()
        .enumerate()
        .map(|(node, sum)| (graph.node_id(node), sum * scale))
        .collect())
}

/// Exact Brandes betweenness with every node as a source
pub fn exact_betweenness(graph: &CompressedGraph, limits: &SafetyLimits) -> Result<ScoreMap> {
    betweenness_centrality(graph, graph.node_count().max(1), None, limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;

    fn graph(edges: &[(NodeId, NodeId)]) -> CompressedGraph {
        CompressedGraph::from_edges(edges.iter().copied()).unwrap()
    }

    fn exact(g: &CompressedGraph) -> ScoreMap {
        exact_betweenness(g, &SafetyLimits::default()).unwrap()
    }

    #[test]
    fn path_middle_node() {
        let bc = exact(&graph(&[(1, 2), (2, 3)]));
        assert!((bc[&1] - 0.0).abs() < 1e-12);
        assert!((bc[&2] - 1.0).abs() < 1e-12);
        assert!((bc[&3] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn star_center_is_on_every_path() {
        let edges: Vec<(NodeId, NodeId)> = (1..=6).map(|leaf| (0, leaf)).collect();
        let bc = exact(&graph(&edges));
        assert!((bc[&0] - 1.0).abs() < 1e-12);
        for leaf in 1..=6 {
            assert_eq!(bc[&leaf], 0.0);
        }
    }

    #[test]
    fn chain_of_four() {
        // Unnormalized: B and C each lie on 2 of the 6 pairs; n = 4 gives factor 2/6
        let bc = exact(&graph(&[(1, 2), (2, 3), (3, 4)]));
        assert!((bc[&2] - 2.0 / 3.0).abs() < 1e-12);
        assert!((bc[&3] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(bc[&1], 0.0);
    }

    #[test]
    fn square_splits_paths() {
        // 1-2-3-4-1: each opposite pair has two shortest paths
        let bc = exact(&graph(&[(1, 2), (2, 3), (3, 4), (4, 1)]));
        for id in 1..=4 {
            assert!((bc[&id] - 1.0 / 6.0).abs() < 1e-12, "node {id}: {}", bc[&id]);
        }
    }

    #[test]
    fn tiny_graphs_score_zero() {
        let bc = exact(&graph(&[(1, 2)]));
        assert_eq!(bc.values().copied().collect::<Vec<_>>(), vec![0.0, 0.0]);
    }

    #[test]
    fn full_sample_equals_exact() {
        let g = graph(&[(1, 2), (2, 3), (3, 4), (4, 5), (2, 5), (5, 6), (6, 7)]);
        let ex = exact(&g);
        let approx = betweenness_centrality(&g, 100, Some(3), &SafetyLimits::default()).unwrap();
        for (id, score) in &ex {
            assert!((score - approx[id]).abs() < 1e-12);
        }
    }

    #[test]
    fn sampled_run_is_reproducible() {
        let edges: Vec<(NodeId, NodeId)> = (0..200).map(|i| (i, (i * 7 + 3) % 200)).collect();
        let g = graph(&edges);
        let a = betweenness_centrality(&g, 20, Some(42), &SafetyLimits::default()).unwrap();
        let b = betweenness_centrality(&g, 20, Some(42), &SafetyLimits::default()).unwrap();
        assert_eq!(a.len(), g.node_count());
        for (id, score) in &a {
            assert_eq!(score.to_bits(), b[id].to_bits());
        }
    }

    #[test]
    fn sampling_without_seed_rejected() {
        let g = graph(&[(1, 2), (2, 3), (3, 4)]);
        assert!(matches!(
            betweenness_centrality(&g, 2, None, &SafetyLimits::default()),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn zero_sample_rejected() {
        let g = graph(&[(1, 2), (2, 3)]);
        assert!(matches!(
            betweenness_centrality(&g, 0, Some(1), &SafetyLimits::default()),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn oversized_graph_refused() {
        let g = graph(&[(1, 2), (2, 3), (3, 4)]);
        let limits = SafetyLimits { max_nodes: None, max_edges: Some(2) };
        assert!(matches!(
            betweenness_centrality(&g, 10, Some(1), &limits),
            Err(AnalysisError::GraphTooLarge { edges: 3, .. })
        ));
    }
}
