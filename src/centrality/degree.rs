//! Degree centrality

use crate::centrality::ScoreMap;
use crate::error::{AnalysisError, Result};
use crate::graph::CompressedGraph;

/// Fraction of all other nodes each node is adjacent to: degree / (n - 1)
pub fn degree_centrality(graph: &CompressedGraph) -> Result<ScoreMap> {
    let n = graph.node_count();
    if n <= 1 {
        return Err(AnalysisError::DegenerateGraph { node_count: n });
    }

    let scale = 1.0 / (n - 1) as f64;
    Ok((0..n)
        .map(|node| (graph.node_id(node), graph.degree_at(node) as f64 * scale))
        .collect())
}
