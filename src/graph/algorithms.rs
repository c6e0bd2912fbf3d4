//! Subgraph extraction on the compressed graph

use std::collections::HashSet;
use crate::config::{EgoOptions, EgoSelection};
use crate::error::{AnalysisError, Result};
use crate::graph::{CompressedGraph, NodeId};

/// Keep only the given nodes and the edges with both endpoints among them
///
/// Ids that are not in the graph are ignored. The result may be empty.
pub fn induced_subgraph(graph: &CompressedGraph, nodes: &[NodeId]) -> CompressedGraph {
    // Map original indices to subgraph indices
    let mut keep: Vec<usize> = nodes.iter().filter_map(|&id| graph.index_of(id)).collect();
    keep.sort_unstable();
    keep.dedup();

    let mut orig_to_sub = vec![u32::MAX; graph.node_count()];
    for (sub, &orig) in keep.iter().enumerate() {
        orig_to_sub[orig] = sub as u32;
    }

    let mut node_ids = Vec::with_capacity(keep.len());
    let mut offsets = Vec::with_capacity(keep.len() + 1);
    let mut edges = Vec::new();
    offsets.push(0);

    for &orig in &keep {
        node_ids.push(graph.node_id(orig));
        // Sub indices are monotone in original indices, so lists stay sorted
        edges.extend(
            graph
                .neighbor_indices(orig)
                .iter()
                .map(|&n| orig_to_sub[n as usize])
                .filter(|&n| n != u32::MAX),
        );
        offsets.push(edges.len());
    }

    log::debug!(
        "Induced subgraph: {} of {} nodes, {} edges",
        node_ids.len(),
        graph.node_count(),
        edges.len() / 2
    );

    CompressedGraph::from_parts(node_ids, offsets, edges)
}

impl CompressedGraph {
    /// See [`induced_subgraph`]
    pub fn induced_subgraph(&self, nodes: &[NodeId]) -> CompressedGraph {
        induced_subgraph(self, nodes)
    }
}

/// Induced subgraph of a node and its immediate neighbors
pub fn ego_network(graph: &CompressedGraph, center: NodeId) -> Result<CompressedGraph> {
    let mut members = graph.neighbors(center).ok_or(AnalysisError::UnknownNode(center))?;
    members.push(center);
    Ok(induced_subgraph(graph, &members))
}

/// Shrink an ego network to at most `options.cap` nodes, always keeping the center
///
/// Neighbors are ranked by the configured selection rule; ties fall back to
/// ascending id. Degrees are taken from `graph`, the graph the ego network was
/// cut from.
pub fn cap_ego_network(
    graph: &CompressedGraph,
    ego: &CompressedGraph,
    center: NodeId,
    options: &EgoOptions,
) -> Result<CompressedGraph> {
    if options.cap == 0 {
        return Err(AnalysisError::InvalidParameter(
            "ego network cap must be at least 1".to_string(),
        ));
    }
    if !ego.contains(center) {
        return Err(AnalysisError::UnknownNode(center));
    }
    if ego.node_count() <= options.cap {
        return Ok(ego.clone());
    }

    let mut others: Vec<NodeId> = ego.node_ids().iter().copied().filter(|&id| id != center).collect();
    match options.selection {
        EgoSelection::HighestDegree => others.sort_by(|&a, &b| {
            let da = graph.degree(a).unwrap_or(0);
            let db = graph.degree(b).unwrap_or(0);
            db.cmp(&da).then(a.cmp(&b))
        }),
        EgoSelection::LowestId => others.sort_unstable(),
    }

    let mut keep: HashSet<NodeId> = others.into_iter().take(options.cap - 1).collect();
    keep.insert(center);
    let keep: Vec<NodeId> = keep.into_iter().collect();

    log::info!(
        "Capping ego network of {} from {} to {} nodes",
        center,
        ego.node_count(),
        keep.len()
    );

    Ok(induced_subgraph(ego, &keep))
}
