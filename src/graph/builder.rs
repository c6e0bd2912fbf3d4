//! Graph construction module

use crate::error::{AnalysisError, Result};
use crate::graph::{CompressedGraph, NodeId};

/// Builder for incrementally constructing a CompressedGraph
///
/// Self-loops are dropped (their endpoint still becomes a node) and duplicate
/// edges collapse regardless of orientation.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    /// Every node id seen so far, possibly repeated
    nodes: Vec<NodeId>,

    /// Normalized `(min, max)` edge pairs, possibly repeated
    pairs: Vec<(NodeId, NodeId)>,

    /// Number of self-loops dropped
    self_loops: usize,
}

impl GraphBuilder {
    /// Create a new graph builder with the given edge capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity * 2),
            pairs: Vec::with_capacity(capacity),
            self_loops: 0,
        }
    }

    /// Register a node, even if it never gets an edge
    pub fn add_node(&mut self, id: NodeId) {
        self.nodes.push(id);
    }

    /// Add an undirected edge
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) {
        self.nodes.push(u);
        self.nodes.push(v);

        if u == v {
            self.self_loops += 1;
            return;
        }

        self.pairs.push((u.min(v), u.max(v)));
    }

    /// Build the compressed graph
    pub fn build(mut self) -> Result<CompressedGraph> {
        self.nodes.sort_unstable();
        self.nodes.dedup();

        if self.nodes.is_empty() {
            return Err(AnalysisError::EmptyGraph);
        }

        let raw_pairs = self.pairs.len();
        self.pairs.sort_unstable();
        self.pairs.dedup();

        log::debug!(
            "Building graph: {} nodes, {} edges ({} duplicates, {} self-loops dropped)",
            self.nodes.len(),
            self.pairs.len(),
            raw_pairs - self.pairs.len(),
            self.self_loops
        );

        let node_ids = self.nodes;
        let index = |id: NodeId| -> usize {
            // Every endpoint was pushed into `nodes`, so the lookup cannot miss
            node_ids.binary_search(&id).unwrap_or_else(|pos| pos)
        };

        // Count degrees, then lay out offsets
        let mut degrees = vec![0usize; node_ids.len()];
        let indexed: Vec<(usize, usize)> = self
            .pairs
            .iter()
            .map(|&(u, v)| (index(u), index(v)))
            .collect();
        for &(u, v) in &indexed {
            degrees[u] += 1;
            degrees[v] += 1;
        }

        let mut offsets = Vec::with_capacity(node_ids.len() + 1);
        offsets.push(0);
        let mut offset = 0;
        for &degree in &degrees {
            offset += degree;
            offsets.push(offset);
        }

        // Fill adjacency, then sort each list
        let mut edges = vec![0u32; offset];
        let mut cursor = offsets[..node_ids.len()].to_vec();
        for &(u, v) in &indexed {
            edges[cursor[u]] = v as u32;
            cursor[u] += 1;
            edges[cursor[v]] = u as u32;
            cursor[v] += 1;
        }
        for node in 0..node_ids.len() {
            edges[offsets[node]..offsets[node + 1]].sort_unstable();
        }

        Ok(CompressedGraph::from_parts(node_ids, offsets, edges))
    }
}

impl CompressedGraph {
    /// Build a clean undirected simple graph from raw edge pairs
    pub fn from_edges<I>(edges: I) -> Result<CompressedGraph>
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let iter = edges.into_iter();
        let mut builder = GraphBuilder::with_capacity(iter.size_hint().0);
        for (u, v) in iter {
            builder.add_edge(u, v);
        }
        builder.build()
    }
}
