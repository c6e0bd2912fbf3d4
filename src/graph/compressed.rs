//! Memory-efficient undirected graph representation

use std::mem;
use serde::{Serialize, Deserialize};
use super::NodeId;

/// Compressed sparse representation of an undirected simple graph
///
/// Nodes are stored sorted by id, so the dense index order is the id order and
/// "smallest index" always means "smallest id". Every edge appears in the
/// adjacency lists of both endpoints and every adjacency list is sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressedGraph {
    /// Node ids, ascending; position = dense index
    pub(crate) node_ids: Vec<NodeId>,

    /// offsets[i] to offsets[i+1] defines the adjacency range for node i
    pub(crate) offsets: Vec<usize>,

    /// Concatenated adjacency lists (dense indices)
    pub(crate) edges: Vec<u32>,
}

impl CompressedGraph {
    /// Graph with no nodes
    pub fn empty() -> Self {
        Self {
            node_ids: Vec::new(),
            offsets: vec![0],
            edges: Vec::new(),
        }
    }

    /// Build from parts already satisfying the representation invariants
    pub(crate) fn from_parts(node_ids: Vec<NodeId>, offsets: Vec<usize>, edges: Vec<u32>) -> Self {
        debug_assert_eq!(offsets.len(), node_ids.len() + 1);
        debug_assert_eq!(offsets.last().copied(), Some(edges.len()));
        Self {
            node_ids,
            offsets,
            edges,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    /// Node ids in ascending order
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// Id of the node at a dense index
    pub fn node_id(&self, index: usize) -> NodeId {
        self.node_ids[index]
    }

    /// Dense index of a node id, if present
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.node_ids.binary_search(&id).ok()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index_of(id).is_some()
    }

    /// Neighbors of a node by dense index
    pub fn neighbor_indices(&self, index: usize) -> &[u32] {
        let start = self.offsets[index];
        let end = self.offsets[index + 1];
        &self.edges[start..end]
    }

    /// Degree of a node by dense index
    pub fn degree_at(&self, index: usize) -> usize {
        self.offsets[index + 1] - self.offsets[index]
    }

    /// Neighbors of a node by id, ascending; `None` if the node is unknown
    pub fn neighbors(&self, id: NodeId) -> Option<Vec<NodeId>> {
        self.index_of(id).map(|idx| {
            self.neighbor_indices(idx)
                .iter()
                .map(|&n| self.node_ids[n as usize])
                .collect()
        })
    }

    /// Degree of a node by id; `None` if the node is unknown
    pub fn degree(&self, id: NodeId) -> Option<usize> {
        self.index_of(id).map(|idx| self.degree_at(idx))
    }

    /// Check for an edge between two node ids
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        match (self.index_of(u), self.index_of(v)) {
            (Some(ui), Some(vi)) => self.neighbor_indices(ui).binary_search(&(vi as u32)).is_ok(),
            _ => false,
        }
    }

    /// Each undirected edge once, as `(smaller id, larger id)` in ascending order
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        (0..self.node_count()).flat_map(move |u| {
            self.neighbor_indices(u)
                .iter()
                .filter(move |&&v| (v as usize) > u)
                .map(move |&v| (self.node_ids[u], self.node_ids[v as usize]))
        })
    }

    /// Edge density: 2m / (n(n-1)), zero for graphs with fewer than two nodes
    pub fn density(&self) -> f64 {
        let n = self.node_count();
        if n <= 1 {
            return 0.0;
        }
        (2 * self.edge_count()) as f64 / (n as f64 * (n - 1) as f64)
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let ids = self.node_ids.capacity() * mem::size_of::<NodeId>();
        let offsets = self.offsets.capacity() * mem::size_of::<usize>();
        let edges = self.edges.capacity() * mem::size_of::<u32>();

        base + ids + offsets + edges
    }
}
