//! Cluster analysis module

pub mod components;
pub mod modularity;
pub mod metrics;

use serde::{Serialize, Deserialize};
use crate::graph::NodeId;

/// Disjoint node sets covering a graph
///
/// Each set is sorted ascending. Sets are ordered by size, largest first,
/// with equal sizes ordered by their smallest node id. All tie-breaks are
/// total orders over node ids so that every run produces the same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    sets: Vec<Vec<NodeId>>,
}

impl Partition {
    /// Normalize raw sets into the canonical order
    pub fn new(mut sets: Vec<Vec<NodeId>>) -> Self {
        sets.retain(|set| !set.is_empty());
        for set in &mut sets {
            set.sort_unstable();
        }
        sets.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));
        Self { sets }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn sets(&self) -> &[Vec<NodeId>] {
        &self.sets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<NodeId>> {
        self.sets.iter()
    }

    /// Set sizes in partition order
    pub fn sizes(&self) -> Vec<usize> {
        self.sets.iter().map(Vec::len).collect()
    }

    /// Total number of nodes covered
    pub fn node_count(&self) -> usize {
        self.sets.iter().map(Vec::len).sum()
    }

    pub fn into_sets(self) -> Vec<Vec<NodeId>> {
        self.sets
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a Vec<NodeId>;
    type IntoIter = std::slice::Iter<'a, Vec<NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}
