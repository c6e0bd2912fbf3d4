//! Connected component detection

use itertools::Itertools;
use crate::cluster::Partition;
use crate::error::{AnalysisError, Result};
use crate::graph::{CompressedGraph, NodeId};

/// Union-Find data structure for connected component analysis
#[derive(Debug, Clone)]
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<u32>,

    /// Size of each set, valid at roots
    size: Vec<u32>,
}

impl DisjointSets {
    /// Create a new DisjointSets data structure
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            size: vec![1; size],
        }
    }

    /// Find the root of the set containing x, compressing the path behind it
    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut cur = x;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }

        root
    }

    /// Union the sets containing x and y, returning the surviving root
    pub fn union(&mut self, x: u32, y: u32) -> u32 {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return root_x;
        }

        // Union by size: attach smaller tree under root of larger tree
        let (big, small) = if self.size[root_x as usize] >= self.size[root_y as usize] {
            (root_x, root_y)
        } else {
            (root_y, root_x)
        };
        self.parent[small as usize] = big;
        self.size[big as usize] += self.size[small as usize];
        big
    }

    /// Get the size of the set containing x
    pub fn size(&mut self, x: u32) -> u32 {
        let root = self.find(x);
        self.size[root as usize]
    }
}

/// Partition the graph into connected components
///
/// Components come out largest first; equal sizes are ordered by their
/// smallest node id.
pub fn connected_components(graph: &CompressedGraph) -> Partition {
    let node_count = graph.node_count();
    let mut sets = DisjointSets::new(node_count);

    for node in 0..node_count {
        for &dst in graph.neighbor_indices(node) {
            if (dst as usize) > node {
                sets.union(node as u32, dst);
            }
        }
    }

    // Ascending index order keeps every member list sorted by id
    let groups = (0..node_count as u32)
        .map(|node| (sets.find(node), graph.node_id(node as usize)))
        .into_group_map();

    let partition = Partition::new(groups.into_values().collect());
    log::info!(
        "Found {} connected components in graph with {} nodes",
        partition.len(),
        node_count
    );
    partition
}

/// The largest set of a partition; equal sizes go to the smallest minimum id
pub fn largest(partition: &Partition) -> Result<&[NodeId]> {
    partition
        .iter()
        .filter(|set| !set.is_empty())
        .min_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])))
        .map(Vec::as_slice)
        .ok_or(AnalysisError::EmptyGraph)
}

/// Restrict the graph to its largest connected component
pub fn largest_component_subgraph(graph: &CompressedGraph) -> Result<CompressedGraph> {
    let components = connected_components(graph);
    let component = largest(&components)?;
    log::info!(
        "Largest connected component has {} of {} nodes",
        component.len(),
        graph.node_count()
    );
    Ok(graph.induced_subgraph(component))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clique(ids: std::ops::Range<NodeId>) -> Vec<(NodeId, NodeId)> {
        let ids: Vec<NodeId> = ids.collect();
        ids.iter()
            .tuple_combinations()
            .map(|(&a, &b)| (a, b))
            .collect()
    }

    #[test]
    fn disjoint_sets_union_and_size() {
        let mut sets = DisjointSets::new(5);
        sets.union(0, 1);
        sets.union(3, 4);
        sets.union(1, 4);
        assert_eq!(sets.size(0), 4);
        assert_eq!(sets.size(2), 1);
        assert_eq!(sets.find(3), sets.find(0));
    }

    #[test]
    fn two_cliques_largest_is_seven() {
        let mut edges = clique(0..5);
        edges.extend(clique(100..107));
        let g = CompressedGraph::from_edges(edges).unwrap();

        let components = connected_components(&g);
        assert_eq!(components.len(), 2);
        assert_eq!(components.sizes(), vec![7, 5]);

        let big = largest(&components).unwrap();
        assert_eq!(big, &[100, 101, 102, 103, 104, 105, 106]);
    }

    #[test]
    fn equal_sizes_pick_smallest_min_id() {
        let g = CompressedGraph::from_edges([(50, 51), (3, 9), (20, 21)]).unwrap();
        let components = connected_components(&g);
        assert_eq!(largest(&components).unwrap(), &[3, 9]);
        assert_eq!(components.sets()[1], vec![20, 21]);
    }

    #[test]
    fn isolated_node_is_own_component() {
        let g = CompressedGraph::from_edges([(1, 2), (5, 5)]).unwrap();
        let components = connected_components(&g);
        assert_eq!(components.sets(), &[vec![1, 2], vec![5]]);
    }

    #[test]
    fn largest_of_empty_partition_fails() {
        let empty = Partition::new(Vec::new());
        assert!(matches!(largest(&empty), Err(AnalysisError::EmptyGraph)));
    }

    #[test]
    fn subgraph_of_largest_component() {
        let g = CompressedGraph::from_edges([(1, 2), (2, 3), (10, 11)]).unwrap();
        let lcc = largest_component_subgraph(&g).unwrap();
        assert_eq!(lcc.node_ids(), &[1, 2, 3]);
        assert_eq!(lcc.edge_count(), 2);
    }
}
