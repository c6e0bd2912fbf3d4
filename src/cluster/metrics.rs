//! Community statistics and metrics

use std::collections::HashMap;
use serde::{Serialize, Deserialize};
use statrs::statistics::{Data, Median, Statistics};
use crate::cluster::Partition;
use crate::graph::{CompressedGraph, NodeId};

/// Newman modularity of a partition
///
/// Q = sum over communities of (internal edges / M) - (degree total / 2M)^2.
/// Nodes missing from the partition count as singletons; an edgeless graph
/// has modularity 0.
pub fn modularity(graph: &CompressedGraph, partition: &Partition) -> f64 {
    let m = graph.edge_count() as f64;
    if m == 0.0 {
        return 0.0;
    }

    let label: HashMap<NodeId, usize> = partition
        .iter()
        .enumerate()
        .flat_map(|(c, set)| set.iter().map(move |&id| (id, c)))
        .collect();

    let mut internal = vec![0.0f64; partition.len()];
    let mut degree_total = vec![0.0f64; partition.len()];
    let mut singletons = 0.0;

    for node in 0..graph.node_count() {
        let id = graph.node_id(node);
        let degree = graph.degree_at(node) as f64;
        let Some(&c) = label.get(&id) else {
            singletons += (degree / (2.0 * m)).powi(2);
            continue;
        };
        degree_total[c] += degree;
        for &other in graph.neighbor_indices(node) {
            let other_id = graph.node_id(other as usize);
            if other_id > id && label.get(&other_id) == Some(&c) {
                internal[c] += 1.0;
            }
        }
    }

    internal
        .iter()
        .zip(&degree_total)
        .map(|(&e, &k)| e / m - (k / (2.0 * m)).powi(2))
        .sum::<f64>()
        - singletons
}

/// Summary of community sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunitySizeStats {
    pub count: usize,
    pub largest: usize,
    pub smallest: usize,
    pub median: f64,
    pub mean: f64,

    /// Sample standard deviation, 0 for fewer than two communities
    pub std_dev: f64,
}

impl CommunitySizeStats {
    pub fn from_partition(partition: &Partition) -> Option<Self> {
        let sizes: Vec<f64> = partition.iter().map(|set| set.len() as f64).collect();
        if sizes.is_empty() {
            return None;
        }

        let mean = sizes.iter().mean();
        let std_dev = if sizes.len() > 1 { sizes.iter().std_dev() } else { 0.0 };
        let median = Data::new(sizes.clone()).median();

        Some(Self {
            count: sizes.len(),
            largest: partition.sets().first().map_or(0, Vec::len),
            smallest: partition.sets().last().map_or(0, Vec::len),
            median,
            mean,
            std_dev,
        })
    }
}

/// One bar of the community-size histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram of community sizes
///
/// The range spans the smallest to the largest size with the last bin closed
/// on the right. When every size is equal the range is widened by 0.5 on
/// both sides.
pub fn size_histogram(partition: &Partition, bins: usize) -> Vec<HistogramBin> {
    if partition.is_empty() || bins == 0 {
        return Vec::new();
    }

    // Partitions are ordered largest first
    let sizes = partition.sizes();
    let mut hi = sizes[0] as f64;
    let mut lo = sizes[sizes.len() - 1] as f64;
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for size in sizes {
        let pos = ((size as f64 - lo) / width) as usize;
        counts[pos.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + i as f64 * width,
            upper: lo + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> CompressedGraph {
        CompressedGraph::from_edges([(1, 2), (2, 3), (1, 3), (4, 5), (5, 6), (4, 6)]).unwrap()
    }

    #[test]
    fn modularity_of_natural_split() {
        let g = two_triangles();
        let p = Partition::new(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        // Each triangle: 3/6 - (6/12)^2 = 0.25
        assert!((modularity(&g, &p) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn modularity_of_single_community_is_zero() {
        let g = two_triangles();
        let p = Partition::new(vec![vec![1, 2, 3, 4, 5, 6]]);
        assert!(modularity(&g, &p).abs() < 1e-12);
    }

    #[test]
    fn size_stats() {
        let p = Partition::new(vec![vec![1, 2, 3, 4], vec![5, 6], vec![7, 8], vec![9]]);
        let stats = CommunitySizeStats::from_partition(&p).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.largest, 4);
        assert_eq!(stats.smallest, 1);
        assert!((stats.median - 2.0).abs() < 1e-12);
        assert!((stats.mean - 2.25).abs() < 1e-12);
        assert!(CommunitySizeStats::from_partition(&Partition::new(Vec::new())).is_none());
    }

    #[test]
    fn histogram_counts_every_community() {
        let p = Partition::new(vec![vec![1, 2, 3, 4], vec![5, 6], vec![7, 8], vec![9]]);
        let hist = size_histogram(&p, 3);
        assert_eq!(hist.len(), 3);
        assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), 4);
        assert_eq!(hist[0].count, 1);
        assert_eq!(hist[1].count, 2);
        assert_eq!(hist[2].count, 1);
    }

    #[test]
    fn histogram_of_uniform_sizes() {
        let p = Partition::new(vec![vec![1, 2], vec![3, 4]]);
        let hist = size_histogram(&p, 2);
        assert_eq!(hist[0].lower, 1.5);
        assert_eq!(hist[1].upper, 2.5);
        assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), 2);
    }
}
