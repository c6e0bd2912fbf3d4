//! Plot-ready data for the external visualization layer

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{NodeIndex, UnGraph};
use crate::analysis::AnalysisResult;
use crate::cluster::metrics::size_histogram;
use crate::config::EgoOptions;
use crate::error::Result;
use crate::graph::algorithms::{cap_ego_network, ego_network};
use crate::graph::{CompressedGraph, NodeId};

/// Bins of the community-size histogram
const HISTOGRAM_BINS: usize = 30;

/// Write chart data files and the ego network of the top influencer
///
/// `graph` must be the component the result was computed on.
pub fn generate_visualizations<P: AsRef<Path>>(
    graph: &CompressedGraph,
    result: &AnalysisResult,
    ego_options: &EgoOptions,
    output_dir: P,
) -> Result<()> {
    let viz_dir = output_dir.as_ref().join("visualizations");
    fs::create_dir_all(&viz_dir)?;
    log::info!("Generating visualization data in {}", viz_dir.display());

    write_ranking(&viz_dir.join("top_influencers.csv"), "degree_centrality", &result.top_influencers)?;
    write_ranking(&viz_dir.join("top_bridges.csv"), "betweenness_centrality", &result.top_bridges)?;

    if let Some(communities) = &result.communities {
        let mut file = BufWriter::new(File::create(viz_dir.join("community_sizes.csv"))?);
        writeln!(file, "rank,size")?;
        for (rank, size) in communities.sizes().into_iter().enumerate() {
            writeln!(file, "{},{}", rank + 1, size)?;
        }
        file.flush()?;

        let mut file = BufWriter::new(File::create(viz_dir.join("community_size_histogram.csv"))?);
        writeln!(file, "lower,upper,count")?;
        for bin in size_histogram(communities, HISTOGRAM_BINS) {
            writeln!(file, "{},{},{}", bin.lower, bin.upper, bin.count)?;
        }
        file.flush()?;
    }

    if let Some(&(center, _)) = result.top_influencers.first() {
        let ego = ego_network(graph, center)?;
        let ego = cap_ego_network(graph, &ego, center, ego_options)?;
        let path = viz_dir.join(format!("ego_network_{}.dot", center));
        fs::write(&path, ego_network_dot(&ego, center))?;
        log::info!(
            "Ego network of {} written with {} nodes and {} edges",
            center,
            ego.node_count(),
            ego.edge_count()
        );
    }

    Ok(())
}

/// Write a `rank,node,<score_name>` table
fn write_ranking(path: &Path, score_name: &str, ranking: &[(NodeId, f64)]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "rank,node,{}", score_name)?;
    for (rank, (node, score)) in ranking.iter().enumerate() {
        writeln!(file, "{},{},{}", rank + 1, node, score)?;
    }
    file.flush()?;
    Ok(())
}

/// Graphviz rendering of an ego network with the center highlighted
pub fn ego_network_dot(ego: &CompressedGraph, center: NodeId) -> String {
    let mut g = UnGraph::<NodeId, ()>::with_capacity(ego.node_count(), ego.edge_count());
    let indices: Vec<NodeIndex> = ego.node_ids().iter().map(|&id| g.add_node(id)).collect();
    for node in 0..ego.node_count() {
        for &other in ego.neighbor_indices(node) {
            if (other as usize) > node {
                g.add_edge(indices[node], indices[other as usize], ());
            }
        }
    }

    let edge_attrs = |_, _| String::new();
    let node_attrs = |_, (_, &id): (NodeIndex, &NodeId)| {
        if id == center {
            "style=filled, fillcolor=orange".to_string()
        } else {
            String::new()
        }
    };
    let dot = Dot::with_attr_getters(&g, &[Config::EdgeNoLabel], &edge_attrs, &node_attrs);
    format!("{:?}", dot)
}
