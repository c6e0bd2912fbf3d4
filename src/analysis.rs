//! End-to-end analysis of an edge list
//!
//! Construction and parameter errors abort the run. A metric that fails with
//! `DegenerateGraph` or `GraphTooLarge` is left as `None` in the result, its
//! top-k list stays empty, and the failure is recorded in `recovered_errors`.

use std::fmt;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use crate::centrality::{betweenness_centrality, degree_centrality, ScoreMap};
use crate::cluster::components::{connected_components, largest};
use crate::cluster::metrics::{modularity, CommunitySizeStats};
use crate::cluster::modularity::greedy_modularity_communities;
use crate::cluster::Partition;
use crate::config::AnalysisOptions;
use crate::error::{AnalysisError, Result};
use crate::graph::{CompressedGraph, NodeId};
use crate::rank::top_k;

/// The independently computed metrics of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    DegreeCentrality,
    BetweennessCentrality,
    Communities,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::DegreeCentrality => "degree centrality",
            Metric::BetweennessCentrality => "betweenness centrality",
            Metric::Communities => "community detection",
        };
        f.write_str(name)
    }
}

/// A metric that failed without failing the run
#[derive(Debug)]
pub struct RecoveredError {
    pub metric: Metric,
    pub error: AnalysisError,
}

impl Serialize for RecoveredError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RecoveredError", 2)?;
        state.serialize_field("metric", &self.metric)?;
        state.serialize_field("message", &self.error.to_string())?;
        state.end()
    }
}

/// Everything computed for the largest connected component
#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    /// Nodes in the analyzed (largest) component
    pub node_count: usize,

    /// Edges in the analyzed component
    pub edge_count: usize,

    pub density: f64,

    /// Nodes in the cleaned input graph
    pub input_node_count: usize,

    /// Edges in the cleaned input graph
    pub input_edge_count: usize,

    /// Connected components in the cleaned input graph
    pub component_count: usize,

    pub degree_centrality: Option<ScoreMap>,
    pub betweenness_centrality: Option<ScoreMap>,
    pub communities: Option<Partition>,

    /// Modularity of `communities`
    pub modularity: Option<f64>,

    pub community_stats: Option<CommunitySizeStats>,

    /// Top nodes by degree centrality
    pub top_influencers: Vec<(NodeId, f64)>,

    /// Top nodes by betweenness centrality
    pub top_bridges: Vec<(NodeId, f64)>,

    pub recovered_errors: Vec<RecoveredError>,
}

/// Keep a metric's value, or record a recoverable failure
fn recover<T>(metric: Metric, outcome: Result<T>, recovered: &mut Vec<RecoveredError>) -> Result<Option<T>> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.is_recoverable() => {
            log::warn!("Skipping {}: {}", metric, error);
            recovered.push(RecoveredError { metric, error });
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

/// Build the graph from raw edges and analyze its largest connected component
pub fn analyze_graph<I>(edges: I, options: &AnalysisOptions) -> Result<AnalysisResult>
where
    I: IntoIterator<Item = (NodeId, NodeId)>,
{
    options.validate()?;
    let graph = CompressedGraph::from_edges(edges)?;
    analyze_with_component(&graph, options).map(|(_, result)| result)
}

/// Analyze an already built graph, also returning its largest component
pub fn analyze_with_component(
    graph: &CompressedGraph,
    options: &AnalysisOptions,
) -> Result<(CompressedGraph, AnalysisResult)> {
    options.validate()?;
    if graph.is_empty() {
        return Err(AnalysisError::EmptyGraph);
    }

    log::info!(
        "Analyzing graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let components = connected_components(graph);
    let component = graph.induced_subgraph(largest(&components)?);
    options.validate_for(component.node_count())?;

    log::info!(
        "Restricted to largest component: {} nodes, {} edges, density {:.6}",
        component.node_count(),
        component.edge_count(),
        component.density()
    );

    // The metrics only read the component, so they can run side by side
    let (degree, (betweenness, communities)) = rayon::join(
        || degree_centrality(&component),
        || {
            rayon::join(
                || betweenness_centrality(&component, options.sample_size, options.seed, &options.limits),
                || greedy_modularity_communities(&component, options.community_cap, &options.limits),
            )
        },
    );

    let mut recovered_errors = Vec::new();
    let degree = recover(Metric::DegreeCentrality, degree, &mut recovered_errors)?;
    let betweenness = recover(Metric::BetweennessCentrality, betweenness, &mut recovered_errors)?;
    let communities = recover(Metric::Communities, communities, &mut recovered_errors)?;

    let result = AnalysisResult {
        node_count: component.node_count(),
        edge_count: component.edge_count(),
        density: component.density(),
        input_node_count: graph.node_count(),
        input_edge_count: graph.edge_count(),
        component_count: components.len(),
        top_influencers: degree.as_ref().map(|d| top_k(d, options.top_k)).unwrap_or_default(),
        top_bridges: betweenness.as_ref().map(|b| top_k(b, options.top_k)).unwrap_or_default(),
        modularity: communities.as_ref().map(|p| modularity(&component, p)),
        community_stats: communities.as_ref().and_then(CommunitySizeStats::from_partition),
        degree_centrality: degree,
        betweenness_centrality: betweenness,
        communities,
        recovered_errors,
    };

    Ok((component, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SafetyLimits;

    #[test]
    fn analyzes_largest_component_only() {
        let edges = vec![(1, 2), (2, 3), (3, 1), (3, 4), (10, 11)];
        let result = analyze_graph(edges, &AnalysisOptions::default()).unwrap();

        assert_eq!(result.input_node_count, 6);
        assert_eq!(result.component_count, 2);
        assert_eq!(result.node_count, 4);
        assert_eq!(result.edge_count, 4);
        assert_eq!(result.top_influencers[0].0, 3);
        assert_eq!(result.top_bridges[0].0, 3);
        assert!(result.recovered_errors.is_empty());
        assert_eq!(result.degree_centrality.as_ref().map(|d| d.len()), Some(4));
    }

    #[test]
    fn single_node_component_recovers_degree_failure() {
        let result = analyze_graph(vec![(5, 5)], &AnalysisOptions::default()).unwrap();
        assert_eq!(result.node_count, 1);
        assert!(result.degree_centrality.is_none());
        assert!(result.top_influencers.is_empty());
        assert_eq!(result.recovered_errors.len(), 1);
        assert_eq!(result.recovered_errors[0].metric, Metric::DegreeCentrality);
        assert_eq!(result.communities.as_ref().map(Partition::len), Some(1));
    }

    #[test]
    fn too_large_metrics_are_recovered() {
        let options = AnalysisOptions {
            limits: SafetyLimits { max_nodes: Some(2), max_edges: None },
            ..AnalysisOptions::default()
        };
        let result = analyze_graph(vec![(1, 2), (2, 3)], &options).unwrap();
        assert!(result.degree_centrality.is_some());
        assert!(result.betweenness_centrality.is_none());
        assert!(result.communities.is_none());
        let metrics: Vec<Metric> = result.recovered_errors.iter().map(|r| r.metric).collect();
        assert_eq!(metrics, vec![Metric::BetweennessCentrality, Metric::Communities]);
    }

    #[test]
    fn empty_input_fails() {
        let edges: Vec<(NodeId, NodeId)> = Vec::new();
        assert!(matches!(
            analyze_graph(edges, &AnalysisOptions::default()),
            Err(AnalysisError::EmptyGraph)
        ));
    }

    #[test]
    fn missing_seed_fails_whole_run() {
        let options = AnalysisOptions {
            sample_size: 1,
            seed: None,
            ..AnalysisOptions::default()
        };
        assert!(matches!(
            analyze_graph(vec![(1, 2), (2, 3)], &options),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn result_serializes_recovered_errors() {
        let result = analyze_graph(vec![(5, 5)], &AnalysisOptions::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["recovered_errors"][0]["metric"], "degree_centrality");
        assert!(json["degree_centrality"].is_null());
    }
}
