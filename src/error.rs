//! Error types for graph construction and analysis

use crate::graph::NodeId;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Everything that can go wrong while loading or analyzing a graph
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A record in the edge list could not be read as two integer endpoints
    #[error("invalid edge record on line {line}: {record:?}")]
    InvalidEdge { line: usize, record: String },

    /// The graph has no nodes
    #[error("graph has no nodes")]
    EmptyGraph,

    /// Degree centrality needs at least two nodes
    #[error("degree centrality is undefined for a graph with {node_count} node(s)")]
    DegenerateGraph { node_count: usize },

    /// The graph exceeds the configured ceiling for an expensive operation
    #[error(
        "{operation} refused: graph has {nodes} nodes and {edges} edges \
         (limits: nodes {max_nodes:?}, edges {max_edges:?})"
    )]
    GraphTooLarge {
        operation: &'static str,
        nodes: usize,
        edges: usize,
        max_nodes: Option<usize>,
        max_edges: Option<usize>,
    },

    /// A caller-supplied option is out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An id-keyed lookup referenced a node that is not in the graph
    #[error("node {0} is not in the graph")]
    UnknownNode(NodeId),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Whether this error only invalidates a single metric rather than the whole run
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::DegenerateGraph { .. } | AnalysisError::GraphTooLarge { .. }
        )
    }
}
