//! Core library functions for collaboration network analysis

pub mod analysis;
pub mod centrality;
pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod rank;
pub mod storage;
pub mod viz;

pub use analysis::{analyze_graph, analyze_with_component, AnalysisResult};
pub use centrality::ScoreMap;
pub use cluster::Partition;
pub use config::{AnalysisOptions, EgoOptions, LoaderOptions, SafetyLimits};
pub use error::{AnalysisError, Result};
pub use graph::{CompressedGraph, NodeId};
