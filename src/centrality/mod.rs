//! Node centrality measures

pub mod degree;
pub mod betweenness;
pub mod sampling;

use std::collections::BTreeMap;
use crate::graph::NodeId;

/// One score per node of the analyzed graph, keyed by node id
pub type ScoreMap = BTreeMap<NodeId, f64>;

pub use betweenness::{betweenness_centrality, betweenness_centrality_with_rng, exact_betweenness};
pub use degree::degree_centrality;
pub use sampling::SplitMix64;
