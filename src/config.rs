//! Configuration for the analysis pipeline and its outer collaborators

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Ceilings that refuse expensive metrics on oversized graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyLimits {
    /// Maximum node count for betweenness sampling and community detection
    pub max_nodes: Option<usize>,

    /// Maximum edge count for betweenness sampling and community detection
    pub max_edges: Option<usize>,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_nodes: Some(2_000_000),
            max_edges: Some(20_000_000),
        }
    }
}

impl SafetyLimits {
    /// No ceilings at all
    pub fn unbounded() -> Self {
        Self {
            max_nodes: None,
            max_edges: None,
        }
    }

    /// Default ceilings with command-line style overrides
    ///
    /// `None` keeps the default ceiling and `Some(0)` removes it.
    pub fn with_overrides(max_nodes: Option<usize>, max_edges: Option<usize>) -> Self {
        let defaults = Self::default();
        let pick = |given: Option<usize>, default: Option<usize>| match given {
            Some(0) => None,
            Some(max) => Some(max),
            None => default,
        };
        Self {
            max_nodes: pick(max_nodes, defaults.max_nodes),
            max_edges: pick(max_edges, defaults.max_edges),
        }
    }

    /// Fail with `GraphTooLarge` if either count is above its ceiling
    pub fn check(&self, operation: &'static str, nodes: usize, edges: usize) -> Result<()> {
        let over_nodes = self.max_nodes.is_some_and(|max| nodes > max);
        let over_edges = self.max_edges.is_some_and(|max| edges > max);

        if over_nodes || over_edges {
            return Err(AnalysisError::GraphTooLarge {
                operation,
                nodes,
                edges,
                max_nodes: self.max_nodes,
                max_edges: self.max_edges,
            });
        }

        Ok(())
    }
}

/// Options for a full analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Number of betweenness source nodes to sample
    pub sample_size: usize,

    /// Seed for source sampling; required whenever sampling actually happens
    pub seed: Option<u64>,

    /// Length of the top influencer / top bridge lists
    pub top_k: usize,

    /// Keep merging communities until at most this many remain
    pub community_cap: Option<usize>,

    /// Size guard for the expensive metrics
    pub limits: SafetyLimits,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            sample_size: 1000,
            seed: Some(42),
            top_k: 10,
            community_cap: None,
            limits: SafetyLimits::default(),
        }
    }
}

impl AnalysisOptions {
    /// Create options with custom values
    pub fn new(
        sample_size: usize,
        seed: Option<u64>,
        top_k: usize,
        community_cap: Option<usize>,
        limits: SafetyLimits,
    ) -> Self {
        Self {
            sample_size,
            seed,
            top_k,
            community_cap,
            limits,
        }
    }

    /// Check the options that do not depend on the graph
    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(AnalysisError::InvalidParameter(
                "sample size must be at least 1".to_string(),
            ));
        }
        if self.top_k == 0 {
            return Err(AnalysisError::InvalidParameter(
                "top-k must be at least 1".to_string(),
            ));
        }
        if self.community_cap == Some(0) {
            return Err(AnalysisError::InvalidParameter(
                "community cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Check that a seed is present when the sample is smaller than the graph
    pub fn validate_for(&self, node_count: usize) -> Result<()> {
        self.validate()?;
        if self.sample_size < node_count && self.seed.is_none() {
            return Err(AnalysisError::InvalidParameter(format!(
                "a seed is required when sampling {} of {} nodes",
                self.sample_size, node_count
            )));
        }
        Ok(())
    }
}

/// Edge-list parsing options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderOptions {
    /// Lines starting with this marker are skipped
    pub comment_marker: String,

    /// Field separator; `None` splits on any whitespace
    pub delimiter: Option<char>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            comment_marker: "#".to_string(),
            delimiter: None,
        }
    }
}

/// Which neighbors survive when an ego network is capped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EgoSelection {
    /// Best-connected neighbors first, ties by ascending id
    #[default]
    HighestDegree,

    /// Smallest ids first
    LowestId,
}

/// Ego-network export options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EgoOptions {
    /// Maximum node count of the exported ego network, center included
    pub cap: usize,

    pub selection: EgoSelection,
}

impl Default for EgoOptions {
    fn default() -> Self {
        Self {
            cap: 200,
            selection: EgoSelection::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_override_removes_a_ceiling() {
        let limits = SafetyLimits::with_overrides(Some(0), None);
        assert_eq!(limits.max_nodes, None);
        assert_eq!(limits.max_edges, SafetyLimits::default().max_edges);
        assert!(limits.check("test", usize::MAX, 10).is_ok());

        let limits = SafetyLimits::with_overrides(Some(5), Some(0));
        assert_eq!(limits, SafetyLimits { max_nodes: Some(5), max_edges: None });
        assert_eq!(SafetyLimits::with_overrides(Some(0), Some(0)), SafetyLimits::unbounded());
    }

    #[test]
    fn default_options() {
        let opts = AnalysisOptions::default();
        assert_eq!(opts.sample_size, 1000);
        assert_eq!(opts.seed, Some(42));
        assert_eq!(opts.top_k, 10);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn zero_sample_size_rejected() {
        let opts = AnalysisOptions {
            sample_size: 0,
            ..AnalysisOptions::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn zero_top_k_rejected() {
        let opts = AnalysisOptions {
            top_k: 0,
            ..AnalysisOptions::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn missing_seed_only_matters_when_sampling() {
        let opts = AnalysisOptions {
            sample_size: 10,
            seed: None,
            ..AnalysisOptions::default()
        };
        assert!(opts.validate_for(10).is_ok());
        assert!(opts.validate_for(5).is_ok());
        assert!(matches!(
            opts.validate_for(11),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn limits_check() {
        let limits = SafetyLimits {
            max_nodes: Some(10),
            max_edges: None,
        };
        assert!(limits.check("test", 10, 1_000_000).is_ok());
        assert!(matches!(
            limits.check("test", 11, 0),
            Err(AnalysisError::GraphTooLarge { nodes: 11, .. })
        ));
        assert!(SafetyLimits::unbounded().check("test", usize::MAX, usize::MAX).is_ok());
    }
}
