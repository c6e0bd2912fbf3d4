//! Graph representation and algorithms module

pub mod compressed;
pub mod builder;
pub mod algorithms;

pub use compressed::CompressedGraph;
pub use builder::GraphBuilder;

/// Integer node identifier as it appears in the input
pub type NodeId = u32;
