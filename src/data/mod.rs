//! Input loading module

pub mod edgelist;

pub use edgelist::{load_edge_list, parse_edge_list};
