//! Core library modules for butterfly-ecoroute
//!
//! Signals flow leaf-first through these modules:
//! provider -> cost -> graph -> search.

pub mod error;
pub mod signal;
pub mod provider;
pub mod cost;
pub mod graph;
pub mod search;

// Re-export main types for internal use
pub use cost::CostModel;
pub use graph::{Graph, GraphBuilder};
pub use search::{shortest_path, Path};
