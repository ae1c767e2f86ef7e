//! ClaimGraph Store: typed fact-checking graph, JSON graph documents, graph queries.

pub mod graph;
pub mod query;
pub mod types;

pub use graph::FactGraph;
pub use query::GraphQuery;
pub use types::*;
