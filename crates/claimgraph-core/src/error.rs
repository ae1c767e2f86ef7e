//! Error types for ClaimGraph.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// An edge or precomputed topology names a node the graph does not hold,
    /// or carries a weight that cannot be a confidence.
    #[error("Malformed topology: {0}")]
    MalformedTopology(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
