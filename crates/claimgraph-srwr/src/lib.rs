//! ClaimGraph SRWR: belief propagation over signed evidence graphs.
//!
//! A run pushes document scores down to their evidence, splits the evidence
//! into connected subgraphs, propagates positive and negative belief inside
//! each subgraph until it settles, rescales the result back to the
//! subgraph's original score mass and finally sums evidence back up into
//! document scores.

pub mod adjacency;
pub mod aggregate;
pub mod engine;
pub mod iterate;
pub mod normalize;
pub mod partition;
pub mod topology;

pub use adjacency::build_signed_adjacency;
pub use aggregate::{collect, distribute, rescale};
pub use engine::{propagate, PropagateOptions, PropagationReport, SubgraphResult};
pub use iterate::{run, Convergence, SrwrRun, SrwrSolver};
pub use normalize::{row_normalize, split, SplitMatrices};
pub use partition::partition;
pub use topology::{SubgraphTopology, Topology};
