//! Precomputed subgraphs and split matrices.
//!
//! Partitioning and matrix construction depend only on the graph's edges,
//! not on scores or SRWR coefficients. Callers that rerun propagation on the
//! same topology with different parameters can build a [`Topology`] once and
//! pass it to every run.

use claimgraph_core::{Error, Result};
use claimgraph_store::{GraphQuery, NodeId, NodeType};
use tracing::debug;

use crate::adjacency::build_signed_adjacency;
use crate::normalize::{split, SplitMatrices};
use crate::partition::partition;

/// One connected subgraph with its split transition matrices.
#[derive(Debug, Clone)]
pub struct SubgraphTopology {
    pub node_ids: Vec<NodeId>,
    pub split: SplitMatrices,
}

impl SubgraphTopology {
    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }
}

/// Every subgraph of a universe, ready for iteration.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub subgraphs: Vec<SubgraphTopology>,
}

impl Topology {
    /// Partition `universe` and build the split matrices of every part.
    pub fn build<Q: GraphQuery + ?Sized>(graph: &Q, universe: &[NodeId]) -> Self {
        let subgraphs: Vec<SubgraphTopology> = partition(graph, universe)
            .into_iter()
            .map(|node_ids| {
                let adjacency = build_signed_adjacency(graph, &node_ids);
                SubgraphTopology {
                    split: split(&adjacency),
                    node_ids,
                }
            })
            .collect();

        debug!(
            "Built topology: {} nodes in {} subgraphs",
            universe.len(),
            subgraphs.len()
        );
        Self { subgraphs }
    }

    /// Topology over all evidence nodes of the graph.
    pub fn evidence<Q: GraphQuery + ?Sized>(graph: &Q) -> Self {
        Self::build(graph, &graph.ids_of_type(NodeType::Evidence))
    }

    pub fn node_count(&self) -> usize {
        self.subgraphs.iter().map(SubgraphTopology::len).sum()
    }

    /// Check that every node of the topology exists in `graph` and every
    /// matrix matches its subgraph size.
    pub fn validate<Q: GraphQuery + ?Sized>(&self, graph: &Q) -> Result<()> {
        for sub in &self.subgraphs {
            let n = sub.len();
            if sub.split.pos.dim() != (n, n) || sub.split.neg.dim() != (n, n) {
                return Err(Error::MalformedTopology(format!(
                    "subgraph of {} nodes carries {:?} and {:?} matrices",
                    n,
                    sub.split.pos.dim(),
                    sub.split.neg.dim()
                )));
            }
            if let Some(missing) = sub.node_ids.iter().find(|id| graph.node(id).is_none()) {
                return Err(Error::MalformedTopology(format!(
                    "topology names unknown node {}",
                    missing
                )));
            }
        }
        Ok(())
    }
}
