//! Read-only graph queries used by the propagation engine.

use crate::types::{Edge, Node, NodeId, NodeType};

/// Lookups the SRWR engine needs from whatever holds the graph.
pub trait GraphQuery {
    /// Node with the given id.
    fn node(&self, id: &str) -> Option<&Node>;

    /// All nodes sharing an edge with `id`, excluding `id` itself.
    fn neighbors(&self, id: &str) -> Vec<&Node>;

    /// The single edge between two nodes, in either direction.
    fn edge_between(&self, a: &str, b: &str) -> Option<&Edge>;

    /// Ids of every node of the given type, in insertion order.
    fn ids_of_type(&self, node_type: NodeType) -> Vec<NodeId>;

    /// Neighbors of `id` restricted to one node type.
    fn neighbors_of_type(&self, id: &str, node_type: NodeType) -> Vec<&Node> {
        self.neighbors(id)
            .into_iter()
            .filter(|n| n.node_type == node_type)
            .collect()
    }

    /// Nodes for the given ids, in the order of `ids`. Unknown ids are skipped.
    fn nodes_with_ids(&self, ids: &[NodeId]) -> Vec<&Node> {
        ids.iter().filter_map(|id| self.node(id)).collect()
    }
}
