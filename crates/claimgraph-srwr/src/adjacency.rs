//! Signed, weighted adjacency matrices.

use claimgraph_store::{GraphQuery, NodeId};
use ndarray::Array2;

/// Build the signed adjacency matrix of `node_ids`, rows and columns in the
/// order given.
///
/// Entry `(i, j)` is `+weight` for a supporting edge, `-weight` for a
/// refuting edge and `0` when the pair has no edge or the edge has no
/// polarity. The diagonal is zero and the matrix is symmetric.
pub fn build_signed_adjacency<Q: GraphQuery + ?Sized>(graph: &Q, node_ids: &[NodeId]) -> Array2<f64> {
    let n = node_ids.len();
    let mut a = Array2::zeros((n, n));

    for i in 0..n {
        for j in (i + 1)..n {
            let Some(edge) = graph.edge_between(&node_ids[i], &node_ids[j]) else {
                continue;
            };
            if let Some(sign) = edge.label.polarity() {
                let value = sign * edge.weight;
                a[[i, j]] = value;
                a[[j, i]] = value;
            }
        }
    }

    a
}
