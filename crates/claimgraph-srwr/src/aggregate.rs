//! Moving scores between documents and their evidence, and rescaling
//! subgraph output back to its original score mass.

use std::collections::HashMap;

use claimgraph_core::Result;
use claimgraph_store::{FactGraph, GraphQuery, NodeId, NodeType};
use ndarray::Array1;
use tracing::{debug, warn};

/// Split every document's score among its evidence in proportion to the
/// connecting edge weights.
///
/// A document whose evidence edges weigh nothing in total distributes
/// nothing. Evidence reached by several documents receives the sum of its
/// shares. Returns the number of documents that distributed.
pub fn distribute(graph: &mut FactGraph) -> Result<usize> {
    let mut shares: HashMap<NodeId, f64> = HashMap::new();
    let mut order: Vec<NodeId> = Vec::new();
    let mut distributed = 0;

    for doc_id in graph.ids_of_type(NodeType::Document) {
        let Some(doc) = graph.node(&doc_id) else {
            continue;
        };
        let weights: Vec<(NodeId, f64)> = graph
            .neighbors_of_type(&doc_id, NodeType::Evidence)
            .into_iter()
            .filter_map(|evi| {
                graph
                    .edge_between(&doc_id, &evi.id)
                    .map(|e| (evi.id.clone(), e.weight))
            })
            .collect();

        if weights.is_empty() {
            continue;
        }
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            warn!(
                "Document {} has zero total evidence weight; scores left unchanged",
                doc_id
            );
            continue;
        }

        for (evi_id, weight) in weights {
            let share = doc.score * (weight / total);
            match shares.get_mut(&evi_id) {
                Some(acc) => *acc += share,
                None => {
                    order.push(evi_id.clone());
                    shares.insert(evi_id, share);
                }
            }
        }
        distributed += 1;
    }

    for evi_id in order {
        graph.set_score(&evi_id, shares[&evi_id])?;
    }

    debug!("Distributed {} document scores to evidence", distributed);
    Ok(distributed)
}

/// Set every document's score to the sum of its evidence scores.
///
/// Documents without evidence keep their score. Returns the number of
/// documents updated.
pub fn collect(graph: &mut FactGraph) -> Result<usize> {
    let updates: Vec<(NodeId, f64)> = graph
        .ids_of_type(NodeType::Document)
        .into_iter()
        .filter_map(|doc_id| {
            let evidence = graph.neighbors_of_type(&doc_id, NodeType::Evidence);
            if evidence.is_empty() {
                return None;
            }
            let total: f64 = evidence.iter().map(|e| e.score).sum();
            Some((doc_id, total))
        })
        .collect();

    let collected = updates.len();
    for (doc_id, score) in updates {
        graph.set_score(&doc_id, score)?;
    }

    debug!("Collected evidence scores into {} documents", collected);
    Ok(collected)
}

/// Map raw subgraph scores back onto the subgraph's original score mass.
///
/// Scores are min-max scaled into `[0, 1]`, renormalized to sum to one
/// (uniform when they all scale to zero) and multiplied by `original_sum`.
pub fn rescale(raw: &Array1<f64>, original_sum: f64) -> Array1<f64> {
    let n = raw.len();
    if n == 0 {
        return Array1::zeros(0);
    }

    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let scaled = if range > 0.0 {
        raw.mapv(|x| (x - min) / range)
    } else {
        Array1::zeros(n)
    };

    let total = scaled.sum();
    let simplex = if total > 0.0 {
        scaled / total
    } else {
        Array1::from_elem(n, 1.0 / n as f64)
    };

    simplex * original_sum
}
