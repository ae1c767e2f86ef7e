//! Claim verdicts from the documents that support or refute it.

use claimgraph_store::{GraphQuery, Node, NodeType};

use crate::types::Verdict;

/// Documents linked to the claim by a polar edge, with the edge polarity.
fn polar_documents<Q: GraphQuery + ?Sized>(graph: &Q) -> Vec<(&Node, f64)> {
    let Some(claim_id) = graph.ids_of_type(NodeType::Claim).into_iter().next() else {
        return Vec::new();
    };
    graph
        .neighbors_of_type(&claim_id, NodeType::Document)
        .into_iter()
        .filter_map(|doc| {
            graph
                .edge_between(&doc.id, &claim_id)
                .and_then(|e| e.label.polarity())
                .map(|p| (doc, p))
        })
        .collect()
}

fn ratio(supporting: f64, total: f64) -> f64 {
    if total > 0.0 {
        supporting / total
    } else {
        0.5
    }
}

/// Fraction of polar documents that support the claim.
pub fn majority_vote<Q: GraphQuery + ?Sized>(graph: &Q) -> f64 {
    let docs = polar_documents(graph);
    let supporting = docs.iter().filter(|(_, p)| *p > 0.0).count();
    ratio(supporting as f64, docs.len() as f64)
}

/// Like [`majority_vote`], with every document weighted by its score.
pub fn weighted_vote<Q: GraphQuery + ?Sized>(graph: &Q) -> f64 {
    let docs = polar_documents(graph);
    let weight = |d: &Node| d.score.max(0.0);
    let supporting: f64 = docs
        .iter()
        .filter(|(_, p)| *p > 0.0)
        .map(|(d, _)| weight(d))
        .sum();
    let total: f64 = docs.iter().map(|(d, _)| weight(d)).sum();
    ratio(supporting, total)
}

pub fn verdict<Q: GraphQuery + ?Sized>(graph: &Q) -> Verdict {
    Verdict {
        majority: majority_vote(graph),
        weighted: weighted_vote(graph),
    }
}
