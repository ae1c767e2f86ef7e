//! One full propagation pass over a fact-checking graph.

use std::time::Instant;

use claimgraph_core::{Error, Result, SrwrParams};
use claimgraph_store::{FactGraph, GraphQuery, NodeId};
use ndarray::Array1;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::{collect, distribute, rescale};
use crate::iterate::{run, Convergence};
use crate::topology::{SubgraphTopology, Topology};

/// Optional inputs of a propagation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropagateOptions<'a> {
    /// Nodes to propagate over. Defaults to every evidence node.
    pub universe: Option<&'a [NodeId]>,
    /// Precomputed subgraphs and matrices; when set, `universe` is ignored.
    pub topology: Option<&'a Topology>,
}

/// Outcome of one subgraph, scores already rescaled to its original mass.
#[derive(Debug, Clone, Serialize)]
pub struct SubgraphResult {
    #[serde(rename = "nodeIds")]
    pub node_ids: Vec<NodeId>,
    /// Sum of the subgraph's node scores before propagation.
    #[serde(rename = "originalSum")]
    pub original_sum: f64,
    #[serde(flatten)]
    pub status: Convergence,
    #[serde(rename = "finalScores")]
    pub final_scores: Vec<f64>,
    /// Rescaled score vector of every step, ending with `final_scores`.
    pub trajectory: Vec<Vec<f64>>,
}

/// Summary of a propagation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PropagationReport {
    pub subgraphs: Vec<SubgraphResult>,
    #[serde(rename = "documentsDistributed")]
    pub documents_distributed: usize,
    #[serde(rename = "documentsCollected")]
    pub documents_collected: usize,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}

impl PropagationReport {
    pub fn non_convergent(&self) -> usize {
        self.subgraphs
            .iter()
            .filter(|s| s.status.is_non_convergent())
            .count()
    }

    /// Length of the longest subgraph trajectory.
    pub fn steps(&self) -> usize {
        self.subgraphs
            .iter()
            .map(|s| s.trajectory.len())
            .max()
            .unwrap_or(0)
    }
}

/// Run distribute, per-subgraph SRWR, rescale and collect on `graph`,
/// writing the resulting evidence and document scores back into it.
///
/// Subgraphs are independent: each one converges, falls back or passes
/// through on its own, and all of them finish before documents collect.
pub fn propagate(
    graph: &mut FactGraph,
    params: &SrwrParams,
    options: PropagateOptions<'_>,
) -> Result<PropagationReport> {
    let start = Instant::now();
    let mut report = PropagationReport::default();

    report.documents_distributed = distribute(graph)?;

    let built;
    let topology = match options.topology {
        Some(topology) => {
            topology.validate(&*graph)?;
            topology
        }
        None => {
            built = match options.universe {
                Some(universe) => Topology::build(&*graph, universe),
                None => Topology::evidence(&*graph),
            };
            &built
        }
    };

    let inputs: Vec<(&SubgraphTopology, Array1<f64>)> = topology
        .subgraphs
        .iter()
        .map(|sub| {
            let scores = graph
                .nodes_with_ids(&sub.node_ids)
                .into_iter()
                .map(|n| n.score)
                .collect::<Array1<f64>>();
            (sub, scores)
        })
        .collect();

    for (sub, scores) in &inputs {
        if scores.len() != sub.len() {
            return Err(Error::MalformedTopology(format!(
                "subgraph of {} nodes resolved to {} graph nodes",
                sub.len(),
                scores.len()
            )));
        }
    }

    report.subgraphs = inputs
        .into_par_iter()
        .map(|(sub, initial)| solve_subgraph(sub, initial, params))
        .collect();

    for result in &report.subgraphs {
        for (id, &score) in result.node_ids.iter().zip(result.final_scores.iter()) {
            graph.set_score(id, score)?;
        }
    }

    report.documents_collected = collect(graph)?;
    report.duration_ms = start.elapsed().as_millis() as u64;

    let non_convergent = report.non_convergent();
    if non_convergent > 0 {
        warn!(
            "{} of {} subgraphs did not converge and were set to uniform belief",
            non_convergent,
            report.subgraphs.len()
        );
    }
    info!(
        "Propagation complete: subgraphs={}, steps={}, documents={}, duration={}ms",
        report.subgraphs.len(),
        report.steps(),
        report.documents_collected,
        report.duration_ms
    );

    Ok(report)
}

fn solve_subgraph(sub: &SubgraphTopology, initial: Array1<f64>, params: &SrwrParams) -> SubgraphResult {
    let original_sum = initial.sum();
    let outcome = run(&sub.split, &initial, params);

    let trajectory: Vec<Vec<f64>> = outcome
        .trajectory
        .iter()
        .map(|step| rescale(step, original_sum).to_vec())
        .collect();
    let final_scores = rescale(&outcome.final_score, original_sum).to_vec();

    debug!(
        "Subgraph of {} nodes: {:?}, mass {:.4}",
        sub.len(),
        outcome.status,
        original_sum
    );

    SubgraphResult {
        node_ids: sub.node_ids.clone(),
        original_sum,
        status: outcome.status,
        final_scores,
        trajectory,
    }
}
