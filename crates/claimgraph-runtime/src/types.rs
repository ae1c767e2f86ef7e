//! Runtime types.

use claimgraph_core::SrwrParams;
use claimgraph_srwr::PropagationReport;
use claimgraph_store::NodeId;
use serde::Serialize;

/// How the documents around a claim lean, as fractions in `[0, 1]` where
/// `1` is full support and `0.5` means undetermined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    /// Share of polar documents that support the claim.
    pub majority: f64,
    /// Share of polar document score that supports the claim.
    pub weighted: f64,
}

/// One propagation pass together with the verdicts around it.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub params: SrwrParams,
    pub before: Verdict,
    pub after: Verdict,
    pub report: PropagationReport,
}

/// Scores of every propagated node at one step of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub step: usize,
    pub scores: Vec<(NodeId, f64)>,
}

/// One parameter combination of a sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    pub params: SrwrParams,
    pub majority: f64,
    pub weighted: f64,
    #[serde(rename = "weightedAfter")]
    pub weighted_after: f64,
}
