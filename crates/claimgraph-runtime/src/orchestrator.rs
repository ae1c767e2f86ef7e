//! Propagator: runs propagation passes with a fixed configuration.

use claimgraph_core::{PropagationConfig, Result, SrwrParams};
use claimgraph_srwr::{propagate, PropagateOptions, PropagationReport};
use claimgraph_store::FactGraph;
use tracing::info;

use crate::playback::Playback;
use crate::sweep::{sweep, ParameterGrid};
use crate::types::*;
use crate::verdict::verdict;

/// Top-level entry point that applies one configuration to any number of
/// graphs.
pub struct Propagator {
    config: PropagationConfig,
}

impl Propagator {
    pub fn new(config: PropagationConfig) -> Self {
        info!(
            "Propagator initialized: c={}, theta={}, mu={}, beta={}, gamma={}, epsilon={}, max_iterations={}",
            config.params.c,
            config.params.theta,
            config.params.mu,
            config.params.beta,
            config.params.gamma,
            config.params.epsilon,
            config.params.max_iterations
        );
        Self { config }
    }

    /// Create from `CLAIMGRAPH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(PropagationConfig::from_env()?))
    }

    /// Create with explicit coefficients and no playback delay (for testing).
    pub fn with_params(params: SrwrParams) -> Self {
        Self {
            config: PropagationConfig {
                params: params.clamped(),
                ..Default::default()
            },
        }
    }

    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    pub fn params(&self) -> &SrwrParams {
        &self.config.params
    }

    /// Propagate over every evidence node of `graph`.
    pub fn run(&self, graph: &mut FactGraph) -> Result<PropagationReport> {
        self.run_with(graph, PropagateOptions::default())
    }

    /// Propagate with an explicit universe or precomputed topology.
    pub fn run_with(
        &self,
        graph: &mut FactGraph,
        options: PropagateOptions<'_>,
    ) -> Result<PropagationReport> {
        propagate(graph, &self.config.params, options)
    }

    /// Run from the current scores and report the claim verdict before and
    /// after.
    pub fn evaluate(&self, graph: &mut FactGraph) -> Result<Evaluation> {
        let before = verdict(&*graph);
        let report = self.run(graph)?;
        let after = verdict(&*graph);
        Ok(Evaluation {
            params: self.config.params,
            before,
            after,
            report,
        })
    }

    /// Frames of `report`, paced by the configured playback delay.
    pub fn playback(&self, report: &PropagationReport) -> Playback {
        Playback::new(report, self.config.playback_delay)
    }

    /// Sweep `grid` over `graph`. The configured coefficients are not used.
    pub fn sweep(&self, graph: &mut FactGraph, grid: &ParameterGrid) -> Result<Vec<SweepRow>> {
        sweep(graph, grid)
    }
}

impl Default for Propagator {
    fn default() -> Self {
        Self::new(PropagationConfig::default())
    }
}
