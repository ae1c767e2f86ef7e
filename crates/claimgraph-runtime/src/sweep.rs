//! Parameter sweeps: rerun propagation over a grid of SRWR coefficients and
//! record how the claim's weighted verdict moves.

use std::time::Instant;

use claimgraph_core::{Result, SrwrParams};
use claimgraph_srwr::{propagate, PropagateOptions, Topology};
use claimgraph_store::FactGraph;
use tracing::info;

use crate::types::SweepRow;
use crate::verdict::{verdict, weighted_vote};

/// Evenly spaced grid over `c` and the four sign-certainty coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterGrid {
    /// Number of intervals `c` is split into on `[0, 1]`.
    pub c_steps: usize,
    /// Number of intervals `theta`, `mu`, `beta` and `gamma` are split into.
    pub sign_steps: usize,
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl Default for ParameterGrid {
    fn default() -> Self {
        Self {
            c_steps: 10,
            sign_steps: 5,
            epsilon: 0.01,
            max_iterations: 50,
        }
    }
}

fn axis(steps: usize) -> Vec<f64> {
    if steps == 0 {
        return vec![0.0];
    }
    (0..=steps).map(|i| i as f64 / steps as f64).collect()
}

impl ParameterGrid {
    /// Number of combinations.
    pub fn len(&self) -> usize {
        axis(self.c_steps).len() * axis(self.sign_steps).len().pow(4)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every combination, `c` outermost and `gamma` innermost.
    pub fn iter(&self) -> impl Iterator<Item = SrwrParams> {
        let cs = axis(self.c_steps);
        let signs = axis(self.sign_steps);
        let (epsilon, max_iterations) = (self.epsilon, self.max_iterations);
        let k = signs.len();

        (0..self.len()).map(move |index| {
            let mut rest = index;
            let mut digit = || {
                let d = rest % k;
                rest /= k;
                signs[d]
            };
            let gamma = digit();
            let beta = digit();
            let mu = digit();
            let theta = digit();
            SrwrParams {
                c: cs[rest],
                theta,
                mu,
                beta,
                gamma,
                epsilon,
                max_iterations,
            }
        })
    }
}

/// Run every grid combination from the graph's raw scores, handing each row
/// to `on_row` as soon as it is ready. The graph is left at its raw scores.
///
/// Subgraphs and matrices are built once and shared by all runs.
pub fn sweep_each<F>(graph: &mut FactGraph, grid: &ParameterGrid, mut on_row: F) -> Result<usize>
where
    F: FnMut(SweepRow),
{
    let start = Instant::now();
    graph.reset_scores();
    let topology = Topology::evidence(&*graph);
    let before = verdict(&*graph);

    let mut count = 0;
    for params in grid.iter() {
        graph.reset_scores();
        propagate(
            graph,
            &params,
            PropagateOptions {
                topology: Some(&topology),
                ..Default::default()
            },
        )?;
        on_row(SweepRow {
            params,
            majority: before.majority,
            weighted: before.weighted,
            weighted_after: weighted_vote(&*graph),
        });
        count += 1;
    }
    graph.reset_scores();

    info!(
        "Sweep complete: combinations={}, subgraphs={}, duration={}ms",
        count,
        topology.subgraphs.len(),
        start.elapsed().as_millis()
    );
    Ok(count)
}

/// Collect every row of [`sweep_each`].
pub fn sweep(graph: &mut FactGraph, grid: &ParameterGrid) -> Result<Vec<SweepRow>> {
    let mut rows = Vec::with_capacity(grid.len());
    sweep_each(graph, grid, |row| rows.push(row))?;
    Ok(rows)
}
