//! Fixed-point iteration of the signed random walk with restart.
//!
//! Belief is tracked as two non-negative vectors: `rP` (support mass) and
//! `rN` (refutation mass). Each step moves mass along the transposed
//! positive and negative transition matrices, routes it into `rP` or `rN`
//! according to the four sign-certainty coefficients, and restarts a share
//! `c` of the walk at the initial importance.

use claimgraph_core::SrwrParams;
use ndarray::Array1;
use serde::Serialize;

use crate::normalize::SplitMatrices;

/// How a subgraph's iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Convergence {
    /// One node: nothing to propagate, the initial importance is returned as is.
    Singleton,
    /// The L1 change dropped to `epsilon` after `iterations` steps.
    Converged { iterations: usize },
    /// The iteration cap was hit; the score was replaced by a uniform vector.
    NonConvergent { iterations: usize },
}

impl Convergence {
    pub fn iterations(&self) -> usize {
        match *self {
            Self::Singleton => 0,
            Self::Converged { iterations } | Self::NonConvergent { iterations } => iterations,
        }
    }

    pub fn is_non_convergent(&self) -> bool {
        matches!(self, Self::NonConvergent { .. })
    }
}

/// Result of running the iteration on one subgraph.
#[derive(Debug, Clone)]
pub struct SrwrRun {
    /// Signed score `rP - rN` of the last accepted step, or the uniform
    /// fallback when the run did not converge.
    pub final_score: Array1<f64>,
    /// Signed score after every step, ending with `final_score`.
    pub trajectory: Vec<Array1<f64>>,
    /// Support mass of the last step.
    pub positive: Array1<f64>,
    /// Refutation mass of the last step.
    pub negative: Array1<f64>,
    pub status: Convergence,
}

/// Scale `initial` to sum to one. Negative and non-finite entries count as
/// zero; an all-zero vector becomes uniform.
pub fn normalize_importance(initial: &Array1<f64>) -> Array1<f64> {
    let n = initial.len();
    let cleaned = initial.mapv(|x| if x.is_finite() && x > 0.0 { x } else { 0.0 });
    let total = cleaned.sum();
    if total > 0.0 {
        cleaned / total
    } else {
        uniform(n)
    }
}

fn uniform(n: usize) -> Array1<f64> {
    if n == 0 {
        Array1::zeros(0)
    } else {
        Array1::from_elem(n, 1.0 / n as f64)
    }
}

/// Step-by-step SRWR state for one subgraph.
pub struct SrwrSolver<'a> {
    split: &'a SplitMatrices,
    restart: Array1<f64>,
    params: SrwrParams,
    positive: Array1<f64>,
    negative: Array1<f64>,
    steps: usize,
}

impl<'a> SrwrSolver<'a> {
    /// Start with `rP` at the normalized initial importance and `rN` at zero.
    pub fn new(split: &'a SplitMatrices, initial_importance: &Array1<f64>, params: SrwrParams) -> Self {
        debug_assert_eq!(split.len(), initial_importance.len());
        let restart = normalize_importance(initial_importance);
        let n = restart.len();
        Self {
            split,
            positive: restart.clone(),
            negative: Array1::zeros(n),
            restart,
            params,
            steps: 0,
        }
    }

    /// Advance one step and return the L1 change of the concatenated `(rP, rN)`.
    pub fn step(&mut self) -> f64 {
        let SrwrParams {
            c,
            theta,
            mu,
            beta,
            gamma,
            ..
        } = self.params;

        let pos_t = self.split.pos.t();
        let neg_t = self.split.neg.t();

        let pos_from_p = pos_t.dot(&self.positive);
        let neg_from_p = neg_t.dot(&self.positive);
        let neg_from_n = neg_t.dot(&self.negative);
        let pos_from_n = pos_t.dot(&self.negative);

        let next_positive = (&pos_from_p * theta
            + &neg_from_p * (1.0 - mu)
            + &neg_from_n * beta
            + &pos_from_n * (1.0 - gamma))
            * (1.0 - c)
            + &self.restart * c;
        let next_negative = (&pos_from_p * (1.0 - theta)
            + &neg_from_p * mu
            + &neg_from_n * (1.0 - beta)
            + &pos_from_n * gamma)
            * (1.0 - c);

        debug_assert!(next_positive.iter().all(|&x| x >= 0.0));
        debug_assert!(next_negative.iter().all(|&x| x >= 0.0));

        let delta = (&next_positive - &self.positive).mapv(f64::abs).sum()
            + (&next_negative - &self.negative).mapv(f64::abs).sum();

        self.positive = next_positive;
        self.negative = next_negative;
        self.steps += 1;
        delta
    }

    /// Signed belief `rP - rN`.
    pub fn signed(&self) -> Array1<f64> {
        &self.positive - &self.negative
    }

    pub fn positive(&self) -> &Array1<f64> {
        &self.positive
    }

    pub fn negative(&self) -> &Array1<f64> {
        &self.negative
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

/// Run SRWR on one subgraph until the L1 change is at most `epsilon` or
/// `max_iterations` steps have been taken.
///
/// A one-node subgraph is returned untouched with a one-entry trajectory.
/// Hitting the cap replaces the score with the uniform vector `1/n` and
/// appends it as the last trajectory entry.
pub fn run(split: &SplitMatrices, initial_importance: &Array1<f64>, params: &SrwrParams) -> SrwrRun {
    let n = initial_importance.len();
    if n <= 1 {
        return SrwrRun {
            final_score: initial_importance.clone(),
            trajectory: vec![initial_importance.clone()],
            positive: initial_importance.clone(),
            negative: Array1::zeros(n),
            status: Convergence::Singleton,
        };
    }

    let mut solver = SrwrSolver::new(split, initial_importance, *params);
    let mut trajectory = Vec::new();
    let mut converged = false;

    while solver.steps() < params.max_iterations {
        let delta = solver.step();
        trajectory.push(solver.signed());
        if delta <= params.epsilon {
            converged = true;
            break;
        }
    }

    let iterations = solver.steps();
    let (final_score, status) = if converged {
        (solver.signed(), Convergence::Converged { iterations })
    } else {
        tracing::warn!(
            "SRWR did not converge within {} iterations on {} nodes; using uniform scores",
            iterations,
            n
        );
        let fallback = uniform(n);
        trajectory.push(fallback.clone());
        (fallback, Convergence::NonConvergent { iterations })
    };

    SrwrRun {
        final_score,
        trajectory,
        positive: solver.positive().clone(),
        negative: solver.negative().clone(),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::split;
    use ndarray::array;

    fn params(c: f64, theta: f64, mu: f64, beta: f64, gamma: f64, epsilon: f64) -> SrwrParams {
        SrwrParams {
            c,
            theta,
            mu,
            beta,
            gamma,
            epsilon,
            max_iterations: 50,
        }
    }

    #[test]
    fn test_normalize_importance() {
        let v = normalize_importance(&array![1.0, 3.0]);
        assert_eq!(v, array![0.25, 0.75]);
        assert_eq!(normalize_importance(&array![0.0, 0.0, 0.0, 0.0]), array![0.25, 0.25, 0.25, 0.25]);
        assert_eq!(normalize_importance(&array![-1.0, 1.0]), array![0.0, 1.0]);
    }

    #[test]
    fn test_positive_pair_never_builds_negative_mass() {
        let s = split(&array![[0.0, 1.0], [1.0, 0.0]]);
        let result = run(&s, &array![0.5, 0.5], &params(0.5, 1.0, 1.0, 0.5, 0.9, 0.01));
        assert!(matches!(result.status, Convergence::Converged { iterations } if iterations < 50));
        assert!(result.negative.iter().all(|&x| x == 0.0));
        assert_eq!(result.final_score, result.positive);
    }

    #[test]
    fn test_masses_stay_non_negative_every_step() {
        let a = array![
            [0.0, 0.9, -0.6, 0.0],
            [0.9, 0.0, 0.0, -0.3],
            [-0.6, 0.0, 0.0, 0.8],
            [0.0, -0.3, 0.8, 0.0]
        ];
        let s = split(&a);
        let initial = array![0.4, 0.1, 0.3, 0.2];
        let mut solver = SrwrSolver::new(&s, &initial, params(0.2, 0.7, 0.6, 0.4, 0.3, 0.0));
        for _ in 0..40 {
            solver.step();
            assert!(solver.positive().iter().all(|&x| x >= 0.0));
            assert!(solver.negative().iter().all(|&x| x >= 0.0));
        }
    }

    #[test]
    fn test_total_mass_is_conserved_on_connected_graph() {
        // Every row has a neighbor, so no walk mass leaks out of (rP, rN).
        let s = split(&array![[0.0, 0.5, -0.5], [0.5, 0.0, 0.2], [-0.5, 0.2, 0.0]]);
        let mut solver = SrwrSolver::new(&s, &array![1.0, 1.0, 2.0], params(0.3, 0.8, 0.8, 0.8, 0.8, 0.0));
        for _ in 0..10 {
            solver.step();
            let mass = solver.positive().sum() + solver.negative().sum();
            assert!((mass - 1.0).abs() < 1e-9, "mass drifted to {}", mass);
        }
    }

    #[test]
    fn test_refuting_pair_pushes_negative_belief() {
        let s = split(&array![[0.0, -1.0], [-1.0, 0.0]]);
        let result = run(&s, &array![0.9, 0.1], &params(0.5, 0.8, 1.0, 0.0, 0.8, 0.001));
        assert!(matches!(result.status, Convergence::Converged { .. }));
        // The low-importance node is refuted by the high-importance one.
        assert!(result.final_score[1] < 0.0);
        assert!(result.final_score[0] > result.final_score[1]);
    }

    #[test]
    fn test_oscillation_falls_back_to_uniform() {
        // With no restart, full refutation and beta = 1 the mass swaps
        // between rP and rN forever.
        let s = split(&array![[0.0, -1.0], [-1.0, 0.0]]);
        let result = run(&s, &array![0.5, 0.5], &params(0.0, 0.5, 1.0, 1.0, 0.5, 0.001));
        assert_eq!(result.status, Convergence::NonConvergent { iterations: 50 });
        assert_eq!(result.final_score, array![0.5, 0.5]);
        assert_eq!(result.trajectory.len(), 51);
        assert_eq!(result.trajectory.last().unwrap(), &array![0.5, 0.5]);
    }

    #[test]
    fn test_singleton_passes_through() {
        let s = split(&array![[0.0]]);
        let result = run(&s, &array![0.37], &SrwrParams::default());
        assert_eq!(result.status, Convergence::Singleton);
        assert_eq!(result.status.iterations(), 0);
        assert_eq!(result.trajectory, vec![array![0.37]]);
        assert_eq!(result.final_score, array![0.37]);
    }

    #[test]
    fn test_trajectory_ends_with_final_score() {
        let s = split(&array![[0.0, 0.4, 0.0], [0.4, 0.0, -0.9], [0.0, -0.9, 0.0]]);
        let result = run(&s, &array![0.2, 0.5, 0.3], &SrwrParams::default());
        assert_eq!(result.trajectory.len(), result.status.iterations());
        assert_eq!(result.trajectory.last().unwrap(), &result.final_score);
    }
}
