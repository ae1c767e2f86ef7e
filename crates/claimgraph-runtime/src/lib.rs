//! Runtime layer: coordinates propagation passes over a graph and turns
//! their reports into claim verdicts, timed playback and parameter sweeps.

pub mod orchestrator;
pub mod playback;
pub mod sweep;
pub mod types;
pub mod verdict;

pub use orchestrator::Propagator;
pub use playback::{frames, Playback};
pub use sweep::{sweep, sweep_each, ParameterGrid};
pub use types::*;
pub use verdict::{majority_vote, verdict, weighted_vote};
