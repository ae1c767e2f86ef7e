//! Step-by-step replay of a propagation run.
//!
//! Every subgraph converges on its own schedule, so a frame `k` holds entry
//! `k` of each subgraph's trajectory, and subgraphs that already finished
//! hold their last entry. Frames are computed up front; playback only paces
//! them.

use std::time::Duration;

use claimgraph_srwr::PropagationReport;
use futures::Stream;
use tracing::debug;

use crate::types::Frame;

/// Align the subgraph trajectories of `report` into frames.
pub fn frames(report: &PropagationReport) -> Vec<Frame> {
    (0..report.steps())
        .map(|step| {
            let scores = report
                .subgraphs
                .iter()
                .filter_map(|sub| {
                    let entry = sub.trajectory.get(step).or(sub.trajectory.last())?;
                    Some(sub.node_ids.iter().cloned().zip(entry.iter().copied()))
                })
                .flatten()
                .collect();
            Frame { step, scores }
        })
        .collect()
}

/// A finite sequence of frames played back with a fixed delay.
#[derive(Debug, Clone)]
pub struct Playback {
    frames: Vec<Frame>,
    delay: Duration,
}

impl Playback {
    pub fn new(report: &PropagationReport, delay: Duration) -> Self {
        Self::from_frames(frames(report), delay)
    }

    pub fn from_frames(frames: Vec<Frame>, delay: Duration) -> Self {
        Self { frames, delay }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Yield the frames in order, sleeping `delay` between consecutive ones.
    /// Dropping the stream stops playback.
    pub fn stream(self) -> impl Stream<Item = Frame> + Send + 'static {
        let Self { frames, delay } = self;
        debug!("Playing {} frames at {:?} per step", frames.len(), delay);

        async_stream::stream! {
            for (i, frame) in frames.into_iter().enumerate() {
                if i > 0 && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                yield frame;
            }
        }
    }
}
