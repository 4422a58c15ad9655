//! Random walks over the embedding space.

pub mod debias;
pub mod mh;
pub mod sf;

use serde::Serialize;

pub use debias::GroupFactorEstimator;
pub use mh::MhSampler;
pub use sf::SfSampler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// MH proposal accepted.
    Accepted,
    /// MH proposal undone.
    Rejected,
    /// No move was available; the embedding was emptied.
    Restarted,
    /// SF expansion below the size bound.
    Expanded,
    /// SF expansion followed by the removal of another word.
    Drained,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalkStats {
    pub steps: usize,
    pub visited: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub restarts: usize,
    pub expanded: usize,
    pub drained: usize,
}

impl WalkStats {
    pub fn record(&mut self, outcome: StepOutcome) {
        self.steps += 1;
        match outcome {
            StepOutcome::Accepted => self.accepted += 1,
            StepOutcome::Rejected => self.rejected += 1,
            StepOutcome::Restarted => self.restarts += 1,
            StepOutcome::Expanded => self.expanded += 1,
            StepOutcome::Drained => self.drained += 1,
        }
    }

    pub fn merge(&mut self, other: &WalkStats) {
        self.steps += other.steps;
        self.visited += other.visited;
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.restarts += other.restarts;
        self.expanded += other.expanded;
        self.drained += other.drained;
    }
}

/// Wall-clock seed for walks that are not meant to be reproducible.
pub fn random_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
