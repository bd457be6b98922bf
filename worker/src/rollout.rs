use evolution::RewardPair;
use ndarray::Array1;

/// The rewards collected during a single episode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Episode {
    pub rewards: Vec<f64>,
    pub steps: usize,
}

impl Episode {
    /// Returns the sum of the rewards of the episode.
    pub fn total(&self) -> f64 {
        self.rewards.iter().sum()
    }
}

/// Everything a worker reports back after an antithetic rollout pair.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerOutcome {
    /// The index of the worker that produced this outcome.
    pub worker: usize,
    /// Where the noise chunk starts in the noise table.
    pub noise_index: usize,
    /// The noise chunk, already scaled by sigma.
    pub noise: Array1<f32>,
    pub rewards: RewardPair,
    /// The steps taken by the positive and negative rollouts.
    pub steps: [usize; 2],
}

impl WorkerOutcome {
    pub fn total_steps(&self) -> usize {
        self.steps[0] + self.steps[1]
    }
}
