use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::error::Result;

/// The name of the training curve file written into the output directory.
pub const AVERAGES_FILE: &str = "averages.json";

/// What a single training iteration produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IterationStats {
    pub iteration: usize,
    /// The mean length of the `2 * workers` episodes of the iteration.
    pub average_steps: f64,
    /// The mean summed reward of the same episodes.
    pub average_reward: f64,
}

/// The training curve, one entry per completed iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingHistory {
    pub iterations: Vec<IterationStats>,
    /// Whether training stopped because the cutoff was reached.
    pub solved: bool,
}

impl TrainingHistory {
    pub fn push(&mut self, stats: IterationStats) {
        self.iterations.push(stats);
    }

    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    /// Returns the average episode length of every iteration, in order.
    pub fn averages(&self) -> Vec<f64> {
        self.iterations.iter().map(|s| s.average_steps).collect()
    }

    /// Writes the history as json into `dir`, creating it if needed.
    ///
    /// # Arguments
    /// * `dir` - The output directory.
    ///
    /// # Returns
    /// The path of the written file.
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        fs::create_dir_all(&dir)?;
        let path = dir.as_ref().join(AVERAGES_FILE);

        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(path)
    }
}

/// Episode lengths of the final test.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TestSummary {
    pub runs: usize,
    pub max: usize,
    pub total: usize,
    pub average: f64,
}

impl TestSummary {
    /// Summarizes the lengths of the test episodes.
    ///
    /// The average divides by the amount of episodes, an empty run yields zeros.
    pub fn from_steps(steps: &[usize]) -> Self {
        let runs = steps.len();
        let total: usize = steps.iter().sum();
        let max = steps.iter().copied().max().unwrap_or(0);
        let average = if runs == 0 { 0. } else { total as f64 / runs as f64 };

        Self {
            runs,
            max,
            total,
            average,
        }
    }
}
