use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use super::{OptimizerConfig, PolicyConfig};
use crate::error::{OrchestratorError, Result};

/// Everything a training run needs, built once and handed to the orchestrator.
///
/// Every field is optional in the serialized form and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// The registered name of the environment.
    pub env: String,
    pub workers: usize,
    pub seed: u64,
    /// The step budget of every training rollout.
    pub step_limit: usize,
    /// The maximum amount of iterations.
    pub iterations: usize,
    /// The amount of episodes of the final test, zero skips it.
    pub test_episodes: usize,
    /// Training stops once the average episode length reaches this value.
    pub cutoff: f64,
    pub sigma: f32,
    pub l2: f32,
    pub optimizer: OptimizerConfig,
    pub policy: PolicyConfig,
    pub render_workers: bool,
    pub render_test: bool,
    /// Where to write the training curve, nothing is written when unset.
    pub output_dir: Option<PathBuf>,
    /// The size of the noise table, `workers * D` when unset.
    pub noise_table_size: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            env: "CartPole-v0".to_string(),
            workers: 2,
            seed: 0,
            step_limit: 100_000,
            iterations: 100,
            test_episodes: 5,
            cutoff: 180.,
            sigma: 0.02,
            l2: 0.005,
            optimizer: OptimizerConfig::default(),
            policy: PolicyConfig::default(),
            render_workers: false,
            render_test: false,
            output_dir: None,
            noise_table_size: None,
        }
    }
}

impl TrainingConfig {
    /// Reads a configuration from a json file.
    ///
    /// # Arguments
    /// * `path` - The path of the file.
    ///
    /// # Returns
    /// The validated configuration or an error if it can't be read, parsed or is invalid.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a configuration from a json string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values of the configuration.
    ///
    /// # Returns
    /// An `InvalidConfig` error describing the first invalid value found.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(OrchestratorError::InvalidConfig(msg));

        if self.env.is_empty() {
            return invalid("the environment name is empty".to_string());
        }

        if self.workers == 0 {
            return invalid("at least one worker is needed".to_string());
        }

        if self.step_limit == 0 {
            return invalid("step_limit must be positive".to_string());
        }

        if !(self.sigma.is_finite() && self.sigma > 0.) {
            return invalid(format!("sigma must be positive, got {}", self.sigma));
        }

        if !(self.l2.is_finite() && self.l2 >= 0.) {
            return invalid(format!("l2 must be non-negative, got {}", self.l2));
        }

        if self.cutoff.is_nan() {
            return invalid("cutoff is NaN".to_string());
        }

        if self.noise_table_size == Some(0) {
            return invalid("noise_table_size must be positive".to_string());
        }

        self.optimizer.validate()?;
        self.policy.validate()
    }
}
