use evolution::arch::{ActFn, FeedForward};
use rand::Rng;
use serde::{Deserialize, Serialize};
use worker::EnvSpec;

use crate::error::{OrchestratorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActFnConfig {
    #[default]
    Tanh,
    Sigmoid {
        amp: f32,
    },
    Identity,
}

impl From<ActFnConfig> for ActFn {
    fn from(value: ActFnConfig) -> Self {
        match value {
            ActFnConfig::Tanh => ActFn::Tanh,
            ActFnConfig::Sigmoid { amp } => ActFn::sigmoid(amp),
            ActFnConfig::Identity => ActFn::Identity,
        }
    }
}

/// The shape of the feed-forward policy, the input and output layers come from the
/// environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub hidden: Vec<usize>,
    pub act_fn: ActFnConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            hidden: vec![4, 4],
            act_fn: ActFnConfig::Tanh,
        }
    }
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.hidden.contains(&0) {
            return Err(OrchestratorError::InvalidConfig(format!(
                "hidden layers can't be empty, got {:?}",
                self.hidden
            )));
        }

        Ok(())
    }

    /// Returns the width of every layer of the policy for the given environment.
    pub fn sizes(&self, spec: &EnvSpec) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden.len() + 2);
        sizes.push(spec.obs_dim);
        sizes.extend_from_slice(&self.hidden);
        sizes.push(spec.action_space.policy_outputs());
        sizes
    }

    /// Builds a freshly initialized policy for the given environment.
    ///
    /// # Arguments
    /// * `spec` - The description of the environment the policy acts on.
    /// * `rng` - The generator used to initialize the weights.
    ///
    /// # Returns
    /// The new policy or an error if the resulting architecture is invalid.
    pub fn build<R: Rng + ?Sized>(&self, spec: &EnvSpec, rng: &mut R) -> Result<FeedForward> {
        let policy = FeedForward::new(&self.sizes(spec), self.act_fn.into(), spec.action_space, rng)?;
        Ok(policy)
    }
}
