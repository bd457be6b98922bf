use evolution::{
    ParameterSet,
    optimization::{Adam, GradientDescent, Optimizer},
};
use serde::{Deserialize, Serialize};

use crate::error::{OrchestratorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum OptimizerConfig {
    Adam {
        step_size: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    },
    GradientDescent {
        learning_rate: f32,
    },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam {
            step_size: 0.01,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, x: f32| {
            if x.is_finite() && x > 0. {
                Ok(())
            } else {
                Err(OrchestratorError::InvalidConfig(format!(
                    "{name} must be positive, got {x}"
                )))
            }
        };

        let unit = |name: &str, x: f32| {
            if (0. ..1.).contains(&x) {
                Ok(())
            } else {
                Err(OrchestratorError::InvalidConfig(format!(
                    "{name} must be in [0, 1), got {x}"
                )))
            }
        };

        match *self {
            Self::Adam {
                step_size,
                beta1,
                beta2,
                epsilon,
            } => {
                positive("step_size", step_size)?;
                unit("beta1", beta1)?;
                unit("beta2", beta2)?;
                positive("epsilon", epsilon)
            }
            Self::GradientDescent { learning_rate } => positive("learning_rate", learning_rate),
        }
    }

    /// Builds the optimizer this configuration describes.
    ///
    /// # Arguments
    /// * `params` - The parameters the optimizer will update.
    ///
    /// # Returns
    /// The optimizer, ready to update `params`.
    pub fn build(&self, params: &ParameterSet) -> Box<dyn Optimizer> {
        match *self {
            Self::Adam {
                step_size,
                beta1,
                beta2,
                epsilon,
            } => Box::new(Adam::new(params, step_size, beta1, beta2, epsilon)),
            Self::GradientDescent { learning_rate } => {
                Box::new(GradientDescent::new(learning_rate))
            }
        }
    }
}
