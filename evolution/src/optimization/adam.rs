use ndarray::{ArrayD, Zip};

use super::Optimizer;
use crate::{EsErr, ParameterSet, Result};

/// Adaptive moment estimation with one pair of moment accumulators per tensor.
#[derive(Debug)]
pub struct Adam {
    step_size: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    m: Vec<ArrayD<f32>>,
    v: Vec<ArrayD<f32>>,
    t: i32,
}

impl Adam {
    /// Creates a new `Adam` optimizer.
    ///
    /// # Arguments
    /// * `params` - The parameters this instance will update, only their layout is used.
    /// * `step_size` - The small coefficient that modulates the amount of training per update.
    /// * `beta1`, `beta2`, `epsilon` - Hyperparameters to the optimization algorithm.
    ///
    /// # Returns
    /// A new `Adam` instance.
    pub fn new(params: &ParameterSet, step_size: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        let zeros = params.zeros_like();

        Self {
            step_size,
            beta1,
            beta2,
            epsilon,
            m: zeros.tensors().to_vec(),
            v: zeros.tensors().to_vec(),
            t: 0,
        }
    }

    /// Returns the amount of updates applied so far.
    pub fn steps(&self) -> i32 {
        self.t
    }

    fn check_state(&self, params: &ParameterSet) -> Result<()> {
        if self.m.len() != params.tensors().len() {
            return Err(EsErr::SizeMismatch {
                what: "optimizer state",
                got: params.tensors().len(),
                expected: self.m.len(),
            });
        }

        for (m, p) in self.m.iter().zip(params.tensors()) {
            if m.shape() != p.shape() {
                return Err(EsErr::SizeMismatch {
                    what: "optimizer state",
                    got: p.len(),
                    expected: m.len(),
                });
            }
        }

        Ok(())
    }
}

impl Optimizer for Adam {
    fn update(&mut self, deltas: &ParameterSet, params: &mut ParameterSet) -> Result<()> {
        params.check_layout(deltas, "deltas")?;
        self.check_state(params)?;

        let Self {
            step_size,
            beta1: b1,
            beta2: b2,
            epsilon: eps,
            ..
        } = *self;

        self.t += 1;
        let a = step_size * (1. - b2.powi(self.t)).sqrt() / (1. - b1.powi(self.t));

        let tensors = params.tensors_mut().iter_mut().zip(deltas.tensors());
        let moments = self.m.iter_mut().zip(self.v.iter_mut());

        for ((p, d), (m, v)) in tensors.zip(moments) {
            Zip::from(p)
                .and(d)
                .and(m)
                .and(v)
                .for_each(|p, &d, m, v| {
                    *m = b1 * *m + (1. - b1) * d;
                    *v = b2 * *v + (1. - b2) * d * d;
                    *p -= a * *m / (v.sqrt() + eps);
                });
        }

        Ok(())
    }
}
