use ndarray::Zip;

use super::Optimizer;
use crate::{ParameterSet, Result};

#[derive(Debug)]
pub struct GradientDescent {
    learning_rate: f32,
}

impl GradientDescent {
    /// Creates a new `GradientDescent` optimizer.
    ///
    /// # Arguments
    /// * `learning_rate` - The small coefficient that modulates the amount of training per update.
    ///
    /// # Returns
    /// A new `GradientDescent` instance.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    fn update(&mut self, deltas: &ParameterSet, params: &mut ParameterSet) -> Result<()> {
        params.check_layout(deltas, "deltas")?;

        let lr = self.learning_rate;

        for (p, d) in params.tensors_mut().iter_mut().zip(deltas.tensors()) {
            Zip::from(p).and(d).for_each(|p, &d| *p -= lr * d);
        }

        Ok(())
    }
}
