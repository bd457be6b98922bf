use ndarray::{Array1, ArrayD, ArrayView1, Zip, s};

use crate::{EsErr, Result};

/// An ordered sequence of parameter tensors.
///
/// Every flat view of the set (noise chunks, gradients) follows the tensors in order and each
/// tensor in its logical iteration order, so a flat vector of length [`ParameterSet::dim`] maps
/// one-to-one onto the set.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    tensors: Vec<ArrayD<f32>>,
}

impl ParameterSet {
    /// Creates a new `ParameterSet`.
    ///
    /// # Arguments
    /// * `tensors` - The tensors in the order the policy consumes them.
    ///
    /// # Returns
    /// A new `ParameterSet` instance.
    pub fn new(tensors: Vec<ArrayD<f32>>) -> Self {
        Self { tensors }
    }

    /// Creates a set with the same layout as `self` filled with zeros.
    pub fn zeros_like(&self) -> Self {
        let tensors = self
            .tensors
            .iter()
            .map(|t| ArrayD::zeros(t.raw_dim()))
            .collect();

        Self { tensors }
    }

    pub fn tensors(&self) -> &[ArrayD<f32>] {
        &self.tensors
    }

    pub fn tensors_mut(&mut self) -> &mut [ArrayD<f32>] {
        &mut self.tensors
    }

    /// Returns the flattened dimensionality of the set, the sum of the tensor sizes.
    pub fn dim(&self) -> usize {
        self.tensors.iter().map(|t| t.len()).sum()
    }

    /// Checks that `other` has exactly the same tensor layout as `self`.
    ///
    /// # Arguments
    /// * `other` - The set to compare against.
    /// * `what` - The name of the compared quantity, used in the error.
    ///
    /// # Returns
    /// An error if the amount of tensors or any of their shapes differ.
    pub fn check_layout(&self, other: &ParameterSet, what: &'static str) -> Result<()> {
        if self.tensors.len() != other.tensors.len() {
            return Err(EsErr::SizeMismatch {
                what,
                got: other.tensors.len(),
                expected: self.tensors.len(),
            });
        }

        for (a, b) in self.tensors.iter().zip(&other.tensors) {
            if a.shape() != b.shape() {
                return Err(EsErr::SizeMismatch {
                    what,
                    got: b.len(),
                    expected: a.len(),
                });
            }
        }

        Ok(())
    }

    /// Flattens the set into a single vector.
    pub fn flatten(&self) -> Array1<f32> {
        self.tensors.iter().flat_map(|t| t.iter().copied()).collect()
    }

    /// Reshapes a flat vector into the layout of `self`.
    ///
    /// # Arguments
    /// * `flat` - A vector of length `self.dim()`.
    ///
    /// # Returns
    /// The new set or an error if `flat` has the wrong length.
    pub fn reshape_like(&self, flat: ArrayView1<f32>) -> Result<ParameterSet> {
        self.check_flat(flat.len(), "flat parameters")?;

        let mut offset = 0;
        let mut tensors = Vec::with_capacity(self.tensors.len());

        for t in &self.tensors {
            let n = t.len();
            let chunk = flat.slice(s![offset..offset + n]).to_vec();
            tensors.push(ArrayD::from_shape_vec(t.raw_dim(), chunk)?);
            offset += n;
        }

        Ok(ParameterSet { tensors })
    }

    /// Returns a copy of `self` with `sign * noise` added elementwise.
    ///
    /// # Arguments
    /// * `noise` - A flat perturbation of length `self.dim()`.
    /// * `sign` - `1.` for the positive perturbation, `-1.` for the negative one.
    ///
    /// # Returns
    /// The perturbed copy or an error if `noise` has the wrong length.
    pub fn perturbed(&self, noise: ArrayView1<f32>, sign: f32) -> Result<ParameterSet> {
        self.check_flat(noise.len(), "noise")?;

        let mut perturbed = self.clone();
        let mut offset = 0;

        for t in perturbed.tensors.iter_mut() {
            let n = t.len();
            t.iter_mut()
                .zip(noise.slice(s![offset..offset + n]))
                .for_each(|(p, e)| *p += sign * e);
            offset += n;
        }

        Ok(perturbed)
    }

    /// Builds the antithetic pair `(self + noise, self - noise)` from independent copies.
    pub fn antithetic(&self, noise: ArrayView1<f32>) -> Result<(ParameterSet, ParameterSet)> {
        Ok((self.perturbed(noise, 1.)?, self.perturbed(noise, -1.)?))
    }

    /// Combines the decay term and the gradient into the deltas fed to an optimizer:
    /// `l2 * self - gradient` for every tensor.
    ///
    /// # Arguments
    /// * `l2` - The decay coefficient.
    /// * `gradient` - A gradient with the layout of `self`.
    ///
    /// # Returns
    /// The deltas or an error if the layouts differ.
    pub fn decayed_deltas(&self, l2: f32, gradient: &ParameterSet) -> Result<ParameterSet> {
        self.check_layout(gradient, "gradient")?;

        let tensors = self
            .tensors
            .iter()
            .zip(&gradient.tensors)
            .map(|(p, g)| Zip::from(p).and(g).map_collect(|&p, &g| l2 * p - g))
            .collect();

        Ok(ParameterSet { tensors })
    }

    fn check_flat(&self, len: usize, what: &'static str) -> Result<()> {
        let dim = self.dim();
        if len != dim {
            return Err(EsErr::SizeMismatch {
                what,
                got: len,
                expected: dim,
            });
        }

        Ok(())
    }
}
