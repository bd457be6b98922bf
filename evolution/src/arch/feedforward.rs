use ndarray::{Array1, ArrayD, ArrayView1, ArrayView2, Ix1, Ix2, IxDyn};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::{ActFn, PolicyEvaluator};
use crate::{Action, ActionSpace, EsErr, Observation, ParameterSet, Result};

/// A dense feed-forward network used as a policy, forward pass only.
///
/// The parameters are laid out as `[w0, b0, w1, b1, ...]`, where `wi` has shape
/// `(fan_out, fan_in)` and `bi` has shape `(fan_out,)`.
#[derive(Debug, Clone)]
pub struct FeedForward {
    sizes: Vec<usize>,
    act_fn: ActFn,
    action_space: ActionSpace,
    params: ParameterSet,
}

impl FeedForward {
    /// Creates a new `FeedForward` with Xavier-normal weights and zero biases.
    ///
    /// # Arguments
    /// * `sizes` - The width of every layer, input first; the last one must match
    ///   `action_space.policy_outputs()`.
    /// * `act_fn` - The activation applied after every layer.
    /// * `action_space` - How the outputs are decoded into actions.
    /// * `rng` - The generator used to initialize the weights.
    ///
    /// # Returns
    /// A new `FeedForward` instance or an error if the architecture is invalid.
    pub fn new<R: Rng + ?Sized>(
        sizes: &[usize],
        act_fn: ActFn,
        action_space: ActionSpace,
        rng: &mut R,
    ) -> Result<Self> {
        if sizes.len() < 2 || sizes.contains(&0) {
            return Err(EsErr::InvalidArchitecture(format!(
                "expected at least two non-empty layers, got {sizes:?}"
            )));
        }

        let outputs = action_space.policy_outputs();
        let last = sizes[sizes.len() - 1];
        if last != outputs {
            return Err(EsErr::InvalidArchitecture(format!(
                "the output layer has {last} units but {action_space:?} needs {outputs}"
            )));
        }

        let mut tensors = Vec::with_capacity(2 * (sizes.len() - 1));
        for dim in sizes.windows(2) {
            let (fan_in, fan_out) = (dim[0], dim[1]);
            let std_dev = (2. / (fan_in + fan_out) as f32).sqrt();
            let normal = Normal::new(0., std_dev)?;

            let weights: Vec<f32> = (0..fan_in * fan_out)
                .map(|_| normal.sample(&mut *rng))
                .collect();

            tensors.push(ArrayD::from_shape_vec(IxDyn(&[fan_out, fan_in]), weights)?);
            tensors.push(ArrayD::zeros(IxDyn(&[fan_out])));
        }

        Ok(Self {
            sizes: sizes.to_vec(),
            act_fn,
            action_space,
            params: ParameterSet::new(tensors),
        })
    }

    pub fn action_space(&self) -> ActionSpace {
        self.action_space
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `x` - The input, of the size of the first layer.
    ///
    /// # Returns
    /// The activations of the last layer or an error if `x` has the wrong size.
    pub fn forward(&self, x: ArrayView1<f32>) -> Result<Array1<f32>> {
        if x.len() != self.sizes[0] {
            return Err(EsErr::SizeMismatch {
                what: "observation",
                got: x.len(),
                expected: self.sizes[0],
            });
        }

        let mut y = x.to_owned();
        for layer in self.params.tensors().chunks_exact(2) {
            let w: ArrayView2<f32> = layer[0].view().into_dimensionality::<Ix2>()?;
            let b: ArrayView1<f32> = layer[1].view().into_dimensionality::<Ix1>()?;

            y = w.dot(&y) + b;
            y.mapv_inplace(|z| self.act_fn.f(z));
        }

        Ok(y)
    }

    fn decode(&self, y: Array1<f32>) -> Action {
        match self.action_space {
            ActionSpace::Discrete(2) => Action::Discrete((y[0] > 0.) as usize),
            ActionSpace::Discrete(_) => {
                let best = y
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(i, _)| i)
                    .unwrap_or(0);

                Action::Discrete(best)
            }
            ActionSpace::Continuous(_) => Action::Continuous(y.mapv(f32::tanh).to_vec()),
        }
    }
}

impl PolicyEvaluator for FeedForward {
    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    fn set_parameters(&mut self, params: &ParameterSet) -> Result<()> {
        self.params.check_layout(params, "policy parameters")?;
        self.params.clone_from(params);
        Ok(())
    }

    fn apply(&self, observation: &Observation) -> Result<Action> {
        let y = self.forward(observation.view())?;
        Ok(self.decode(y))
    }
}
