use crate::{Action, Observation, ParameterSet, Result};

/// Maps observations to actions under a set of parameters.
///
/// The parameters are loaded with `set_parameters` right before every rollout, each worker
/// owns its own evaluator.
pub trait PolicyEvaluator: Send {
    /// Returns the current parameters, in the layout `set_parameters` expects.
    fn parameters(&self) -> &ParameterSet;

    /// Loads a new set of parameters.
    ///
    /// # Returns
    /// An error if `params` doesn't have the evaluator's layout.
    fn set_parameters(&mut self, params: &ParameterSet) -> Result<()>;

    /// Computes the action to take for `observation`.
    ///
    /// # Returns
    /// An error if the observation doesn't have the expected size.
    fn apply(&self, observation: &Observation) -> Result<Action>;
}
