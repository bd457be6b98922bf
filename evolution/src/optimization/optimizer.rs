use crate::{ParameterSet, Result};

/// Defines the strategy for updating the policy parameters once per iteration.
pub trait Optimizer: Send {
    /// Updates `params` in place from the combined deltas of this iteration.
    ///
    /// # Arguments
    /// * `deltas` - The decay term minus the estimated gradient, with the layout of `params`.
    /// * `params` - The parameters to update.
    ///
    /// # Returns
    /// An error if the layouts of `deltas`, `params` and the optimizer's state differ.
    fn update(&mut self, deltas: &ParameterSet, params: &mut ParameterSet) -> Result<()>;
}
