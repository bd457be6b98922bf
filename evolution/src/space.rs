use ndarray::Array1;

/// An observation emitted by an environment.
pub type Observation = Array1<f32>;

/// The shape of the actions an environment accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSpace {
    /// Discrete actions: `0..n`.
    Discrete(usize),
    /// Continuous actions: an `n`-dimensional vector in `[-1, 1]`.
    Continuous(usize),
}

impl ActionSpace {
    /// Returns the amount of outputs a policy needs to drive this action space.
    ///
    /// A two-action discrete space is driven by a single thresholded output.
    pub fn policy_outputs(&self) -> usize {
        match *self {
            ActionSpace::Discrete(2) => 1,
            ActionSpace::Discrete(n) | ActionSpace::Continuous(n) => n,
        }
    }
}

/// An action passed to an environment.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Discrete(usize),
    Continuous(Vec<f32>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_space_uses_single_output() {
        assert_eq!(ActionSpace::Discrete(2).policy_outputs(), 1);
        assert_eq!(ActionSpace::Discrete(4).policy_outputs(), 4);
        assert_eq!(ActionSpace::Continuous(3).policy_outputs(), 3);
    }
}
