//! Environment capability and the native environments.
//!
//! Mirrors gym's reset/step/close cycle. Every worker owns one instance for the whole run.

mod cartpole;

pub use cartpole::CartPole;

use evolution::{Action, ActionSpace, Observation};

use crate::error::{EnvErr, Result, WorkerErr};

/// The result of a single environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
}

/// The static description of an environment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvSpec {
    pub name: String,
    pub obs_dim: usize,
    pub action_space: ActionSpace,
    pub max_steps: usize,
}

/// An episodic environment.
pub trait Environment: Send {
    /// Starts a new episode.
    ///
    /// # Returns
    /// The first observation of the episode.
    fn reset(&mut self) -> std::result::Result<Observation, EnvErr>;

    /// Advances the episode by one action.
    ///
    /// # Arguments
    /// * `action` - The action to apply.
    /// * `render` - Whether to display the state after the step.
    ///
    /// # Returns
    /// The next observation, the reward of the step and whether the episode finished.
    fn step(&mut self, action: &Action, render: bool) -> std::result::Result<StepOutcome, EnvErr>;

    /// Releases the environment, any further call fails.
    fn close(&mut self) -> std::result::Result<(), EnvErr>;

    fn spec(&self) -> &EnvSpec;
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn reset(&mut self) -> std::result::Result<Observation, EnvErr> {
        (**self).reset()
    }

    fn step(&mut self, action: &Action, render: bool) -> std::result::Result<StepOutcome, EnvErr> {
        (**self).step(action, render)
    }

    fn close(&mut self) -> std::result::Result<(), EnvErr> {
        (**self).close()
    }

    fn spec(&self) -> &EnvSpec {
        (**self).spec()
    }
}

/// Returns the description of a known environment.
pub fn spec_of(name: &str) -> Option<EnvSpec> {
    let max_steps = match name {
        "CartPole-v0" => 200,
        "CartPole-v1" => 500,
        _ => return None,
    };

    Some(EnvSpec {
        name: name.to_string(),
        obs_dim: 4,
        action_space: ActionSpace::Discrete(2),
        max_steps,
    })
}

/// Creates an environment by name.
///
/// # Arguments
/// * `name` - The registered name, e.g. `CartPole-v0`.
/// * `seed` - The seed of the environment's initial-state sampling.
///
/// # Returns
/// The boxed environment or `UnknownEnvironment` if the name is not registered.
pub fn make(name: &str, seed: u64) -> Result<Box<dyn Environment>> {
    let spec = spec_of(name).ok_or_else(|| WorkerErr::UnknownEnvironment(name.to_string()))?;
    Ok(Box::new(CartPole::new(spec, seed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_cartpoles() {
        let v0 = make("CartPole-v0", 1).unwrap();
        assert_eq!(v0.spec().max_steps, 200);
        assert_eq!(v0.spec().obs_dim, 4);
        assert_eq!(v0.spec().action_space, ActionSpace::Discrete(2));

        let v1 = make("CartPole-v1", 1).unwrap();
        assert_eq!(v1.spec().max_steps, 500);
    }

    #[test]
    fn unknown_names_are_rejected() {
        match make("Pendulum-v1", 0) {
            Err(WorkerErr::UnknownEnvironment(name)) => assert_eq!(name, "Pendulum-v1"),
            other => panic!("expected UnknownEnvironment, got {:?}", other.map(|e| e.spec().clone())),
        }
    }
}
