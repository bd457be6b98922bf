use std::f64::consts::PI;

use evolution::{Action, Observation};
use log::{info, warn};
use ndarray::Array1;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{EnvSpec, Environment, StepOutcome};
use crate::error::EnvErr;

const GRAVITY: f64 = 9.8;
const CART_MASS: f64 = 1.0;
const POLE_MASS: f64 = 0.1;
const TOTAL_MASS: f64 = CART_MASS + POLE_MASS;
const POLE_HALF_LENGTH: f64 = 0.5;
const FORCE_MAG: f64 = 10.0;
const TAU: f64 = 0.02;
const X_THRESHOLD: f64 = 2.4;
const THETA_THRESHOLD: f64 = 12.0 * PI / 180.0;

/// The classic cart-pole balancing task, integrated with explicit Euler steps.
///
/// Every step yields a reward of 1 and the episode ends when the pole falls, the cart leaves
/// the track or `max_steps` steps were taken.
pub struct CartPole {
    spec: EnvSpec,
    rng: StdRng,
    // x, x_dot, theta, theta_dot
    state: [f64; 4],
    steps: usize,
    done: bool,
    closed: bool,
}

impl CartPole {
    /// Creates a new `CartPole`.
    ///
    /// # Arguments
    /// * `spec` - The description of this variant.
    /// * `seed` - The seed of the initial-state sampling.
    ///
    /// # Returns
    /// A new `CartPole` instance, it must be reset before stepping.
    pub fn new(spec: EnvSpec, seed: u64) -> Self {
        Self {
            spec,
            rng: StdRng::seed_from_u64(seed),
            state: [0.; 4],
            steps: 0,
            done: true,
            closed: false,
        }
    }

    fn observation(&self) -> Observation {
        Array1::from_iter(self.state.iter().map(|&s| s as f32))
    }

    fn check_open(&self) -> Result<(), EnvErr> {
        if self.closed {
            return Err(EnvErr::Closed {
                env: self.spec.name.clone(),
            });
        }

        Ok(())
    }

    fn force(&self, action: &Action) -> Result<f64, EnvErr> {
        match action {
            Action::Discrete(0) => Ok(-FORCE_MAG),
            Action::Discrete(1) => Ok(FORCE_MAG),
            other => Err(EnvErr::InvalidAction {
                env: self.spec.name.clone(),
                detail: format!("expected 0 or 1, got {other:?}"),
            }),
        }
    }
}

impl Environment for CartPole {
    fn reset(&mut self) -> Result<Observation, EnvErr> {
        self.check_open()?;

        for s in self.state.iter_mut() {
            *s = self.rng.random_range(-0.05..0.05);
        }

        self.steps = 0;
        self.done = false;
        Ok(self.observation())
    }

    fn step(&mut self, action: &Action, render: bool) -> Result<StepOutcome, EnvErr> {
        self.check_open()?;
        let force = self.force(action)?;

        if self.done {
            warn!(
                "{} stepped after the episode finished, call reset first",
                self.spec.name
            );

            return Ok(StepOutcome {
                observation: self.observation(),
                reward: 0.,
                done: true,
            });
        }

        let [x, x_dot, theta, theta_dot] = self.state;
        let (sin_theta, cos_theta) = theta.sin_cos();

        let temp = (force + POLE_MASS * POLE_HALF_LENGTH * theta_dot * theta_dot * sin_theta)
            / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (POLE_HALF_LENGTH * (4. / 3. - POLE_MASS * cos_theta * cos_theta / TOTAL_MASS));
        let x_acc = temp - POLE_MASS * POLE_HALF_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];
        self.steps += 1;

        let [x, _, theta, _] = self.state;
        let fallen = x.abs() > X_THRESHOLD || theta.abs() > THETA_THRESHOLD;
        self.done = fallen || self.steps >= self.spec.max_steps;

        if render {
            info!(
                step = self.steps;
                "{}: x={:+.3} x_dot={:+.3} theta={:+.3} theta_dot={:+.3}",
                self.spec.name, self.state[0], self.state[1], self.state[2], self.state[3]
            );
        }

        Ok(StepOutcome {
            observation: self.observation(),
            reward: 1.,
            done: self.done,
        })
    }

    fn close(&mut self) -> Result<(), EnvErr> {
        self.check_open()?;
        self.closed = true;
        Ok(())
    }

    fn spec(&self) -> &EnvSpec {
        &self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::spec_of;

    fn cartpole(name: &str, seed: u64) -> CartPole {
        CartPole::new(spec_of(name).unwrap(), seed)
    }

    #[test]
    fn reset_samples_small_initial_state() {
        let mut env = cartpole("CartPole-v0", 3);
        let obs = env.reset().unwrap();

        assert_eq!(obs.len(), 4);
        assert!(obs.iter().all(|s| s.abs() <= 0.05));
    }

    #[test]
    fn same_seed_same_trajectory() {
        let run = |seed| {
            let mut env = cartpole("CartPole-v0", seed);
            let mut observations = vec![env.reset().unwrap()];
            for i in 0..10 {
                observations.push(env.step(&Action::Discrete(i % 2), false).unwrap().observation);
            }
            observations
        };

        assert_eq!(run(9), run(9));
        assert_ne!(run(9), run(10));
    }

    #[test]
    fn pushing_one_way_drops_the_pole() {
        let mut env = cartpole("CartPole-v1", 0);
        env.reset().unwrap();

        let mut steps = 0;
        let mut total = 0.;
        loop {
            let out = env.step(&Action::Discrete(1), false).unwrap();
            steps += 1;
            total += out.reward;
            if out.done {
                break;
            }
        }

        assert!(steps < 100, "steps={steps}");
        assert_eq!(total, steps as f64);
    }

    #[test]
    fn truncates_at_step_limit() {
        let spec = EnvSpec {
            max_steps: 3,
            ..spec_of("CartPole-v0").unwrap()
        };
        let mut env = CartPole::new(spec, 0);
        env.reset().unwrap();

        assert!(!env.step(&Action::Discrete(0), false).unwrap().done);
        assert!(!env.step(&Action::Discrete(1), false).unwrap().done);
        assert!(env.step(&Action::Discrete(0), false).unwrap().done);

        let after = env.step(&Action::Discrete(1), false).unwrap();
        assert!(after.done);
        assert_eq!(after.reward, 0.);
    }

    #[test]
    fn rejects_unknown_actions() {
        let mut env = cartpole("CartPole-v0", 0);
        env.reset().unwrap();

        assert!(env.step(&Action::Discrete(2), false).is_err());
        assert!(env.step(&Action::Continuous(vec![0.5]), false).is_err());
    }

    #[test]
    fn closed_environment_fails() {
        let mut env = cartpole("CartPole-v0", 0);
        env.close().unwrap();

        assert!(matches!(env.reset(), Err(EnvErr::Closed { .. })));
        assert!(env.step(&Action::Discrete(0), false).is_err());
        assert!(env.close().is_err());
    }
}
