use evolution::{NoiseTable, ParameterSet, RewardPair, arch::PolicyEvaluator};
use log::{debug, trace};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    env::Environment,
    error::Result,
    rollout::{Episode, WorkerOutcome},
};

/// Evaluates perturbed parameters on its own environment.
///
/// The environment, the policy and the random stream belong to this worker for the whole run.
pub struct RolloutWorker<E, P> {
    id: usize,
    env: E,
    policy: P,
    rng: StdRng,
}

impl<E, P> RolloutWorker<E, P>
where
    E: Environment,
    P: PolicyEvaluator,
{
    /// Creates a new `RolloutWorker`.
    ///
    /// # Arguments
    /// * `id` - The index of this worker, used to order outcomes.
    /// * `env` - The environment rollouts run on.
    /// * `policy` - Maps observations into actions.
    /// * `seed` - The seed of the stream noise indices are drawn from.
    ///
    /// # Returns
    /// A new `RolloutWorker` instance.
    pub fn new(id: usize, env: E, policy: P, seed: u64) -> Self {
        Self {
            id,
            env,
            policy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// Runs one episode with the given parameters.
    ///
    /// The episode ends when the environment says so or after `step_limit` steps. Any
    /// environment failure aborts the episode.
    ///
    /// # Arguments
    /// * `params` - The parameters loaded into the policy before the episode.
    /// * `step_limit` - The maximum amount of steps to take.
    /// * `render` - Whether the environment should display every step.
    ///
    /// # Returns
    /// The rewards of the episode and the steps taken.
    pub fn rollout(
        &mut self,
        params: &ParameterSet,
        step_limit: usize,
        render: bool,
    ) -> Result<Episode> {
        self.policy.set_parameters(params)?;
        let mut observation = self.env.reset()?;
        let mut episode = Episode::default();

        while episode.steps < step_limit {
            let action = self.policy.apply(&observation)?;
            let outcome = self.env.step(&action, render)?;

            episode.rewards.push(outcome.reward);
            episode.steps += 1;
            observation = outcome.observation;

            if outcome.done {
                break;
            }
        }

        trace!(
            worker = self.id;
            "episode finished: steps={} reward={}",
            episode.steps,
            episode.total()
        );

        Ok(episode)
    }

    /// Evaluates an antithetic pair around `base`.
    ///
    /// Draws a noise chunk from `table` with the worker's own stream, scales it by `sigma` and
    /// rolls out `base + noise` then `base - noise`. `base` is left untouched.
    ///
    /// # Arguments
    /// * `table` - The shared noise table.
    /// * `base` - The current parameters.
    /// * `sigma` - The standard deviation of the perturbation.
    /// * `step_limit` - The step budget of each rollout.
    /// * `render` - Whether the environment should display every step.
    ///
    /// # Returns
    /// The outcome of both rollouts, tagged with this worker's id.
    pub fn antithetic(
        &mut self,
        table: &NoiseTable,
        base: &ParameterSet,
        sigma: f32,
        step_limit: usize,
        render: bool,
    ) -> Result<WorkerOutcome> {
        let dim = base.dim();
        let noise_index = table.sample_index(&mut self.rng, dim)?;
        let noise = table.chunk(noise_index, dim)?.mapv(|e| e * sigma);

        let (pos, neg) = base.antithetic(noise.view())?;
        let pos = self.rollout(&pos, step_limit, render)?;
        let neg = self.rollout(&neg, step_limit, render)?;

        debug!(
            worker = self.id;
            "antithetic pair done: noise_index={noise_index} pos={} neg={} steps={}+{}",
            pos.total(),
            neg.total(),
            pos.steps,
            neg.steps
        );

        Ok(WorkerOutcome {
            worker: self.id,
            noise_index,
            noise,
            rewards: RewardPair::new(pos.total(), neg.total()),
            steps: [pos.steps, neg.steps],
        })
    }

    /// Closes the environment of this worker.
    pub fn close(&mut self) -> Result<()> {
        self.env.close()?;
        debug!(worker = self.id; "environment closed");
        Ok(())
    }
}
