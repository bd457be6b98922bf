use evolution::{
    EsErr, NoiseTable, ParameterSet, RewardPair, arch::PolicyEvaluator, gradient,
    optimization::Optimizer, shaping,
};
use log::{debug, info};
use ndarray::{Array1, Axis};
use rayon::prelude::*;
use worker::{Environment, RolloutWorker, WorkerOutcome};

use crate::{
    configs::TrainingConfig,
    error::{OrchestratorError, Result},
    report::{IterationStats, TestSummary, TrainingHistory},
};

/// Runs the fork-join training loop.
///
/// Owns the canonical parameters, the optimizer, the noise table and the workers. Workers
/// only read the parameters and the table while rolling out, the update happens after every
/// worker has reported back.
pub struct Orchestrator<E, P> {
    config: TrainingConfig,
    params: ParameterSet,
    optimizer: Box<dyn Optimizer>,
    table: NoiseTable,
    workers: Vec<RolloutWorker<E, P>>,
}

impl<E, P> Orchestrator<E, P>
where
    E: Environment,
    P: PolicyEvaluator,
{
    /// Creates a new `Orchestrator`.
    ///
    /// # Arguments
    /// * `config` - The training configuration.
    /// * `params` - The initial parameters.
    /// * `optimizer` - Applies the updates to `params`.
    /// * `table` - The shared noise table, at least `workers.len() * params.dim()` long.
    /// * `workers` - The workers, worker `i` must have id `i`.
    ///
    /// # Returns
    /// A new `Orchestrator` or a setup error if the pieces don't fit together.
    pub fn new(
        config: TrainingConfig,
        params: ParameterSet,
        optimizer: Box<dyn Optimizer>,
        table: NoiseTable,
        workers: Vec<RolloutWorker<E, P>>,
    ) -> Result<Self> {
        config.validate()?;

        if workers.is_empty() {
            return Err(OrchestratorError::Setup("no workers to train with".to_string()));
        }

        if let Some((i, w)) = workers.iter().enumerate().find(|(i, w)| w.id() != *i) {
            return Err(OrchestratorError::Setup(format!(
                "worker at position {i} has id {}",
                w.id()
            )));
        }

        // Room for one chunk per worker.
        let needed = workers.len().checked_mul(params.dim()).ok_or_else(|| {
            OrchestratorError::Setup(format!(
                "{} workers with {} parameters overflow the noise table size",
                workers.len(),
                params.dim()
            ))
        })?;

        if table.len() < needed {
            return Err(OrchestratorError::Setup(format!(
                "the noise table holds {} values but {} workers with {} parameters need {needed}",
                table.len(),
                workers.len(),
                params.dim()
            )));
        }

        Ok(Self {
            config,
            params,
            optimizer,
            table,
            workers,
        })
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn into_params(self) -> ParameterSet {
        self.params
    }

    /// Runs one training iteration: every worker evaluates an antithetic pair in parallel,
    /// then the rewards are shaped into a gradient estimate and the parameters are updated.
    ///
    /// # Arguments
    /// * `iteration` - The index of this iteration, used for reporting.
    ///
    /// # Returns
    /// The statistics of the iteration, or the first worker or update error.
    pub fn step(&mut self, iteration: usize) -> Result<IterationStats> {
        let outcomes = self.fork()?;
        let stats = summarize(iteration, &outcomes);

        let pairs: Vec<RewardPair> = outcomes.iter().map(|o| o.rewards).collect();
        let fitness: Array1<f32> = shaping::fitness_differences(&pairs)
            .into_iter()
            .map(|f| f as f32)
            .collect();

        let rows: Vec<_> = outcomes.iter().map(|o| o.noise.view()).collect();
        let noise = ndarray::stack(Axis(0), &rows).map_err(EsErr::from)?;

        let grad = gradient::estimate_like(&self.params, noise.view(), fitness.view())?;
        let deltas = self.params.decayed_deltas(self.config.l2, &grad)?;
        self.optimizer.update(&deltas, &mut self.params)?;

        info!(
            iteration = iteration;
            "average episode length {:.2}, average reward {:.2}",
            stats.average_steps,
            stats.average_reward
        );

        Ok(stats)
    }

    /// Runs every worker concurrently and waits for all of them.
    ///
    /// # Returns
    /// The outcomes ordered by worker index, or the first error any worker hit.
    fn fork(&mut self) -> Result<Vec<WorkerOutcome>> {
        let Self {
            config,
            params,
            table,
            workers,
            ..
        } = self;

        let (sigma, step_limit, render) = (config.sigma, config.step_limit, config.render_workers);
        let params: &ParameterSet = params;
        let table: &NoiseTable = table;

        let outcomes = workers
            .par_iter_mut()
            .map(|worker| {
                let worker_id = worker.id();
                worker
                    .antithetic(table, params, sigma, step_limit, render)
                    .map_err(|source| OrchestratorError::Worker { worker_id, source })
            })
            .collect::<Result<Vec<_>>>()?;

        for (expected, outcome) in outcomes.iter().enumerate() {
            if outcome.worker != expected {
                return Err(OrchestratorError::OutOfOrder {
                    expected,
                    got: outcome.worker,
                });
            }
        }

        Ok(outcomes)
    }

    /// Trains until the iteration limit or until the average episode length reaches the
    /// cutoff, whichever comes first.
    ///
    /// # Returns
    /// The training curve or the first error hit, which aborts training.
    pub fn train(&mut self) -> Result<TrainingHistory> {
        let mut history = TrainingHistory::default();

        for iteration in 0..self.config.iterations {
            let stats = self.step(iteration)?;
            history.push(stats);

            if stats.average_steps >= self.config.cutoff {
                info!(
                    "cutoff {} reached after {} iterations",
                    self.config.cutoff,
                    iteration + 1
                );
                history.solved = true;
                break;
            }
        }

        Ok(history)
    }

    /// Evaluates the current parameters on `worker` with an unbounded step budget.
    ///
    /// # Arguments
    /// * `worker` - A worker with a fresh environment.
    /// * `runs` - The amount of test episodes.
    ///
    /// # Returns
    /// The summary of the episode lengths.
    pub fn test<E2, P2>(&self, worker: &mut RolloutWorker<E2, P2>, runs: usize) -> Result<TestSummary>
    where
        E2: Environment,
        P2: PolicyEvaluator,
    {
        let worker_id = worker.id();
        let mut steps = Vec::with_capacity(runs);

        for run in 0..runs {
            let episode = worker
                .rollout(&self.params, usize::MAX, self.config.render_test)
                .map_err(|source| OrchestratorError::Worker { worker_id, source })?;

            debug!("test episode {run} lasted {} steps", episode.steps);
            steps.push(episode.steps);
        }

        let summary = TestSummary::from_steps(&steps);
        info!(
            "test over {} episodes: max={} total={} average={:.2}",
            summary.runs, summary.max, summary.total, summary.average
        );

        Ok(summary)
    }

    /// Closes the environments of every worker.
    pub fn close(&mut self) -> Result<()> {
        for worker in self.workers.iter_mut() {
            let worker_id = worker.id();
            worker
                .close()
                .map_err(|source| OrchestratorError::Worker { worker_id, source })?;
        }

        Ok(())
    }
}

fn summarize(iteration: usize, outcomes: &[WorkerOutcome]) -> IterationStats {
    let episodes = (2 * outcomes.len()) as f64;
    let steps: usize = outcomes.iter().map(WorkerOutcome::total_steps).sum();
    let reward: f64 = outcomes
        .iter()
        .map(|o| o.rewards.positive + o.rewards.negative)
        .sum();

    IterationStats {
        iteration,
        average_steps: steps as f64 / episodes,
        average_reward: reward / episodes,
    }
}
