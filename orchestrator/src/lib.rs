pub mod configs;
pub mod error;
pub mod report;
mod trainer;

use evolution::{NoiseTable, ParameterSet, arch::PolicyEvaluator};
use log::info;
use rand::{Rng, SeedableRng, rngs::StdRng};
use worker::RolloutWorker;

pub use configs::TrainingConfig;
pub use error::{OrchestratorError, Result};
pub use report::{IterationStats, TestSummary, TrainingHistory};
pub use trainer::Orchestrator;

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub history: TrainingHistory,
    /// The final test, `None` when no test episodes were requested.
    pub test: Option<TestSummary>,
    pub params: ParameterSet,
}

/// Builds every piece of a run from `config`, trains, writes the training curve and runs the
/// final test on a fresh environment.
///
/// Every random stream derives from `config.seed`, in this order: the noise table, the policy
/// initialization, one environment and one noise-index stream per worker, the test
/// environment.
///
/// # Arguments
/// * `config` - The training configuration.
///
/// # Returns
/// The report of the run, or the first setup, worker or output error.
pub fn train(config: TrainingConfig) -> Result<RunReport> {
    config.validate()?;

    let mut seeder = StdRng::seed_from_u64(config.seed);
    let noise_seed: u64 = seeder.random();
    let mut policy_rng = StdRng::seed_from_u64(seeder.random());

    let spec = worker::env::spec_of(&config.env)
        .ok_or_else(|| OrchestratorError::Setup(format!("unknown environment {}", config.env)))?;
    let policy = config.policy.build(&spec, &mut policy_rng)?;
    let params = policy.parameters().clone();

    let table_size = config
        .noise_table_size
        .unwrap_or(config.workers * params.dim());
    info!(
        "training on {} with {} workers, {} parameters, noise table of {table_size}",
        config.env,
        config.workers,
        params.dim()
    );
    let table = NoiseTable::new(noise_seed, table_size);

    let mut workers = Vec::with_capacity(config.workers);
    for id in 0..config.workers {
        let env = make_env(&config.env, seeder.random())?;
        workers.push(RolloutWorker::new(id, env, policy.clone(), seeder.random()));
    }

    let optimizer = config.optimizer.build(&params);
    let mut orchestrator = Orchestrator::new(config.clone(), params, optimizer, table, workers)?;

    let history = orchestrator.train()?;
    if let Some(dir) = &config.output_dir {
        let path = history.write_to(dir)?;
        info!("training curve written to {}", path.display());
    }

    orchestrator.close()?;

    let test = if config.test_episodes > 0 {
        let env = make_env(&config.env, seeder.random())?;
        let mut tester = RolloutWorker::new(config.workers, env, policy, seeder.random());
        let summary = orchestrator.test(&mut tester, config.test_episodes)?;
        tester.close().map_err(|source| OrchestratorError::Worker {
            worker_id: config.workers,
            source,
        })?;
        Some(summary)
    } else {
        None
    };

    Ok(RunReport {
        history,
        test,
        params: orchestrator.into_params(),
    })
}

fn make_env(name: &str, seed: u64) -> Result<Box<dyn worker::Environment>> {
    worker::make(name, seed).map_err(|e| OrchestratorError::Setup(e.to_string()))
}
