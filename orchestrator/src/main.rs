use std::env;

use anyhow::{Context, Result};
use log::{error, info};

use orchestrator::TrainingConfig;

const CONFIG_VAR: &str = "ES_CONFIG";

fn main() -> Result<()> {
    env_logger::init();

    run().inspect_err(|e| error!("{e:#}"))
}

fn run() -> Result<()> {
    let path = env::args().nth(1).or_else(|| env::var(CONFIG_VAR).ok());
    let config = match path {
        Some(path) => TrainingConfig::from_path(&path)
            .with_context(|| format!("failed to load the config at {path}"))?,
        None => {
            info!("no config given, using the defaults");
            TrainingConfig::default()
        }
    };

    let report = orchestrator::train(config).context("training failed")?;

    let averages = report.history.averages();
    info!(
        "trained for {} iterations, last average episode length {:.2}",
        report.history.len(),
        averages.last().copied().unwrap_or(0.)
    );

    if let Some(test) = report.test {
        println!(
            "test episodes: {} max: {} total: {} average: {:.2}",
            test.runs, test.max, test.total, test.average
        );
    }

    Ok(())
}
