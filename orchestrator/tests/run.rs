use std::fs;

use orchestrator::{OrchestratorError, TrainingConfig, report::AVERAGES_FILE};

fn short_run() -> TrainingConfig {
    TrainingConfig {
        workers: 3,
        seed: 5,
        iterations: 3,
        test_episodes: 2,
        cutoff: f64::INFINITY,
        ..Default::default()
    }
}

#[test]
fn cartpole_run_trains_writes_and_tests() {
    let dir = std::env::temp_dir().join(format!("es-run-{}", std::process::id()));
    let config = TrainingConfig {
        output_dir: Some(dir.clone()),
        ..short_run()
    };

    let report = orchestrator::train(config).unwrap();
    assert_eq!(report.history.len(), 3);
    assert!(report.history.averages().iter().all(|&a| (1. ..=200.).contains(&a)));
    assert_eq!(report.params.dim(), 45);

    let test = report.test.unwrap();
    assert_eq!(test.runs, 2);
    assert!(test.max >= 1 && test.max <= 200);
    assert_eq!(test.average, test.total as f64 / 2.);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join(AVERAGES_FILE)).unwrap()).unwrap();
    assert_eq!(json["iterations"].as_array().map(Vec::len), Some(3));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn same_seed_same_run() {
    let a = orchestrator::train(short_run()).unwrap();
    let b = orchestrator::train(short_run()).unwrap();

    assert_eq!(a.history, b.history);
    assert_eq!(a.params, b.params);
    assert_eq!(a.test, b.test);
}

#[test]
fn zero_test_episodes_skip_the_test() {
    let config = TrainingConfig {
        test_episodes: 0,
        iterations: 1,
        ..short_run()
    };

    let report = orchestrator::train(config).unwrap();
    assert!(report.test.is_none());
}

#[test]
fn bad_setups_fail_before_training() {
    let unknown = TrainingConfig {
        env: "MountainCar-v0".to_string(),
        ..short_run()
    };
    assert!(matches!(orchestrator::train(unknown), Err(OrchestratorError::Setup(_))));

    let tiny_table = TrainingConfig {
        noise_table_size: Some(10),
        ..short_run()
    };
    assert!(matches!(orchestrator::train(tiny_table), Err(OrchestratorError::Setup(_))));

    // 45 parameters for the default CartPole policy, one chunk is not enough for 3 workers.
    let one_chunk = TrainingConfig {
        noise_table_size: Some(45),
        ..short_run()
    };
    assert!(matches!(orchestrator::train(one_chunk), Err(OrchestratorError::Setup(_))));

    let one_chunk_each = TrainingConfig {
        noise_table_size: Some(3 * 45),
        iterations: 1,
        test_episodes: 0,
        ..short_run()
    };
    assert!(orchestrator::train(one_chunk_each).is_ok());
}
