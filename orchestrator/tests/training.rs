use evolution::{
    Action, ActionSpace, NoiseTable, Observation, ParameterSet, arch::PolicyEvaluator,
    optimization::Adam,
};
use ndarray::{ArrayD, IxDyn, arr1};
use orchestrator::{Orchestrator, OrchestratorError, TrainingConfig, configs::OptimizerConfig};
use worker::{EnvErr, EnvSpec, Environment, RolloutWorker, StepOutcome};

#[derive(Clone, Copy)]
enum Payout {
    /// The same reward on every step.
    Constant(f64),
    /// The first component of the action.
    Action,
    /// Fails on the first step.
    Fail,
}

/// An episode of `length` steps.
struct MockEnv {
    spec: EnvSpec,
    payout: Payout,
    steps: usize,
}

impl MockEnv {
    fn new(length: usize, payout: Payout) -> Self {
        Self {
            spec: EnvSpec {
                name: "Mock".to_string(),
                obs_dim: 1,
                action_space: ActionSpace::Continuous(1),
                max_steps: length,
            },
            payout,
            steps: 0,
        }
    }
}

impl Environment for MockEnv {
    fn reset(&mut self) -> Result<Observation, EnvErr> {
        self.steps = 0;
        Ok(arr1(&[0.]))
    }

    fn step(&mut self, action: &Action, _render: bool) -> Result<StepOutcome, EnvErr> {
        self.steps += 1;

        let reward = match (self.payout, action) {
            (Payout::Constant(r), _) => r,
            (Payout::Action, Action::Continuous(a)) => a[0] as f64,
            (Payout::Action, Action::Discrete(a)) => *a as f64,
            (Payout::Fail, _) => return Err(EnvErr::Backend("simulator crashed".to_string())),
        };

        Ok(StepOutcome {
            observation: arr1(&[self.steps as f32]),
            reward,
            done: self.steps >= self.spec.max_steps,
        })
    }

    fn close(&mut self) -> Result<(), EnvErr> {
        Ok(())
    }

    fn spec(&self) -> &EnvSpec {
        &self.spec
    }
}

/// Acts with its first parameter, whatever it observes.
#[derive(Clone)]
struct EchoPolicy {
    params: ParameterSet,
}

impl PolicyEvaluator for EchoPolicy {
    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    fn set_parameters(&mut self, params: &ParameterSet) -> evolution::Result<()> {
        self.params.check_layout(params, "policy parameters")?;
        self.params.clone_from(params);
        Ok(())
    }

    fn apply(&self, _observation: &Observation) -> evolution::Result<Action> {
        Ok(Action::Continuous(vec![self.params.flatten()[0]]))
    }
}

fn params(values: &[f32]) -> ParameterSet {
    let t = ArrayD::from_shape_vec(IxDyn(&[values.len()]), values.to_vec()).unwrap();
    ParameterSet::new(vec![t])
}

fn build(
    config: TrainingConfig,
    initial: &[f32],
    length: usize,
    payout: Payout,
) -> Orchestrator<MockEnv, EchoPolicy> {
    let base = params(initial);
    let table = NoiseTable::new(config.seed, config.workers * base.dim());
    let workers = (0..config.workers)
        .map(|id| {
            let policy = EchoPolicy {
                params: base.zeros_like(),
            };
            RolloutWorker::new(id, MockEnv::new(length, payout), policy, config.seed + id as u64)
        })
        .collect();
    let optimizer = config.optimizer.build(&base);

    Orchestrator::new(config, base, optimizer, table, workers).unwrap()
}

#[test]
fn constant_rewards_leave_parameters_unchanged() {
    let config = TrainingConfig {
        workers: 1,
        seed: 10,
        sigma: 0.02,
        l2: 0.,
        iterations: 1,
        cutoff: f64::INFINITY,
        ..Default::default()
    };
    let initial = [0.3, -1.2, 0.7];
    let mut orch = build(config, &initial, 1, Payout::Constant(1.));

    let stats = orch.step(0).unwrap();
    assert_eq!(stats.average_steps, 1.);
    assert_eq!(stats.average_reward, 1.);
    assert_eq!(orch.params(), &params(&initial));
}

#[test]
fn parameters_climb_a_rewarding_direction() {
    let config = TrainingConfig {
        workers: 4,
        seed: 1,
        sigma: 0.05,
        l2: 0.,
        iterations: 25,
        cutoff: f64::INFINITY,
        ..Default::default()
    };
    let mut orch = build(config, &[0., 0.], 3, Payout::Action);

    let mut prev = orch.params().flatten()[0];
    for iteration in 0..25 {
        orch.step(iteration).unwrap();
        let curr = orch.params().flatten()[0];
        assert!(curr > prev, "iteration {iteration}: {curr} <= {prev}");
        prev = curr;
    }
}

#[test]
fn training_stops_at_the_cutoff() {
    let config = TrainingConfig {
        workers: 3,
        iterations: 50,
        cutoff: 10.,
        ..Default::default()
    };
    let mut orch = build(config, &[0.], 10, Payout::Constant(0.5));

    let history = orch.train().unwrap();
    assert_eq!(history.len(), 1);
    assert!(history.solved);
    assert_eq!(history.averages(), vec![10.]);
    assert_eq!(history.iterations[0].average_reward, 5.);
}

#[test]
fn training_runs_every_iteration_below_the_cutoff() {
    let config = TrainingConfig {
        workers: 2,
        iterations: 6,
        cutoff: 180.,
        ..Default::default()
    };
    let mut orch = build(config, &[0., 1.], 4, Payout::Action);

    let history = orch.train().unwrap();
    assert_eq!(history.len(), 6);
    assert!(!history.solved);

    let indices: Vec<_> = history.iterations.iter().map(|s| s.iteration).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn worker_failure_aborts_the_iteration() {
    let config = TrainingConfig {
        workers: 2,
        ..Default::default()
    };
    let mut orch = build(config, &[0.], 5, Payout::Fail);
    let before = orch.params().clone();

    match orch.step(0) {
        Err(OrchestratorError::Worker { worker_id, .. }) => assert!(worker_id < 2),
        other => panic!("expected a worker error, got {other:?}"),
    }
    assert_eq!(orch.params(), &before);
}

#[test]
fn test_phase_reports_episode_lengths() {
    let config = TrainingConfig {
        workers: 1,
        ..Default::default()
    };
    let orch = build(config, &[0.], 2, Payout::Constant(1.));

    let policy = EchoPolicy { params: params(&[0.]) };
    let mut tester = RolloutWorker::new(1, MockEnv::new(7, Payout::Constant(1.)), policy, 0);

    let summary = orch.test(&mut tester, 3).unwrap();
    assert_eq!(summary.runs, 3);
    assert_eq!(summary.max, 7);
    assert_eq!(summary.total, 21);
    assert_eq!(summary.average, 7.);
}

#[test]
fn setup_rejects_mismatched_pieces() {
    let config = TrainingConfig {
        workers: 1,
        ..Default::default()
    };
    let base = params(&[0., 0., 0.]);
    let policy = EchoPolicy {
        params: base.zeros_like(),
    };

    let small_table = Orchestrator::new(
        config.clone(),
        base.clone(),
        Box::new(Adam::new(&base, 0.01, 0.9, 0.999, 1e-8)),
        NoiseTable::new(0, 2),
        vec![RolloutWorker::new(0, MockEnv::new(1, Payout::Action), policy.clone(), 0)],
    );
    assert!(matches!(small_table, Err(OrchestratorError::Setup(_))));

    let misnumbered = Orchestrator::new(
        config.clone(),
        base.clone(),
        Box::new(Adam::new(&base, 0.01, 0.9, 0.999, 1e-8)),
        NoiseTable::new(0, 3),
        vec![RolloutWorker::new(3, MockEnv::new(1, Payout::Action), policy.clone(), 0)],
    );
    assert!(matches!(misnumbered, Err(OrchestratorError::Setup(_))));

    // A table of exactly D values would hand every worker the same chunk.
    let shared_chunk = Orchestrator::new(
        TrainingConfig {
            workers: 2,
            ..config.clone()
        },
        base.clone(),
        Box::new(Adam::new(&base, 0.01, 0.9, 0.999, 1e-8)),
        NoiseTable::new(0, base.dim()),
        (0..2)
            .map(|id| RolloutWorker::new(id, MockEnv::new(1, Payout::Action), policy.clone(), 0))
            .collect(),
    );
    assert!(matches!(shared_chunk, Err(OrchestratorError::Setup(_))));

    let enough = Orchestrator::new(
        TrainingConfig {
            workers: 2,
            ..config.clone()
        },
        base.clone(),
        Box::new(Adam::new(&base, 0.01, 0.9, 0.999, 1e-8)),
        NoiseTable::new(0, 2 * base.dim()),
        (0..2)
            .map(|id| RolloutWorker::new(id, MockEnv::new(1, Payout::Action), policy.clone(), 0))
            .collect(),
    );
    assert!(enough.is_ok());

    let invalid = Orchestrator::<MockEnv, EchoPolicy>::new(
        TrainingConfig {
            sigma: -1.,
            ..config
        },
        base.clone(),
        OptimizerConfig::default().build(&base),
        NoiseTable::new(0, 3),
        Vec::new(),
    );
    assert!(matches!(invalid, Err(OrchestratorError::InvalidConfig(_))));
}
