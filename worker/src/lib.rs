pub mod env;
pub mod error;
pub mod rollout;
pub mod worker;

pub use env::{EnvSpec, Environment, StepOutcome, make};
pub use error::{EnvErr, Result, WorkerErr};
pub use rollout::{Episode, WorkerOutcome};
pub use worker::RolloutWorker;
