use std::{error::Error, fmt};

use evolution::EsErr;

/// The worker module's result type.
pub type Result<T> = std::result::Result<T, WorkerErr>;

/// Failures reported by an environment.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvErr {
    Closed { env: String },
    InvalidAction { env: String, detail: String },
    Backend(String),
}

impl fmt::Display for EnvErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvErr::Closed { env } => write!(f, "environment {env} is closed"),
            EnvErr::InvalidAction { env, detail } => {
                write!(f, "invalid action for {env}: {detail}")
            }
            EnvErr::Backend(detail) => write!(f, "environment failure: {detail}"),
        }
    }
}

impl Error for EnvErr {}

/// Worker runtime failures.
#[derive(Debug)]
pub enum WorkerErr {
    Env(EnvErr),
    Policy(EsErr),
    UnknownEnvironment(String),
}

impl fmt::Display for WorkerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerErr::Env(e) => write!(f, "rollout failed: {e}"),
            WorkerErr::Policy(e) => write!(f, "policy error: {e}"),
            WorkerErr::UnknownEnvironment(name) => write!(f, "unknown environment: {name}"),
        }
    }
}

impl Error for WorkerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorkerErr::Env(e) => Some(e),
            WorkerErr::Policy(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EnvErr> for WorkerErr {
    fn from(value: EnvErr) -> Self {
        Self::Env(value)
    }
}

impl From<EsErr> for WorkerErr {
    fn from(value: EsErr) -> Self {
        Self::Policy(value)
    }
}
