use std::{fmt, io};

use evolution::EsErr;
use worker::WorkerErr;

/// The orchestrator's result type.
pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// All errors that can occur in the orchestrator.
#[derive(Debug)]
pub enum OrchestratorError {
    /// Invalid configuration, caught before any worker is created.
    InvalidConfig(String),
    /// Failed to build the pieces of a training run.
    Setup(String),
    /// A worker failed during a rollout, the whole run is aborted.
    Worker { worker_id: usize, source: WorkerErr },
    /// A worker outcome arrived in the wrong slot.
    OutOfOrder { expected: usize, got: usize },
    /// A numeric step of the update failed.
    Ml(EsErr),
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Setup(msg) => write!(f, "setup failed: {msg}"),
            Self::Worker { worker_id, source } => write!(f, "worker {worker_id} error: {source}"),
            Self::OutOfOrder { expected, got } => {
                write!(f, "expected the outcome of worker {expected}, got worker {got}")
            }
            Self::Ml(e) => write!(f, "update failed: {e}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Worker { source, .. } => Some(source),
            Self::Ml(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EsErr> for OrchestratorError {
    fn from(e: EsErr) -> Self {
        Self::Ml(e)
    }
}

impl From<io::Error> for OrchestratorError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for OrchestratorError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
