use thiserror::Error;

use rcb_model::ModelError;

use crate::runtime::{RuntimeError, WorkerId};

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("invalid launch spec: {0}")]
    InvalidSpec(#[from] ModelError),

    #[error("working directory unavailable: {0}")]
    WorkingDir(#[source] std::io::Error),

    #[error("durable log unavailable: {0}")]
    Sink(#[source] std::io::Error),

    #[error("launch failed: {0}")]
    Launch(#[source] RuntimeError),

    #[error("inspect failed: {0}")]
    Inspect(#[source] RuntimeError),

    #[error("runtime reported no exit code for container {0}")]
    ExitCodeUnavailable(WorkerId),
}

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("signal handlers have been already installed")]
    AlreadyInstalled,

    #[error("failed to register signal handler: {0}")]
    Register(#[from] std::io::Error),
}
