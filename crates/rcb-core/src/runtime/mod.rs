//! Container runtime capability consumed by the supervisor.
//!
//! The supervisor never talks to a container engine directly; it drives a [`ContainerRuntime`].
//! `rcb-exec` provides the Docker implementation, tests provide in-memory fakes.
mod error;
pub use error::RuntimeError;

use std::{fmt, time::Duration};

use async_trait::async_trait;
use futures::stream::BoxStream;

use rcb_model::Labels;

/// Followed worker output: raw chunks in arrival order, ending when the worker's process ends.
pub type LogStream<'a> = BoxStream<'a, Result<Vec<u8>, RuntimeError>>;

/// Runtime-assigned container identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully rendered container creation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateRequest {
    pub name: String,
    pub image: String,
    pub command: Option<Vec<String>>,
    /// `KEY=VALUE` entries, worker marker included.
    pub env: Vec<String>,
    /// `host:bind:mode` entries.
    pub binds: Vec<String>,
    pub labels: Labels,
    /// `container:<id>` of the container whose network stack is reused.
    pub network_mode: String,
    pub working_dir: String,
    /// Allocate a pseudo-terminal so stdout and stderr interleave in arrival order.
    pub tty: bool,
}

/// Snapshot of a worker's runtime state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerStatus {
    pub running: bool,
    pub exit_code: Option<i64>,
}

#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    fn name(&self) -> &'static str;

    /// Create and start a detached container.
    async fn create_and_start(&self, req: &CreateRequest) -> Result<WorkerId, RuntimeError>;

    /// Follow combined stdout/stderr from the start of the container's life.
    fn logs(&self, id: &WorkerId) -> LogStream<'_>;

    /// Ask the runtime to stop the worker, killing it after `grace`.
    async fn stop(&self, id: &WorkerId, grace: Duration) -> Result<(), RuntimeError>;

    async fn inspect(&self, id: &WorkerId) -> Result<WorkerStatus, RuntimeError>;

    /// Remove the worker, running or not.
    async fn remove(&self, id: &WorkerId) -> Result<(), RuntimeError>;
}
