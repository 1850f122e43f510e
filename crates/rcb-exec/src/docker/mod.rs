//! Docker-backed [`ContainerRuntime`].
//!
//! Talks to the local engine through `bollard`, honouring `DOCKER_HOST` the same way the docker CLI does.
use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use bollard::{
    Docker,
    container::{
        Config, CreateContainerOptions, InspectContainerOptions, LogsOptions,
        RemoveContainerOptions, StopContainerOptions,
    },
    errors::Error as BollardError,
    models::HostConfig,
};
use futures::StreamExt;
use tracing::{debug, trace, warn};

use rcb_core::{ContainerRuntime, CreateRequest, LogStream, RuntimeError, WorkerId, WorkerStatus};

use crate::error::{ExecError, ExecResult};

pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect using local defaults and make sure the engine answers.
    pub async fn connect() -> ExecResult<Self> {
        let docker =
            Docker::connect_with_local_defaults().map_err(|e| ExecError::Connect(e.to_string()))?;
        docker
            .ping()
            .await
            .map_err(|e| ExecError::Unavailable(e.to_string()))?;
        debug!(target: "rcb.exec.docker", "docker engine reachable");
        Ok(Self { docker })
    }

    async fn discard_unstarted(&self, id: &WorkerId) {
        if let Err(e) = self.remove(id).await {
            warn!(
                target: "rcb.exec.docker",
                id = %id,
                error = %e,
                "failed to remove unstarted container; it may need manual cleanup"
            );
        }
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    fn name(&self) -> &'static str {
        "docker"
    }

    async fn create_and_start(&self, req: &CreateRequest) -> Result<WorkerId, RuntimeError> {
        trace!(target: "rcb.exec.docker", name = %req.name, image = %req.image, "create");
        let options = CreateContainerOptions {
            name: req.name.clone(),
            ..Default::default()
        };
        let created = self
            .docker
            .create_container(Some(options), container_config(req))
            .await
            .map_err(runtime_error)?;
        for warning in &created.warnings {
            debug!(target: "rcb.exec.docker", %warning, "create warning");
        }

        let id = WorkerId::new(created.id);
        trace!(target: "rcb.exec.docker", %id, "start");
        if let Err(e) = self.docker.start_container::<String>(id.as_str(), None).await {
            // Created but never started: nobody else will clean it up.
            self.discard_unstarted(&id).await;
            return Err(runtime_error(e));
        }
        Ok(id)
    }

    fn logs(&self, id: &WorkerId) -> LogStream<'_> {
        let options = LogsOptions::<String> {
            follow: true,
            stdout: true,
            stderr: true,
            tail: "all".to_string(),
            ..Default::default()
        };
        self.docker
            .logs(id.as_str(), Some(options))
            .map(|chunk| {
                chunk
                    .map(|out| out.into_bytes().to_vec())
                    .map_err(|e| RuntimeError::Stream(e.to_string()))
            })
            .boxed()
    }

    async fn stop(&self, id: &WorkerId, grace: Duration) -> Result<(), RuntimeError> {
        let options = StopContainerOptions {
            t: grace.as_secs() as i64,
        };
        self.docker
            .stop_container(id.as_str(), Some(options))
            .await
            .map_err(runtime_error)
    }

    async fn inspect(&self, id: &WorkerId) -> Result<WorkerStatus, RuntimeError> {
        let info = self
            .docker
            .inspect_container(id.as_str(), None::<InspectContainerOptions>)
            .await
            .map_err(runtime_error)?;
        let state = info.state.unwrap_or_default();
        Ok(WorkerStatus {
            running: state.running.unwrap_or(false),
            exit_code: state.exit_code,
        })
    }

    async fn remove(&self, id: &WorkerId) -> Result<(), RuntimeError> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        self.docker
            .remove_container(id.as_str(), Some(options))
            .await
            .map_err(runtime_error)
    }
}

/// Engine-level create config for a rendered request.
pub fn container_config(req: &CreateRequest) -> Config<String> {
    let labels: HashMap<String, String> = req
        .labels
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Config {
        image: Some(req.image.clone()),
        cmd: req.command.clone(),
        env: Some(req.env.clone()),
        labels: Some(labels),
        working_dir: Some(req.working_dir.clone()),
        tty: Some(req.tty),
        attach_stdout: Some(true),
        attach_stderr: Some(true),
        host_config: Some(HostConfig {
            binds: Some(req.binds.clone()),
            network_mode: Some(req.network_mode.clone()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn runtime_error(e: BollardError) -> RuntimeError {
    match e {
        BollardError::DockerResponseServerError {
            status_code: 404,
            message,
        } => RuntimeError::NotFound(message),
        other => RuntimeError::Api(other.to_string()),
    }
}
