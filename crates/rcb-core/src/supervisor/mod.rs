//! Backup worker lifecycle.
//!
//! One [`BackupSupervisor::run`] call walks `Idle → Launching → Streaming → Finalizing → Done`:
//! start the worker container, drain its output into a [`LineSink`], then stop (on shutdown),
//! inspect and remove it. Removal is attempted on every path once the container exists.
mod drain;
mod handle;
pub use handle::{WorkerHandle, WorkerState};


use std::{fmt, sync::Mutex};

use tracing::{debug, error, info, instrument, warn};

use rcb_model::{LaunchSpec, Outcome};

use crate::{
    DurableLog, LineSink, Shutdown, SupervisorConfig,
    error::SupervisorError,
    runtime::{ContainerRuntime, CreateRequest, WorkerId},
};

/// Supervisor lifecycle phase. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Idle,
    Launching,
    Streaming,
    Finalizing,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::Launching => "launching",
            Phase::Streaming => "streaming",
            Phase::Finalizing => "finalizing",
            Phase::Done => "done",
        })
    }
}

/// Runs exactly one backup worker container to completion.
pub struct BackupSupervisor<R> {
    runtime: R,
    shutdown: Shutdown,
    cfg: SupervisorConfig,
    phase: Mutex<Phase>,
}

impl<R: ContainerRuntime> BackupSupervisor<R> {
    pub fn new(runtime: R, shutdown: Shutdown, cfg: SupervisorConfig) -> Self {
        Self {
            runtime,
            shutdown,
            cfg,
            phase: Mutex::new(Phase::Idle),
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.cfg
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enter(&self, next: Phase) {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        debug_assert!(next > *phase, "phase moved backwards: {} -> {next}", *phase);
        debug!(target: "rcb.core.supervisor", from = %*phase, to = %next, "phase transition");
        *phase = next;
    }

    /// Full lifecycle with output appended to the configured durable log.
    ///
    /// The log is opened before the container is created, so a log failure never leaves a worker behind.
    pub async fn run(&self, spec: &LaunchSpec) -> Result<Outcome, SupervisorError> {
        let mut sink = DurableLog::open(&self.cfg.log_path)
            .await
            .map_err(SupervisorError::Sink)?;
        let outcome = self.run_into(spec, &mut sink).await;
        if let Err(e) = sink.close().await {
            warn!(target: "rcb.core.supervisor", error = %e, "failed to close durable log");
        }
        outcome
    }

    /// Full lifecycle with output going to `sink`.
    #[instrument(level = "debug", skip_all, fields(image = %spec.image))]
    pub async fn run_into<S>(&self, spec: &LaunchSpec, sink: &mut S) -> Result<Outcome, SupervisorError>
    where
        S: LineSink + ?Sized,
    {
        self.enter(Phase::Launching);
        let mut handle = match self.launch(spec).await {
            Ok(h) => h,
            Err(e) => {
                self.enter(Phase::Done);
                return Err(e);
            }
        };

        self.enter(Phase::Streaming);
        self.drain_logs(&mut handle, sink).await;

        self.enter(Phase::Finalizing);
        let outcome = self.finalize(handle).await;

        self.enter(Phase::Done);
        outcome
    }

    /// Create and start the worker and attach to its output.
    pub async fn launch(&self, spec: &LaunchSpec) -> Result<WorkerHandle<'_>, SupervisorError> {
        let req = self.create_request(spec)?;

        info!(
            target: "rcb.core.supervisor",
            runtime = self.runtime.name(),
            image = %req.image,
            "starting backup container"
        );
        let id = self
            .runtime
            .create_and_start(&req)
            .await
            .map_err(SupervisorError::Launch)?;
        info!(target: "rcb.core.supervisor", name = %req.name, id = %id, "backup process container");

        let logs = self.runtime.logs(&id);
        Ok(WorkerHandle::new(id, req.name, logs))
    }

    /// Render the runtime request for `spec`.
    pub fn create_request(&self, spec: &LaunchSpec) -> Result<CreateRequest, SupervisorError> {
        spec.validate()?;

        let working_dir = match &spec.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(SupervisorError::WorkingDir)?,
        };

        Ok(CreateRequest {
            name: self.worker_name(),
            image: spec.image.clone(),
            command: spec.command.clone(),
            env: spec.environment.with_worker_marker().render(),
            binds: spec.binds(),
            labels: spec.labels.clone(),
            network_mode: spec.network_mode(),
            working_dir: working_dir.to_string_lossy().into_owned(),
            tty: true,
        })
    }

    fn worker_name(&self) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{}-{}", self.cfg.name_prefix, &suffix[..12])
    }

    /// Stop (on shutdown), inspect and remove the worker, then compute the outcome.
    ///
    /// Inspect and removal happen whatever the stop request did. Shutdown requested at any point
    /// up to the end of removal yields [`Outcome::Signaled`]. Inspect errors only surface
    /// when no shutdown was requested, and only after removal was attempted.
    pub async fn finalize(&self, mut handle: WorkerHandle<'_>) -> Result<Outcome, SupervisorError> {
        handle.close_logs();
        let signaled = self.shutdown.is_requested();

        if signaled {
            info!(target: "rcb.core.supervisor", name = handle.name(), "stopping backup container due to signal");
            self.stop_bounded(handle.id()).await;
        }

        let status = self.runtime.inspect(handle.id()).await;
        match &status {
            Ok(s) => {
                debug!(target: "rcb.core.supervisor", exit_code = ?s.exit_code, "container exit code");
                if s.running {
                    warn!(target: "rcb.core.supervisor", name = handle.name(), "container still running at finalize");
                } else {
                    handle.set_state(WorkerState::Exited);
                }
            }
            Err(e) => {
                error!(target: "rcb.core.supervisor", name = handle.name(), error = %e, "failed to inspect container");
            }
        }

        self.remove(&mut handle).await;

        if signaled || self.shutdown.is_requested() {
            info!(target: "rcb.core.supervisor", "exiting due to signal");
            return Ok(Outcome::Signaled);
        }

        let status = status.map_err(SupervisorError::Inspect)?;
        let exit_code = status
            .exit_code
            .ok_or_else(|| SupervisorError::ExitCodeUnavailable(handle.id().clone()))?;
        Ok(Outcome::Completed { exit_code })
    }

    async fn stop_bounded(&self, id: &WorkerId) {
        let deadline = self.cfg.stop_deadline();
        match tokio::time::timeout(deadline, self.runtime.stop(id, self.cfg.stop_grace)).await {
            Ok(Ok(())) => debug!(target: "rcb.core.supervisor", id = %id, "container stopped"),
            Ok(Err(e)) => error!(target: "rcb.core.supervisor", id = %id, error = %e, "error stopping container"),
            Err(_) => warn!(
                target: "rcb.core.supervisor",
                id = %id,
                deadline_ms = deadline.as_millis() as u64,
                "stop request did not complete in time; continuing cleanup"
            ),
        }
    }

    async fn remove(&self, handle: &mut WorkerHandle<'_>) {
        match self.runtime.remove(handle.id()).await {
            Ok(()) => {
                handle.set_state(WorkerState::Removed);
                debug!(target: "rcb.core.supervisor", name = handle.name(), "container removed");
            }
            Err(e) => warn!(
                target: "rcb.core.supervisor",
                name = handle.name(),
                id = %handle.id(),
                error = %e,
                "failed to remove container; it may need manual cleanup"
            ),
        }
    }
}
