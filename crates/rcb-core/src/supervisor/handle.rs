use crate::runtime::{LogStream, WorkerId};

/// Lifecycle of the worker container as seen by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    Exited,
    Removed,
}

/// A launched worker, exclusively owned by the supervisor until removal.
pub struct WorkerHandle<'r> {
    id: WorkerId,
    name: String,
    state: WorkerState,
    logs: Option<LogStream<'r>>,
}

impl<'r> WorkerHandle<'r> {
    pub(crate) fn new(id: WorkerId, name: String, logs: LogStream<'r>) -> Self {
        Self {
            id,
            name,
            state: WorkerState::Running,
            logs: Some(logs),
        }
    }

    pub fn id(&self) -> &WorkerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: WorkerState) {
        self.state = state;
    }

    /// Take the log stream; it can be drained once.
    pub(crate) fn take_logs(&mut self) -> Option<LogStream<'r>> {
        self.logs.take()
    }

    pub(crate) fn close_logs(&mut self) {
        self.logs = None;
    }
}

impl std::fmt::Debug for WorkerHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("logs_attached", &self.logs.is_some())
            .finish()
    }
}
