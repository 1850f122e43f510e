pub mod config;
pub use config::SupervisorConfig;

pub mod error;
pub use error::{SignalError, SupervisorError};

mod framing;
pub use framing::LineFramer;

pub mod runtime;
pub use runtime::{ContainerRuntime, CreateRequest, LogStream, RuntimeError, WorkerId, WorkerStatus};

mod shutdown;
pub use shutdown::Shutdown;

pub mod signals;

pub mod sink;
pub use sink::{DurableLog, LineSink};

pub mod supervisor;
pub use supervisor::{BackupSupervisor, Phase, WorkerHandle, WorkerState};
