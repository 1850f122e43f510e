mod error;
pub use error::ExecError;

#[cfg(feature = "docker")]
pub mod docker;
#[cfg(feature = "docker")]
pub use docker::DockerRuntime;
