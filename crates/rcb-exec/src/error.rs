use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("docker connection failed: {0}")]
    Connect(String),
    #[error("container runtime unavailable: {0}")]
    Unavailable(String),
}

pub type ExecResult<T> = Result<T, ExecError>;
