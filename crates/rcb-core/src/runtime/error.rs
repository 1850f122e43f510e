use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("container runtime api error: {0}")]
    Api(String),
    #[error("container not found: {0}")]
    NotFound(String),
    #[error("log stream error: {0}")]
    Stream(String),
}
