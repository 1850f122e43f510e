use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid mount mode: {0} (expected: rw|ro)")]
    InvalidMountMode(String),
    #[error("launch spec is missing {0}")]
    Missing(&'static str),
}
