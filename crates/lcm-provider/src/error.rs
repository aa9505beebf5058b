//! Error types for container providers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to connect to container runtime: {0}")]
    ConnectionError(String),

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Exec failed: {0}")]
    ExecError(String),

    #[error("Container runtime error: {0}")]
    RuntimeError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Timeout waiting for operation")]
    Timeout,
}

impl From<bollard::errors::Error> for ProviderError {
    fn from(err: bollard::errors::Error) -> Self {
        match err {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404,
                message,
            } => ProviderError::ContainerNotFound(message),
            bollard::errors::Error::DockerResponseServerError { message, .. } => {
                ProviderError::RuntimeError(message)
            }
            bollard::errors::Error::IOError { err } => ProviderError::IoError(err),
            other => ProviderError::RuntimeError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
