//! Plugin error types

use dockpost_core::FieldError;
use thiserror::Error;

/// Failure of a single external command
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Non-zero exit. `status` is the rendered exit status, `stderr` the tail of its error output.
    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("{0}")]
    Other(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a publish run
#[derive(Error, Debug)]
pub enum PublishError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("failed to login to registry: {0}")]
    LoginFailed(#[source] ExecError),

    #[error("failed to build image: {0}")]
    BuildFailed(#[source] ExecError),

    #[error("failed to push image {image}: {source}")]
    PushFailed {
        image: String,
        #[source]
        source: ExecError,
    },
}

impl PublishError {
    /// Stable error kind reported to the host.
    pub fn kind(&self) -> &'static str {
        match self {
            PublishError::Validation(e) => e.source.kind(),
            PublishError::LoginFailed(_) => "LoginFailed",
            PublishError::BuildFailed(_) => "BuildFailed",
            PublishError::PushFailed { .. } => "PushFailed",
        }
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;
