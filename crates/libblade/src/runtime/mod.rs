//! Abstraction over the container runtime an action talks to
use std::time::Duration;

use serde::Deserialize;

use crate::response::ErrorCode;

pub mod docker;

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("failed to reach container runtime at {endpoint}: {reason}")]
    Unreachable { endpoint: String, reason: String },
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to spawn {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
    #[error("{command} failed: {stderr}")]
    Command { command: String, stderr: String },
    #[error("failed to parse runtime output")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

/// Failure of a lookup by id. The code is chosen by the runtime client and
/// passed through unchanged to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LookupError {
    pub code: ErrorCode,
    pub message: String,
}

impl LookupError {
    pub fn not_found(id: &str) -> Self {
        LookupError {
            code: ErrorCode::ContainerNotFound,
            message: ErrorCode::ContainerNotFound.render(&[id]),
        }
    }

    pub fn failed(operation: &str, reason: &str) -> Self {
        LookupError {
            code: ErrorCode::RuntimeExecFailed,
            message: ErrorCode::RuntimeExecFailed.render(&[operation, reason]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: ContainerState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerState {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub running: bool,
}

/// Container lifecycle operations of a connected runtime.
pub trait RuntimeClient {
    fn get_by_id(&self, id: &str) -> Result<ContainerInfo, LookupError>;
    /// Stops the container, waiting at most `timeout` before it is killed,
    /// then removes it.
    fn stop_then_remove(&self, id: &str, timeout: Duration) -> Result<(), RuntimeError>;
    /// Removes the container immediately, killing it if it still runs.
    fn force_remove(&self, id: &str) -> Result<(), RuntimeError>;
}

/// Hands out runtime clients bound to an endpoint. Each call returns a fresh
/// client; implementations must be usable from several invocations at once.
pub trait RuntimeConnector: Send + Sync {
    fn connect(&self, endpoint: &str) -> Result<Box<dyn RuntimeClient>, ConnectError>;
}
