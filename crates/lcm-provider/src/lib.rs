//! Container runtime client abstraction for lcm
//!
//! This crate provides the [`ContainerProvider`] trait used by the dashboard,
//! a bollard-backed implementation that speaks the Docker Engine API, and the
//! connection resolver that picks the first reachable runtime on this machine.

mod connect;
mod docker;
mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
mod types;

pub use connect::{
    candidate_targets, resolve, Attempt, CandidateEnv, Connection, ConnectionTarget, Connector,
    DockerConnector, ResolveError, DEFAULT_PROBE_TIMEOUT,
};
pub use docker::DockerProvider;
pub use error::*;
pub use types::*;

use async_trait::async_trait;

/// Trait for container runtime clients
///
/// Each call is a single request/response exchange with the daemon. Errors are
/// daemon specific and are surfaced to the user verbatim.
#[async_trait]
pub trait ContainerProvider: Send + Sync {
    /// Check that the daemon is alive
    async fn ping(&self) -> Result<()>;

    /// List containers, including stopped ones when `all` is set
    async fn list(&self, all: bool) -> Result<Vec<ContainerSummary>>;

    /// Start a container
    async fn start(&self, id: &ContainerId) -> Result<()>;

    /// Stop a container, giving it `timeout_secs` before it is killed
    async fn stop(&self, id: &ContainerId, timeout_secs: u32) -> Result<()>;

    /// Restart a container, giving it `timeout_secs` to stop first
    async fn restart(&self, id: &ContainerId, timeout_secs: u32) -> Result<()>;

    /// Remove a container
    async fn remove(&self, id: &ContainerId, force: bool) -> Result<()>;

    /// Get the full inspect record of a container
    async fn inspect(&self, id: &ContainerId) -> Result<serde_json::Value>;

    /// Get the last `tail` lines of a container's combined stdout/stderr
    async fn logs(&self, id: &ContainerId, tail: usize) -> Result<String>;

    /// Create an exec instance running `argv` inside the container
    async fn exec_create(&self, id: &ContainerId, argv: &[String]) -> Result<ExecHandle>;

    /// Start an exec instance and collect its combined output until it exits
    async fn exec_attach(&self, handle: &ExecHandle) -> Result<String>;
}
