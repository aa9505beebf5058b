//! Test support utilities for lcm-provider
//!
//! Provides MockProvider and MockConnector for unit testing the dashboard and
//! the connection resolver without requiring a real Docker/Podman runtime.

use crate::*;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Records which methods were called on the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Ping,
    List { all: bool },
    Start { id: String },
    Stop { id: String, timeout: u32 },
    Restart { id: String, timeout: u32 },
    Remove { id: String, force: bool },
    Inspect { id: String },
    Logs { id: String, tail: usize },
    ExecCreate { id: String, argv: Vec<String> },
    ExecAttach { exec_id: String },
}

/// Configurable mock container provider for testing
#[derive(Clone)]
pub struct MockProvider {
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    pub ping_result: Arc<Mutex<Result<()>>>,
    pub list_result: Arc<Mutex<Result<Vec<ContainerSummary>>>>,
    pub start_result: Arc<Mutex<Result<()>>>,
    pub stop_result: Arc<Mutex<Result<()>>>,
    pub restart_result: Arc<Mutex<Result<()>>>,
    pub remove_result: Arc<Mutex<Result<()>>>,
    pub inspect_result: Arc<Mutex<Result<serde_json::Value>>>,
    pub logs_result: Arc<Mutex<Result<String>>>,
    /// Error for exec_create calls (if Some, exec_create returns this error)
    pub exec_create_error: Arc<Mutex<Option<ProviderError>>>,
    /// Output returned by exec_attach
    pub exec_output: Arc<Mutex<Result<String>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a new mock provider with default success results
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            ping_result: Arc::new(Mutex::new(Ok(()))),
            list_result: Arc::new(Mutex::new(Ok(Vec::new()))),
            start_result: Arc::new(Mutex::new(Ok(()))),
            stop_result: Arc::new(Mutex::new(Ok(()))),
            restart_result: Arc::new(Mutex::new(Ok(()))),
            remove_result: Arc::new(Mutex::new(Ok(()))),
            inspect_result: Arc::new(Mutex::new(Ok(serde_json::json!({"Id": "mock"})))),
            logs_result: Arc::new(Mutex::new(Ok(String::new()))),
            exec_create_error: Arc::new(Mutex::new(None)),
            exec_output: Arc::new(Mutex::new(Ok(String::new()))),
        }
    }

    /// Mock whose list call returns the given containers
    pub fn with_containers(containers: Vec<ContainerSummary>) -> Self {
        let mock = Self::new();
        *mock.list_result.lock().unwrap() = Ok(containers);
        mock
    }

    /// Record a call
    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a specific call was made
    pub fn was_called(&self, call: &MockCall) -> bool {
        self.calls.lock().unwrap().contains(call)
    }
}

/// Helper to clone a Result<T> from an Arc<Mutex<Result<T>>>
fn clone_result<T: Clone>(r: &Arc<Mutex<Result<T>>>) -> Result<T> {
    let guard = r.lock().unwrap();
    match &*guard {
        Ok(v) => Ok(v.clone()),
        Err(e) => Err(clone_provider_error(e)),
    }
}

/// Clone a ProviderError (thiserror types don't implement Clone)
fn clone_provider_error(e: &ProviderError) -> ProviderError {
    match e {
        ProviderError::ConnectionError(s) => ProviderError::ConnectionError(s.clone()),
        ProviderError::ContainerNotFound(s) => ProviderError::ContainerNotFound(s.clone()),
        ProviderError::ExecError(s) => ProviderError::ExecError(s.clone()),
        ProviderError::RuntimeError(s) => ProviderError::RuntimeError(s.clone()),
        ProviderError::Timeout => ProviderError::Timeout,
        ProviderError::IoError(e) => ProviderError::IoError(std::io::Error::new(e.kind(), e.to_string())),
    }
}

#[async_trait]
impl ContainerProvider for MockProvider {
    async fn ping(&self) -> Result<()> {
        self.record(MockCall::Ping);
        clone_result(&self.ping_result)
    }

    async fn list(&self, all: bool) -> Result<Vec<ContainerSummary>> {
        self.record(MockCall::List { all });
        clone_result(&self.list_result)
    }

    async fn start(&self, id: &ContainerId) -> Result<()> {
        self.record(MockCall::Start { id: id.0.clone() });
        clone_result(&self.start_result)
    }

    async fn stop(&self, id: &ContainerId, timeout_secs: u32) -> Result<()> {
        self.record(MockCall::Stop {
            id: id.0.clone(),
            timeout: timeout_secs,
        });
        clone_result(&self.stop_result)
    }

    async fn restart(&self, id: &ContainerId, timeout_secs: u32) -> Result<()> {
        self.record(MockCall::Restart {
            id: id.0.clone(),
            timeout: timeout_secs,
        });
        clone_result(&self.restart_result)
    }

    async fn remove(&self, id: &ContainerId, force: bool) -> Result<()> {
        self.record(MockCall::Remove {
            id: id.0.clone(),
            force,
        });
        clone_result(&self.remove_result)
    }

    async fn inspect(&self, id: &ContainerId) -> Result<serde_json::Value> {
        self.record(MockCall::Inspect { id: id.0.clone() });
        clone_result(&self.inspect_result)
    }

    async fn logs(&self, id: &ContainerId, tail: usize) -> Result<String> {
        self.record(MockCall::Logs {
            id: id.0.clone(),
            tail,
        });
        clone_result(&self.logs_result)
    }

    async fn exec_create(&self, id: &ContainerId, argv: &[String]) -> Result<ExecHandle> {
        self.record(MockCall::ExecCreate {
            id: id.0.clone(),
            argv: argv.to_vec(),
        });
        if let Some(e) = self.exec_create_error.lock().unwrap().as_ref() {
            return Err(clone_provider_error(e));
        }
        Ok(ExecHandle {
            id: format!("exec-{}", id.0),
            container: id.clone(),
        })
    }

    async fn exec_attach(&self, handle: &ExecHandle) -> Result<String> {
        self.record(MockCall::ExecAttach {
            exec_id: handle.id.clone(),
        });
        clone_result(&self.exec_output)
    }
}

/// Connector whose providers answer pings only for a fixed set of addresses
pub struct MockConnector {
    reachable: HashSet<String>,
    opened: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn reachable(addresses: &[&str]) -> Self {
        Self {
            reachable: addresses.iter().map(|a| a.to_string()).collect(),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Addresses opened so far, in order
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl Connector for MockConnector {
    fn open(&self, address: &str) -> Result<Box<dyn ContainerProvider>> {
        self.opened.lock().unwrap().push(address.to_string());
        let provider = MockProvider::new();
        if !self.reachable.contains(address) {
            *provider.ping_result.lock().unwrap() = Err(ProviderError::ConnectionError(format!(
                "connection refused: {}",
                address
            )));
        }
        Ok(Box::new(provider))
    }
}

/// Build a raw container record the way the daemon reports it
pub fn mock_summary(id: &str, name: &str, state: &str) -> ContainerSummary {
    ContainerSummary {
        id: ContainerId::new(id),
        names: vec![format!("/{}", name)],
        image: format!("{}:latest", name),
        status: match state {
            "running" => "Up 2 hours".to_string(),
            "exited" => "Exited (0) 5 minutes ago".to_string(),
            other => other.to_string(),
        },
        state: state.to_string(),
        ports: Vec::new(),
    }
}
