//! Connection resolution
//!
//! Tries every known runtime socket convention in priority order and keeps the
//! first one whose daemon answers a ping.

use crate::{ContainerProvider, DockerProvider, ProviderError, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Liveness probe timeout per candidate
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment variable that overrides the daemon address
const DOCKER_HOST_VAR: &str = "DOCKER_HOST";

/// A place a runtime daemon might be listening
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    /// Display name, e.g. "Colima"
    pub name: String,
    /// Daemon address; `None` means "use the `DOCKER_HOST` override"
    pub address: Option<String>,
    /// Whether the label should carry the resolved address
    pub label_with_address: bool,
}

impl ConnectionTarget {
    fn socket(name: &str, address: String) -> Self {
        Self {
            name: name.to_string(),
            address: Some(address),
            label_with_address: false,
        }
    }

    /// Title-bar label once this target resolved to `address`
    pub fn label(&self, address: &str) -> String {
        if self.label_with_address {
            format!("{} ({})", self.name, address)
        } else {
            self.name.clone()
        }
    }
}

/// Process environment the candidate list is derived from
#[derive(Debug, Clone, Default)]
pub struct CandidateEnv {
    /// Value of `DOCKER_HOST`, if set
    pub docker_host: Option<String>,
    /// Address given on the command line, tried before everything else
    pub cli_host: Option<String>,
    pub home: PathBuf,
    pub uid: u32,
}

impl CandidateEnv {
    /// Read the candidate environment from the current process
    pub fn from_process(cli_host: Option<String>) -> Self {
        Self {
            docker_host: std::env::var(DOCKER_HOST_VAR)
                .ok()
                .filter(|v| !v.trim().is_empty()),
            cli_host,
            home: dirs::home_dir().unwrap_or_default(),
            uid: current_uid(),
        }
    }
}

#[cfg(unix)]
fn current_uid() -> u32 {
    nix::unistd::getuid().as_raw()
}

#[cfg(not(unix))]
fn current_uid() -> u32 {
    0
}

/// Build the ordered candidate list
pub fn candidate_targets(env: &CandidateEnv) -> Vec<ConnectionTarget> {
    let home = env.home.display().to_string();
    let mut targets = Vec::new();

    if let Some(host) = &env.cli_host {
        targets.push(ConnectionTarget {
            label_with_address: true,
            ..ConnectionTarget::socket("--host", host.clone())
        });
    }

    targets.push(ConnectionTarget {
        name: DOCKER_HOST_VAR.to_string(),
        address: None,
        label_with_address: true,
    });

    targets.extend([
        ConnectionTarget::socket("Docker Desktop", "unix:///var/run/docker.sock".to_string()),
        ConnectionTarget::socket("Rancher Desktop", format!("unix://{}/.rd/docker.sock", home)),
        ConnectionTarget::socket(
            "Rancher Desktop",
            format!("unix://{}/.docker/run/docker.sock", home),
        ),
        ConnectionTarget::socket(
            "Colima",
            format!("unix://{}/.colima/default/docker.sock", home),
        ),
        ConnectionTarget::socket("Colima", format!("unix://{}/.colima/docker.sock", home)),
        ConnectionTarget::socket(
            "OrbStack",
            format!("unix://{}/.orbstack/run/docker.sock", home),
        ),
        ConnectionTarget::socket(
            "Podman",
            format!(
                "unix://{}/.local/share/containers/podman/machine/podman.sock",
                home
            ),
        ),
        ConnectionTarget::socket(
            "Podman",
            format!(
                "unix://{}/.local/share/containers/podman/machine/qemu/podman.sock",
                home
            ),
        ),
        ConnectionTarget::socket(
            "Podman",
            format!("unix:///run/user/{}/podman/podman.sock", env.uid),
        ),
        ConnectionTarget::socket(
            "Lima",
            format!("unix://{}/.lima/default/sock/docker.sock", home),
        ),
    ]);

    targets
}

/// Opens a client for an address (no I/O; the resolver pings it afterwards)
pub trait Connector {
    fn open(&self, address: &str) -> Result<Box<dyn ContainerProvider>>;
}

/// Connector producing bollard-backed providers
pub struct DockerConnector;

impl Connector for DockerConnector {
    fn open(&self, address: &str) -> Result<Box<dyn ContainerProvider>> {
        Ok(Box::new(DockerProvider::connect(address)?))
    }
}

/// A live daemon handle plus the label shown in the title bar
pub struct Connection {
    pub provider: Box<dyn ContainerProvider>,
    pub label: String,
    pub address: String,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("label", &self.label)
            .field("address", &self.address)
            .finish()
    }
}

/// One failed candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub name: String,
    pub address: String,
    pub error: String,
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Cannot connect to any container runtime: {last_error}")]
    NoRuntime {
        attempts: Vec<Attempt>,
        last_error: String,
    },
}

impl ResolveError {
    /// Candidates that were tried before giving up
    pub fn attempts(&self) -> &[Attempt] {
        match self {
            ResolveError::NoRuntime { attempts, .. } => attempts,
        }
    }
}

/// Try each target in order and return the first one whose daemon answers
pub async fn resolve<C: Connector>(
    connector: &C,
    targets: &[ConnectionTarget],
    env: &CandidateEnv,
    probe_timeout: Duration,
) -> std::result::Result<Connection, ResolveError> {
    let mut attempts = Vec::new();
    let mut last_error = String::from("no candidates");

    for target in targets {
        let address = match (&target.address, &env.docker_host) {
            (Some(address), _) => address.clone(),
            (None, Some(host)) => host.clone(),
            (None, None) => {
                tracing::debug!("{} not set, skipping", target.name);
                continue;
            }
        };
        let label = target.label(&address);

        match probe(connector, &address, probe_timeout).await {
            Ok(provider) => {
                tracing::info!("Connected to {} at {}", label, address);
                return Ok(Connection {
                    provider,
                    label,
                    address,
                });
            }
            Err(e) => {
                tracing::debug!("{} at {} unavailable: {}", target.name, address, e);
                last_error = e.to_string();
                attempts.push(Attempt {
                    name: target.name.clone(),
                    address,
                    error: last_error.clone(),
                });
            }
        }
    }

    Err(ResolveError::NoRuntime {
        attempts,
        last_error,
    })
}

async fn probe<C: Connector>(
    connector: &C,
    address: &str,
    timeout: Duration,
) -> Result<Box<dyn ContainerProvider>> {
    let provider = connector.open(address)?;
    match tokio::time::timeout(timeout, provider.ping()).await {
        Ok(Ok(())) => Ok(provider),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(ProviderError::Timeout),
    }
}
