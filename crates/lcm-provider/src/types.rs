//! Common types for container providers

use serde::{Deserialize, Serialize};

/// Container ID wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(12) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Container lifecycle state as reported by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    Unknown,
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Restarting => write!(f, "restarting"),
            Self::Removing => write!(f, "removing"),
            Self::Exited => write!(f, "exited"),
            Self::Dead => write!(f, "dead"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl From<&str> for ContainerStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "created" => Self::Created,
            "running" => Self::Running,
            "paused" => Self::Paused,
            "restarting" => Self::Restarting,
            "removing" => Self::Removing,
            "exited" => Self::Exited,
            "dead" => Self::Dead,
            _ => Self::Unknown,
        }
    }
}

/// A single port entry from the daemon's container listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    /// Port inside the container
    pub container_port: u16,
    /// Host port, when the container port is published
    pub host_port: Option<u16>,
    /// Protocol (tcp, udp, sctp)
    pub protocol: String,
}

impl PortMapping {
    pub fn new(container_port: u16, host_port: Option<u16>, protocol: impl Into<String>) -> Self {
        Self {
            container_port,
            host_port,
            protocol: protocol.into(),
        }
    }
}

impl std::fmt::Display for PortMapping {
    /// `hostPort:containerPort/proto` when bound, `containerPort/proto` otherwise
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.host_port {
            Some(host) if host > 0 => {
                write!(f, "{}:{}/{}", host, self.container_port, self.protocol)
            }
            _ => write!(f, "{}/{}", self.container_port, self.protocol),
        }
    }
}

/// Raw container record from a list call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub id: ContainerId,
    /// Names as reported by the daemon (Docker prefixes them with `/`)
    pub names: Vec<String>,
    pub image: String,
    /// Human readable status, e.g. "Up 3 hours"
    pub status: String,
    /// Raw lifecycle state string, e.g. "running"
    pub state: String,
    pub ports: Vec<PortMapping>,
}

/// Handle to a created (not yet started) exec instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecHandle {
    pub id: String,
    pub container: ContainerId,
}
