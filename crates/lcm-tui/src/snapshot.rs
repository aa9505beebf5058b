//! Container snapshot: normalized records built from a list-all call

use lcm_provider::{ContainerId, ContainerProvider, ContainerStatus, ContainerSummary};

/// A container as the dashboard shows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    /// Short (12 character) id
    pub id: ContainerId,
    pub name: String,
    pub image: String,
    /// Human readable status, e.g. "Up 3 hours"
    pub status: String,
    pub state: ContainerStatus,
    /// `hostPort:containerPort/proto` or `containerPort/proto`, in daemon order
    pub ports: Vec<String>,
}

impl ContainerRecord {
    pub fn from_summary(summary: ContainerSummary) -> Self {
        let name = summary
            .names
            .first()
            .map(|n| n.strip_prefix('/').unwrap_or(n).to_string())
            .unwrap_or_default();

        Self {
            id: ContainerId::new(summary.id.short()),
            name,
            image: summary.image,
            status: summary.status,
            state: ContainerStatus::from(summary.state.as_str()),
            ports: summary.ports.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Ports joined with `sep`, or `None` when the container exposes nothing
    pub fn ports_joined(&self, sep: &str) -> Option<String> {
        if self.ports.is_empty() {
            None
        } else {
            Some(self.ports.join(sep))
        }
    }

    /// First port that is published on the host
    pub fn first_host_port(&self) -> Option<u16> {
        self.ports.iter().find_map(|p| {
            let (host, _) = p.split_once(':')?;
            host.parse::<u16>().ok().filter(|port| *port > 0)
        })
    }
}

/// Fetch every container (running or not) and normalize it
pub async fn load(provider: &dyn ContainerProvider) -> lcm_provider::Result<Vec<ContainerRecord>> {
    let containers = provider.list(true).await?;
    tracing::debug!("Loaded {} containers", containers.len());
    Ok(containers
        .into_iter()
        .map(ContainerRecord::from_summary)
        .collect())
}
